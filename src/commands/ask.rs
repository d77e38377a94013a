//! One-shot question command

use crate::client::{AskMode, GuidanceClient};
use crate::config::Config;
use crate::conversation::{ConversationController, MessageKind};
use crate::error::Result;
use crate::verse::Language;

pub async fn run(config: &Config, question: &str, language: Language, mode: AskMode) -> Result<()> {
    let client = GuidanceClient::from_config(config)?;
    let mut controller = ConversationController::new(client);

    controller.submit(question, language, mode).await;

    // Render the last turn only; the greeting is chat-mode furniture.
    if let Some(message) = controller
        .messages()
        .iter()
        .rev()
        .find(|m| m.kind != MessageKind::User)
    {
        println!("{}", message.text);

        if let Some(verse) = &message.verse {
            println!();
            println!("  {}", verse.reference());
            println!("  Themes: {}", verse.themes.join(", "));
        }
        if let Some(emotion) = &message.detected_emotion {
            println!("  Detected emotion: {}", emotion);
        }
    }

    Ok(())
}
