//! Interactive chat command
//!
//! REPL over the conversation controller. Reads one question per line;
//! "quit" or EOF ends the session.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::client::{AskMode, GuidanceClient};
use crate::config::Config;
use crate::conversation::{ConversationController, MessageKind, SubmitStatus};
use crate::error::Result;
use crate::verse::Language;

pub async fn run(config: &Config, language: Language, mode: AskMode) -> Result<()> {
    let client = GuidanceClient::from_config(config)?;

    // Connectivity indicator, same role as the web header's status dot.
    match client.health().await {
        Ok(()) => println!("● connected to {}", client.base_url()),
        Err(err) => {
            warn!("health probe failed: {}", err);
            println!("○ service unreachable at {} (answers may fail)", client.base_url());
        }
    }

    let mut controller = ConversationController::new(client);
    println!("{}\n", controller.messages()[0].text);
    println!(
        "[{} mode, {}] Type your question, or \"quit\" to leave.",
        mode.as_str(),
        language.display_label()
    );

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match controller.submit(line, language, mode).await {
            SubmitStatus::RejectedEmpty => continue,
            SubmitStatus::RejectedBusy => {
                println!("(still waiting on the previous answer)");
                continue;
            }
            SubmitStatus::Answered | SubmitStatus::Failed => {}
        }

        if let Some(message) = controller.messages().last() {
            match message.kind {
                MessageKind::Assistant => {
                    println!("\nKrishna: {}", message.text);
                    if let Some(emotion) = &message.detected_emotion {
                        println!("  [{}]", emotion);
                    }
                    if let Some(verse) = &message.verse {
                        if let Some(reference) = &message.reference {
                            println!("  — {}", reference);
                        }
                        println!("  Themes: {}\n", verse.themes.join(", "));
                    }
                }
                MessageKind::SystemError => println!("\n{}\n", message.text),
                MessageKind::User => {}
            }
        }
    }

    println!("🙏 Farewell.");
    Ok(())
}
