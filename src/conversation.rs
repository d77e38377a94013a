//! Chat session controller
//!
//! Owns the ordered message history and the request lifecycle for chat mode.
//! The history is append-only and strictly chronological; a pushed message is
//! never mutated. At most one request is in flight at a time: submissions
//! while `Sending` are rejected without touching the history.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::client::{AskMode, GuidanceClient};
use crate::normalize;
use crate::verse::{Language, Verse};

/// Shown once at session start, before any exchange.
pub const GREETING: &str = "🙏 Namaste! I am Krishna, here to guide you with wisdom \
from the Bhagavad Gita. Share your questions about life, dharma, or any challenges \
you face, and I shall offer divine guidance.";

/// Fixed user-facing text for any failed request; the underlying error is
/// logged but never displayed.
pub const APOLOGY: &str = "I apologize, but I'm having trouble connecting to the \
divine wisdom at the moment. Please try again.";

/// Fallback reference line when the service names no verses.
const DEFAULT_REFERENCE: &str = "Bhagavad Gita Wisdom";

/// Assistant verse excerpts are cut to this many characters.
const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    SystemError,
}

/// One turn in the conversation. Immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    /// Present only for Assistant turns that carried guidance.
    pub verse: Option<Verse>,
    /// Joined reference line for Assistant turns.
    pub reference: Option<String>,
    /// Present only when emotion mode was active.
    pub detected_emotion: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn now(kind: MessageKind, text: String) -> Self {
        Self {
            kind,
            text,
            verse: None,
            reference: None,
            detected_emotion: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Sending,
}

/// Outcome of a [`ConversationController::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Request completed and an Assistant message was appended.
    Answered,
    /// Request failed; a SystemError message was appended instead.
    Failed,
    /// Input was empty after trimming; nothing changed.
    RejectedEmpty,
    /// A request was already in flight; nothing changed.
    RejectedBusy,
}

/// State machine for the chat session. Lives for the page/process session;
/// success and error both return it to `Idle`.
pub struct ConversationController {
    client: GuidanceClient,
    messages: Vec<Message>,
    state: ConversationState,
}

impl ConversationController {
    /// Start a session seeded with the greeting message.
    pub fn new(client: GuidanceClient) -> Self {
        Self {
            client,
            messages: vec![Message::now(MessageKind::Assistant, GREETING.to_string())],
            state: ConversationState::Idle,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Submit a user question.
    ///
    /// Appends the User message before the network call completes, then
    /// either an Assistant message (normalized verse attached) or a fixed
    /// apology on failure. Transport and service errors are absorbed here;
    /// the session stays usable either way.
    pub async fn submit(
        &mut self,
        text: &str,
        language: Language,
        mode: AskMode,
    ) -> SubmitStatus {
        let text = text.trim();
        if text.is_empty() {
            return SubmitStatus::RejectedEmpty;
        }
        if self.state == ConversationState::Sending {
            warn!("submit rejected: a request is already in flight");
            return SubmitStatus::RejectedBusy;
        }

        self.messages
            .push(Message::now(MessageKind::User, text.to_string()));
        self.state = ConversationState::Sending;

        let status = match self.client.ask(text, language, mode).await {
            Ok(response) => {
                let emotions: Vec<String> = if mode == AskMode::Emotion {
                    response.detected_emotion.iter().cloned().collect()
                } else {
                    vec![]
                };

                let mut verse = normalize::verse_from_answer(
                    &response.krishna_response,
                    &response.verses_referenced,
                    emotions,
                );
                verse.english = normalize::excerpt(&response.krishna_response, EXCERPT_CHARS);

                let reference = if response.verses_referenced.is_empty() {
                    DEFAULT_REFERENCE.to_string()
                } else {
                    response.verses_referenced.join(", ")
                };

                let detected_emotion = if mode == AskMode::Emotion {
                    response.detected_emotion.clone()
                } else {
                    None
                };

                info!(
                    reference = %verse.reference(),
                    themes = ?verse.themes,
                    "guidance received"
                );

                self.messages.push(Message {
                    kind: MessageKind::Assistant,
                    text: response.krishna_response,
                    verse: Some(verse),
                    reference: Some(reference),
                    detected_emotion,
                    created_at: Utc::now(),
                });
                SubmitStatus::Answered
            }
            Err(err) => {
                warn!("ask failed: {}", err);
                self.messages
                    .push(Message::now(MessageKind::SystemError, APOLOGY.to_string()));
                SubmitStatus::Failed
            }
        };

        self.state = ConversationState::Idle;
        status
    }
}
