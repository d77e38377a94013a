//! Ask Krishna Guidance Client Library
//!
//! This library provides the client core for a Bhagavad Gita guidance
//! service:
//! - Ask free-text questions and keep an append-only chat session
//! - Browse the corpus by chapter, verse reference, or theme (study mode)
//! - Normalize free-text answers into typed verses with theme tags and
//!   chapter/verse references
//! - Probe service connectivity

pub mod client;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod normalize;
pub mod study;
pub mod verse;

// Re-export common types
pub use client::{AskMode, AskResponse, GuidanceClient, StudyRequest, StudyResponse};
pub use config::Config;
pub use conversation::{ConversationController, ConversationState, Message, MessageKind, SubmitStatus};
pub use error::{Error, Result};
pub use study::{SearchMode, SearchQuery, SearchResult, StudyQueryController, POPULAR_THEMES};
pub use verse::{Language, Verse};
