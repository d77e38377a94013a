//! Command implementations
//!
//! Each module corresponds to a subcommand in the CLI. Commands are thin
//! consumers of the controllers: they render state and forward user intents,
//! nothing more.

pub mod ask;
pub mod chat;
pub mod health;
pub mod study;

pub use ask::run as ask_run;
pub use chat::run as chat_run;
pub use health::run as health_run;
pub use study::{run as study_run, StudyArgs};
