//! Gita Guide CLI - main entry point
//!
//! Unified CLI for the Ask Krishna guidance service: chat, one-shot
//! questions, study searches, and a connectivity check.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gita_guide::commands::{self, StudyArgs};
use gita_guide::{AskMode, Config, Language};

#[derive(Parser)]
#[command(name = "gita_guide")]
#[command(about = "Ask Krishna — Bhagavad Gita guidance client", long_about = None)]
#[command(version)]
struct Cli {
    /// Answer language: english | hindi | sanskrit (default from config.yml)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat {
        /// Chat mode: default | emotion | study (default from config.yml)
        #[arg(short, long)]
        mode: Option<AskMode>,
    },

    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        /// Chat mode: default | emotion | study (default from config.yml)
        #[arg(short, long)]
        mode: Option<AskMode>,
    },

    /// Search the corpus by chapter, verse, or theme
    Study(StudyArgs),

    /// List the curated popular themes
    Themes,

    /// Check service connectivity
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("gita_guide=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new();
    let language = cli.language.unwrap_or(config.default_language);

    match cli.command {
        Commands::Chat { mode } => {
            let mode = mode.unwrap_or(config.default_mode);
            commands::chat_run(&config, language, mode).await?
        }
        Commands::Ask { question, mode } => {
            let mode = mode.unwrap_or(config.default_mode);
            commands::ask_run(&config, &question, language, mode).await?
        }
        Commands::Study(args) => commands::study_run(&config, args, language).await?,
        Commands::Themes => commands::study::print_themes(),
        Commands::Health => commands::health_run(&config).await?,
    }

    Ok(())
}
