//! Study search command

use clap::Args;

use crate::client::GuidanceClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::study::{SearchQuery, SearchResult, StudyQueryController, POPULAR_THEMES};
use crate::verse::Language;

#[derive(Debug, Args)]
pub struct StudyArgs {
    /// Chapter number (1-18)
    #[arg(short, long)]
    pub chapter: Option<u8>,

    /// Verse reference, e.g. "2.47"
    #[arg(short, long)]
    pub verse: Option<String>,

    /// Theme tag, e.g. "karma_yoga"
    #[arg(short, long)]
    pub theme: Option<String>,
}

impl StudyArgs {
    fn into_query(self, language: Language) -> Result<SearchQuery> {
        match (self.chapter, self.verse, self.theme) {
            (Some(chapter), None, None) => Ok(SearchQuery::by_chapter(chapter, language)),
            (None, Some(verse), None) => Ok(SearchQuery::by_verse(verse, language)),
            (None, None, Some(theme)) => Ok(SearchQuery::by_theme(theme, language)),
            _ => Err(Error::InvalidQuery(
                "Provide exactly one of --chapter, --verse, --theme".to_string(),
            )),
        }
    }
}

pub async fn run(config: &Config, args: StudyArgs, language: Language) -> Result<()> {
    let query = args.into_query(language)?;

    let client = GuidanceClient::from_config(config)?;
    let mut controller = StudyQueryController::new(client);
    let result = controller.search(query).await?;

    render(result, language);
    Ok(())
}

/// Print the curated theme list.
pub fn print_themes() {
    println!("Popular themes:");
    for theme in POPULAR_THEMES {
        println!("  {}", theme.replace('_', " "));
    }
}

fn render(result: &SearchResult, language: Language) {
    println!("{} — {} verse(s) found", result.query_type, result.total_found);

    if let Some(error) = &result.error {
        println!("{}", error);
        return;
    }

    for verse in &result.verses {
        println!();
        println!("{}", verse.reference());
        println!("{}", verse.text(language));
        if language != Language::English {
            println!("(English: {})", verse.english);
        }
        if !verse.themes.is_empty() {
            println!("Themes: {}", verse.themes.join(", "));
        }
        if !verse.emotions.is_empty() {
            println!("Emotions: {}", verse.emotions.join(", "));
        }
    }
}
