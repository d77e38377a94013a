//! Structured-search controller
//!
//! Owns the current search parameters and the last result for study mode.
//! Results are replaced wholesale per search, no history. Every search gets
//! a monotonically increasing ticket; a completion is applied only if no
//! newer ticket has landed, so out-of-order completions are discarded
//! deterministically instead of silently overwriting newer results.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::client::{GuidanceClient, StudyRequest};
use crate::error::{Error, Result};
use crate::normalize;
use crate::verse::{Language, Verse};

/// Curated theme tags offered as one-click searches.
pub const POPULAR_THEMES: [&str; 10] = [
    "karma_yoga",
    "bhakti",
    "dharma",
    "meditation",
    "detachment",
    "divine_love",
    "wisdom",
    "surrender",
    "peace",
    "duty",
];

/// Shown when a search fails; the underlying error is logged, not displayed.
pub const SEARCH_ERROR_MESSAGE: &str = "Failed to search. Please try again.";

static VERSE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("verse ref pattern"));

/// Exactly one search payload per query, enforced by the enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Chapter number, 1..=18.
    ByChapter(u8),
    /// "C.V" reference, e.g. "2.47".
    ByVerse(String),
    /// Free-text theme tag.
    ByTheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub language: Language,
}

impl SearchQuery {
    pub fn by_chapter(chapter: u8, language: Language) -> Self {
        Self {
            mode: SearchMode::ByChapter(chapter),
            language,
        }
    }

    pub fn by_verse<S: Into<String>>(verse: S, language: Language) -> Self {
        Self {
            mode: SearchMode::ByVerse(verse.into()),
            language,
        }
    }

    pub fn by_theme<S: Into<String>>(theme: S, language: Language) -> Self {
        Self {
            mode: SearchMode::ByTheme(theme.into()),
            language,
        }
    }

    /// Check the mode payload against the service preconditions.
    fn validate(&self) -> Result<()> {
        match &self.mode {
            SearchMode::ByChapter(chapter) => {
                if !(1..=18).contains(chapter) {
                    return Err(Error::InvalidQuery(format!(
                        "Chapter must be 1-18, got {}",
                        chapter
                    )));
                }
            }
            SearchMode::ByVerse(verse) => {
                if !VERSE_REF_RE.is_match(verse.trim()) {
                    return Err(Error::InvalidQuery(format!(
                        "Verse reference must look like \"2.47\", got {:?}",
                        verse
                    )));
                }
            }
            SearchMode::ByTheme(theme) => {
                if theme.trim().is_empty() {
                    return Err(Error::InvalidQuery("Theme must not be empty".to_string()));
                }
            }
        }
        Ok(())
    }

    fn to_request(&self) -> StudyRequest {
        let mut request = StudyRequest {
            language: self.language,
            chapter: None,
            verse: None,
            theme: None,
        };
        match &self.mode {
            SearchMode::ByChapter(chapter) => request.chapter = Some(*chapter),
            SearchMode::ByVerse(verse) => request.verse = Some(verse.trim().to_string()),
            SearchMode::ByTheme(theme) => request.theme = Some(theme.trim().to_string()),
        }
        request
    }
}

/// Outcome of one search. `error` set means `verses` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub verses: Vec<Verse>,
    pub total_found: usize,
    pub query_type: String,
    pub error: Option<String>,
}

impl SearchResult {
    fn failure() -> Self {
        Self {
            verses: vec![],
            total_found: 0,
            query_type: "Error".to_string(),
            error: Some(SEARCH_ERROR_MESSAGE.to_string()),
        }
    }
}

/// One search per call, no queuing. State between searches is just the last
/// query and the last applied result.
pub struct StudyQueryController {
    client: GuidanceClient,
    next_ticket: u64,
    applied_ticket: Option<u64>,
    last_query: Option<SearchQuery>,
    last_result: Option<SearchResult>,
}

impl StudyQueryController {
    pub fn new(client: GuidanceClient) -> Self {
        Self {
            client,
            next_ticket: 0,
            applied_ticket: None,
            last_query: None,
            last_result: None,
        }
    }

    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }

    /// Run a search and apply its outcome.
    ///
    /// Precondition violations (bad chapter range, malformed verse reference,
    /// empty theme) are returned as errors. Transport and service failures
    /// are absorbed into a [`SearchResult`] with a generic message and zero
    /// verses, so the call still succeeds.
    pub async fn search(&mut self, query: SearchQuery) -> Result<&SearchResult> {
        query.validate()?;

        let ticket = self.issue_ticket();
        let result = run_search(&self.client, &query).await;
        self.apply(ticket, query, result);

        // apply never discards here: awaiting through &mut self means no
        // newer ticket can land in between.
        Ok(self.last_result.as_ref().expect("result just applied"))
    }

    /// Sugar for picking one of [`POPULAR_THEMES`]; same path as `search`.
    pub async fn search_popular_theme(
        &mut self,
        theme: &str,
        language: Language,
    ) -> Result<&SearchResult> {
        self.search(SearchQuery::by_theme(theme, language)).await
    }

    /// Reserve a ticket for a search about to start. Tickets are strictly
    /// increasing for the controller's lifetime.
    pub fn issue_ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Apply a completed search unless a newer ticket already landed.
    /// Returns whether the result was kept.
    pub fn apply(&mut self, ticket: u64, query: SearchQuery, result: SearchResult) -> bool {
        if let Some(applied) = self.applied_ticket {
            if ticket <= applied {
                warn!(ticket, applied, "discarding stale search result");
                return false;
            }
        }
        self.applied_ticket = Some(ticket);
        self.last_query = Some(query);
        self.last_result = Some(result);
        true
    }
}

/// Execute the network round trip and normalization for one query.
/// Failures fold into an error-carrying [`SearchResult`].
async fn run_search(client: &GuidanceClient, query: &SearchQuery) -> SearchResult {
    match client.study(&query.to_request()).await {
        Ok(response) => {
            // The contract returns one answer per query today; keeping a Vec
            // means a multi-verse service only changes this wrapping step.
            let verse =
                normalize::verse_from_study_answer(&response.answer, &response.verses_referenced);
            info!(query_type = %response.query_type, reference = %verse.reference(), "study result");
            SearchResult {
                verses: vec![verse],
                total_found: 1,
                query_type: response.query_type,
                error: None,
            }
        }
        Err(err) => {
            warn!("study search failed: {}", err);
            SearchResult::failure()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn controller(server: &MockServer) -> StudyQueryController {
        StudyQueryController::new(GuidanceClient::new(server.base_url()).expect("client"))
    }

    #[test]
    fn test_popular_themes_count_and_content() {
        assert_eq!(POPULAR_THEMES.len(), 10);
        assert!(POPULAR_THEMES.contains(&"karma_yoga"));
        assert!(POPULAR_THEMES.contains(&"duty"));
    }

    #[test]
    fn test_validate_chapter_range() {
        assert!(SearchQuery::by_chapter(1, Language::English).validate().is_ok());
        assert!(SearchQuery::by_chapter(18, Language::English).validate().is_ok());
        assert!(SearchQuery::by_chapter(0, Language::English).validate().is_err());
        assert!(SearchQuery::by_chapter(19, Language::English).validate().is_err());
    }

    #[test]
    fn test_validate_verse_reference_shape() {
        assert!(SearchQuery::by_verse("2.47", Language::English).validate().is_ok());
        assert!(SearchQuery::by_verse(" 18.66 ", Language::English).validate().is_ok());
        assert!(SearchQuery::by_verse("2-47", Language::English).validate().is_err());
        assert!(SearchQuery::by_verse("chapter 2", Language::English).validate().is_err());
        assert!(SearchQuery::by_verse("", Language::English).validate().is_err());
    }

    #[test]
    fn test_validate_theme_non_empty() {
        assert!(SearchQuery::by_theme("karma_yoga", Language::English).validate().is_ok());
        assert!(SearchQuery::by_theme("  ", Language::English).validate().is_err());
    }

    #[test]
    fn test_to_request_populates_exactly_one_field() {
        let request = SearchQuery::by_chapter(5, Language::Hindi).to_request();
        assert_eq!(request.chapter, Some(5));
        assert!(request.verse.is_none() && request.theme.is_none());

        let request = SearchQuery::by_verse(" 2.47 ", Language::English).to_request();
        assert_eq!(request.verse.as_deref(), Some("2.47"));
        assert!(request.chapter.is_none() && request.theme.is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let server = MockServer::start();
        let mut controller = controller(&server);

        let old_ticket = controller.issue_ticket();
        let new_ticket = controller.issue_ticket();

        let newer = SearchResult {
            verses: vec![],
            total_found: 0,
            query_type: "Chapter 2".to_string(),
            error: None,
        };
        assert!(controller.apply(
            new_ticket,
            SearchQuery::by_chapter(2, Language::English),
            newer.clone()
        ));

        // the older search completes late; its result must not overwrite
        let kept = controller.apply(
            old_ticket,
            SearchQuery::by_chapter(9, Language::English),
            SearchResult::failure(),
        );
        assert!(!kept);
        assert_eq!(controller.last_result(), Some(&newer));
        assert_eq!(
            controller.last_query(),
            Some(&SearchQuery::by_chapter(2, Language::English))
        );
    }

    #[tokio::test]
    async fn search_wraps_single_answer_into_one_verse() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST)
                .path("/study")
                .json_body(json!({ "language": "english", "chapter": 2 }));
            then.status(200).json_body(json!({
                "answer": "Chapter 2 teaches steady wisdom and duty.",
                "verses_referenced": ["Chapter 2, Verse 47"],
                "query_type": "Chapter 2"
            }));
        });

        let mut controller = controller(&server);
        let result = controller
            .search(SearchQuery::by_chapter(2, Language::English))
            .await
            .unwrap()
            .clone();

        assert_eq!(result.total_found, 1);
        assert_eq!(result.query_type, "Chapter 2");
        assert!(result.error.is_none());
        assert_eq!(result.verses.len(), 1);
        assert_eq!(result.verses[0].chapter, 2);
        assert_eq!(result.verses[0].verse_number, 47);
        assert!(!result.verses[0].themes.is_empty());
        assert_eq!(result.verses[0].hindi, "Available in Krishna's response");
        assert_eq!(result.verses[0].sanskrit, "Available in Krishna's response");
    }

    #[tokio::test]
    async fn search_failure_yields_empty_error_result() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST).path("/study");
            then.status(500).body("down");
        });

        let mut controller = controller(&server);
        let result = controller
            .search(SearchQuery::by_chapter(2, Language::English))
            .await
            .unwrap();

        assert!(result.verses.is_empty());
        assert_eq!(result.total_found, 0);
        assert_eq!(result.query_type, "Error");
        assert_eq!(result.error.as_deref(), Some(SEARCH_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn search_rejects_invalid_query_without_network_call() {
        let server = MockServer::start_async().await;

        let study_mock = server.mock(|when, then| {
            when.method(POST).path("/study");
            then.status(200).json_body(json!({
                "answer": "never",
                "verses_referenced": [],
                "query_type": "never"
            }));
        });

        let mut controller = controller(&server);
        let err = controller
            .search(SearchQuery::by_chapter(42, Language::English))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidQuery(_)));
        assert!(controller.last_result().is_none());
        study_mock.assert_calls(0);
    }

    #[tokio::test]
    async fn new_search_replaces_previous_result_wholesale() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST)
                .path("/study")
                .json_body_includes(r#"{ "chapter": 2 }"#);
            then.status(200).json_body(json!({
                "answer": "First answer.",
                "verses_referenced": ["Chapter 2, Verse 47"],
                "query_type": "Chapter 2"
            }));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/study")
                .json_body_includes(r#"{ "theme": "peace" }"#);
            then.status(200).json_body(json!({
                "answer": "A calm and tranquil mind.",
                "verses_referenced": ["Chapter 6, Verse 7"],
                "query_type": "Theme: peace"
            }));
        });

        let mut controller = controller(&server);
        controller
            .search(SearchQuery::by_chapter(2, Language::English))
            .await
            .unwrap();
        let result = controller
            .search(SearchQuery::by_theme("peace", Language::English))
            .await
            .unwrap();

        assert_eq!(result.query_type, "Theme: peace");
        assert_eq!(result.verses[0].chapter, 6);
        assert_eq!(
            controller.last_query(),
            Some(&SearchQuery::by_theme("peace", Language::English))
        );
    }

    #[tokio::test]
    async fn popular_theme_shortcut_uses_same_search_path() {
        let server = MockServer::start_async().await;

        server.mock(|when, then| {
            when.method(POST)
                .path("/study")
                .json_body(json!({ "language": "english", "theme": "bhakti" }));
            then.status(200).json_body(json!({
                "answer": "Devotion and surrender in love.",
                "verses_referenced": ["Chapter 9, Verse 22"],
                "query_type": "Theme: bhakti"
            }));
        });

        let mut controller = controller(&server);
        let result = controller
            .search_popular_theme("bhakti", Language::English)
            .await
            .unwrap();

        assert_eq!(result.query_type, "Theme: bhakti");
        assert!(result.verses[0].themes.contains(&"bhakti".to_string()));
    }
}
