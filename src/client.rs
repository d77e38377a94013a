//! HTTP client for the Ask Krishna guidance service.
//!
//! Wraps the three endpoints the UI depends on: `POST /ask`, `POST /study`
//! and `GET /health`. One attempt per request, no retry.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::verse::Language;

/// Chat behavior selector sent to the service, orthogonal to the study
/// controller's search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    #[default]
    Default,
    Emotion,
    Study,
}

impl AskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AskMode::Default => "default",
            AskMode::Emotion => "emotion",
            AskMode::Study => "study",
        }
    }
}

impl std::str::FromStr for AskMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(AskMode::Default),
            "emotion" => Ok(AskMode::Emotion),
            "study" => Ok(AskMode::Study),
            other => Err(Error::InvalidQuery(format!("Unknown mode: {}", other))),
        }
    }
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    query: &'a str,
    language: Language,
    mode: AskMode,
}

/// Raw `/ask` answer, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub krishna_response: String,
    #[serde(default)]
    pub verses_referenced: Vec<String>,
    #[serde(default)]
    pub detected_emotion: Option<String>,
}

/// `/study` request body. Exactly one of chapter/verse/theme is set;
/// [`crate::study::SearchMode`] guarantees that at the type level.
#[derive(Debug, Clone, Serialize)]
pub struct StudyRequest {
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Raw `/study` answer, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct StudyResponse {
    pub answer: String,
    #[serde(default)]
    pub verses_referenced: Vec<String>,
    pub query_type: String,
}

/// Guidance service client.
#[derive(Debug, Clone)]
pub struct GuidanceClient {
    http: Client,
    base_url: String,
}

impl GuidanceClient {
    /// Create a client against the given base URL, with the default timeout.
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a client with an explicit request timeout in seconds.
    pub fn with_timeout<S: Into<String>>(base_url: S, timeout_secs: u64) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::Config("API base URL is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent("gita_guide/0.1.0")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from a loaded [`Config`]. Environment overrides
    /// (`GITA_API_URL`, `GITA_API_TIMEOUT_SECS`) are resolved by the config
    /// layer, not here.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeout(config.api_url.clone(), config.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask a free-text question. One attempt; any failure surfaces as an error.
    pub async fn ask(&self, query: &str, language: Language, mode: AskMode) -> Result<AskResponse> {
        debug!(%language, mode = mode.as_str(), "POST /ask");

        let request = AskRequest {
            query,
            language,
            mode,
        };

        let response = self
            .http
            .post(format!("{}/ask", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("ask request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read ask response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Serialization(format!("invalid ask response: {}", e)))
    }

    /// Run a structured search against the corpus.
    pub async fn study(&self, request: &StudyRequest) -> Result<StudyResponse> {
        debug!(language = %request.language, "POST /study");

        let response = self
            .http
            .post(format!("{}/study", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("study request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read study response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Serialization(format!("invalid study response: {}", e)))
    }

    /// Probe service availability. The body is opaque; only success matters.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| Error::Transport(format!("health request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        Ok(())
    }
}
