//! Normalized verse model and language tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Languages the corpus is served in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Sanskrit,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Sanskrit => "sanskrit",
        }
    }

    /// Native label, as shown by the UI language selector.
    pub fn display_label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "हिंदी",
            Language::Sanskrit => "संस्कृत",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "hindi" | "hi" => Ok(Language::Hindi),
            "sanskrit" | "sa" => Ok(Language::Sanskrit),
            other => Err(Error::InvalidQuery(format!("Unknown language: {}", other))),
        }
    }
}

/// A normalized unit of guidance text with chapter/verse identity,
/// per-language text, and heuristic tags.
///
/// `chapter` and `verse_number` are always populated: the normalizer
/// substitutes deterministic defaults when extraction fails, so rendering
/// never has to branch on a missing reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 1..=18, the chapters of the Gita.
    pub chapter: u8,
    pub verse_number: u32,
    pub english: String,
    pub hindi: String,
    pub sanskrit: String,
    /// Never empty after normalization.
    pub themes: Vec<String>,
    pub emotions: Vec<String>,
}

impl Verse {
    /// Text in the requested language.
    pub fn text(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Hindi => &self.hindi,
            Language::Sanskrit => &self.sanskrit,
        }
    }

    /// Human-readable reference, e.g. "Chapter 2, Verse 47".
    pub fn reference(&self) -> String {
        format!("Chapter {}, Verse {}", self.chapter, self.verse_number)
    }
}
