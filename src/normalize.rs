//! Response normalization
//!
//! The guidance service answers in free text with loosely-structured
//! reference strings ("Chapter 2, Verse 47"). This module turns those into a
//! stable [`Verse`] shape using keyword heuristics and regex extraction.
//! Extraction misses are not errors: each field falls back to a deterministic
//! default, so callers always get a fully-populated verse identity. That
//! fallback behavior is part of the contract, not an accident — the upstream
//! service does not guarantee structured fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::verse::Verse;

/// Bump when the keyword table or reference patterns change.
pub const THEME_TABLE_VERSION: u32 = 1;

/// Fallback reference when a chapter cannot be extracted.
pub const DEFAULT_CHAPTER: u8 = 2;
/// Fallback reference when a verse number cannot be extracted.
pub const DEFAULT_VERSE: u32 = 47;

/// Theme tag -> keywords that imply it. Matching is case-insensitive
/// substring search over the whole answer text.
const THEME_KEYWORDS: &[(&str, &[&str])] = &[
    ("karma_yoga", &["karma", "action", "duty"]),
    ("dharma", &["dharma", "righteousness"]),
    ("bhakti", &["devotion", "surrender", "love"]),
    ("wisdom", &["wisdom", "knowledge"]),
    ("peace", &["peace", "tranquil", "calm"]),
];

static CHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)chapter\s*(\d+)").expect("chapter pattern"));
static VERSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)verse\s*(\d+)").expect("verse pattern"));

/// Extract theme tags from an answer text.
///
/// Returns themes in table order; never empty — an answer that matches no
/// keyword gets the singleton `["wisdom"]`.
pub fn extract_themes(answer: &str) -> Vec<String> {
    let lower = answer.to_lowercase();
    let themes: Vec<String> = THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(theme, _)| theme.to_string())
        .collect();

    if themes.is_empty() {
        vec!["wisdom".to_string()]
    } else {
        themes
    }
}

/// Extract `(chapter, verse_number)` from the service's reference strings.
///
/// Only the first reference is inspected. Chapter and verse are extracted
/// independently; each falls back to its own default when its pattern does
/// not match, even if the other one did. A parsed chapter outside 1..=18
/// also falls back, keeping the corpus invariant.
pub fn extract_reference(verses_referenced: &[String]) -> (u8, u32) {
    let Some(first) = verses_referenced.first() else {
        return (DEFAULT_CHAPTER, DEFAULT_VERSE);
    };

    let chapter = CHAPTER_RE
        .captures(first)
        .and_then(|c| c[1].parse::<u8>().ok())
        .filter(|c| (1..=18).contains(c))
        .unwrap_or(DEFAULT_CHAPTER);

    let verse = VERSE_RE
        .captures(first)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(DEFAULT_VERSE);

    (chapter, verse)
}

// The /ask and /study contracts carry a single answer string, so only the
// english text is real; the other languages get placeholder notes. The two
// flows use different notes, as the original service did.
const CHAT_HINDI_NOTE: &str = "Hindi available in full response";
const CHAT_SANSKRIT_NOTE: &str = "Sanskrit available in full response";
const STUDY_NOTE: &str = "Available in Krishna's response";

/// Assemble a normalized [`Verse`] from a raw chat answer.
pub fn verse_from_answer(answer: &str, verses_referenced: &[String], emotions: Vec<String>) -> Verse {
    assemble(
        answer,
        verses_referenced,
        emotions,
        CHAT_HINDI_NOTE,
        CHAT_SANSKRIT_NOTE,
    )
}

/// Assemble a normalized [`Verse`] from a raw study answer. Study answers
/// carry no emotion tags.
pub fn verse_from_study_answer(answer: &str, verses_referenced: &[String]) -> Verse {
    assemble(answer, verses_referenced, vec![], STUDY_NOTE, STUDY_NOTE)
}

fn assemble(
    answer: &str,
    verses_referenced: &[String],
    emotions: Vec<String>,
    hindi: &str,
    sanskrit: &str,
) -> Verse {
    let (chapter, verse_number) = extract_reference(verses_referenced);
    Verse {
        chapter,
        verse_number,
        english: answer.to_string(),
        hindi: hindi.to_string(),
        sanskrit: sanskrit.to_string(),
        themes: extract_themes(answer),
        emotions,
    }
}

/// Truncate to at most `max` characters, appending "..." when shortened.
/// Cuts on a char boundary, never mid-codepoint.
pub fn excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
