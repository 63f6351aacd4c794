/// Theme parsing: free-text query -> ParsedTheme
///
/// Cleans the raw query, extracts strict keywords, expands them through the
/// keyword families and tags the query language. Pure apart from the injected
/// language detector.

pub mod keywords;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language::{detect_or, Language, LanguageDetector};

pub use keywords::{expand_keywords, extract_strict_keywords};

/// Language assumed for queries too short or too ambiguous to detect.
pub const QUERY_DEFAULT_LANGUAGE: Language = Language::Fr;

/// Everything outside ascii lowercase letters, digits, the supported accented
/// letters and whitespace.
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9àâäéèêëïîôöùûüçñ\s]+").expect("theme cleaning regex is valid")
});

/// A parsed search theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTheme {
    /// Input exactly as received
    pub raw: String,
    /// Lowercased, punctuation stripped, whitespace collapsed
    pub clean: String,
    /// Unique non-stop-word tokens of `clean`, first-occurrence order
    pub strict_keywords: Vec<String>,
    /// `clean` followed by family expansions, no duplicates
    pub expanded_keywords: Vec<String>,
    pub language: Language,
}

/// Lowercase, replace disallowed characters with spaces, collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let replaced = DISALLOWED_RE.replace_all(&lowered, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Query language. Two tokens or fewer carry too little signal, so they get the
/// default without consulting the detector.
pub fn detect_language(detector: &dyn LanguageDetector, clean: &str) -> Language {
    if clean.split_whitespace().count() <= 2 {
        return QUERY_DEFAULT_LANGUAGE;
    }
    detect_or(detector, clean, QUERY_DEFAULT_LANGUAGE)
}

pub fn parse_theme(detector: &dyn LanguageDetector, theme: &str) -> ParsedTheme {
    let clean = clean_text(theme);
    let language = detect_language(detector, &clean);
    let strict_keywords = extract_strict_keywords(&clean);
    let expanded_keywords = expand_keywords(&clean);
    ParsedTheme {
        raw: theme.to_string(),
        clean,
        strict_keywords,
        expanded_keywords,
        language,
    }
}
