/// Language detection capability
///
/// Detection is modeled as a fallible capability: a detector either names one of
/// the supported languages or reports why it could not. Call sites pick their
/// own default (queries fall back to French, lyrics to English) through
/// [`detect_or`]; nothing in this module hard-codes a global default.

pub mod whatlang;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use self::whatlang::WhatlangDetector;

/// The closed set of languages the search understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
    Es,
    Vi,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
            Language::Es => "es",
            Language::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "vi" => Ok(Language::Vi),
            other => Err(DetectionError::Unsupported(other.to_string())),
        }
    }
}

/// Why a detector could not produce a supported language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    /// Nothing reliable could be detected (empty text, no script match, ...)
    #[error("no language signal in text")]
    NoSignal,

    /// A language was detected but it is outside the supported set
    #[error("unsupported language: {0}")]
    Unsupported(String),
}

/// A language detector.
///
/// Implementations must be Send + Sync so a single detector can be shared by
/// concurrent requests (e.g., Arc<dyn LanguageDetector>).
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<Language, DetectionError>;
}

/// Detect the language of `text`, substituting `default` on any failure.
pub fn detect_or(detector: &dyn LanguageDetector, text: &str, default: Language) -> Language {
    match detector.detect(text) {
        Ok(lang) => lang,
        Err(e) => {
            tracing::trace!(error = %e, default = %default, "Language detection fell back to default");
            default
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Detector that always returns the same answer.
    pub struct FixedDetector(pub Result<Language, DetectionError>);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Result<Language, DetectionError> {
            self.0.clone()
        }
    }
}
