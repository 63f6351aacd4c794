/// whatlang-backed language detector
///
/// Trigram-based, offline, no model download. Only fra/eng/spa/vie map into the
/// supported set; anything else is reported as unsupported with its ISO 639-3 code.

use ::whatlang::Lang;

use super::{DetectionError, Language, LanguageDetector};

#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        WhatlangDetector
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<Language, DetectionError> {
        let info = ::whatlang::detect(text).ok_or(DetectionError::NoSignal)?;
        match info.lang() {
            Lang::Fra => Ok(Language::Fr),
            Lang::Eng => Ok(Language::En),
            Lang::Spa => Ok(Language::Es),
            Lang::Vie => Ok(Language::Vi),
            other => Err(DetectionError::Unsupported(other.code().to_string())),
        }
    }
}
