/// Domain-specific error types for findmusic
///
/// The scoring core never fails on well-typed input; these errors belong to the
/// boundary (theme validation, configuration, the lyrics source) and carry
/// enough context for an MCP client to correct its call.

#[derive(Debug, thiserror::Error)]
pub enum FindMusicError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Lyrics source error: {0}")]
    Source(String),
}

impl From<crate::source::LyricsSourceError> for FindMusicError {
    fn from(e: crate::source::LyricsSourceError) -> Self {
        FindMusicError::Source(e.to_string())
    }
}

impl FindMusicError {
    /// Helper to create validation errors with field names
    ///
    /// Example:
    /// ```
    /// use findmusic::errors::FindMusicError;
    /// let err = FindMusicError::validation("theme", "Theme cannot be empty");
    /// ```
    pub fn validation(field: &str, message: &str) -> Self {
        FindMusicError::Validation {
            message: message.to_string(),
            field: Some(field.to_string()),
        }
    }
}
