/// Lyrics source trait and supporting types
///
/// A lyrics source turns a parsed theme into candidate songs with raw lyrics.
/// The default implementation searches Genius, scrapes song pages and falls
/// back to lyrics.ovh (see `genius`). Per-candidate failures are counted in the
/// report, never raised; only a source that cannot operate at all errors out.

pub mod genius;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::lyrics::Song;
use crate::theme::ParsedTheme;

pub use genius::GeniusLyricsSource;

/// Errors that make a lyrics source unusable for a whole request.
#[derive(Debug, Error)]
pub enum LyricsSourceError {
    /// HTTP client construction or other transport setup failure
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Source missing required configuration
    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

/// Outcome of one catalog search for one keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStatus {
    pub keyword: String,
    /// "200", "401", "429", "no_token" or "exc:<kind>"
    pub status: String,
}

/// Diagnostics counters for one lyrics lookup. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub keywords_used: Vec<String>,
    pub search_statuses: Vec<KeywordStatus>,
    pub hits_total: usize,
    pub scrape_ok: usize,
    pub scrape_fail: usize,
    pub fallback_ok: usize,
    pub fallback_fail: usize,
    pub added_songs: usize,
}

/// Songs found for a theme plus how the lookup went.
#[derive(Debug, Clone, Default)]
pub struct SourceOutcome {
    pub songs: Vec<Song>,
    pub report: SourceReport,
}

/// Core trait for fetching candidate songs for a theme.
///
/// Implementations must be Send + Sync to support use in async contexts
/// and across thread boundaries (e.g., Arc<dyn LyricsSource>).
#[async_trait]
pub trait LyricsSource: Send + Sync {
    async fn find(&self, theme: &ParsedTheme) -> Result<SourceOutcome, LyricsSourceError>;

    /// Short identifier for logs (e.g., "genius").
    fn name(&self) -> &str;
}

/// Collapse repeated (artist, title) pairs, case-insensitively, then cap at
/// `limit`. A repeat keeps the position of the first occurrence but replaces
/// its record, so the most recently fetched lyrics win.
pub fn dedupe_songs(songs: Vec<Song>, limit: usize) -> Vec<Song> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut unique: Vec<Song> = Vec::new();
    for song in songs {
        let key = (song.artist.to_lowercase(), song.title.to_lowercase());
        match positions.get(&key) {
            Some(&idx) => unique[idx] = song,
            None => {
                positions.insert(key, unique.len());
                unique.push(song);
            }
        }
    }
    unique.truncate(limit);
    unique
}
