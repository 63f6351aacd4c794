pub mod ranking;
pub mod relevance;

// Re-export key types for convenience
pub use ranking::{rank_and_select, weighted_shuffle, RankedResults, DEFAULT_SHUFFLE_POOL};
pub use relevance::{
    classify, compute_centrality, compute_density, compute_relevance, extract_snippet, Category,
};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::lyrics::ProcessedSong;
use crate::theme::ParsedTheme;

/// A processed song enriched with its theme scores.
///
/// Serialized as-is in search responses; the lyrics text itself is not carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSong {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub language_original: Language,
    pub translation_used: bool,
    /// Weighted keyword presence: 0.15 with no hit, else score / 20 capped at 1
    pub relevance: f64,
    /// Share of lines with a strict keyword, [0, 1]
    pub density: f64,
    /// Opening/middle/closing keyword presence, [0, 1]
    pub centrality: f64,
    pub snippet: String,
    pub category: Category,
    /// Reserved; always null for now
    pub spotify_link: Option<String>,
}

/// Score one song against the theme. None when its processed lyrics are blank.
pub fn score_song(song: &ProcessedSong, theme: &ParsedTheme) -> Option<ScoredSong> {
    let lyrics = song.lyrics_processed.as_str();
    if lyrics.trim().is_empty() {
        return None;
    }
    let strict = &theme.strict_keywords;

    let relevance = compute_relevance(lyrics, strict, &theme.expanded_keywords);
    let density = compute_density(lyrics, strict);
    let centrality = compute_centrality(lyrics, strict);

    Some(ScoredSong {
        title: song.title.clone(),
        artist: song.artist.clone(),
        year: song.year,
        language_original: song.language_original,
        translation_used: song.translation_used,
        relevance,
        density,
        centrality,
        snippet: extract_snippet(lyrics, strict),
        category: classify(density, centrality),
        spotify_link: None,
    })
}

/// Score every song, then rank and select.
///
/// Synchronous and free of I/O; the only nondeterminism comes from `rng`.
pub fn analyze_songs<R>(
    songs: &[ProcessedSong],
    theme: &ParsedTheme,
    pool: usize,
    max_results: usize,
    rng: &mut R,
) -> RankedResults
where
    R: Rng + ?Sized,
{
    let enriched: Vec<ScoredSong> = songs.iter().filter_map(|s| score_song(s, theme)).collect();
    rank_and_select(enriched, pool, max_results, rng)
}
