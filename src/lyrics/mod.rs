/// Lyrics normalization: raw songs -> language-tagged processed songs
///
/// Drops songs without usable lyrics and tags the rest with their detected
/// language. `lyrics_processed` is where a translation stage would plug in;
/// today it is a verbatim copy and `translation_used` is always false.

use serde::{Deserialize, Serialize};

use crate::language::{detect_or, Language, LanguageDetector};

/// Language assumed for lyrics the detector cannot place.
pub const LYRICS_DEFAULT_LANGUAGE: Language = Language::En;

/// A candidate song as returned by a lyrics source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub lyrics: Option<String>,
}

/// A song with non-blank lyrics, tagged for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedSong {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub lyrics: String,
    pub language_original: Language,
    pub translation_used: bool,
    pub lyrics_processed: String,
}

/// Tag each song with its lyrics language, dropping songs whose lyrics are
/// missing or whitespace-only. Input order is preserved.
pub fn normalize_lyrics(detector: &dyn LanguageDetector, songs: Vec<Song>) -> Vec<ProcessedSong> {
    songs
        .into_iter()
        .filter_map(|song| {
            let lyrics = song.lyrics.filter(|l| !l.trim().is_empty())?;
            let language_original = detect_or(detector, &lyrics, LYRICS_DEFAULT_LANGUAGE);
            Some(ProcessedSong {
                title: song.title,
                artist: song.artist,
                year: song.year,
                lyrics_processed: lyrics.clone(),
                lyrics,
                language_original,
                translation_used: false,
            })
        })
        .collect()
}
