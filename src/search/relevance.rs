/// Theme relevance scoring for song lyrics
///
/// Four independent metrics per song, all computed from the lyrics text and
/// the parsed theme's keyword sets:
///   1. Relevance:  weighted keyword presence; no match at all gets a floor
///   2. Density:    share of lines mentioning a strict keyword
///   3. Centrality: keyword presence in the opening, middle and closing windows
///   4. Snippet:    the one or two lines that best represent the theme
///
/// Matching is plain substring containment on lowercased text: "art" matches
/// inside "cartouche". Empty keywords are ignored.
///
/// All scoring functions are pure: no I/O, no shared state.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Relevance assigned when no keyword matches at all.
pub const RELEVANCE_FLOOR: f64 = 0.15;

const STRICT_WEIGHT: f64 = 2.0;
const EXPANDED_WEIGHT: f64 = 1.0;
/// Raw score that maps to full relevance.
const RELEVANCE_SCALE: f64 = 20.0;

/// Lines per centrality window; shorter lyrics have no measurable structure.
pub const CENTRALITY_WINDOW: usize = 8;
/// Equal thirds for the opening, middle and closing windows.
const CENTRALITY_WINDOW_WEIGHT: f64 = 0.33;

/// density + centrality above this makes a song a main result.
pub const MAIN_THRESHOLD: f64 = 0.25;

const SNIPPET_LINES: usize = 2;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Main,
    Secondary,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Main => write!(f, "main"),
            Category::Secondary => write!(f, "secondary"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pure scoring functions
// ---------------------------------------------------------------------------

/// Trimmed, non-empty lines of the lyrics.
fn lyric_lines(lyrics: &str) -> Vec<&str> {
    lyrics
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    !keyword.is_empty() && haystack.contains(keyword)
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| contains_keyword(haystack, k))
}

/// Weighted keyword presence normalized to [0, 1].
///
/// score = 2 × (strict keywords present) + 1 × (expanded keywords present).
/// Each keyword counts once however often it recurs. A non-positive score
/// returns RELEVANCE_FLOOR; a positive one is score / 20 capped at 1.
/// A single expanded hit (0.05) therefore scores below a song with no hit.
pub fn compute_relevance(lyrics: &str, strict: &[String], expanded: &[String]) -> f64 {
    let text = lyrics.to_lowercase();

    let strict_hits = strict.iter().filter(|k| contains_keyword(&text, k)).count();
    let expanded_hits = expanded.iter().filter(|k| contains_keyword(&text, k)).count();
    let score = STRICT_WEIGHT * strict_hits as f64 + EXPANDED_WEIGHT * expanded_hits as f64;

    if score <= 0.0 {
        return RELEVANCE_FLOOR;
    }
    (score / RELEVANCE_SCALE).min(1.0)
}

/// Fraction of lines containing at least one strict keyword. 0.0 with no lines.
pub fn compute_density(lyrics: &str, strict: &[String]) -> f64 {
    let lines = lyric_lines(lyrics);
    if lines.is_empty() {
        return 0.0;
    }
    let matched = lines
        .iter()
        .filter(|line| contains_any(&line.to_lowercase(), strict))
        .count();
    (matched as f64 / lines.len() as f64).min(1.0)
}

/// Keyword presence across the opening, middle and closing 8-line windows.
///
/// Returns exactly 0.0 when there are fewer than 8 lines. The middle window
/// starts at `len / 2` and may be shorter than 8 lines near the end.
pub fn compute_centrality(lyrics: &str, strict: &[String]) -> f64 {
    let lines = lyric_lines(lyrics);
    let len = lines.len();
    if len < CENTRALITY_WINDOW {
        return 0.0;
    }

    let mid_start = len / 2;
    let mid_end = (mid_start + CENTRALITY_WINDOW).min(len);
    let windows = [
        &lines[..CENTRALITY_WINDOW],
        &lines[mid_start..mid_end],
        &lines[len - CENTRALITY_WINDOW..],
    ];

    let score: f64 = windows
        .iter()
        .filter(|window| contains_any(&window.join(" ").to_lowercase(), strict))
        .map(|_| CENTRALITY_WINDOW_WEIGHT)
        .sum();
    score.min(1.0)
}

/// The one or two lines carrying the most distinct strict keywords.
///
/// Ties keep lyric order. With no matching line at all, the first two lines are
/// returned verbatim so every song still gets a readable excerpt.
pub fn extract_snippet(lyrics: &str, strict: &[String]) -> String {
    let lines = lyric_lines(lyrics);

    let mut scored: Vec<(usize, &str)> = lines
        .iter()
        .map(|line| {
            let low = line.to_lowercase();
            let hits = strict.iter().filter(|k| contains_keyword(&low, k)).count();
            (hits, *line)
        })
        .filter(|(hits, _)| *hits > 0)
        .collect();

    if scored.is_empty() {
        return lines.iter().take(SNIPPET_LINES).copied().collect::<Vec<_>>().join("\n");
    }

    // sort_by is stable: equal scores keep their original line order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .iter()
        .take(SNIPPET_LINES)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn classify(density: f64, centrality: f64) -> Category {
    if density + centrality > MAIN_THRESHOLD {
        Category::Main
    } else {
        Category::Secondary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
