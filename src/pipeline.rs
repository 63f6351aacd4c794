/// End-to-end search pipeline
///
/// theme -> parse -> (cache) -> lyrics source -> normalize -> score + rank -> response
///
/// Collaborators (lyrics source, language detector, response cache) are
/// injected as trait objects so tests can substitute fakes. Scoring and
/// ranking run synchronously after all I/O has completed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::{ResponseCache, TtlCache};
use crate::config::{Config, SearchConfig};
use crate::errors::FindMusicError;
use crate::language::{Language, LanguageDetector, WhatlangDetector};
use crate::lyrics::normalize_lyrics;
use crate::search::{analyze_songs, RankedResults};
use crate::source::{GeniusLyricsSource, LyricsSource, SourceReport};
use crate::theme::{parse_theme, ParsedTheme};

/// Diagnostic counters attached to every response. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchDebug {
    pub songs_raw_count: usize,
    pub songs_processed_count: usize,
    pub main_count: usize,
    pub secondary_count: usize,
    pub lyrics_finder: SourceReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub request_id: Uuid,
    pub query: String,
    pub language_query: Language,
    pub debug: SearchDebug,
    #[serde(flatten)]
    pub results: RankedResults,
    /// True when served from the response cache
    #[serde(default)]
    pub cached: bool,
}

/// Hard ceiling on results per category; a configured cap above it is ignored.
pub const MAX_RESULTS_LIMIT: usize = 20;

pub struct SearchPipeline {
    source: Arc<dyn LyricsSource>,
    detector: Arc<dyn LanguageDetector>,
    cache: Option<Arc<dyn ResponseCache>>,
    config: SearchConfig,
}

impl SearchPipeline {
    pub fn new(
        source: Arc<dyn LyricsSource>,
        detector: Arc<dyn LanguageDetector>,
        config: SearchConfig,
    ) -> Self {
        SearchPipeline {
            source,
            detector,
            cache: None,
            config,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Production wiring: Genius source, whatlang detector, TTL cache if enabled.
    pub fn from_config(config: &Config) -> Result<Self, FindMusicError> {
        let source = GeniusLyricsSource::new(config.source.clone())?;
        if config.source.token().is_none() {
            tracing::warn!("No Genius token configured, searches will return no songs");
        }
        let pipeline = SearchPipeline::new(
            Arc::new(source),
            Arc::new(WhatlangDetector::new()),
            config.search.clone(),
        );
        if config.cache.enabled {
            let cache: TtlCache<SearchResponse> = TtlCache::from_config(&config.cache);
            Ok(pipeline.with_cache(Arc::new(cache)))
        } else {
            Ok(pipeline)
        }
    }

    /// Clamp a requested result count to 1..=max_results_cap, where the cap
    /// itself never exceeds MAX_RESULTS_LIMIT. None means the cap.
    pub fn effective_max_results(&self, requested: Option<usize>) -> usize {
        let cap = self.config.max_results_cap.clamp(1, MAX_RESULTS_LIMIT);
        requested.unwrap_or(cap).clamp(1, cap)
    }

    /// Validate and parse a theme.
    pub fn parse(&self, theme: &str) -> Result<ParsedTheme, FindMusicError> {
        let theme = theme.trim();
        if theme.is_empty() {
            return Err(FindMusicError::validation(
                "theme",
                "Field 'theme' is required and cannot be empty",
            ));
        }
        let parsed = parse_theme(self.detector.as_ref(), theme);
        if parsed.clean.is_empty() {
            return Err(FindMusicError::validation(
                "theme",
                "Field 'theme' must contain at least one letter or digit",
            ));
        }
        Ok(parsed)
    }

    pub async fn search(
        &self,
        theme: &str,
        max_results: Option<usize>,
    ) -> Result<SearchResponse, FindMusicError> {
        let request_id = Uuid::new_v4();
        let max_results = self.effective_max_results(max_results);
        let parsed = self.parse(theme)?;
        let cache_key = format!("{}|{}", parsed.clean, max_results);

        if let Some(cache) = &self.cache {
            if let Some(mut hit) = cache.get(&cache_key) {
                tracing::info!(request_id = %request_id, key = %cache_key, "Search served from cache");
                hit.request_id = request_id;
                hit.query = parsed.raw.clone();
                hit.cached = true;
                return Ok(hit);
            }
        }

        tracing::info!(
            request_id = %request_id,
            clean = %parsed.clean,
            language = %parsed.language,
            strict = parsed.strict_keywords.len(),
            expanded = parsed.expanded_keywords.len(),
            source = self.source.name(),
            "Search started"
        );

        let outcome = self.source.find(&parsed).await?;
        let songs_raw_count = outcome.songs.len();

        let processed = normalize_lyrics(self.detector.as_ref(), outcome.songs);

        let mut rng = match self.config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let results = analyze_songs(
            &processed,
            &parsed,
            self.config.shuffle_pool,
            max_results,
            &mut rng,
        );

        let response = SearchResponse {
            request_id,
            query: parsed.raw.clone(),
            language_query: parsed.language,
            debug: SearchDebug {
                songs_raw_count,
                songs_processed_count: processed.len(),
                main_count: results.results_main.len(),
                secondary_count: results.results_secondary.len(),
                lyrics_finder: outcome.report,
            },
            results,
            cached: false,
        };

        tracing::info!(
            request_id = %request_id,
            songs_raw = response.debug.songs_raw_count,
            songs_processed = response.debug.songs_processed_count,
            main = response.debug.main_count,
            secondary = response.debug.secondary_count,
            "Search complete"
        );

        if let Some(cache) = &self.cache {
            cache.put(cache_key, response.clone());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{LyricsSourceError, SourceOutcome};
    use async_trait::async_trait;

    struct EmptySource;

    #[async_trait]
    impl LyricsSource for EmptySource {
        async fn find(&self, _theme: &ParsedTheme) -> Result<SourceOutcome, LyricsSourceError> {
            Ok(SourceOutcome::default())
        }

        fn name(&self) -> &str {
            "empty"
        }
    }

    fn pipeline(cap: usize) -> SearchPipeline {
        SearchPipeline::new(
            Arc::new(EmptySource),
            Arc::new(WhatlangDetector::new()),
            SearchConfig {
                max_results_cap: cap,
                ..SearchConfig::default()
            },
        )
    }

    #[test]
    fn test_effective_max_results_is_clamped() {
        let p = pipeline(20);
        assert_eq!(p.effective_max_results(None), 20);
        assert_eq!(p.effective_max_results(Some(5)), 5);
        assert_eq!(p.effective_max_results(Some(500)), 20);
        assert_eq!(p.effective_max_results(Some(0)), 1);
    }

    #[test]
    fn test_configured_cap_cannot_exceed_limit() {
        let p = pipeline(100);
        assert_eq!(p.effective_max_results(None), MAX_RESULTS_LIMIT);
        assert_eq!(p.effective_max_results(Some(50)), MAX_RESULTS_LIMIT);

        let p = pipeline(5);
        assert_eq!(p.effective_max_results(Some(50)), 5);

        let p = pipeline(0);
        assert_eq!(p.effective_max_results(None), 1);
    }

    #[test]
    fn test_parse_rejects_blank_and_symbol_only_themes() {
        let p = pipeline(20);
        for theme in ["", "   ", "?!..."] {
            match p.parse(theme) {
                Err(FindMusicError::Validation { field, .. }) => {
                    assert_eq!(field.as_deref(), Some("theme"))
                }
                other => panic!("expected validation error for {theme:?}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_zero_songs_gives_empty_partitions() {
        let p = pipeline(20);
        let response = p.search("mon père me parle", Some(10)).await.unwrap();
        assert!(response.results.results_main.is_empty());
        assert!(response.results.results_secondary.is_empty());
        assert_eq!(response.debug.songs_raw_count, 0);
        assert_eq!(response.query, "mon père me parle");
        assert!(!response.cached);
    }

    #[tokio::test]
    async fn test_response_json_is_flat() {
        let p = pipeline(20);
        let response = p.search("father", None).await.unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["results_main"].is_array());
        assert!(json["results_secondary"].is_array());
        assert_eq!(json["language_query"], "fr");
        assert!(json["debug"]["lyrics_finder"].is_object());
        assert!(json["request_id"].is_string());
    }
}
