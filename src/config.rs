/// Configuration management using figment
///
/// Loads configuration with this precedence (highest wins):
/// 1. Defaults (hardcoded)
/// 2. TOML file: findmusic.toml (in working directory)
/// 3. Environment variables: prefixed FINDMUSIC_ (e.g., FINDMUSIC_LOG_LEVEL=debug)
///
/// Nested sections use a double underscore: FINDMUSIC_SOURCE__GENIUS_TOKEN=...

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml, Serialized},
};
use serde::{Deserialize, Serialize};
use crate::errors::FindMusicError;
use crate::logging::LogFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// auto, pretty or json
    #[serde(default)]
    pub log_format: LogFormat,

    /// Optional file path for log output (in addition to stderr)
    #[serde(default)]
    pub log_file: Option<String>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Ranking and result-size limits applied at the request boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Upper bound for max_results, whatever the caller asks for.
    /// Values above 20 are treated as 20.
    #[serde(default = "default_max_results_cap")]
    pub max_results_cap: usize,

    /// How many top-relevance songs enter the weighted shuffle
    #[serde(default = "default_shuffle_pool")]
    pub shuffle_pool: usize,

    /// Fixed seed for the weighted shuffle. None = OS entropy per request.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

fn default_max_results_cap() -> usize {
    20
}

fn default_shuffle_pool() -> usize {
    40
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_results_cap: default_max_results_cap(),
            shuffle_pool: default_shuffle_pool(),
            shuffle_seed: None,
        }
    }
}

/// Genius search + lyrics.ovh fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Genius API bearer token. Without it, catalog search is skipped.
    #[serde(default)]
    pub genius_token: Option<String>,

    #[serde(default = "default_genius_base_url")]
    pub genius_base_url: String,

    #[serde(default = "default_ovh_base_url")]
    pub ovh_base_url: String,

    /// Number of expanded keywords sent to the catalog search
    #[serde(default = "default_keywords_per_query")]
    pub keywords_per_query: usize,

    #[serde(default = "default_hits_per_keyword")]
    pub hits_per_keyword: usize,

    /// Stop collecting once this many songs have lyrics
    #[serde(default = "default_max_songs")]
    pub max_songs: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_keyword_pause_ms")]
    pub keyword_pause_ms: u64,

    #[serde(default = "default_rate_limit_backoff_secs")]
    pub rate_limit_backoff_secs: u64,
}

fn default_genius_base_url() -> String {
    "https://api.genius.com".to_string()
}

fn default_ovh_base_url() -> String {
    "https://api.lyrics.ovh".to_string()
}

fn default_keywords_per_query() -> usize {
    2
}

fn default_hits_per_keyword() -> usize {
    6
}

fn default_max_songs() -> usize {
    25
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_keyword_pause_ms() -> u64 {
    250
}

fn default_rate_limit_backoff_secs() -> u64 {
    15
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            genius_token: None,
            genius_base_url: default_genius_base_url(),
            ovh_base_url: default_ovh_base_url(),
            keywords_per_query: default_keywords_per_query(),
            hits_per_keyword: default_hits_per_keyword(),
            max_songs: default_max_songs(),
            request_timeout_secs: default_request_timeout_secs(),
            keyword_pause_ms: default_keyword_pause_ms(),
            rate_limit_backoff_secs: default_rate_limit_backoff_secs(),
        }
    }
}

impl SourceConfig {
    /// The configured token, treating blank strings as absent.
    pub fn token(&self) -> Option<&str> {
        self.genius_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn keyword_pause(&self) -> Duration {
        Duration::from_millis(self.keyword_pause_ms)
    }

    pub fn rate_limit_backoff(&self) -> Duration {
        Duration::from_secs(self.rate_limit_backoff_secs)
    }
}

/// In-memory response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_log_level(),
            log_format: LogFormat::Auto,
            log_file: None,
            search: SearchConfig::default(),
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, TOML file, and environment variables
    ///
    /// Environment variables override TOML file values.
    /// Example: FINDMUSIC_CACHE__TTL_SECS=60 overrides cache.ttl_secs in findmusic.toml
    pub fn load() -> Result<Config, FindMusicError> {
        Self::figment()
            .extract()
            .map_err(|e| FindMusicError::Config(format!("Failed to load config: {}", e)))
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("findmusic.toml"))
            .merge(Env::prefixed("FINDMUSIC_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Auto);
        assert_eq!(config.log_file, None);
        assert_eq!(config.search.max_results_cap, 20);
        assert_eq!(config.search.shuffle_pool, 40);
        assert_eq!(config.search.shuffle_seed, None);
        assert_eq!(config.source.keywords_per_query, 2);
        assert_eq!(config.source.hits_per_keyword, 6);
        assert_eq!(config.source.max_songs, 25);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_blank_token_is_absent() {
        let mut source = SourceConfig::default();
        assert_eq!(source.token(), None);
        source.genius_token = Some("   ".to_string());
        assert_eq!(source.token(), None);
        source.genius_token = Some(" abc ".to_string());
        assert_eq!(source.token(), Some("abc"));
    }

    #[test]
    fn test_toml_and_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "findmusic.toml",
                r#"
                log_level = "debug"

                [search]
                shuffle_seed = 7

                [cache]
                ttl_secs = 30
                "#,
            )?;
            jail.set_env("FINDMUSIC_CACHE__TTL_SECS", "90");
            jail.set_env("FINDMUSIC_SOURCE__MAX_SONGS", "10");
            jail.set_env("FINDMUSIC_LOG_FORMAT", "json");

            let config = Config::load().expect("config should load");
            assert_eq!(config.log_level, "debug");
            assert_eq!(config.search.shuffle_seed, Some(7));
            assert_eq!(config.cache.ttl_secs, 90);
            assert_eq!(config.source.max_songs, 10);
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.search.max_results_cap, 20);
            Ok(())
        });
    }
}
