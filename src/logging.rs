/// Log output for findmusic
///
/// stdout is never written: in server mode it carries the MCP JSON-RPC stream,
/// in CLI mode the search response. Everything goes to stderr, either as
/// human-readable lines or as one JSON object per event for log collectors.
/// Search events carry `request_id`, so a JSON log can be grouped per request.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// `log_format` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty on a terminal, JSON when stderr is piped
    #[default]
    Auto,
    Pretty,
    Json,
}

impl LogFormat {
    /// Concrete format for the given stderr; never returns Auto.
    pub fn resolve(self, stderr_is_terminal: bool) -> LogFormat {
        match self {
            LogFormat::Auto if stderr_is_terminal => LogFormat::Pretty,
            LogFormat::Auto => LogFormat::Json,
            fixed => fixed,
        }
    }
}

/// Filter directive: `RUST_LOG` wins, then `log_level`, then "info" if the
/// configured level does not parse.
fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(config: &Config) {
    let format = config.log_format.resolve(std::io::stderr().is_terminal());
    let filter = build_filter(config);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .json(),
            )
            .init(),
        _ => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .init(),
    }

    if let Some(path) = &config.log_file {
        tracing::warn!(log_file = %path, "log_file is ignored, logging to stderr only");
    }
    tracing::debug!(format = ?format, level = %config.log_level, "Logging initialized");
}
