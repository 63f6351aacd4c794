use rmcp::{
    ServerHandler,
    tool,
    model::{ServerCapabilities, Implementation, ProtocolVersion, CallToolResult},
    handler::server::wrapper::Parameters,
    ErrorData as McpError,
};
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::FindMusicError;
use crate::pipeline::SearchPipeline;

pub struct FindMusicService {
    pipeline: Arc<SearchPipeline>,
    start_time: Instant,
}

impl FindMusicService {
    pub fn new(pipeline: Arc<SearchPipeline>) -> Self {
        Self {
            pipeline,
            start_time: Instant::now(),
        }
    }

    fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// Parameter structs

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchSongsParams {
    /// Free-text theme, e.g. "mon père me parle" (required)
    pub theme: String,
    /// Maximum results per category (1-20, default: 20)
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ParseThemeParams {
    /// Free-text theme to analyze (required)
    pub theme: String,
}

// Helper: convert FindMusicError to CallToolResult with isError: true
fn error_to_result(err: FindMusicError) -> CallToolResult {
    match err {
        FindMusicError::Validation { message, field } => {
            let mut obj = json!({
                "isError": true,
                "error": message,
            });
            if let Some(f) = field {
                obj["field"] = json!(f);
            }
            CallToolResult::structured_error(obj)
        }
        FindMusicError::Source(msg) => {
            CallToolResult::structured_error(json!({
                "isError": true,
                "error": format!("Lyrics source error: {}", msg),
                "hint": "The external lyrics catalog is unavailable; retry later"
            }))
        }
        other => {
            CallToolResult::structured_error(json!({
                "isError": true,
                "error": other.to_string()
            }))
        }
    }
}

// Tool implementations
#[rmcp::tool_router]
impl FindMusicService {
    #[tool(description = "Find songs whose lyrics match a free-text theme. Returns main results (theme is central) and secondary results (theme is mentioned), each with relevance, density, centrality and a lyrics snippet. Order is randomized, weighted by relevance.")]
    async fn search_songs(
        &self,
        Parameters(params): Parameters<SearchSongsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            tool = "search_songs",
            theme = %params.theme,
            max_results = ?params.max_results,
            "Tool called"
        );

        let max_results = params.max_results.map(|m| m as usize);
        match self.pipeline.search(&params.theme, max_results).await {
            Ok(response) => {
                let value = serde_json::to_value(&response)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::structured(value))
            }
            Err(e) => Ok(error_to_result(e)),
        }
    }

    #[tool(description = "Show how a theme is interpreted: cleaned text, strict keywords, expanded keywords and detected language. Makes no external calls.")]
    async fn parse_theme(
        &self,
        Parameters(params): Parameters<ParseThemeParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "parse_theme", theme = %params.theme, "Tool called");

        match self.pipeline.parse(&params.theme) {
            Ok(parsed) => {
                let value = serde_json::to_value(&parsed)
                    .map_err(|e| McpError::internal_error(e.to_string(), None))?;
                Ok(CallToolResult::structured(value))
            }
            Err(e) => Ok(error_to_result(e)),
        }
    }

    #[tool(description = "Check server health and status")]
    async fn health_check(
        &self,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(tool = "health_check", "Tool called");

        Ok(CallToolResult::structured(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": self.uptime_seconds(),
        })))
    }
}

// ServerHandler implementation
#[rmcp::tool_handler(router = Self::tool_router())]
impl ServerHandler for FindMusicService {
    fn get_info(&self) -> rmcp::model::InitializeResult {
        rmcp::model::InitializeResult {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "findmusic".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some("Theme-driven lyrics search with relevance scoring".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Lyrics theme search. Tools: search_songs (theme -> ranked songs), parse_theme (inspect keyword expansion), health_check.".to_string()
            ),
        }
    }
}
