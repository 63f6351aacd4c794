use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use findmusic::config::Config;
use findmusic::logging;
use findmusic::pipeline::SearchPipeline;
use findmusic::server::FindMusicService;
use rmcp::ServiceExt;

#[derive(Parser)]
#[command(name = "findmusic", version, about = "Theme-driven lyrics search")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print the response as JSON
    Search {
        /// Free-text theme, e.g. "mon père me parle"
        theme: String,
        /// Maximum results per category (clamped to search.max_results_cap)
        #[arg(long)]
        max_results: Option<usize>,
        /// Fix the shuffle seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print how a theme is parsed (no external calls)
    Parse {
        theme: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Parse CLI args
    let cli = Cli::parse();

    // 2. Load configuration
    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Config error (using defaults): {}", e);
        Config::default()
    });

    // 3. Initialize logging FIRST (stderr only; stdout carries JSON)
    logging::init_logging(&config);

    match cli.command {
        Some(Commands::Search { theme, max_results, seed }) => {
            if seed.is_some() {
                config.search.shuffle_seed = seed;
            }
            let pipeline = SearchPipeline::from_config(&config)?;
            let response = pipeline.search(&theme, max_results).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Some(Commands::Parse { theme }) => {
            let pipeline = SearchPipeline::from_config(&config)?;
            let parsed = pipeline.parse(&theme)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }

        None => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "findmusic server starting"
            );

            let pipeline = Arc::new(SearchPipeline::from_config(&config)?);
            tracing::info!(
                cache_enabled = config.cache.enabled,
                cache_ttl_secs = config.cache.ttl_secs,
                max_results_cap = config.search.max_results_cap,
                "Search pipeline initialized"
            );

            let service = FindMusicService::new(pipeline);

            let (stdin, stdout) = rmcp::transport::io::stdio();
            let server = service.serve((stdin, stdout)).await?;

            tracing::info!("findmusic server running, awaiting tool calls via stdio");

            // Wait for shutdown (client disconnects or signal)
            server.waiting().await?;

            tracing::info!("findmusic server stopped");
        }
    }

    Ok(())
}
