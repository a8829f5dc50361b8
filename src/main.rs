use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leaderboard::api::build_router;
use leaderboard::api::state::AppState;
use leaderboard::config::{AppConfig, StoreBackend};
use leaderboard::ingest;
use leaderboard::ranking::Leaderboard;
use leaderboard::storage::connect_store;

#[derive(Parser)]
#[command(name = "leaderboard")]
#[command(about = "Leaderboard service backed by a ranked score store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Use the in-process store instead of Redis
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Submit every score in a JSONL file
    Import {
        /// JSONL file with one {name, email, score} object per line
        #[arg(long)]
        file: PathBuf,
    },

    /// Write the full ranked list to a JSONL file
    Export {
        /// Output path
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {:?}", cli.config))?;
    if cli.memory {
        config.store.backend = StoreBackend::Memory;
    }

    // Initialize tracing
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting leaderboard v{}", env!("CARGO_PKG_VERSION"));

    let store = connect_store(&config.store)
        .await
        .context("Failed to connect to the ranking store")?;
    let board = Leaderboard::new(store, &config.leaderboard);

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState { leaderboard: board };
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
        Commands::Import { file } => {
            if config.store.backend == StoreBackend::Memory {
                tracing::warn!("Importing into the in-process store; scores are lost on exit");
            }
            let result = ingest::import_scores(&file, &board).await?;
            println!("\n=== Import Results ===");
            println!("Accepted: {}", result.accepted);
            println!("Rejected: {}", result.rejected);
            if !result.errors.is_empty() {
                println!("\nErrors:");
                for err in &result.errors {
                    println!("  - {}", err);
                }
            }
        }
        Commands::Export { file } => {
            let count = ingest::export_scores(&file, &board).await?;
            println!("Exported {} entries to {}", count, file.display());
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
