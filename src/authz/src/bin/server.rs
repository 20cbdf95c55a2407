//! # Privileges HTTP Server
//!
//! Serves the privilege engine over HTTP, backed by the in-memory store and
//! optionally seeded from a TOML configuration file.
//!
//! ## Configuration
//!
//! - `--config` / `PRIVILEGES_CONFIG` - TOML file (optional)
//! - `--port` / `PORT` - HTTP port (overrides config)
//! - `--log-level` / `LOG_LEVEL` - Log level (overrides config)
//! - `RUST_LOG` - Full filter directive, wins over both

use anyhow::{Context, Result};
use clap::Parser;
use privileges_authz::api::{create_router, AppState};
use privileges_authz::{InMemoryStorage, PrivilegeEngine, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Privileges server CLI
#[derive(Parser)]
#[command(name = "privileges-server")]
#[command(about = "Wildcard-aware privilege checks over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PRIVILEGES_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port (overrides config)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level (overrides config)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received SIGTERM signal");
        }
    }

    info!("Starting graceful shutdown");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ServerConfig::default(),
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Privileges Server v{}", privileges_authz::VERSION);
    info!("Configuration:");
    info!("  Address: {}:{}", config.server.host, config.server.port);
    info!("  Seed grants: {}", config.seed.len());
    info!("  Seed roles: {}", config.seed_roles.len());

    let engine = PrivilegeEngine::new(Arc::new(InMemoryStorage::new()));
    config.apply_seed(&engine).await?;

    let app = create_router(AppState::new(engine));
    let addr = config.socket_addr()?;

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server shut down gracefully");
    Ok(())
}
