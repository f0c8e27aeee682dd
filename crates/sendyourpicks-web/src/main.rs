use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::filter::{filter_fn, EnvFilter};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*};

use sendyourpicks_core::auth::GoTrueProvider;
use sendyourpicks_core::logging::{Logger, EVENT_TARGET};
use sendyourpicks_core::Config;

mod rejection;
mod routes;
mod session;
mod state;

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "sendyourpicks-web")]
#[command(about = "Session-validated web gateway for Send Your Picks")]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:3000", env = "SENDYOURPICKS_BIND_ADDRESS")]
    bind: String,
}

fn init_tracing() {
    // Event lines go out exactly as rendered: errors and warnings to stderr,
    // everything else to stdout.
    let events = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_writer(io::stderr.with_max_level(Level::WARN).or_else(io::stdout))
        .with_filter(filter_fn(|meta| meta.target() == EVENT_TARGET));

    // Use RUST_LOG env var to control diagnostics (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let diagnostics = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter)
        .with_filter(filter_fn(|meta| meta.target() != EVENT_TARGET));

    tracing_subscriber::registry()
        .with(events)
        .with(diagnostics)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let provider = GoTrueProvider::from_config(&config).context("Failed to build auth provider client")?;
    let state = AppState::new(&config, Arc::new(provider), Logger::tracing())
        .context("Failed to build API client")?;

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind))?;
    info!(
        "Listening on {} (auth: {}, api: {})",
        cli.bind, config.auth_url, config.api_base_url
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
