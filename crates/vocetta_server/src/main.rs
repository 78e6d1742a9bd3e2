use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use vocetta_core::{init_telemetry, redact_context};
use vocetta_quota::Sweeper as QuotaSweeper;
use vocetta_rate_limit::Sweeper as RateSweeper;
use vocetta_server::{AppState, VocettaConfig, create_router};

/// Lapsed rate-limit windows are reclaimed once a minute.
const RATE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Quota ledgers live for a month, so an hourly sweep is plenty.
const QUOTA_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Parser, Debug)]
#[command(author, version, about = "Vocetta text-to-speech gateway", long_about = None)]
struct Args {
    /// Path to a configuration file (default: bundled defaults plus
    /// ~/.config/vocetta/vocetta.toml and ./vocetta.toml overrides)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configured port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => VocettaConfig::from_file(path)?,
        None => VocettaConfig::load()?,
    };

    init_telemetry(config.telemetry())?;

    info!(
        config = %redact_context(serde_json::to_value(&config)?),
        "starting vocetta gateway"
    );

    let state = AppState::from_config(&config);

    if !state.synthesis().is_configured() {
        warn!("OPENAI_API_KEY is not set; synthesis requests will be rejected until it is");
    }

    let _ip_sweeper = RateSweeper::spawn(Arc::clone(state.ip_limiter()), RATE_SWEEP_INTERVAL);
    let _user_sweeper = RateSweeper::spawn(Arc::clone(state.user_limiter()), RATE_SWEEP_INTERVAL);
    let _quota_sweeper = QuotaSweeper::spawn(Arc::clone(state.quota()), QUOTA_SWEEP_INTERVAL);

    let app = create_router(state);

    let port = args.port.unwrap_or(*config.port());
    let addr = format!("{}:{}", config.host(), port);
    let listener = TcpListener::bind(&addr).await?;

    info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("vocetta gateway stopped");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("shutdown signal received, draining connections");
}
