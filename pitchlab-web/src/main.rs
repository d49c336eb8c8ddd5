//! pitchlab-web: serves the pitcher profile form.

use anyhow::{Context, Result};
use clap::Parser;
use pitchlab_core::AppConfig;
use pitchlab_web::{build_router, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pitchlab-web", version, about = "PitchLab web form")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "PITCHLAB_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,

    /// Path to the TOML config file. Defaults apply when it does not exist.
    #[arg(long, default_value = "pitchlab.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting pitchlab-web v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = AppConfig::from_file_or_default(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    std::fs::create_dir_all(&config.charts.output_dir).with_context(|| {
        format!("creating chart directory {}", config.charts.output_dir.display())
    })?;
    info!("Chart directory: {}", config.charts.output_dir.display());
    info!("Cache directory: {}", config.data.cache_dir.display());

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("pitchlab-web listening on http://{}", args.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
