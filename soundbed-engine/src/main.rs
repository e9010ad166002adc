//! Soundbed smoke player - main entry point
//!
//! Loads an audio manifest, restores persisted volume levels, and loops
//! one clip group against the logging backend. Useful for exercising a
//! manifest and the preference database without a host audio system.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundbed_engine::backend::LogBackend;
use soundbed_engine::config;
use soundbed_engine::mixer::LogMixer;
use soundbed_engine::{PlaybackEngine, SharedState, VolumeStore};

/// Command-line arguments for the smoke player
#[derive(Parser, Debug)]
#[command(name = "soundbed-engine")]
#[command(about = "Clip-group smoke player for the soundbed engine")]
#[command(version)]
struct Args {
    /// Audio manifest declaring clip groups and volume groups
    #[arg(short, long, env = "SOUNDBED_MANIFEST")]
    manifest: PathBuf,

    /// Preference database path
    #[arg(short, long, default_value = "soundbed-prefs.db", env = "SOUNDBED_DB")]
    database: PathBuf,

    /// Clip group to loop (defaults to a group from the manifest)
    #[arg(short, long)]
    group: Option<String>,

    /// Stop after this many seconds (runs until ctrl-c when omitted)
    #[arg(short, long)]
    play_for: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundbed_engine=debug,soundbed_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting soundbed smoke player");
    info!("Manifest: {}", args.manifest.display());

    let manifest =
        config::load_manifest(&args.manifest).context("Failed to load audio manifest")?;
    let (registry, volume_groups) = manifest.build().context("Invalid audio manifest")?;

    let group = match args.group {
        Some(group) => group,
        None => registry
            .group_ids()
            .next()
            .map(str::to_string)
            .context("Manifest has no clip groups")?,
    };

    let db = soundbed_common::db::init_database(&args.database)
        .await
        .context("Failed to open preference database")?;

    let state = Arc::new(SharedState::new());

    let volumes = VolumeStore::new(volume_groups, db, Arc::new(LogMixer), Arc::clone(&state));
    volumes
        .initialise()
        .await
        .context("Failed to initialise volume groups")?;

    let engine = PlaybackEngine::new(registry, Arc::new(LogBackend), Arc::clone(&state));
    engine
        .play_looping(&group)
        .await
        .context("Failed to start looping group")?;
    info!("Looping clip group '{}'", group);

    match args.play_for {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    info!("Play window elapsed");
                }
                _ = shutdown_signal() => {}
            }
        }
        None => shutdown_signal().await,
    }

    engine.stop_looping(&group).await;
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
