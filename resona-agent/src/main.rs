//! Resona Agent - Main entry point
//!
//! Long-lived local companion for the Resona desktop client: watches the
//! music library folder for changes and drives the system-wide equalizer
//! through generated config files, exposing both over a localhost HTTP +
//! SSE surface.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resona_agent::api::{self, AppContext};
use resona_agent::config::TomlConfig;
use resona_agent::equalizer::{ApoBackend, EqualizerEngine};
use resona_agent::library::WatchManager;
use resona_common::events::EventBus;

/// Command-line arguments for resona-agent
#[derive(Parser, Debug)]
#[command(name = "resona-agent")]
#[command(about = "Library and equalizer companion service for the Resona client")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "RESONA_AGENT_PORT")]
    port: Option<u16>,

    /// Music folder to watch
    #[arg(short, long)]
    music_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start watching the music folder immediately
    #[arg(long, default_value_t = false)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resona_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    let config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let port = args.port.unwrap_or(config.port);

    let music_folder = resona_common::config::resolve_music_folder(
        args.music_folder.as_deref(),
        "RESONA_MUSIC_FOLDER",
        config.music_folder.as_ref(),
    );

    info!("Starting Resona agent on port {}", port);
    info!("Music folder: {}", music_folder.display());

    let bus = Arc::new(EventBus::new(256));
    let watches = Arc::new(WatchManager::new(Arc::clone(&bus)));

    let backend = ApoBackend::with_defaults(
        config.equalizer.install_dir.clone(),
        config.equalizer.config_path.clone(),
    );
    let equalizer = Arc::new(EqualizerEngine::new(Box::new(backend), Arc::clone(&bus)));

    // Startup probe; absence is a steady state, not an error
    let snapshot = equalizer.detect().await;
    if snapshot.available {
        info!("Equalizer install detected");
    } else {
        info!("No equalizer install detected; equalizer endpoints report unavailable");
    }

    if args.watch {
        watches
            .start(music_folder.clone())
            .await
            .context("Failed to start folder watch")?;
    }

    // Build the application router
    let ctx = AppContext {
        bus,
        watches: Arc::clone(&watches),
        equalizer,
        port,
    };
    let app = api::create_router(ctx);

    // Loopback only: the agent is a local IPC surface, not a network service
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Tear down the active watch so no debounce task outlives the server
    watches.shutdown().await;

    info!("Server shutdown complete");
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
