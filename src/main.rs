//! # Guestbook
//!
//! Accepts guestbook entries over HTTP, stores them in Redis, and relays new
//! entries to subscribed phone numbers by SMS.
//!
//! Usage:
//!   guestbook                          # Redis at REDIS_MASTER / REDIS_SLAVE, port 3000
//!   guestbook --port 8080              # Custom port
//!   guestbook --config guestbook.toml  # Load settings from a TOML file
//!   guestbook --memory-store           # No Redis, data lives in process memory

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use guestbook_core::{GuestbookConfig, GuestbookStore};
use guestbook_gateway::AppState;
use guestbook_scheduler::{OutboxScanner, TwilioDispatcher, spawn_scanner};
use guestbook_store::{MemoryStore, RedisStore};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "guestbook",
    version,
    about = "📖 Guestbook — entries over HTTP, new entries relayed by SMS"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config and GUESTBOOK_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep data in process memory instead of Redis
    #[arg(long)]
    memory_store: bool,

    /// Do not start the outbox scanner
    #[arg(long)]
    no_scanner: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "guestbook=debug,tower_http=debug"
    } else {
        "guestbook=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => GuestbookConfig::load_from(path)?,
        None => GuestbookConfig::from_env(),
    };
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if cli.no_scanner {
        config.scanner.enabled = false;
    }
    config.validate()?;

    let store: Arc<dyn GuestbookStore> = if cli.memory_store {
        tracing::warn!("⚠️ Using in-memory store: data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(RedisStore::open(&config.redis)?)
    };

    let dispatcher = TwilioDispatcher::new(config.twilio.clone());
    if !dispatcher.is_enabled() {
        tracing::warn!(
            "⚠️ TWILIO_ACCOUNT_SID / TWILIO_ACCOUNT_TOKEN not set, SMS relay disabled"
        );
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let scanner = if config.scanner.enabled {
        let scanner = Arc::new(OutboxScanner::new(store.clone(), Arc::new(dispatcher)));
        Some(spawn_scanner(
            scanner,
            config.scanner.interval(),
            shutdown_rx.clone(),
        ))
    } else {
        tracing::info!("Outbox scanner disabled");
        None
    };

    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = signal_tx.send(true);
    });

    println!("📖 Guestbook v{}", env!("CARGO_PKG_VERSION"));
    println!("   🌐 HTTP:    http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   🗄️  Store:   {}", store.backend());
    println!("   📁 Static:  {}", config.gateway.public_dir.display());
    println!();

    let served = guestbook_gateway::start(
        AppState::new(store).with_public_dir(&config.gateway.public_dir),
        &config.gateway.host,
        config.gateway.port,
        shutdown_rx,
    )
    .await;

    // Stop the scanner whether the server drained or failed to start.
    let _ = shutdown_tx.send(true);
    if let Some(handle) = scanner {
        if let Err(e) = handle.await {
            tracing::warn!("⚠️ Outbox scanner task ended abnormally: {e}");
        }
    }

    served?;
    tracing::info!("👋 Guestbook stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "guestbook",
            "--port",
            "8080",
            "--memory-store",
            "--no-scanner",
        ]);
        assert_eq!(cli.port, Some(8080));
        assert!(cli.memory_store);
        assert!(cli.no_scanner);
        assert!(cli.config.is_none());
    }
}
