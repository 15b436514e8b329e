//! rolldice
//!
//! Rolls a six-sided die over HTTP. Each roll evaluates the `slow-your-roll`
//! feature flag, records a `roll` span and a `dice.rolls` counter, and waits
//! two seconds first when the flag is on.
//!
//! ```text
//!     Client ──▶ listener ──▶ request ID ──▶ trace span ──▶ timeout ──▶ router
//!                                                                        │
//!                          ┌─────────────────────────────────────────────┤
//!                          ▼                                             ▼
//!                     GET /  (308 or hint)                     GET /rolldice
//!                                                                        │
//!               flagd ◀── flag client ◀──────────────────────────────────┤
//!                                                                        ▼
//!                                              roll span → delay → die → counter
//!                                                                        │
//!     Client ◀──────────────────────────────────────────────────── "<n>\n"
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use rolldice::config::{load_config, validate_config, ConfigError, ServiceConfig};
use rolldice::lifecycle::{wait_for_signal, Shutdown};
use rolldice::observability::{init_metrics, init_telemetry};
use rolldice::{AppState, HttpServer};

#[derive(Parser)]
#[command(name = "rolldice", version)]
#[command(about = "Rolls a die over HTTP, with flag-gated latency", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    let telemetry = init_telemetry(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "rolldice starting");
    tracing::info!(
        config_path = ?cli.config,
        bind_address = %config.listener.bind_address,
        flag_provider = ?config.flags.provider,
        flag_key = %config.flags.key,
        slow_roll_ms = config.delay.slow_roll_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let state = AppState::from_config(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, state)
        .run(listener, server_shutdown)
        .await?;

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
