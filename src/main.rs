use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gis_relay::config::loader::{load_config, ConfigError};
use gis_relay::config::validation::validate_config;
use gis_relay::config::RelayConfig;
use gis_relay::http::RelayServer;
use gis_relay::lifecycle::Shutdown;
use gis_relay::observability::metrics;

/// CORS relay for an upstream WMS/WFS GIS server.
#[derive(Debug, Parser)]
#[command(name = "gis-relay", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (also: RELAY_BIND).
    #[arg(long)]
    bind: Option<String>,

    /// Override the upstream base origin (also: RELAY_BASE_ORIGIN).
    #[arg(long)]
    base_origin: Option<String>,

    /// Include attempted upstream URLs in relay error bodies.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(bind) = args.bind.or_else(|| std::env::var("RELAY_BIND").ok()) {
        config.listener.bind_address = bind;
    }
    if let Some(origin) = args
        .base_origin
        .or_else(|| std::env::var("RELAY_BASE_ORIGIN").ok())
    {
        config.upstream.base_origin = origin;
    }
    if args.debug {
        config.debug = true;
    }

    // Overrides can invalidate a previously valid config.
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gis_relay={},tower_http=info", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_path = %config.listener.mount_path,
        upstream = %config.upstream.base_origin,
        connect_timeout_ms = config.timeouts.connect_ms,
        total_timeout_ms = config.timeouts.total_ms,
        debug = config.debug,
        "configuration loaded"
    );

    if config.upstream.insecure_skip_tls_verify {
        tracing::warn!("TLS certificate verification for the upstream is DISABLED");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = RelayServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
