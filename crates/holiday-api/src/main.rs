//! Holiday proxy server binary.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! holiday-proxy --config config.yaml
//!
//! # With environment variables only
//! HOLIDAYS_SERVER__PORT=9090 HOLIDAYS_BATCH__MODE=in_process holiday-proxy
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, Level};

use holiday_api::http::{create_router_with_observability, AppState};
use holiday_api::observability::{init_logging, init_metrics, LoggingConfig};
use holiday_api::smoke::run_smoke_test;
use holiday_server::ServerConfig;
use holiday_upstream::{HttpCalendarClient, UpstreamConfig};

/// Holiday proxy: answers public-holiday questions from an upstream calendar
#[derive(Parser, Debug)]
#[command(name = "holiday-proxy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    init_logging(LoggingConfig {
        json_format: config.logging.json,
        default_level: parse_log_level(&config.logging.level),
    });

    info!(version = env!("CARGO_PKG_VERSION"), "Starting holiday proxy");

    let metrics_state = if config.metrics.enabled {
        let state = init_metrics()?;
        info!("Metrics enabled at /metrics");
        Some(state)
    } else {
        None
    };

    let upstream = HttpCalendarClient::new(
        UpstreamConfig::new(config.upstream.base_url.clone())
            .with_timeout(config.upstream.timeout()),
    )?;
    info!(base_url = %upstream.base_url(), "Upstream calendar provider configured");

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    let local_addr = listener.local_addr()?;

    let self_address = self_call_address(config.server.self_address.as_deref(), local_addr);
    let state = AppState::from_config(Arc::new(upstream), &config, &self_address)?;
    info!(
        batch_mode = %config.batch.mode,
        self_address = %self_address,
        max_dates = config.batch.max_dates,
        "Batch aggregator configured"
    );

    let router =
        create_router_with_observability(state, metrics_state, config.server.body_limit_bytes);

    if config.smoke_test.enabled {
        let settings = config.smoke_test.clone();
        let address = self_address.clone();
        tokio::spawn(async move {
            if let Err(err) = run_smoke_test(&address, &settings).await {
                error!(error = %err, "smoke test failed");
            }
        });
    }

    info!(addr = %local_addr, "HTTP server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Address the batch aggregator uses to reach this process.
///
/// An explicit setting wins. Otherwise the bound address is used, with an
/// unspecified IP (`0.0.0.0`, `::`) replaced by loopback.
fn self_call_address(configured: Option<&str>, local_addr: SocketAddr) -> String {
    if let Some(addr) = configured {
        return addr.trim().to_string();
    }

    let mut addr = local_addr;
    if addr.ip().is_unspecified() {
        let loopback = if addr.is_ipv4() {
            std::net::Ipv4Addr::LOCALHOST.into()
        } else {
            std::net::Ipv6Addr::LOCALHOST.into()
        };
        addr.set_ip(loopback);
    }
    addr.to_string()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Parse log level from string.
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
