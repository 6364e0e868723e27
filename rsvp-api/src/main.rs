//! rsvp-api - wedding RSVP HTTP service
//!
//! Serves guest name verification, RSVP submission, avatar selection and the
//! admin verification link. Configuration comes from the environment; see
//! `rsvp_common::config`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rsvp_common::email::ResendMailer;
use rsvp_common::store::RestStore;
use rsvp_common::Config;
use tokio::signal;
use tracing::info;

use rsvp_api::{build_router, AppState};

/// Command-line arguments for rsvp-api
#[derive(Parser, Debug)]
#[command(name = "rsvp-api")]
#[command(about = "Wedding RSVP HTTP service")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "RSVP_BIND_ADDR")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!(
        "Starting rsvp-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::from_env();

    let store = RestStore::new(&config.store, config.request_timeout)
        .context("Failed to create store client")?;
    let mailer = ResendMailer::new(&config.email, config.request_timeout)
        .context("Failed to create email client")?;

    let state = AppState::new(config, Arc::new(store), Arc::new(mailer));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;
    info!("Listening on http://{}", args.bind);
    info!("Health check: http://{}/api/health", args.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
