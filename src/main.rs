//! webdict - look up word definitions in the browser
//!
//! Starts an HTTP server that answers searches from an on-disk cache or the
//! Free Dictionary API, throttled by a single global rate limiter.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webdict::cli::{Cli, ServerConfig};
use webdict::limiter::RateLimiter;
use webdict::server::{build_router, serve, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webdict=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let state = AppState::from_config(&config).await?;
    let limiter = Arc::new(RateLimiter::new(config.rate_interval));
    let router = build_router(state, limiter);

    let listener = TcpListener::bind(config.listen).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    serve(listener, router).await?;

    Ok(())
}
