//! Caching proxy in front of the TransLoc API for the live map.

mod config;
mod routes;

use std::sync::Arc;

use eyre::WrapErr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wolfline_transit::{HttpFetcher, TransLocFeed, TransitStore};

use crate::config::ServerConfig;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wolfline_server=info,wolfline_transit=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    setup_logging();

    let config = ServerConfig::from_env().wrap_err("failed to read configuration")?;
    info!(
        "Serving agency {} from {}",
        config.transloc.agency_id, config.transloc.base_url
    );

    let fetcher = HttpFetcher::new(&config.transloc)?;
    let feed = TransLocFeed::new(fetcher, config.transloc.clone());
    let store = Arc::new(TransitStore::new(feed, config.intervals));

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .wrap_err_with(|| format!("failed to bind port {}", config.port))?;
    info!("Listening at http://{}", listener.local_addr()?);

    axum::serve(listener, routes::create_router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
