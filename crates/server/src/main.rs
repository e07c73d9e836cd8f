mod config;
mod error;
mod routes;
mod seed;
mod state;

use std::sync::Arc;

use bus_tracker_transit::{BusTracker, TopologyProvider};
use clap::Parser;
use eyre::WrapErr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Args;
use crate::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    setup_logging();

    let topology = seed::load(args.seed.as_deref())?;
    tracing::info!(
        stops = topology.all_stops().len(),
        routes = topology.all_routes().len(),
        buses = topology.all_buses().len(),
        drivers = topology.all_drivers().len(),
        "fleet loaded"
    );

    let tracker = BusTracker::new(Arc::new(topology)).with_config(args.tracker_config()?);
    let app = routes::create_router(AppState::new(tracker));

    let addr = args.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    tracing::info!("API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server stopped unexpectedly")
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
