mod forms;
mod routes;
mod services;
mod views;

use std::net::SocketAddr;
use studio_dashboard::storage::{load_settings, settings_path};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings_path = settings_path();
    let settings = load_settings(&settings_path)
        .await
        .expect("failed to load settings");
    settings.validate().expect("invalid settings");

    let state = routes::build_state(&settings).expect("failed to prepare dashboard state");
    let monitor = state.monitor.clone().start();
    let app = routes::build_router(state);

    let addr: SocketAddr = settings.bind_address.parse().expect("invalid bind address");
    info!(
        settings = %settings_path.display(),
        poll_interval_secs = settings.poll_interval_secs,
        "dashboard listening on http://{addr}"
    );
    axum::Server::try_bind(&addr)
        .expect("failed to bind address")
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    monitor.shutdown().await;
    info!("dashboard stopped");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
