pub mod dashboard;
pub mod health;
pub mod status;
pub mod workflow;

use axum::{
    routing::{get, post},
    Router,
};
use std::{path::PathBuf, sync::Arc, time::Duration};
use studio_dashboard::{
    models::ServiceName,
    monitor::HealthMonitor,
    probe::ReqwestProbe,
    scenario::{ReqwestScenarioClient, ScenarioClient},
    storage::DashboardSettings,
};
use tower_http::services::ServeDir;

const SCENARIO_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub monitor: HealthMonitor,
    pub scenario: Arc<dyn ScenarioClient>,
}

pub fn build_router(state: AppState) -> Router {
    let web_dir = web_dir();
    Router::new()
        .route("/api/services", get(status::services_status))
        .route("/api/services/refresh", post(status::services_refresh))
        .route("/api/services/stream", get(status::services_stream))
        .route(
            "/partials/service-status",
            get(dashboard::service_status_partial).post(dashboard::service_status_refresh),
        )
        .route("/partials/service-cards", get(dashboard::service_cards_partial))
        .route("/workflow/start", post(workflow::workflow_start))
        .route("/health", get(health::health))
        .route("/", get(dashboard::dashboard_page))
        .nest_service("/web", ServeDir::new(web_dir))
        .with_state(state)
}

pub fn build_state(settings: &DashboardSettings) -> Result<AppState, String> {
    let probe = ReqwestProbe::new(settings.probe_timeout())?;
    let monitor = HealthMonitor::new(
        Arc::new(probe),
        settings.endpoints(),
        settings.monitor_config(),
    );
    let scenario = ReqwestScenarioClient::new(
        settings.base_url(ServiceName::Scenario),
        SCENARIO_REQUEST_TIMEOUT,
    )?;
    Ok(AppState {
        monitor,
        scenario: Arc::new(scenario),
    })
}

fn web_dir() -> PathBuf {
    std::env::var("STUDIO_DASHBOARD_WEB_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web"))
}
