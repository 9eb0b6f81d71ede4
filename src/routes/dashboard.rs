use crate::routes::AppState;
use crate::services::load_projects;
use crate::views::dashboard::{render_dashboard_page, render_service_cards, render_service_status};
use axum::{extract::State, http::StatusCode, response::Html};

pub async fn dashboard_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.monitor.snapshot();
    let projects = load_projects(state.scenario.as_ref(), &snapshot).await;
    Html(render_dashboard_page(&snapshot, &projects))
}

pub async fn service_status_partial(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let snapshot = state.monitor.snapshot();
    render_service_status(&snapshot)
        .map(Html)
        .map_err(|message| (StatusCode::INTERNAL_SERVER_ERROR, message))
}

pub async fn service_status_refresh(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let snapshot = state.monitor.probe_all().await;
    render_service_status(&snapshot)
        .map(Html)
        .map_err(|message| (StatusCode::INTERNAL_SERVER_ERROR, message))
}

pub async fn service_cards_partial(State(state): State<AppState>) -> Html<String> {
    Html(render_service_cards(&state.monitor.snapshot()))
}
