use crate::routes::AppState;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use studio_dashboard::models::StatusSnapshot;
use tokio_stream::{wrappers::WatchStream, Stream, StreamExt};

pub async fn services_status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.monitor.snapshot())
}

pub async fn services_refresh(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.monitor.probe_all().await)
}

/// Current snapshot first, then one event per completed probe cycle.
pub async fn services_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, serde_json::Error>>> {
    let stream = WatchStream::new(state.monitor.subscribe())
        .map(|snapshot| Event::default().event("status").json_data(&snapshot));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
