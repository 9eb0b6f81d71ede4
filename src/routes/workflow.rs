use crate::forms::WorkflowForm;
use crate::routes::AppState;
use crate::services::start_workflow;
use crate::views::workflow::render_workflow_card;
use axum::{extract::State, response::Html, Form};

pub async fn workflow_start(
    State(state): State<AppState>,
    Form(form): Form<WorkflowForm>,
) -> Html<String> {
    let snapshot = state.monitor.snapshot();
    let outcome = start_workflow(state.scenario.as_ref(), &snapshot, &form).await;
    Html(render_workflow_card(&form, Some(&outcome)))
}
