use crate::forms::WorkflowForm;
use studio_dashboard::{
    models::{ServiceName, ServiceStatus, StatusSnapshot},
    scenario::{Genre, MovieSummary, NewMovie, ScenarioClient},
};
use tracing::{info, warn};

pub enum ProjectList {
    ScenarioOffline,
    Loaded(Vec<MovieSummary>),
    Failed(String),
}

#[derive(Debug)]
pub enum WorkflowOutcome {
    Started(MovieSummary),
    Rejected(String),
}

/// Lists projects only when the last probe saw the scenario service online.
pub async fn load_projects(client: &dyn ScenarioClient, snapshot: &StatusSnapshot) -> ProjectList {
    if !snapshot.is_online(ServiceName::Scenario) {
        return ProjectList::ScenarioOffline;
    }
    match client.list_movies().await {
        Ok(movies) => ProjectList::Loaded(movies),
        Err(err) => {
            warn!(error = %err, "failed to list projects");
            ProjectList::Failed(err)
        }
    }
}

pub fn new_movie_from_form(form: &WorkflowForm) -> Result<NewMovie, String> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err("Title must not be empty.".to_string());
    }
    let genre = Genre::parse(&form.genre)
        .ok_or_else(|| "Choose a genre from the list.".to_string())?;
    let idea = form.idea.trim();
    if idea.is_empty() {
        return Err("Describe the basic idea of the movie.".to_string());
    }

    Ok(NewMovie {
        title: title.to_string(),
        genre,
        theme: normalize_optional(&form.theme),
        initial_idea: idea.to_string(),
    })
}

pub async fn start_workflow(
    client: &dyn ScenarioClient,
    snapshot: &StatusSnapshot,
    form: &WorkflowForm,
) -> WorkflowOutcome {
    let movie = match new_movie_from_form(form) {
        Ok(movie) => movie,
        Err(message) => return WorkflowOutcome::Rejected(message),
    };

    // Status is advisory; the request below can still fail.
    if !snapshot.is_online(ServiceName::Scenario) {
        return WorkflowOutcome::Rejected(
            "The scenario service is not available right now.".to_string(),
        );
    }

    match client.create_movie(&movie).await {
        Ok(created) => {
            info!(movie_id = created.id, title = %created.title, "workflow started");
            WorkflowOutcome::Started(created)
        }
        Err(err) => {
            warn!(error = %err, "failed to start workflow");
            WorkflowOutcome::Rejected(format!("The scenario service did not accept the project: {err}"))
        }
    }
}

pub fn normalize_optional(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn status_text(status: ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Online => "Online",
        ServiceStatus::Offline => "Offline",
        ServiceStatus::Unknown => "Unknown",
    }
}

pub fn status_badge_class(status: ServiceStatus) -> &'static str {
    match status {
        ServiceStatus::Online => "badge text-bg-success",
        ServiceStatus::Offline => "badge text-bg-danger",
        ServiceStatus::Unknown => "badge text-bg-secondary",
    }
}
