use crate::forms::WorkflowForm;
use crate::services::{status_badge_class, status_text, ProjectList};
use crate::views::layout::{breadcrumb, render_layout, template_env};
use crate::views::workflow::render_workflow_card;
use minijinja::context;
use serde::Serialize;
use studio_dashboard::models::{ServiceEndpoint, StatusSnapshot};

#[derive(Serialize)]
struct ServiceStatusItem {
    label: &'static str,
    base_url: String,
    status: &'static str,
}

pub fn render_dashboard_page(snapshot: &StatusSnapshot, projects: &ProjectList) -> String {
    let content = format!(
        r#"<h1 class="h3 mb-3">Dashboard</h1>
        <section id="services" class="mb-4">
          <h2 class="h5 mb-3">Services</h2>
          {service_cards}
        </section>
        <section id="projects" class="mb-4">
          <h2 class="h5 mb-3">Projects</h2>
          {project_list}
        </section>
        <section id="workflow" class="mb-4">
          <h2 class="h5 mb-3">Automatic workflow</h2>
          {workflow_card}
        </section>"#,
        service_cards = render_service_cards(snapshot),
        project_list = render_project_list(projects),
        workflow_card = render_workflow_card(&WorkflowForm::default(), None),
    );

    render_layout(
        "Movie Studio Dashboard",
        "dashboard",
        vec![breadcrumb("Dashboard", None)],
        &content,
    )
}

pub fn render_service_status(snapshot: &StatusSnapshot) -> Result<String, String> {
    let services: Vec<ServiceStatusItem> = snapshot
        .services
        .iter()
        .map(|endpoint| ServiceStatusItem {
            label: endpoint.name.label(),
            base_url: endpoint.base_url.clone(),
            status: endpoint.status.as_str(),
        })
        .collect();
    let checked_at = snapshot
        .checked_at
        .clone()
        .unwrap_or_else(|| "not checked yet".to_string());

    template_env()
        .get_template("partials/service_status.html")
        .map_err(|err| err.to_string())?
        .render(context! {
            services => services,
            checked_at => checked_at,
        })
        .map_err(|err| err.to_string())
}

pub fn render_service_cards(snapshot: &StatusSnapshot) -> String {
    let cards: String = snapshot.services.iter().map(render_service_card).collect();
    format!(
        r#"<div id="service-cards" class="row g-3" hx-get="/partials/service-cards" hx-trigger="every 5s" hx-swap="outerHTML">{cards}</div>"#
    )
}

fn render_service_card(endpoint: &ServiceEndpoint) -> String {
    let open_action = if endpoint.status.is_online() {
        format!(
            r#"<a class="btn btn-sm btn-primary" href="{url}" target="_blank" rel="noopener">Open {label}</a>"#,
            url = html_escape::encode_double_quoted_attribute(&endpoint.base_url),
            label = endpoint.name.label(),
        )
    } else {
        format!(
            r#"<a class="btn btn-sm btn-primary disabled" role="link" aria-disabled="true">Open {label}</a>
              <p class="small text-danger mt-2 mb-0">Service is not available right now.</p>"#,
            label = endpoint.name.label(),
        )
    };

    format!(
        r#"<div class="col-md-6 col-lg-3">
          <div class="card card-body service-card" data-service="{name}">
            <div class="d-flex justify-content-between align-items-center mb-2">
              <h3 class="h6 mb-0">{label}</h3>
              <span class="{badge}">{status}</span>
            </div>
            <p class="small text-muted">{description}</p>
            <p class="small text-muted mb-3"><code>{url}</code></p>
            <div>{open_action}</div>
          </div>
        </div>"#,
        name = endpoint.name.as_str(),
        label = endpoint.name.label(),
        badge = status_badge_class(endpoint.status),
        status = status_text(endpoint.status),
        description = endpoint.name.description(),
        url = html_escape::encode_text(&endpoint.base_url),
        open_action = open_action,
    )
}

pub fn render_project_list(projects: &ProjectList) -> String {
    match projects {
        ProjectList::ScenarioOffline => {
            r#"<div class="card card-body text-muted">Projects appear here once the scenario service is online.</div>"#
                .to_string()
        }
        ProjectList::Failed(message) => format!(
            r#"<div class="card card-body text-warning">Could not load projects: {message}</div>"#,
            message = html_escape::encode_text(message),
        ),
        ProjectList::Loaded(movies) if movies.is_empty() => {
            r#"<div class="card card-body text-muted">No projects yet. Start one with the workflow below.</div>"#
                .to_string()
        }
        ProjectList::Loaded(movies) => {
            let rows: String = movies
                .iter()
                .map(|movie| {
                    format!(
                        r#"<tr><td>{id}</td><td>{title}</td><td>{genre}</td><td><span class="badge text-bg-secondary">{status}</span></td></tr>"#,
                        id = movie.id,
                        title = html_escape::encode_text(&movie.title),
                        genre = html_escape::encode_text(movie.genre.as_deref().unwrap_or("-")),
                        status = html_escape::encode_text(movie.status.as_deref().unwrap_or("-")),
                    )
                })
                .collect();
            format!(
                r#"<div class="card">
                  <table class="table mb-0">
                    <thead><tr><th>#</th><th>Title</th><th>Genre</th><th>Status</th></tr></thead>
                    <tbody>{rows}</tbody>
                  </table>
                </div>"#
            )
        }
    }
}
