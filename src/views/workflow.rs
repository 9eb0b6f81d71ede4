use crate::forms::WorkflowForm;
use crate::services::WorkflowOutcome;
use studio_dashboard::scenario::Genre;

const STEPS: [(&str, &str); 4] = [
    ("1. Scenario", "Generate the script and characters"),
    ("2. Visuals", "Create images for every scene"),
    ("3. Audio", "Generate voices and music"),
    ("4. Editing", "Assemble and export the movie"),
];

pub fn render_workflow_card(form: &WorkflowForm, outcome: Option<&WorkflowOutcome>) -> String {
    let steps: String = STEPS
        .iter()
        .map(|(title, detail)| {
            format!(
                r#"<div class="col-md-3"><div class="border rounded p-3 h-100"><h3 class="h6">{title}</h3><p class="small text-muted mb-0">{detail}</p></div></div>"#
            )
        })
        .collect();

    let notice = match outcome {
        Some(WorkflowOutcome::Started(movie)) => format!(
            r#"<div class="alert alert-success">Project #{id} "{title}" was created on the scenario service.</div>"#,
            id = movie.id,
            title = html_escape::encode_text(&movie.title),
        ),
        Some(WorkflowOutcome::Rejected(message)) => format!(
            r#"<div class="alert alert-warning">{message}</div>"#,
            message = html_escape::encode_text(message),
        ),
        None => String::new(),
    };

    let mut genre_options = String::from(r#"<option value="">Choose a genre</option>"#);
    for genre in Genre::ALL {
        let selected = if form.genre.trim() == genre.as_str() { " selected" } else { "" };
        genre_options.push_str(&format!(
            r#"<option value="{value}"{selected}>{label}</option>"#,
            value = genre.as_str(),
            label = genre.label(),
        ));
    }

    format!(
        r##"<div id="workflow-card" class="card card-body">
          <div class="row g-3 mb-3">{steps}</div>
          {notice}
          <form method="post" action="/workflow/start" hx-post="/workflow/start" hx-target="#workflow-card" hx-swap="outerHTML">
            <div class="row g-3">
              <div class="col-md-6">
                <label class="form-label" for="movie-title">Title</label>
                <input class="form-control" id="movie-title" name="title" type="text" value="{title}">
              </div>
              <div class="col-md-6">
                <label class="form-label" for="movie-genre">Genre</label>
                <select class="form-select" id="movie-genre" name="genre">{genre_options}</select>
              </div>
              <div class="col-12">
                <label class="form-label" for="movie-theme">Theme</label>
                <input class="form-control" id="movie-theme" name="theme" type="text" value="{theme}">
              </div>
              <div class="col-12">
                <label class="form-label" for="movie-idea">Basic idea</label>
                <textarea class="form-control" id="movie-idea" name="idea" rows="4">{idea}</textarea>
              </div>
            </div>
            <button class="btn btn-primary w-100 mt-3" type="submit">Start automatic production</button>
          </form>
        </div>"##,
        steps = steps,
        notice = notice,
        title = html_escape::encode_double_quoted_attribute(&form.title),
        genre_options = genre_options,
        theme = html_escape::encode_double_quoted_attribute(&form.theme),
        idea = html_escape::encode_text(&form.idea),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_submission_keeps_entered_values() {
        let form = WorkflowForm {
            title: "Night \"Shift\"".to_string(),
            genre: "comedy".to_string(),
            theme: String::new(),
            idea: String::new(),
        };
        let outcome = WorkflowOutcome::Rejected("Describe the basic idea of the movie.".to_string());

        let html = render_workflow_card(&form, Some(&outcome));

        assert!(html.contains("alert-warning"));
        assert!(html.contains(r#"value="Night &quot;Shift&quot;""#));
        assert!(html.contains(r#"<option value="comedy" selected>"#));
    }
}
