use studio_dashboard::models::StatusSnapshot;

pub fn render_health_page(snapshot: &StatusSnapshot) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Movie Studio Health</title>
    <link href="/web/css/theme.css" rel="stylesheet">
  </head>
  <body>
    <h1>Movie Studio Dashboard</h1>
    <p>Status: ok</p>
    <p>Services online: {online} of {total} (probe cycle {cycle})</p>
    <p><a href="/api/services">Service status as JSON</a></p>
  </body>
</html>
"#,
        online = snapshot.online_count(),
        total = snapshot.services.len(),
        cycle = snapshot.cycle,
    )
}
