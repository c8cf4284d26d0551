//! Server-rendered HTML for the page routes.
//!
//! Every interpolated value goes through [`escape`].

use std::fmt::Write;

use models::{CreateTeamForm, LoginForm, Team, ValidationErrors};
use service::actions::ActionFailure;
use service::pages::{TeamDetailPage, TeamListPage};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/static/app.css">
<script src="/static/teams.js" defer></script>
</head>
<body>
<nav><a href="/teams">Teams</a> <a href="/login">Login</a> <a href="/docs">API</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

fn failure_block(message: &str, issues: &ValidationErrors, detail: &[String]) -> String {
    let mut out = format!(r#"<div class="error" role="alert"><p>{}</p>"#, escape(message));
    if !issues.is_empty() || !detail.is_empty() {
        out.push_str("<ul>");
        for issue in issues.issues() {
            let _ = write!(out, "<li>{}: {}</li>", escape(&issue.field), escape(&issue.message));
        }
        for line in detail {
            let _ = write!(out, "<li>{}</li>", escape(line));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");
    out
}

fn team_rows(teams: &[Team]) -> String {
    if teams.is_empty() {
        return r#"<tr><td colspan="4">No teams yet.</td></tr>"#.to_string();
    }
    let mut out = String::new();
    for team in teams {
        let id = escape(team.id.as_str());
        let _ = write!(
            out,
            r#"<tr id="team-{id}"><td><a href="/teams/{id}">{name}</a></td><td>{cidr}</td><td>{count}</td><td><button type="button" data-delete-team="{id}">Delete</button></td></tr>"#,
            name = escape(&team.name),
            cidr = escape(&team.cidr),
            count = team.services.len(),
        );
    }
    out
}

fn create_team_form(page: &TeamListPage, failure: Option<&ActionFailure<CreateTeamForm>>) -> String {
    let empty = CreateTeamForm::default();
    let form = failure.map(|f| &f.form).unwrap_or(&empty);
    let mut out = String::from(r#"<section id="create-team"><h2>New team</h2>"#);
    if let Some(f) = failure {
        out.push_str(&failure_block(&f.message, &f.issues, &f.detail));
    }
    let _ = write!(
        out,
        r#"<form method="post" action="/teams">
<label>Name <input name="name" value="{name}" required minlength="3" maxlength="20"></label>
<label>Description <input name="description" value="{description}"></label>
<fieldset><legend>Services</legend>"#,
        name = escape(&form.name),
        description = escape(&form.description),
    );
    for service in &page.services {
        let value = service.id.to_string();
        let checked = if form.services.iter().any(|s| s.trim() == value) { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<label><input type="checkbox" name="services" value="{value}"{checked}> {name}</label>"#,
            name = escape(&service.name),
        );
    }
    out.push_str("</fieldset>");
    if !page.default_services.is_empty() {
        out.push_str(r#"<p class="hint">Always deployed:</p><ul class="defaults">"#);
        for d in &page.default_services {
            let _ = write!(out, "<li><strong>{}</strong> {}</li>", escape(&d.label), escape(&d.description));
        }
        out.push_str("</ul>");
    }
    let _ = write!(
        out,
        r#"<label>Network <input name="address" value="{address}" placeholder="192.168.10.0"></label>
<label>/ <input name="mask" value="{mask}" placeholder="24" size="2"></label>
<button type="submit">Create</button>
</form></section>"#,
        address = escape(&form.address),
        mask = escape(&form.mask),
    );
    out
}

pub fn team_list_page(page: &TeamListPage, failure: Option<&ActionFailure<CreateTeamForm>>) -> String {
    let body = format!(
        r#"<h1>Teams</h1>
<table class="teams"><thead><tr><th>Name</th><th>Network</th><th>Services</th><th></th></tr></thead>
<tbody>{rows}</tbody></table>
{form}"#,
        rows = team_rows(&page.teams),
        form = create_team_form(page, failure),
    );
    layout("Teams", &body)
}

pub fn team_detail_page(page: &TeamDetailPage) -> String {
    let team = &page.team;
    let mut services = String::new();
    for s in &team.services {
        let deployed = s.deployed_at.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".to_string());
        let _ = write!(
            services,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&s.base.name),
            escape(s.base.description.as_deref().unwrap_or("")),
            escape(&s.ip_address),
            escape(&deployed),
        );
    }
    if services.is_empty() {
        services.push_str(r#"<tr><td colspan="4">No services deployed.</td></tr>"#);
    }
    let body = format!(
        r#"<h1>{name}</h1>
<p>{description}</p>
<dl><dt>Network</dt><dd>{cidr}</dd><dt>Id</dt><dd>{id}</dd></dl>
<table class="services"><thead><tr><th>Service</th><th>Description</th><th>Address</th><th>Deployed</th></tr></thead>
<tbody>{services}</tbody></table>
<button type="button" data-delete-team="{id}" data-redirect="/teams">Delete team</button>"#,
        name = escape(&team.name),
        description = escape(team.description.as_deref().unwrap_or("")),
        cidr = escape(&team.cidr),
        id = escape(team.id.as_str()),
    );
    layout(&team.name, &body)
}

pub fn login_page(failure: Option<&ActionFailure<LoginForm>>) -> String {
    let (username, remember, error) = match failure {
        Some(f) => (
            escape(&f.form.username),
            f.form.remember_me.is_some(),
            failure_block(&f.message, &ValidationErrors::new(), &[]),
        ),
        None => (String::new(), false, String::new()),
    };
    let body = format!(
        r#"<h1>Sign in</h1>
{error}
<form method="post" action="/login">
<label>Username <input name="username" value="{username}" required minlength="3"></label>
<label>Password <input type="password" name="password" required></label>
<label><input type="checkbox" name="rememberMe"{checked}> Remember me</label>
<button type="submit">Sign in</button>
</form>"#,
        checked = if remember { " checked" } else { "" },
    );
    layout("Sign in", &body)
}

pub fn error_page(status: u16, title: &str, detail: &str) -> String {
    let body = format!(
        r#"<h1>{status} {title}</h1><p>{detail}</p><p><a href="/teams">Back to teams</a></p>"#,
        title = escape(title),
        detail = escape(detail),
    );
    layout(title, &body)
}
