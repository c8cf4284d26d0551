//! HTML pages and form endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use models::{CreateTeamForm, LoginForm, TeamId};
use service::{actions, pages};
use tracing::warn;
use url::Url;

use crate::errors::PageError;
use crate::state::AppState;
use crate::views;

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Path of a team's detail page; the id is percent-encoded as one segment.
fn team_location(id: &TeamId) -> String {
    let mut url = match Url::parse("http://localhost/teams") {
        Ok(url) => url,
        Err(_) => return "/teams".to_string(),
    };
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.push(id.as_str());
        }
        Err(()) => return "/teams".to_string(),
    }
    url.path().to_string()
}

pub async fn index() -> Redirect {
    Redirect::to("/teams")
}

pub async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match actions::login(state.auth.as_ref(), form).await {
        Ok(_session) => Redirect::to("/teams").into_response(),
        Err(failure) => (status(failure.status), Html(views::login_page(Some(&failure)))).into_response(),
    }
}

pub async fn team_list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let page = pages::load_team_list(&state.backends).await?;
    Ok(Html(views::team_list_page(&page, None)))
}

/// `services` may repeat, hence the `axum_extra` form extractor.
pub async fn create_team(
    State(state): State<AppState>,
    axum_extra::extract::Form(form): axum_extra::extract::Form<CreateTeamForm>,
) -> Result<Response, PageError> {
    match actions::create_team(&state.backends, form).await {
        Ok(team) => Ok(Redirect::to(&team_location(&team.id)).into_response()),
        Err(failure) => {
            let page = match pages::load_team_list(&state.backends).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "could not reload team list after failed create");
                    pages::TeamListPage { teams: vec![], services: vec![], default_services: vec![] }
                }
            };
            Ok((status(failure.status), Html(views::team_list_page(&page, Some(&failure)))).into_response())
        }
    }
}

pub async fn team_detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<Html<String>, PageError> {
    let page = pages::load_team_detail(&state.backends, &TeamId::new(id)).await?;
    Ok(Html(views::team_detail_page(&page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_location_encodes_the_id() {
        assert_eq!(team_location(&TeamId::new("65f0")), "/teams/65f0");
        assert_eq!(team_location(&TeamId::new("a/b c")), "/teams/a%2Fb%20c");
    }
}
