//! JSON API over the configured team and service backends.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use models::{CreateTeamRequest, DefaultService, ServiceBase, Team, TeamId, Validate};
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[utoipa::path(
    get, path = "/api/teams", tag = "teams",
    responses(
        (status = 200, description = "All teams", body = [crate::openapi::TeamDoc]),
        (status = 502, description = "Upstream Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, JsonApiError> {
    let teams = state.backends.teams.list().await?;
    Ok(Json(teams))
}

#[utoipa::path(
    post, path = "/api/teams", tag = "teams",
    request_body = crate::openapi::CreateTeamRequestDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::TeamDoc),
        (status = 400, description = "Malformed body or Validation Error", body = crate::openapi::ErrorDoc),
        (status = 502, description = "Upstream Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create_team(
    State(state): State<AppState>,
    body: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), JsonApiError> {
    let Json(request) = body?;
    let request = request.dedup_services();
    request.validate().map_err(service::ServiceError::from)?;
    let team = state.backends.teams.create(request).await?;
    info!(event = "team_created", team_id = %team.id, "team created via api");
    Ok((StatusCode::CREATED, Json(team)))
}

#[utoipa::path(
    get, path = "/api/teams/{id}", tag = "teams",
    params(("id" = String, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team", body = crate::openapi::TeamDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get_team(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Team>, JsonApiError> {
    let id = TeamId::new(id);
    match state.backends.teams.get(&id).await? {
        Some(team) => Ok(Json(team)),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("team `{id}` not found")))),
    }
}

#[utoipa::path(
    delete, path = "/api/teams/{id}", tag = "teams",
    params(("id" = String, Path, description = "Team id")),
    responses(
        (status = 204, description = "Deleted, or was never there"),
        (status = 502, description = "Upstream Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete_team(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    let id = TeamId::new(id);
    state.backends.teams.delete(&id).await?;
    info!(event = "team_deleted", team_id = %id, "team deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/services", tag = "services",
    responses(
        (status = 200, description = "Service catalog", body = [crate::openapi::ServiceBaseDoc]),
        (status = 502, description = "Upstream Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<ServiceBase>>, JsonApiError> {
    Ok(Json(state.backends.services.list_services().await?))
}

#[utoipa::path(
    get, path = "/api/services/default", tag = "services",
    responses(
        (status = 200, description = "Services deployed for every team", body = [crate::openapi::DefaultServiceDoc]),
        (status = 502, description = "Upstream Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_default_services(State(state): State<AppState>) -> Result<Json<Vec<DefaultService>>, JsonApiError> {
    Ok(Json(state.backends.services.list_default_services().await?))
}
