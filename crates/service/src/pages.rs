//! Data loaded for each page before it is rendered.

use models::{DefaultService, ServiceBase, Team, TeamId};
use serde::Serialize;
use tracing::instrument;

use crate::backend::Backends;
use crate::errors::ServiceError;

/// Everything the team list page shows, including the create form's options.
#[derive(Debug, Clone, Serialize)]
pub struct TeamListPage {
    pub teams: Vec<Team>,
    pub services: Vec<ServiceBase>,
    pub default_services: Vec<DefaultService>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDetailPage {
    pub team: Team,
}

/// The three fetches are independent and run concurrently; the first failure wins.
#[instrument(skip(backends))]
pub async fn load_team_list(backends: &Backends) -> Result<TeamListPage, ServiceError> {
    let (teams, services, default_services) = tokio::try_join!(
        backends.teams.list(),
        backends.services.list_services(),
        backends.services.list_default_services(),
    )?;
    Ok(TeamListPage { teams, services, default_services })
}

#[instrument(skip(backends))]
pub async fn load_team_detail(backends: &Backends, id: &TeamId) -> Result<TeamDetailPage, ServiceError> {
    match backends.teams.get(id).await? {
        Some(team) => Ok(TeamDetailPage { team }),
        None => Err(ServiceError::not_found("team")),
    }
}
