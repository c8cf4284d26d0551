//! Team and service data sources.
//!
//! Handlers depend only on [`TeamRepository`] and [`ServiceDirectory`]; the
//! configured [`BackendMode`] decides whether they are answered from
//! in-process fixture data or forwarded to the external backend API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::{BackendConfig, BackendMode};
use models::{CreateTeamRequest, DefaultService, ServiceBase, Team, TeamId};
use tracing::info;

use crate::errors::ServiceError;

pub mod fixture;
pub mod remote;

pub use fixture::FixtureBackend;
pub use remote::RemoteBackend;

/// Team persistence seen by the request handlers.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Team>, ServiceError>;
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, ServiceError>;
    async fn create(&self, request: CreateTeamRequest) -> Result<Team, ServiceError>;
    /// Remove a team. Removing an unknown id is not an error.
    async fn delete(&self, id: &TeamId) -> Result<(), ServiceError>;
}

/// Catalog of services a team can pick from.
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    async fn list_services(&self) -> Result<Vec<ServiceBase>, ServiceError>;
    async fn list_default_services(&self) -> Result<Vec<DefaultService>, ServiceError>;
}

/// The pair of data sources injected into the server state.
#[derive(Clone)]
pub struct Backends {
    pub teams: Arc<dyn TeamRepository>,
    pub services: Arc<dyn ServiceDirectory>,
}

impl Backends {
    /// Both traits served by one implementation.
    pub fn single<B>(backend: Arc<B>) -> Self
    where
        B: TeamRepository + ServiceDirectory + 'static,
    {
        let teams: Arc<dyn TeamRepository> = backend.clone();
        let services: Arc<dyn ServiceDirectory> = backend;
        Self { teams, services }
    }

    pub fn from_config(cfg: &BackendConfig) -> Result<Self, ServiceError> {
        match cfg.mode {
            BackendMode::Fixture => {
                info!(event = "backend_selected", mode = "fixture", delete_delay_ms = cfg.delete_delay_ms, "serving fixture data");
                Ok(Self::single(Arc::new(FixtureBackend::new(Duration::from_millis(cfg.delete_delay_ms)))))
            }
            BackendMode::Proxy => {
                info!(event = "backend_selected", mode = "proxy", api_base_url = %cfg.api_base_url, "forwarding to external backend");
                let remote = RemoteBackend::new(
                    &cfg.api_base_url,
                    Duration::from_secs(cfg.connect_timeout_secs),
                    Duration::from_secs(cfg.request_timeout_secs),
                )?;
                Ok(Self::single(Arc::new(remote)))
            }
        }
    }
}
