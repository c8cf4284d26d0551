use std::time::Duration;

use async_trait::async_trait;
use common::upstream::UpstreamClient;
use common::CoreError;
use models::{CreateTeamRequest, DefaultService, ServiceBase, ServiceListing, Team, TeamId};
use tracing::{info, instrument, warn};

use super::{ServiceDirectory, TeamRepository};
use crate::errors::ServiceError;

/// Forwards every call to the external backend API.
///
/// Endpoints used: `GET /teams/`, `GET /team/{id}`, `POST /team`,
/// `DELETE /team/{id}`, `GET /services/`, `GET /services/default`.
pub struct RemoteBackend {
    client: UpstreamClient,
}

fn team_path(id: &TeamId) -> [&str; 2] {
    ["team", id.as_str()]
}

impl RemoteBackend {
    pub fn new(base_url: &str, connect_timeout: Duration, request_timeout: Duration) -> Result<Self, ServiceError> {
        let client = UpstreamClient::new(base_url, connect_timeout, request_timeout)?;
        Ok(Self { client })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl TeamRepository for RemoteBackend {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Team>, ServiceError> {
        Ok(self.client.get_json(&["teams", ""]).await?)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, ServiceError> {
        Ok(self.client.get_json_opt(&team_path(id)).await?)
    }

    #[instrument(skip(self, request), fields(name = %request.name, cidr = %request.cidr))]
    async fn create(&self, request: CreateTeamRequest) -> Result<Team, ServiceError> {
        match self.client.post_json::<_, Team>(&["team"], &request).await {
            Ok(team) => {
                info!(team_id = %team.id, "upstream team created");
                Ok(team)
            }
            Err(e) => {
                warn!(error = %e, "upstream rejected team creation");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &TeamId) -> Result<(), ServiceError> {
        match self.client.delete(&team_path(id)).await {
            Ok(()) => Ok(()),
            Err(CoreError::Status { status: 404, .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ServiceDirectory for RemoteBackend {
    async fn list_services(&self) -> Result<Vec<ServiceBase>, ServiceError> {
        let listing: ServiceListing = self.client.get_json(&["services", ""]).await?;
        Ok(listing.into_list())
    }

    async fn list_default_services(&self) -> Result<Vec<DefaultService>, ServiceError> {
        Ok(self.client.get_json(&["services", "default"]).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    #[derive(Clone, Default)]
    struct Upstream {
        posted: Arc<Mutex<Vec<Value>>>,
        deleted: Arc<Mutex<Vec<String>>>,
    }

    fn sample_team(id: &str) -> Value {
        json!({"id": id, "name": "DevOps", "cidr": "192.168.2.0/24", "services": [
            {"id": 3, "name": "DNS", "ipAddress": "192.168.2.2", "deployedAt": "2024-03-01T10:00:00Z"}
        ]})
    }

    async fn spawn_upstream(state: Upstream) -> String {
        let app = Router::new()
            .route("/teams/", get(|| async { Json(json!([sample_team("65f0"), sample_team("65f1")])) }))
            .route(
                "/team/:id",
                get(|Path(id): Path<String>| async move {
                    if id == "65f0" { Ok(Json(sample_team(&id))) } else { Err((StatusCode::NOT_FOUND, Json(json!({"detail": "Team not found"})))) }
                })
                .delete(|State(s): State<Upstream>, Path(id): Path<String>| async move {
                    s.deleted.lock().unwrap().push(id.clone());
                    if id == "gone" { StatusCode::NOT_FOUND } else if id == "boom" { StatusCode::INTERNAL_SERVER_ERROR } else { StatusCode::OK }
                }),
            )
            .route(
                "/team",
                post(|State(s): State<Upstream>, Json(body): Json<Value>| async move {
                    s.posted.lock().unwrap().push(body.clone());
                    if body["name"] == "Taken" {
                        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": [{"loc": ["body", "name"], "msg": "already exists"}]}))));
                    }
                    Ok(Json(json!({"id": "65f9", "name": body["name"], "cidr": body["cidr"], "services": []})))
                }),
            )
            .route("/services/", get(|| async { Json(json!({"git": [{"id": 1, "name": "GIT"}], "dns": [{"id": 3, "name": "DNS"}]})) }))
            .route("/services/default", get(|| async { Json(json!([{"label": "Web", "description": "Landing page"}])) }))
            .with_state(state);
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}", addr)
    }

    fn remote(base: &str) -> RemoteBackend {
        RemoteBackend::new(base, Duration::from_secs(2), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn ids_with_reserved_characters_stay_one_segment() {
        let upstream = Upstream::default();
        let r = remote(&spawn_upstream(upstream.clone()).await);
        r.delete(&TeamId::new("a/b c")).await.unwrap();
        assert_eq!(upstream.deleted.lock().unwrap().as_slice(), ["a/b c".to_string()]);
    }

    #[tokio::test]
    async fn reads_teams_and_services() {
        let r = remote(&spawn_upstream(Upstream::default()).await);
        let teams = r.list().await.unwrap();
        assert_eq!(teams.len(), 2);
        assert!(teams[0].services[0].deployed_at.is_some());

        assert_eq!(r.get(&TeamId::new("65f0")).await.unwrap().unwrap().name, "DevOps");
        assert!(r.get(&TeamId::new("other")).await.unwrap().is_none());

        let services = r.list_services().await.unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(r.list_default_services().await.unwrap()[0].label, "Web");
    }

    #[tokio::test]
    async fn create_posts_backend_contract_and_surfaces_detail() {
        let upstream = Upstream::default();
        let r = remote(&spawn_upstream(upstream.clone()).await);

        let req = CreateTeamRequest { services: vec![1, 3], name: "Platform".into(), description: None, cidr: "10.0.0.0/24".into() };
        let team = r.create(req).await.unwrap();
        assert_eq!(team.id.as_str(), "65f9");
        assert_eq!(upstream.posted.lock().unwrap()[0], json!({"services": [1, 3], "name": "Platform", "cidr": "10.0.0.0/24"}));

        let taken = CreateTeamRequest { services: vec![], name: "Taken".into(), description: None, cidr: "10.0.1.0/24".into() };
        match r.create(taken).await {
            Err(ServiceError::Upstream { status, detail }) => {
                assert_eq!(status, 422);
                assert_eq!(detail, vec!["body.name: already exists".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_treats_missing_as_success() {
        let upstream = Upstream::default();
        let r = remote(&spawn_upstream(upstream.clone()).await);
        r.delete(&TeamId::new("65f0")).await.unwrap();
        r.delete(&TeamId::new("gone")).await.unwrap();
        assert!(matches!(r.delete(&TeamId::new("boom")).await, Err(ServiceError::Upstream { status: 500, .. })));
        assert_eq!(upstream.deleted.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let r = remote("http://127.0.0.1:1");
        assert!(matches!(r.list().await, Err(ServiceError::Network(_))));
    }
}
