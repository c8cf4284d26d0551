use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use models::errors::ModelError;
use models::network::{Ipv4Cidr, NetworkError};
use models::{CreateTeamRequest, DefaultService, Rule, Service, ServiceBase, Team, TeamId, Validate, ValidationErrors};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{ServiceDirectory, TeamRepository};
use crate::errors::ServiceError;

/// In-process stand-in for the external backend, used during development.
///
/// Teams live in a map behind a lock; the service catalog and the default
/// services are fixed.
pub struct FixtureBackend {
    teams: RwLock<HashMap<TeamId, Team>>,
    catalog: Vec<ServiceBase>,
    defaults: Vec<DefaultService>,
    delete_delay: Duration,
}

fn exhausted(e: NetworkError) -> ValidationErrors {
    ValidationErrors::single("services", Rule::Capacity, e.to_string())
}

fn service(id: u64, name: &str, ip: &str) -> Service {
    Service { base: ServiceBase::new(id, name, None), deployed_at: None, ip_address: ip.to_string() }
}

fn team(id: &str, name: &str, description: Option<&str>, cidr: &str, services: Vec<Service>) -> Team {
    Team {
        id: TeamId::new(id),
        name: name.to_string(),
        description: description.map(str::to_string),
        cidr: cidr.to_string(),
        services,
        created_at: None,
        updated_at: None,
    }
}

/// Teams present when the fixture backend starts.
pub fn seed_teams() -> Vec<Team> {
    vec![
        team("2134", "HR", Some("Human Resources"), "192.168.0.0/24", vec![service(234, "Proxy", "192.168.0.1")]),
        team(
            "23455634",
            "UI/UX",
            None,
            "192.168.1.0/24",
            vec![service(45674, "Proxy", "192.168.1.1"), service(23907, "Git", "192.168.1.2")],
        ),
        team("23456576", "DevOps", None, "192.168.2.0/24", vec![]),
    ]
}

pub fn seed_catalog() -> Vec<ServiceBase> {
    vec![
        ServiceBase::new(1, "GIT", Some("Custom GIT remote repository")),
        ServiceBase::new(2, "Squid Proxy", Some("Proxy server")),
        ServiceBase::new(3, "DNS", Some("Custom sub-DNS server")),
    ]
}

/// Services every team network gets next to the ones picked from the catalog.
pub fn seed_defaults() -> Vec<DefaultService> {
    vec![
        DefaultService { label: "Web".into(), description: "Team landing page".into() },
        DefaultService { label: "Proxy".into(), description: "Outbound proxy for the team network".into() },
        DefaultService { label: "DNS".into(), description: "Team sub-DNS server".into() },
    ]
}

impl FixtureBackend {
    pub fn new(delete_delay: Duration) -> Self {
        Self::with_teams(seed_teams(), delete_delay)
    }

    pub fn with_teams(teams: Vec<Team>, delete_delay: Duration) -> Self {
        let teams = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self { teams: RwLock::new(teams), catalog: seed_catalog(), defaults: seed_defaults(), delete_delay }
    }

    fn resolve_services(&self, ids: &[u64]) -> Result<Vec<ServiceBase>, ValidationErrors> {
        let mut errs = ValidationErrors::new();
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            match self.catalog.iter().find(|s| s.id == *id) {
                Some(s) => resolved.push(s.clone()),
                None => errs.push("services", Rule::Exists, format!("unknown service id {id}")),
            }
        }
        errs.into_result(resolved)
    }
}

#[async_trait]
impl TeamRepository for FixtureBackend {
    async fn list(&self) -> Result<Vec<Team>, ServiceError> {
        let map = self.teams.read().await;
        let mut teams: Vec<Team> = map.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn get(&self, id: &TeamId) -> Result<Option<Team>, ServiceError> {
        let map = self.teams.read().await;
        Ok(map.get(id).cloned())
    }

    #[instrument(skip(self, request), fields(name = %request.name, cidr = %request.cidr))]
    async fn create(&self, request: CreateTeamRequest) -> Result<Team, ServiceError> {
        let request = request.dedup_services();
        request.validate()?;
        let selected = self.resolve_services(&request.services)?;
        let block: Ipv4Cidr = request.cidr.parse().map_err(ModelError::from)?;

        let mut hosts = block.allocator();
        let gateway = hosts.next_host().map_err(exhausted)?;
        let mut reserved = Vec::with_capacity(self.defaults.len());
        for default in &self.defaults {
            let addr = hosts.next_host().map_err(exhausted)?;
            reserved.push(format!("{}={addr}", default.label));
        }
        let now = Utc::now();
        let mut services = Vec::with_capacity(selected.len());
        for base in selected {
            let addr = hosts.next_host().map_err(exhausted)?;
            services.push(Service::deployed(base, addr.to_string(), now));
        }

        let created = Team {
            id: TeamId::new(Uuid::new_v4().simple().to_string()),
            name: request.name,
            description: request.description,
            cidr: request.cidr,
            services,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.teams.write().await.insert(created.id.clone(), created.clone());
        info!(
            team_id = %created.id,
            %gateway,
            defaults = %reserved.join(","),
            services = created.services.len(),
            "fixture team created"
        );
        Ok(created)
    }

    async fn delete(&self, id: &TeamId) -> Result<(), ServiceError> {
        if !self.delete_delay.is_zero() {
            debug!(delay_ms = self.delete_delay.as_millis() as u64, "simulating backend latency");
            tokio::time::sleep(self.delete_delay).await;
        }
        let existed = self.teams.write().await.remove(id).is_some();
        debug!(team_id = %id, existed, "fixture team delete");
        Ok(())
    }
}

#[async_trait]
impl ServiceDirectory for FixtureBackend {
    async fn list_services(&self) -> Result<Vec<ServiceBase>, ServiceError> {
        Ok(self.catalog.clone())
    }

    async fn list_default_services(&self) -> Result<Vec<DefaultService>, ServiceError> {
        Ok(self.defaults.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn backend() -> FixtureBackend {
        FixtureBackend::new(Duration::ZERO)
    }

    fn request(services: Vec<u64>, cidr: &str) -> CreateTeamRequest {
        CreateTeamRequest { services, name: "Platform".into(), description: Some("Platform team".into()), cidr: cidr.into() }
    }

    #[tokio::test]
    async fn lists_and_gets_seeded_teams() {
        let b = backend();
        let names: Vec<String> = b.list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["DevOps", "HR", "UI/UX"]);
        let ui = b.get(&TeamId::new("23455634")).await.unwrap().unwrap();
        assert_eq!(ui.services.len(), 2);
        assert!(b.get(&TeamId::new("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let b = backend();
        b.delete(&TeamId::new("2134")).await.unwrap();
        b.delete(&TeamId::new("2134")).await.unwrap();
        b.delete(&TeamId::new("does-not-exist")).await.unwrap();
        assert_eq!(b.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_waits_for_configured_delay() {
        let b = FixtureBackend::new(Duration::from_millis(50));
        let start = Instant::now();
        b.delete(&TeamId::new("2134")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn create_allocates_addresses_after_gateway() {
        let b = backend();
        let team = b.create(request(vec![1, 3], "10.20.0.0/24")).await.unwrap();
        let ips: Vec<&str> = team.services.iter().map(|s| s.ip_address.as_str()).collect();
        // .1 gateway, .2-.4 web, proxy and DNS
        assert_eq!(ips, vec!["10.20.0.5", "10.20.0.6"]);
        assert!(team.services.iter().all(|s| s.deployed_at.is_some()));
        assert!(team.validate().is_ok());
        let fetched = b.get(&team.id).await.unwrap();
        assert_eq!(fetched, Some(team));
    }

    #[test]
    fn reserves_one_host_per_default_service() {
        assert_eq!(seed_defaults().len() as u64, models::DEFAULT_SERVICE_HOSTS);
    }

    #[tokio::test]
    async fn create_rejects_block_without_room_for_defaults() {
        let b = backend();
        match b.create(request(vec![1, 2, 3], "10.0.0.0/29")).await {
            Err(ServiceError::Validation(errs)) => assert!(errs.has("services", Rule::Capacity)),
            other => panic!("unexpected: {other:?}"),
        }
        let fits = b.create(request(vec![1, 2], "10.0.0.0/29")).await.unwrap();
        let ips: Vec<&str> = fits.services.iter().map(|s| s.ip_address.as_str()).collect();
        assert_eq!(ips, vec!["10.0.0.5", "10.0.0.6"]);
    }

    #[tokio::test]
    async fn create_allocates_once_per_distinct_service() {
        let b = backend();
        let team = b.create(request(vec![2, 2, 1], "10.21.0.0/24")).await.unwrap();
        let ids: Vec<u64> = team.services.iter().map(|s| s.base.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn create_rejects_unknown_service_ids() {
        let b = backend();
        match b.create(request(vec![1, 42], "10.20.0.0/24")).await {
            Err(ServiceError::Validation(errs)) => assert!(errs.has("services", Rule::Exists)),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(b.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_rejects_invalid_request() {
        let b = backend();
        let bad = CreateTeamRequest { name: "HR".into(), ..request(vec![], "999.1.1.1/33") };
        match b.create(bad).await {
            Err(ServiceError::Validation(errs)) => {
                assert!(errs.has("name", Rule::MinLength));
                assert!(errs.has("cidr", Rule::Cidr));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
