use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{check_ipv4, check_min_len, Validate, ValidationErrors};

/// A catalog entry a team may select when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBase {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServiceBase {
    pub fn new(id: u64, name: &str, description: Option<&str>) -> Self {
        Self { id, name: name.to_string(), description: description.map(str::to_string) }
    }
}

/// A service instance deployed for a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub base: ServiceBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
    pub ip_address: String,
}

impl Service {
    pub fn deployed(base: ServiceBase, ip_address: String, at: DateTime<Utc>) -> Self {
        Self { base, deployed_at: Some(at), ip_address }
    }

    /// Field rules, reported under `prefix` (e.g. `services[1]`).
    pub fn collect_issues(&self, prefix: &str, errs: &mut ValidationErrors) {
        check_min_len(errs, &format!("{prefix}.name"), &self.base.name, 1);
        check_ipv4(errs, &format!("{prefix}.ipAddress"), &self.ip_address);
    }
}

impl Validate for Service {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        self.collect_issues("service", &mut errs);
        errs.into_result(())
    }
}

/// Service suggested by default on the team creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultService {
    pub label: String,
    pub description: String,
}

/// The backend answers the service listing either as a flat list or grouped
/// by catalog tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceListing {
    Flat(Vec<ServiceBase>),
    ByTag(BTreeMap<String, Vec<ServiceBase>>),
}

impl ServiceListing {
    pub fn into_list(self) -> Vec<ServiceBase> {
        match self {
            ServiceListing::Flat(list) => list,
            ServiceListing::ByTag(groups) => groups.into_values().flatten().collect(),
        }
    }
}
