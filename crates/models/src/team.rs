use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::service::Service;
use crate::validation::{check_cidr, check_max_len, check_min_len, Validate, ValidationErrors};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 20;

/// Team identifier. Stored as a string; integer ids from older backends are
/// accepted and kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => TeamId(s),
            Raw::Number(n) => TeamId(n.to_string()),
        })
    }
}

/// An organizational unit owning a network block and the services deployed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cidr: String,
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

pub fn check_team_name(errs: &mut ValidationErrors, name: &str) {
    check_min_len(errs, "name", name, NAME_MIN_LEN);
    check_max_len(errs, "name", name, NAME_MAX_LEN);
}

impl Validate for Team {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_team_name(&mut errs, &self.name);
        check_cidr(&mut errs, "cidr", &self.cidr);
        for (i, service) in self.services.iter().enumerate() {
            service.collect_issues(&format!("services[{i}]"), &mut errs);
        }
        errs.into_result(())
    }
}
