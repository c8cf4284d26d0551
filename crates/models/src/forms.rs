//! Form schemas: raw submitted values and the typed values they parse into.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::Ipv4Cidr;
use crate::team::check_team_name;
use crate::validation::{check_cidr, check_min_len, Rule, Validate, ValidationErrors};

pub const DESCRIPTION_MIN_LEN: usize = 3;
pub const USERNAME_MIN_LEN: usize = 3;

/// Hosts every team network reserves after the gateway for its web, proxy
/// and DNS services.
pub const DEFAULT_SERVICE_HOSTS: u64 = 3;

/// Values submitted by the "create team" form, kept verbatim so the form can
/// be re-rendered after a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTeamForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub mask: String,
}

/// Payload sent to the backend to create a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub services: Vec<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cidr: String,
}

impl CreateTeamRequest {
    /// Drop repeated service ids, keeping the first occurrence of each.
    pub fn dedup_services(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.services.len());
        self.services.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        self
    }

    /// Gateway, default services, then one host per distinct selected service.
    pub fn hosts_needed(&self) -> u64 {
        let mut distinct = self.services.clone();
        distinct.sort_unstable();
        distinct.dedup();
        1 + DEFAULT_SERVICE_HOSTS + distinct.len() as u64
    }
}

impl CreateTeamForm {
    /// Base address and mask length combined; the mask is optional.
    pub fn cidr(&self) -> String {
        let address = self.address.trim();
        let mask = self.mask.trim();
        if mask.is_empty() { address.to_string() } else { format!("{address}/{mask}") }
    }

    pub fn parse(&self) -> Result<CreateTeamRequest, ValidationErrors> {
        let mut errs = ValidationErrors::new();

        let mut services = Vec::with_capacity(self.services.len());
        for raw in &self.services {
            match raw.trim().parse::<u64>() {
                Ok(id) => services.push(id),
                Err(_) => errs.push("services", Rule::MinValue, format!("`{raw}` is not a non-negative integer id")),
            }
        }

        if self.address.trim().is_empty() {
            errs.push("cidr", Rule::Required, "base address is required");
        }

        let description = Some(self.description.trim()).filter(|d| !d.is_empty()).map(str::to_string);
        let request = CreateTeamRequest {
            services,
            name: self.name.trim().to_string(),
            description,
            cidr: self.cidr(),
        }
        .dedup_services();
        if !errs.has("cidr", Rule::Required) {
            if let Err(e) = request.validate() {
                errs.extend(e);
            }
        } else {
            let mut rest = ValidationErrors::new();
            check_team_name(&mut rest, &request.name);
            errs.extend(rest);
        }
        errs.into_result(request)
    }
}

impl Validate for CreateTeamRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_team_name(&mut errs, &self.name);
        if let Some(d) = &self.description {
            check_min_len(&mut errs, "description", d, DESCRIPTION_MIN_LEN);
        }
        check_cidr(&mut errs, "cidr", &self.cidr);
        if !errs.has("cidr", Rule::Pattern) && !errs.has("cidr", Rule::Cidr) {
            if let Ok(block) = self.cidr.parse::<Ipv4Cidr>() {
                let needed = self.hosts_needed();
                if needed > block.host_capacity() {
                    errs.push(
                        "services",
                        Rule::Capacity,
                        format!("{} needs {needed} host addresses but only has {}", block, block.host_capacity()),
                    );
                }
            }
        }
        errs.into_result(())
    }
}

/// Values submitted by the login form.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, rename = "rememberMe")]
    pub remember_me: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("remember_me", &self.remember_me)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("remember_me", &self.remember_me)
            .finish_non_exhaustive()
    }
}

fn checkbox_value(raw: Option<&str>) -> bool {
    matches!(raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(), Some("on" | "true" | "1" | "yes"))
}

impl LoginForm {
    pub fn parse(&self) -> Result<Credentials, ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_min_len(&mut errs, "username", &self.username, USERNAME_MIN_LEN);
        if self.password.is_none() {
            errs.push("password", Rule::Required, "password is required");
        }
        errs.into_result(())?;
        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone().unwrap_or_default(),
            remember_me: checkbox_value(self.remember_me.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateTeamForm {
        CreateTeamForm {
            name: "Platform".into(),
            description: String::new(),
            services: vec!["1".into(), "3".into()],
            address: "10.20.0.0".into(),
            mask: "24".into(),
        }
    }

    #[test]
    fn combines_address_and_mask() {
        let req = form().parse().unwrap();
        assert_eq!(req.cidr, "10.20.0.0/24");
        assert_eq!(req.services, vec![1, 3]);
        assert_eq!(req.description, None);
    }

    #[test]
    fn request_json_matches_backend_contract() {
        let req = form().parse().unwrap();
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v, serde_json::json!({"services": [1, 3], "name": "Platform", "cidr": "10.20.0.0/24"}));
    }

    #[test]
    fn collects_field_issues() {
        let bad = CreateTeamForm {
            name: "HR".into(),
            description: "x".into(),
            services: vec!["-4".into()],
            address: "300.0.0.0".into(),
            mask: "24".into(),
        };
        let errs = bad.parse().unwrap_err();
        assert!(errs.has("name", Rule::MinLength));
        assert!(errs.has("description", Rule::MinLength));
        assert!(errs.has("services", Rule::MinValue));
        assert!(errs.has("cidr", Rule::Cidr));
    }

    #[test]
    fn missing_address_is_required() {
        let errs = CreateTeamForm { address: " ".into(), ..form() }.parse().unwrap_err();
        assert!(errs.has("cidr", Rule::Required));
        assert!(!errs.has("cidr", Rule::Pattern));
    }

    #[test]
    fn block_must_fit_gateway_defaults_and_services() {
        // a /29 has six hosts: gateway, three defaults, two selected
        let three = CreateTeamForm { mask: "29".into(), services: vec!["1".into(), "2".into(), "3".into()], ..form() };
        assert!(three.parse().unwrap_err().has("services", Rule::Capacity));
        assert!(CreateTeamForm { mask: "29".into(), services: vec!["1".into(), "2".into()], ..form() }.parse().is_ok());

        let bare = CreateTeamForm { mask: "30".into(), services: vec![], ..form() };
        assert!(bare.parse().unwrap_err().has("services", Rule::Capacity));
    }

    #[test]
    fn duplicate_service_ids_count_once() {
        let req = CreateTeamForm { services: vec!["3".into(), "1".into(), "3".into()], ..form() }.parse().unwrap();
        assert_eq!(req.services, vec![3, 1]);

        let raw = CreateTeamRequest { services: vec![1, 1, 2, 2], name: "Platform".into(), description: None, cidr: "10.0.0.0/29".into() };
        assert_eq!(raw.hosts_needed(), 6);
        assert!(raw.validate().is_ok());
        assert_eq!(raw.dedup_services().services, vec![1, 2]);
    }

    #[test]
    fn login_rules() {
        let short = LoginForm { username: "ab".into(), password: Some("pw".into()), remember_me: None };
        assert!(short.parse().unwrap_err().has("username", Rule::MinLength));

        let no_password = LoginForm { username: "alice".into(), password: None, remember_me: None };
        assert!(no_password.parse().unwrap_err().has("password", Rule::Required));

        let ok = LoginForm { username: "alice".into(), password: Some(String::new()), remember_me: Some("on".into()) };
        let creds = ok.parse().unwrap();
        assert!(creds.remember_me);
        assert!(!format!("{creds:?}").contains("password"));
    }

    #[test]
    fn remember_me_defaults_to_false() {
        let creds = LoginForm { username: "alice".into(), password: Some("pw".into()), remember_me: None }.parse().unwrap();
        assert!(!creds.remember_me);
    }
}
