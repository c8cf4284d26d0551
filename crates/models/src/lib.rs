//! Domain model: teams, deployed services, catalog entries, their validation
//! rules and the network math behind team address blocks.

pub mod errors;
pub mod db;
pub mod validation;
pub mod network;
pub mod service;
pub mod team;
pub mod forms;
pub mod catalog;

pub use forms::{CreateTeamForm, CreateTeamRequest, Credentials, LoginForm, DEFAULT_SERVICE_HOSTS};
pub use service::{DefaultService, Service, ServiceBase, ServiceListing};
pub use team::{Team, TeamId};
pub use validation::{FieldIssue, Rule, Validate, ValidationErrors};
