//! Form actions: validate submitted values, call the backend, and report a
//! failure the page can re-render with.

use models::{CreateTeamForm, LoginForm, Team, ValidationErrors};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::auth::{Authenticator, Session};
use crate::backend::Backends;
use crate::errors::ServiceError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const INVALID_TEAM: &str = "Invalid team data.";
pub const BACKEND_UNAVAILABLE: &str = "Team backend unavailable.";

/// A rejected submission, carrying what the user typed so the form can be
/// shown again.
#[derive(Debug, Clone, Serialize)]
pub struct ActionFailure<F> {
    pub status: u16,
    pub form: F,
    pub message: String,
    pub issues: ValidationErrors,
    /// Messages reported by the external backend, if it was reached.
    pub detail: Vec<String>,
}

impl<F> ActionFailure<F> {
    fn new(status: u16, form: F, message: &str) -> Self {
        Self { status, form, message: message.to_string(), issues: ValidationErrors::new(), detail: Vec::new() }
    }

    fn with_issues(mut self, issues: ValidationErrors) -> Self {
        self.issues = issues;
        self
    }

    fn with_detail(mut self, detail: Vec<String>) -> Self {
        self.detail = detail;
        self
    }
}

fn create_failure(form: CreateTeamForm, err: ServiceError) -> ActionFailure<CreateTeamForm> {
    match err {
        ServiceError::Validation(issues) => ActionFailure::new(400, form, INVALID_TEAM).with_issues(issues),
        ServiceError::Upstream { status, detail } if (400..500).contains(&status) => {
            ActionFailure::new(400, form, INVALID_TEAM).with_detail(detail)
        }
        ServiceError::Upstream { detail, .. } => ActionFailure::new(502, form, BACKEND_UNAVAILABLE).with_detail(detail),
        ServiceError::Network(msg) => ActionFailure::new(502, form, BACKEND_UNAVAILABLE).with_detail(vec![msg]),
        other => ActionFailure::new(500, form, BACKEND_UNAVAILABLE).with_detail(vec![other.to_string()]),
    }
}

/// Parse the create-team form and hand the request to the team backend.
#[instrument(skip(backends, form), fields(name = %form.name))]
pub async fn create_team(backends: &Backends, form: CreateTeamForm) -> Result<Team, ActionFailure<CreateTeamForm>> {
    let request = match form.parse() {
        Ok(request) => request,
        Err(issues) => {
            info!(event = "create_team_rejected", issues = issues.issues().len(), "team form failed validation");
            return Err(create_failure(form, issues.into()));
        }
    };
    match backends.teams.create(request).await {
        Ok(team) => {
            info!(event = "team_created", team_id = %team.id, "team created");
            Ok(team)
        }
        Err(e) => {
            warn!(event = "create_team_failed", error = %e, "backend refused team");
            Err(create_failure(form, e))
        }
    }
}

/// Validate the login form and ask the verifier for a session. Every failure
/// reads the same to the user.
#[instrument(skip(auth, form), fields(username = %form.username))]
pub async fn login(auth: &dyn Authenticator, mut form: LoginForm) -> Result<Session, ActionFailure<LoginForm>> {
    let outcome = match form.parse() {
        Ok(credentials) => auth.verify(&credentials).await,
        Err(issues) => Err(issues.into()),
    };
    form.password = None;
    match outcome {
        Ok(session) => {
            info!(event = "login", remember_me = session.remember_me, "login accepted");
            Ok(session)
        }
        Err(e) => {
            info!(event = "login_rejected", code = e.code(), "login rejected");
            let issues = match e {
                crate::auth::AuthError::Validation(issues) => issues,
                _ => ValidationErrors::new(),
            };
            Err(ActionFailure::new(400, form, INVALID_CREDENTIALS).with_issues(issues))
        }
    }
}
