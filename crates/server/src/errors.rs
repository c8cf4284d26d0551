use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use models::ValidationErrors;
use serde::Serialize;
use service::ServiceError;
use tracing::{error, warn};

use crate::views;

/// JSON error body returned by the `/api` routes.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "ValidationErrors::is_empty")]
    pub issues: ValidationErrors,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &str, detail: Option<String>) -> Self {
        Self { status, error: title.to_string(), detail, issues: ValidationErrors::new() }
    }

    pub fn with_issues(mut self, issues: ValidationErrors) -> Self {
        self.issues = issues;
        self
    }
}

/// Status and title shown for a service failure.
pub fn classify(e: &ServiceError) -> (StatusCode, &'static str) {
    match e {
        ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
        ServiceError::Upstream { .. } | ServiceError::Network(_) => (StatusCode::BAD_GATEWAY, "Upstream Error"),
        ServiceError::Db(_) | ServiceError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    }
}

fn log_failure(status: StatusCode, e: &ServiceError) {
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %e, "request failed");
    } else {
        warn!(status = status.as_u16(), error = %e, "request rejected");
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let (status, title) = classify(&e);
        log_failure(status, &e);
        match e {
            ServiceError::Validation(issues) => JsonApiError::new(status, title, None).with_issues(issues),
            other => JsonApiError::new(status, title, Some(other.to_string())),
        }
    }
}

/// Bodies that are not JSON, or do not match the request schema.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(status = 400, error = %rejection.body_text(), "request body rejected");
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Request", Some(rejection.body_text()))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Failure while loading a page; rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError(pub ServiceError);

impl From<ServiceError> for PageError {
    fn from(e: ServiceError) -> Self {
        PageError(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title) = classify(&self.0);
        log_failure(status, &self.0);
        (status, Html(views::error_page(status.as_u16(), title, &self.0.to_string()))).into_response()
    }
}
