use common::CoreError;
use models::errors::ModelError;
use models::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(ValidationErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream error ({status}): {}", .detail.join("; "))]
    Upstream { status: u16, detail: Vec<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e)
    }
}

impl From<CoreError> for ServiceError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Network(msg) => Self::Network(msg),
            CoreError::Parse(msg) => Self::Upstream { status: 502, detail: vec![format!("undecodable response: {msg}")] },
            CoreError::Status { status, detail } => Self::Upstream { status, detail },
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Db(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_service_errors() {
        assert!(matches!(ServiceError::from(CoreError::Network("refused".into())), ServiceError::Network(_)));
        match ServiceError::from(CoreError::Status { status: 422, detail: vec!["cidr: bad".into()] }) {
            ServiceError::Upstream { status, detail } => {
                assert_eq!(status, 422);
                assert_eq!(detail, vec!["cidr: bad".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(ServiceError::from(CoreError::Parse("eof".into())), ServiceError::Upstream { status: 502, .. }));
    }

    #[test]
    fn not_found_message() {
        assert_eq!(ServiceError::not_found("team").to_string(), "not found: team not found");
    }
}
