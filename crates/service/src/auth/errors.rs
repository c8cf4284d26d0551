use models::ValidationErrors;
use thiserror::Error;

/// Business errors for the login workflow
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("verifier error: {0}")]
    Verifier(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Unauthorized => 1004,
            AuthError::Verifier(_) => 1200,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(e: ValidationErrors) -> Self {
        AuthError::Validation(e)
    }
}
