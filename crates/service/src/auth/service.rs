use async_trait::async_trait;
use models::Credentials;
use tracing::{debug, instrument};

use super::domain::Session;
use super::errors::AuthError;

/// Checks a username/password pair and opens a session.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> Result<Session, AuthError>;
}

/// Accepts any credentials that passed the login schema. Issues no token.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubAuthenticator;

#[async_trait]
impl Authenticator for StubAuthenticator {
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    async fn verify(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        if credentials.username.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        debug!(remember_me = credentials.remember_me, "stub authenticator accepted login");
        Ok(Session { username: credentials.username.clone(), remember_me: credentials.remember_me, token: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str) -> Credentials {
        Credentials { username: username.into(), password: "secret".into(), remember_me: true }
    }

    #[tokio::test]
    async fn stub_accepts_schema_valid_credentials() {
        let session = StubAuthenticator.verify(&creds("alice")).await.unwrap();
        assert_eq!(session.username, "alice");
        assert!(session.remember_me);
        assert!(session.token.is_none());
    }

    #[tokio::test]
    async fn stub_rejects_blank_username() {
        let err = StubAuthenticator.verify(&creds("   ")).await.unwrap_err();
        assert_eq!(err.code(), 1004);
    }
}
