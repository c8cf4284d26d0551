use std::sync::Arc;

use service::auth::{Authenticator, StubAuthenticator};
use service::Backends;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub auth: Arc<dyn Authenticator>,
}

impl AppState {
    /// State with the stub credential verifier.
    pub fn new(backends: Backends) -> Self {
        Self { backends, auth: Arc::new(StubAuthenticator) }
    }

    pub fn with_authenticator(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = auth;
        self
    }
}
