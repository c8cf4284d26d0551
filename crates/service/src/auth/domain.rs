use serde::Serialize;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    pub remember_me: bool,
    /// Opaque session token, when the verifier issues one.
    pub token: Option<String>,
}
