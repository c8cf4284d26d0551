//! Auth module: domain types, errors and the credential verifier seam.
//!
//! No real identity store is wired in; [`service::StubAuthenticator`] is the
//! verifier the server ships with.

pub mod domain;
pub mod errors;
pub mod service;

pub use domain::Session;
pub use errors::AuthError;
pub use service::{Authenticator, StubAuthenticator};
