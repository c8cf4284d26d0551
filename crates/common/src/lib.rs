//! Shared helpers for the workspace: logging setup, wire types and the
//! JSON client used to talk to the external backend API.

use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;
pub mod upstream;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("upstream responded {status}: {}", .detail.join("; "))]
    Status { status: u16, detail: Vec<String> },
}

impl CoreError {
    /// Upstream HTTP status, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
