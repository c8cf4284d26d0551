//! Service layer between the HTTP surface and the data sources.
//! - Backends answer team and service queries (fixture data or the external API).
//! - Page loads and form actions turn backend results into what a page renders.
//! - The catalog seed routine is only used by the `seed` binary.

pub mod actions;
pub mod auth;
pub mod backend;
pub mod errors;
pub mod pages;
pub mod seed;

pub use backend::{Backends, ServiceDirectory, TeamRepository};
pub use errors::ServiceError;
