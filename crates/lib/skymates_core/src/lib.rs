//! # skymates_core
//!
//! Core domain logic for Skymates: ranked term search, keyset paging over
//! categories, signed access tokens and the error taxonomy the API layer
//! maps to HTTP.

pub mod auth;
pub mod error;
pub mod migrate;
pub mod models;
pub mod store;
pub mod terms;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
