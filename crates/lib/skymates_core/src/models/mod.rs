//! Domain models shared by the store, service and API layers.

pub mod auth;
pub mod term;
