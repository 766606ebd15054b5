//! Request and response bodies.
//!
//! Every response is wrapped in an [`Envelope`]: `{"message": ..., "data": ...}`
//! with `data` omitted when there is nothing to return.

use serde::{Deserialize, Serialize};
use skymates_core::models::auth::User;
use skymates_core::models::term::{TermId, TermSummary};

/// Uniform response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::with_message("Success", data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// `account` is a username, or an email when it contains `@`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub terms: Vec<TermSummary>,
}

/// Raw listing parameters; parsed by the handler so malformed values become
/// validation errors in the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTermsQuery {
    pub category_id: Option<String>,
    pub last_id: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTermsResponse {
    pub terms: Vec<TermSummary>,
    /// Cursor for the next page: pass back as `last_id`.
    pub last_id: Option<TermId>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermCountResponse {
    pub category_id: i64,
    pub term_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub version: String,
    pub db_connected: bool,
}
