//! Authentication logic.
//!
//! Provides password hashing, the signed-token service, and the credential
//! rules shared by registration and login.

pub mod credentials;
pub mod jwt;
pub mod password;

use thiserror::Error;

use crate::error::{CoreError, ErrorKind};

/// Why a token was refused.
///
/// Callers always report these as "unauthorized" to end users; the variant
/// is for logs and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature does not verify")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token not valid yet")]
    NotYetValid,

    #[error("token is malformed")]
    Malformed,

    #[error("token issued by a different issuer")]
    IssuerMismatch,
}

impl From<TokenError> for CoreError {
    fn from(e: TokenError) -> Self {
        CoreError::with_source(ErrorKind::Unauthorized, "Invalid or expired token", e)
    }
}
