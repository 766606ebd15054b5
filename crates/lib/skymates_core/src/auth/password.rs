//! Password hashing via bcrypt.

use crate::error::{CoreError, CoreResult};

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> CoreResult<String> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| CoreError::internal("bcrypt hash", e))
}

/// Verify a password against a bcrypt hash.
///
/// A hash that cannot be parsed is an internal error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> CoreResult<bool> {
    bcrypt::verify(password, hash).map_err(|e| CoreError::internal("bcrypt verify", e))
}
