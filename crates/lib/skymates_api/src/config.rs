//! API server configuration.

use std::time::Duration;

use skymates_core::auth::jwt::JwtSecret;
use thiserror::Error;

/// Startup configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set")]
    MissingJwtSecret,

    #[error("Invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Configuration for the API server.
///
/// The server binary fills it from CLI arguments, each with an environment
/// fallback (`BIND_ADDR`, `DATABASE_URL`, `JWT_SECRET`, `QUERY_TIMEOUT_SECS`).
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// JWT signing secret.
    pub jwt_secret: JwtSecret,
    /// Deadline applied to each store query.
    pub query_timeout: Duration,
}

/// Wrap a raw secret value; absent or empty is a startup error.
pub fn jwt_secret_from(raw: Option<String>) -> Result<JwtSecret, ConfigError> {
    match raw {
        Some(secret) if !secret.is_empty() => {
            JwtSecret::new(secret).map_err(|_| ConfigError::MissingJwtSecret)
        }
        _ => Err(ConfigError::MissingJwtSecret),
    }
}

/// Parse a positive number of seconds.
pub fn parse_timeout_secs(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name: "QUERY_TIMEOUT_SECS",
            message: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_secret_is_fatal() {
        assert!(matches!(
            jwt_secret_from(None),
            Err(ConfigError::MissingJwtSecret)
        ));
        assert!(matches!(
            jwt_secret_from(Some(String::new())),
            Err(ConfigError::MissingJwtSecret)
        ));
        assert!(jwt_secret_from(Some("s3cret".into())).is_ok());
    }

    #[test]
    fn timeout_must_be_positive() {
        assert_eq!(parse_timeout_secs("5").unwrap(), Duration::from_secs(5));
        assert!(parse_timeout_secs("0").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }
}
