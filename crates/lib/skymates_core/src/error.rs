//! Classified errors shared by every core operation.
//!
//! Each failure carries an [`ErrorKind`] from a closed taxonomy, a short
//! human-readable message and, optionally, the underlying cause. The HTTP
//! boundary maps kinds to transport statuses; nothing in this crate does.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed underlying cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Failure classes understood by the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Validation,
    Unauthorized,
    Forbidden,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::Validation => "validation",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CoreError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl CoreError {
    /// Build an error of the given kind without an underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Build an error of the given kind wrapping an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyExists, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Internal failure with its cause attached for diagnostics.
    pub fn internal(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::with_source(ErrorKind::Internal, message, source)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Look for an underlying cause of type `E` anywhere in the source chain.
    pub fn find_cause<E: StdError + 'static>(&self) -> Option<&E> {
        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }

    /// Message followed by the full cause chain, for logs only.
    pub fn detailed(&self) -> String {
        let mut out = self.message.clone();
        let mut current: Option<&(dyn StdError + 'static)> = self.source();
        while let Some(err) = current {
            out.push_str(": ");
            out.push_str(&err.to_string());
            current = err.source();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("connection reset")]
    struct Reset;

    #[test]
    fn internal_keeps_cause_for_diagnostics() {
        let err = CoreError::internal("search failed", Reset);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "search failed");
        assert_eq!(err.detailed(), "search failed: connection reset");
        assert!(err.find_cause::<Reset>().is_some());
    }

    #[test]
    fn constructors_tag_kind() {
        assert!(CoreError::not_found("x").is(ErrorKind::NotFound));
        assert!(CoreError::already_exists("x").is(ErrorKind::AlreadyExists));
        assert!(CoreError::validation("x").is(ErrorKind::Validation));
        assert!(CoreError::unauthorized("x").is(ErrorKind::Unauthorized));
        assert!(CoreError::forbidden("x").is(ErrorKind::Forbidden));
        assert!(CoreError::conflict("x").is(ErrorKind::Conflict));
    }

    #[test]
    fn kind_has_stable_text() {
        assert_eq!(ErrorKind::AlreadyExists.to_string(), "already_exists");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
    }
}
