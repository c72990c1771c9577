//! Shared error type across urlguard crates.

use thiserror::Error;

use crate::rule::PatternField;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// A rule carries a pattern that does not compile.
    InvalidPattern,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidPattern => "INVALID_PATTERN",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, UrlGuardError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum UrlGuardError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("invalid {field} pattern in rule {rule} ({pattern:?}): {reason}")]
    InvalidPattern {
        rule: usize,
        field: PatternField,
        pattern: String,
        reason: String,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl UrlGuardError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            UrlGuardError::BadRequest(_) => ClientCode::BadRequest,
            UrlGuardError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            UrlGuardError::InvalidPattern { .. } => ClientCode::InvalidPattern,
            UrlGuardError::Internal(_) => ClientCode::Internal,
        }
    }
}
