//! Error types for the GDNS system
//!
//! This module defines all error types used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for GDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registrar error code returned when a nameserver change is refused
pub const NAME_SERVER_VALIDATION_CODE: &str = "FAILED_NAME_SERVER_VALIDATION";

/// HTTP status the registrar uses for [`NAME_SERVER_VALIDATION_CODE`]
pub const NAME_SERVER_VALIDATION_STATUS: u16 = 422;

/// Structured failure reported by the registrar API
///
/// The registrar answers failed requests with a JSON body carrying a
/// machine-readable `code` next to the human-readable `message`. The code is
/// kept verbatim so callers can match on it instead of on message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarError {
    /// HTTP status of the failed response
    pub status: u16,
    /// Machine-readable registrar error code (e.g. `FAILED_NAME_SERVER_VALIDATION`)
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl RegistrarError {
    /// Create a new registrar error
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether this is the registrar refusing a nameserver change
    pub fn is_nameserver_validation(&self) -> bool {
        self.status == NAME_SERVER_VALIDATION_STATUS && self.code == NAME_SERVER_VALIDATION_CODE
    }
}

impl fmt::Display for RegistrarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for RegistrarError {}

/// Core error type for the GDNS system
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed record data or declarative input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registrar could not find the requested entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Domain identity could not be resolved
    #[error("couldn't find domain ({domain}): {source}")]
    DomainNotFound {
        /// Domain name that was looked up
        domain: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Record set could not be fetched
    #[error("couldn't find domain record ({domain}): {source}")]
    RecordsNotFound {
        /// Domain name whose records were fetched
        domain: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Structured registrar API failure
    #[error("Registrar error: {0}")]
    Registrar(#[from] RegistrarError),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Wrap a domain resolution failure with the domain name
    pub fn domain_not_found(domain: impl Into<String>, source: Error) -> Self {
        Self::DomainNotFound {
            domain: domain.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a record fetch failure with the domain name
    pub fn records_not_found(domain: impl Into<String>, source: Error) -> Self {
        Self::RecordsNotFound {
            domain: domain.into(),
            source: Box::new(source),
        }
    }

    /// Create a structured registrar error
    pub fn registrar(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registrar(RegistrarError::new(status, code, message))
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Whether this error is the registrar's nameserver validation refusal
    ///
    /// Matches on the structured error code, never on message text.
    pub fn is_nameserver_validation(&self) -> bool {
        matches!(self, Self::Registrar(err) if err.is_nameserver_validation())
    }
}
