//! Error types for LBaaS operations.
//!
//! All bindings share one error enum. Each variant belongs to one of four
//! classes, see [`ErrorKind`], so callers can tell a request that never left
//! the process from one the server rejected.

use thiserror::Error;

/// Main error type for LBaaS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Options could not be rendered as a query string or request body
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// A required option was missing or empty
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Endpoint could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The server answered with a status outside the accepted set
    #[error("Expected HTTP response code {expected:?} when accessing [{method} {url}], but got {status} instead: {body}")]
    UnexpectedStatus {
        /// HTTP method of the failed request
        method: String,
        /// Absolute URL of the failed request
        url: String,
        /// Status code the server returned
        status: u16,
        /// Status codes that would have been accepted
        expected: Vec<u16>,
        /// Raw response body, lossily decoded
        body: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for LBaaS operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Building the query or body failed; no request was sent.
    Encoding,
    /// The request was sent (or attempted) and failed at the HTTP level.
    Transport,
    /// The response arrived but could not be decoded.
    Decoding,
    /// The client itself is misconfigured.
    Config,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EncodingError(_) => "ENCODING_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns the class this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EncodingError(_) | Self::ValidationError(_) => ErrorKind::Encoding,
            Self::HttpError(_)
            | Self::Timeout(_)
            | Self::ServiceUnavailable(_)
            | Self::UnexpectedStatus { .. } => ErrorKind::Transport,
            Self::DecodeError(_) => ErrorKind::Decoding,
            Self::ConfigError(_) | Self::InvalidEndpoint(_) => ErrorKind::Config,
        }
    }

    /// HTTP status code carried by an [`Error::UnexpectedStatus`].
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
