//! Error types for cryptowatch.

use thiserror::Error;

use crate::RouteKind;

/// Result type alias for cryptowatch operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while calling the market-data API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Every attempt was answered with `429 Too Many Requests`.
    #[error("too many requests: rate limited on all {attempts} attempts")]
    RateLimitExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// The API rejected the request (`400 Bad Request`).
    #[error("API error: {message}")]
    Client {
        /// Error message supplied by the API.
        message: String,
    },

    /// The API answered with an unexpected status code.
    #[error("status code: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// HTTP request failed before a status was received.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A positional record could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The market has no route for the requested resource.
    #[error("No {route} route resolved for this market")]
    MissingRoute {
        /// The route that was requested.
        route: RouteKind,
    },
}

impl ApiError {
    /// Returns true if the error was caused by rate limiting.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    /// Returns the HTTP status associated with the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimitExceeded { .. } => Some(429),
            Self::Client { .. } => Some(400),
            Self::Status { status } => Some(*status),
            _ => None,
        }
    }
}
