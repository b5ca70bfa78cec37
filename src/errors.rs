//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. Failures cross
//! module boundaries as typed variants rather than panics; callers branch on
//! the variant (and on [`Error::is_retryable`]) to decide between retrying,
//! degrading to cached state, or surfacing the failure.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong.
        message: String,
    },

    /// Local storage (SQLite) failure.
    #[error("Storage error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization failure, either a malformed server payload or
    /// a corrupt persisted snapshot.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport-level failure: connect, timeout, TLS, or body read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// A URL could not be parsed or joined.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// No auth token in local storage; the call requires a signed-in user.
    #[error("No auth token in storage")]
    NotAuthenticated,

    /// A client-side precondition was not met (e.g. empty cart at checkout).
    #[error("Precondition not met: {message}")]
    Precondition {
        /// Which precondition failed.
        message: String,
    },

    /// I/O error outside the database (e.g. reading a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable lookup error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Whether retrying the failed operation can plausibly succeed.
    ///
    /// Timeouts and connection failures are transient, as are server-side
    /// (5xx) statuses. Everything else (bad payloads, 4xx, local storage,
    /// missing auth) needs a different fix than a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
