//! API endpoint configuration.
//!
//! Resolves where the commerce backend lives and how long requests may take.
//! Values come from `storefront.toml` with environment-variable overrides;
//! see [`crate::config::load_app_configuration`].

use url::Url;

/// Default backend base URL when neither config file nor environment set one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/";

/// Default per-request timeout in seconds.
///
/// The backend contract specifies no timeout of its own, so the client
/// imposes one; a timed-out request is classified as retryable.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Resolved API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are joined onto.
    pub base_url: Url,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Creates a config with the given base URL and the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
