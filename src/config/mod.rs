//! Application configuration.
//!
//! Settings are layered the same way at every key: environment variable
//! first, then an optional `storefront.toml` file, then a built-in default.
//! [`load_app_configuration`] performs the layering once at startup and hands
//! back an immutable [`AppConfig`].

/// API endpoint configuration (base URL, timeout)
pub mod api;

/// Database configuration and connection management
pub mod database;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::env;
use tracing::debug;
use url::Url;

use api::ApiConfig;

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend API settings.
    pub api: ApiConfig,
    /// Connection URL for the local storage database.
    pub database_url: String,
}

/// Raw shape of `storefront.toml`. All keys optional; missing sections fall
/// through to environment variables and defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api: ApiSection,
    #[serde(default)]
    database: DatabaseSection,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    url: Option<String>,
}

/// Loads the application configuration.
///
/// Reads the config file named by `STOREFRONT_CONFIG` (default
/// `storefront.toml`; a missing file is fine), then applies
/// `STOREFRONT_API_URL`, `STOREFRONT_API_TIMEOUT_SECS`, and
/// `STOREFRONT_DB_URL` overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::var("STOREFRONT_CONFIG").unwrap_or_else(|_| "storefront.toml".to_owned());
    let file = match std::fs::read_to_string(&path) {
        Ok(raw) => toml::from_str(&raw).map_err(|e| Error::Config {
            message: format!("Failed to parse {path}: {e}"),
        })?,
        Err(_) => {
            debug!("No config file at {path}, using environment and defaults");
            ConfigFile::default()
        }
    };

    resolve(
        file,
        env::var("STOREFRONT_API_URL").ok(),
        env::var("STOREFRONT_API_TIMEOUT_SECS").ok(),
        env::var("STOREFRONT_DB_URL").ok(),
    )
}

/// Merges file values with environment overrides and defaults.
fn resolve(
    file: ConfigFile,
    env_api_url: Option<String>,
    env_timeout_secs: Option<String>,
    env_database_url: Option<String>,
) -> Result<AppConfig> {
    let base_url_raw = env_api_url
        .or(file.api.base_url)
        .unwrap_or_else(|| api::DEFAULT_API_URL.to_owned());
    let base_url = Url::parse(&base_url_raw).map_err(|e| Error::Config {
        message: format!("Invalid API base URL '{base_url_raw}': {e}"),
    })?;

    let timeout_secs = match env_timeout_secs {
        Some(raw) => raw.parse().map_err(|e| Error::Config {
            message: format!("Invalid STOREFRONT_API_TIMEOUT_SECS '{raw}': {e}"),
        })?,
        None => file
            .api
            .timeout_secs
            .unwrap_or(api::DEFAULT_TIMEOUT_SECS),
    };

    let database_url = env_database_url
        .or(file.database.url)
        .unwrap_or_else(|| database::DEFAULT_DATABASE_URL.to_owned());

    Ok(AppConfig {
        api: ApiConfig {
            base_url,
            timeout_secs,
        },
        database_url,
    })
}
