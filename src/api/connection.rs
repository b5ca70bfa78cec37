//! Connection management for the commerce backend.
//!
//! One [`Connection`] wraps the HTTP client, the backend base URL, and a
//! handle to local storage. The bearer token is loaded from storage on every
//! authenticated request (the login flow may replace it at any time), non-2xx
//! statuses become typed errors, and response bodies are decoded strictly
//! into the caller's DTO - a payload that does not match its schema is a
//! serialization error, not a value that propagates.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use url::Url;

use crate::config::api::ApiConfig;
use crate::core::persistence;
use crate::errors::{Error, Result};

/// Authenticated connection to the commerce backend.
#[derive(Debug, Clone)]
pub struct Connection {
    http: reqwest::Client,
    base_url: Url,
    storage: DatabaseConnection,
}

impl Connection {
    /// Builds a connection with the configured base URL and an explicit
    /// request timeout (a timed-out request classifies as retryable).
    pub fn new(config: &ApiConfig, storage: DatabaseConnection) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            storage,
        })
    }

    /// Base URL endpoint paths are joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Handle to the local storage backing token lookup.
    #[must_use]
    pub fn storage(&self) -> &DatabaseConnection {
        &self.storage
    }

    /// The stored bearer token, if the user is signed in.
    pub async fn auth_token(&self) -> Result<Option<String>> {
        persistence::load_auth_token(&self.storage).await
    }

    async fn bearer(&self) -> Result<String> {
        self.auth_token().await?.ok_or(Error::NotAuthenticated)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    /// Authenticated GET with query parameters, decoded into `T`.
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send_and_decode(self.http.get(url).query(query)).await
    }

    /// Authenticated POST with a JSON body, decoded into `O`.
    pub async fn post<I, O>(&self, path: &str, body: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send_and_decode(self.http.post(url).json(body)).await
    }

    /// Unauthenticated PUT of raw bytes to an absolute (presigned) URL.
    pub async fn put_bytes(&self, url: Url, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let response = self
            .http
            .put(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        drop(Self::check_status(response).await?);
        Ok(())
    }

    async fn send_and_decode<T>(&self, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let token = self.bearer().await?;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("Rejecting malformed response payload: {e}");
            Error::from(e)
        })
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
