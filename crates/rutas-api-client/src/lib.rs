//! HTTP client for the Rutas backend.
//!
//! Provides a minimal client with Bearer auth, generic GET/POST/PUT/DELETE
//! helpers, and the collaborator trait implementations the form engine
//! consumes (`EntityBackend`, `PlaceSearch`). The CLI uses this client
//! directly.

pub mod api;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// No credentials (public directory endpoints)
    Anonymous,
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// Non-success HTTP status, kept typed so callers can map it.
#[derive(Debug, thiserror::Error)]
#[error("API request failed with status {status}: {body}")]
pub struct ApiStatusError {
    pub status: u16,
    pub body: String,
}

/// API version prefix (e.g. "/api/v1"). Set RUTAS_API_VERSION to match the server.
pub fn api_prefix() -> String {
    let version = std::env::var("RUTAS_API_VERSION").unwrap_or_else(|_| "v1".to_string());
    format!("/api/{}", version)
}

/// HTTP client for the Rutas API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from environment: RUTAS_API_URL, RUTAS_API_TOKEN.
    ///
    /// Without a token the client is anonymous and can only reach public endpoints.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("RUTAS_API_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string());

        let auth = match std::env::var("RUTAS_API_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Auth::Bearer(token),
            _ => Auth::Anonymous,
        };

        Self::new(base_url, auth)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Anonymous => request,
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiStatusError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(response)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }

        self.send(request)
            .await?
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// POST JSON body. Returns Ok(()) on success, ignoring any body.
    pub async fn post_json<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.client.post(self.build_url(path)).json(body))
            .await?;
        Ok(())
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        self.send(self.client.post(self.build_url(path)).multipart(form))
            .await?
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// PUT multipart form. Returns Ok(()) on success.
    pub async fn put_multipart(&self, path: &str, form: reqwest::multipart::Form) -> Result<()> {
        self.send(self.client.put(self.build_url(path)).multipart(form))
            .await?;
        Ok(())
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.client.delete(self.build_url(path))).await?;
        Ok(())
    }
}
