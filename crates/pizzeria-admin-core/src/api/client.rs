//! HTTP client for the platform's auth and catalog services.
//!
//! `ApiClient` owns a cookie-enabled `reqwest::Client`; the session lives
//! entirely in server-set cookies, so the client never handles tokens.
//! Every request goes through `send` (see `interceptor.rs`), which adds
//! the one-shot refresh on 401.

use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::SessionStore;
use crate::config::Config;

use super::request::{Method, PendingRequest, RequestBody, RequestConfig};
use super::ApiError;

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the platform services.
/// Clone is cheap - the reqwest client, cookie jar and session store are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        Self::with_timeout(
            base_url.into(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session,
        )
    }

    pub fn from_config(config: &Config, session: SessionStore) -> Result<Self, ApiError> {
        Self::with_timeout(config.base_url(), config.request_timeout(), session)
    }

    pub fn with_timeout(
        base_url: String,
        timeout: Duration,
        session: SessionStore,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store this client clears when a refresh fails
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn default_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    // ===== Verbs =====

    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(Method::Get, path)).await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(Method::Post, path).body(body)).await
    }

    pub async fn patch(&self, path: &str, body: RequestBody) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(Method::Patch, path).body(body)).await
    }

    pub async fn put(&self, path: &str, body: RequestBody) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(Method::Put, path).body(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(Method::Delete, path)).await
    }

    /// Any verb with per-call header overrides
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        config: RequestConfig,
    ) -> Result<Response, ApiError> {
        self.send(PendingRequest::new(method, path).body(body).config(config))
            .await
    }

    /// Send one attempt of `request`, without any refresh handling.
    pub(crate) async fn attempt(&self, request: &PendingRequest) -> Result<Response, ApiError> {
        let url = self.url(&request.path);

        let mut headers = Self::default_headers();
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.body {
            RequestBody::Empty => builder.headers(headers),
            RequestBody::Json(value) => builder.headers(headers).json(value),
            RequestBody::Multipart(body) => {
                // reqwest sets the content type with the boundary
                headers.remove(header::CONTENT_TYPE);
                builder.headers(headers).multipart(body.to_form()?)
            }
        };

        let response = builder.send().await?;
        debug!(
            method = %request.method,
            path = %request.path,
            retry = request.is_retry,
            status = response.status().as_u16(),
            "Request completed"
        );
        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Decode a JSON response body.
    pub async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let url = response.url().path().to_string();
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e)))
    }
}
