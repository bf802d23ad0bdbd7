//! Upstream REST client with JSON conventions and uniform error handling.
//!
//! # Responsibilities
//! - Hold the configured base URL and a pooled `reqwest::Client`
//! - Issue GET/POST/PATCH/DELETE calls with JSON headers
//! - Turn transport, status and decode failures into `UpstreamError`

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{UpstreamError, UpstreamResult};

/// Client for the remote REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: Client,
    base_url: Arc<str>,
}

impl UpstreamClient {
    /// Create a client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        let http = builder.build().map_err(UpstreamError::Client)?;

        tracing::info!(base_url = %config.base_url, "Upstream client initialized");

        Ok(Self::with_client(http, &config.base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with optional query pairs.
    pub async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> UpstreamResult<T>
    where
        T: DeserializeOwned,
    {
        let mut builder = self.http.get(self.url(path));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.execute(Method::GET, path, builder, decode_json).await
    }

    /// POST a JSON body to `path`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> UpstreamResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.post(self.url(path)).json(body);
        self.execute(Method::POST, path, builder, decode_json).await
    }

    /// PATCH a JSON body to `path`.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> UpstreamResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.patch(self.url(path)).json(body);
        self.execute(Method::PATCH, path, builder, decode_json).await
    }

    /// DELETE `path`. Only the status is checked; the body may be anything.
    pub async fn delete(&self, path: &str) -> UpstreamResult<()> {
        let builder = self.http.delete(self.url(path));
        self.execute(Method::DELETE, path, builder, |_| Ok(())).await
    }

    async fn execute<T>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
        decode: fn(&[u8]) -> UpstreamResult<T>,
    ) -> UpstreamResult<T> {
        let start = Instant::now();
        let result = Self::send(builder, decode).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(method.as_str(), outcome, start);

        match &result {
            Ok(_) => tracing::debug!(
                method = %method,
                path = %path,
                elapsed = ?start.elapsed(),
                "Upstream call succeeded"
            ),
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Upstream call failed")
            }
        }

        result
    }

    async fn send<T>(
        builder: RequestBuilder,
        decode: fn(&[u8]) -> UpstreamResult<T>,
    ) -> UpstreamResult<T> {
        let response = builder.send().await.map_err(UpstreamError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(UpstreamError::Transport)?;

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null);
            return Err(UpstreamError::Status { status, body });
        }

        decode(&bytes)
    }
}

fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> UpstreamResult<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Client pointed at a closed local port; any call fails with a transport error.
#[cfg(test)]
pub(crate) fn offline_upstream() -> UpstreamClient {
    let http = Client::builder().no_proxy().build().unwrap();
    UpstreamClient::with_client(http, "http://127.0.0.1:9")
}
