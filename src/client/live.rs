//! HTTP client for the real backend

use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use super::ApiResponse;
use crate::errors::TripmockError;
use crate::mock::RequestOptions;

const USER_AGENT_STRING: &str = concat!("tripmock/", env!("CARGO_PKG_VERSION"));

/// Single-shot JSON calls against a base URL, no retries
#[derive(Debug, Clone)]
pub struct LiveClient {
    client: Client,
    base_url: String,
}

impl LiveClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TripmockError> {
        Url::parse(base_url)?;

        let client = Client::builder()
            .user_agent(USER_AGENT_STRING)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for a request path, keeping any path prefix of the base URL
    pub fn url_for(&self, path: &str) -> Result<Url, TripmockError> {
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        self.send(Method::POST, path, options).await
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        self.send(Method::GET, path, options).await
    }

    async fn send(&self, method: Method, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        let url = self.url_for(path)?;
        debug!(method = %method, url = %url, "Live request");

        let mut request = self.client.request(method, url);
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(ref data) = options.data {
            request = request.json(data);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(status, bytes = text.len(), "Live response");
        Ok(ApiResponse::new(status, parse_body(&text)))
    }
}

/// Decode a response body: JSON when possible, `{"raw": text}` otherwise
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}
