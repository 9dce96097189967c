//! Backend selection: the in-process mock or the real service
//!
//! Both sides expose the same `post`/`get` shape so checks never know which
//! one answered.

pub mod live;

use serde::Serialize;
use serde_json::Value;

pub use live::LiveClient;

use crate::config::HarnessConfig;
use crate::errors::TripmockError;
use crate::mock::{HttpMethod, MockResponder, MockResponse, RequestOptions};

/// Status plus decoded JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    status: u16,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Read the decoded body
    pub async fn json(&self) -> Value {
        self.body.clone()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl From<MockResponse> for ApiResponse {
    fn from(response: MockResponse) -> Self {
        let status = response.status();
        Self::new(status, response.into_body())
    }
}

/// Where calls go
#[derive(Debug, Clone)]
pub enum ApiBackend {
    Mock(MockResponder),
    Live(LiveClient),
}

impl ApiBackend {
    pub fn from_config(config: &HarnessConfig) -> Result<Self, TripmockError> {
        if config.use_mock {
            Ok(ApiBackend::Mock(MockResponder::new()))
        } else {
            Ok(ApiBackend::Live(LiveClient::new(&config.base_url, config.timeout)?))
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self, ApiBackend::Mock(_))
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        match self {
            ApiBackend::Mock(mock) => Ok(mock.post(path, options).await.into()),
            ApiBackend::Live(client) => client.post(path, options).await,
        }
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        match self {
            ApiBackend::Mock(mock) => Ok(mock.get(path, options).await.into()),
            ApiBackend::Live(client) => client.get(path, options).await,
        }
    }

    /// Issue a call by method name; only GET and POST are part of the contract
    pub async fn call(&self, method: &str, path: &str, options: RequestOptions) -> Result<ApiResponse, TripmockError> {
        match method.parse::<HttpMethod>()? {
            HttpMethod::Get => self.get(path, options).await,
            HttpMethod::Post => self.post(path, options).await,
        }
    }
}
