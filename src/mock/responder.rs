//! In-process mock responder
//!
//! A pure function from request to response: no shared state, no I/O. Every
//! input produces a well-formed response, unmatched routes degrade to 404.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::handlers::ROUTE_TABLE;
use super::routes::{Route, RouteInfo};

/// Optional request payload and headers, mirroring `{data, headers}` options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub data: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying a JSON body
    pub fn json(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    /// Add an `Authorization: Bearer` header
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", &format!("Bearer {}", token))
    }
}

/// A simulated request
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: String,
    path: String,
    body: Option<Value>,
    headers: HashMap<String, String>,
}

impl MockRequest {
    pub fn new(method: &str, path: &str, options: RequestOptions) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            body: options.data,
            headers: options.headers,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Look up a top-level field of the JSON body
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(name))
    }

    /// Field value if it is present and truthy
    ///
    /// Missing, `null`, `false`, `0` and `""` all count as absent.
    pub fn present(&self, name: &str) -> Option<&Value> {
        self.field(name).filter(|v| is_truthy(v))
    }
}

/// A simulated response: status code plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockResponse {
    status: u16,
    body: Value,
}

impl MockResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Response with a `{message}` body
    pub fn message(status: u16, message: &str) -> Self {
        Self::new(status, json!({ "message": message }))
    }

    pub fn not_found() -> Self {
        Self::message(404, "Not Found")
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Read the body
    ///
    /// Resolves immediately; the suspension point only mirrors a real body read.
    pub async fn json(&self) -> Value {
        tokio::task::yield_now().await;
        self.body.clone()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

/// JavaScript-style truthiness for JSON values
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Mock backend for auth, bookings, tours and health
#[derive(Debug, Clone)]
pub struct MockResponder {
    routes: &'static [Route],
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResponder {
    pub fn new() -> Self {
        Self { routes: ROUTE_TABLE }
    }

    /// Simulate a POST request
    pub async fn post(&self, path: &str, options: RequestOptions) -> MockResponse {
        self.dispatch(&MockRequest::new("POST", path, options))
    }

    /// Simulate a GET request
    pub async fn get(&self, path: &str, options: RequestOptions) -> MockResponse {
        self.dispatch(&MockRequest::new("GET", path, options))
    }

    /// Route a request through the table, first match wins
    pub fn dispatch(&self, request: &MockRequest) -> MockResponse {
        for route in self.routes {
            if let Some(params) = route.matches(request.method(), request.path()) {
                let response = route.handle(request, &params);
                debug!(
                    method = %request.method(),
                    path = %request.path(),
                    route = route.name,
                    status = response.status(),
                    "Mock request handled"
                );
                return response;
            }
        }

        debug!(method = %request.method(), path = %request.path(), "No mock route matched");
        MockResponse::not_found()
    }

    /// The routing table in evaluation order
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.routes.iter().map(RouteInfo::from).collect()
    }
}
