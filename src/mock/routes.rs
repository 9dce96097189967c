//! Mock route definitions and matching
//!
//! Routes are evaluated in declaration order and the first match wins, so a
//! more specific pattern must be declared before any prefix that covers it.

use std::collections::HashMap;
use std::fmt;

use super::responder::{MockRequest, MockResponse};
use crate::errors::TripmockError;

/// HTTP method for route matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn matches(&self, method: &str) -> bool {
        method.eq_ignore_ascii_case(self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = TripmockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(TripmockError::Argument(format!(
                "Unsupported method {}: only GET and POST are available",
                other
            ))),
        }
    }
}

/// Path pattern for a route
///
/// Only exact and prefix comparisons exist. `Tail` is a prefix followed by a
/// single trailing variable segment: the final `/`-separated segment of the
/// request path is captured under `param`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(&'static str),
    Prefix(&'static str),
    Tail { prefix: &'static str, param: &'static str },
}

impl PathPattern {
    /// Match a request path, returning captured parameters on success
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        match self {
            PathPattern::Exact(p) => (path == *p).then(HashMap::new),
            PathPattern::Prefix(p) => path.starts_with(p).then(HashMap::new),
            PathPattern::Tail { prefix, param } => {
                if !path.starts_with(prefix) {
                    return None;
                }
                let segment = path.rsplit('/').next().unwrap_or_default();
                let mut params = HashMap::new();
                params.insert(param.to_string(), segment.to_string());
                Some(params)
            }
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(p) => write!(f, "{}", p),
            PathPattern::Prefix(p) => write!(f, "{}*", p),
            PathPattern::Tail { prefix, param } => write!(f, "{}:{}", prefix, param),
        }
    }
}

/// Handler producing a response from a request and the captured path params
pub type Handler = fn(&MockRequest, &HashMap<String, String>) -> MockResponse;

/// A single entry of the routing table
#[derive(Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub pattern: PathPattern,
    pub name: &'static str,
    handler: Handler,
}

impl Route {
    pub const fn new(method: HttpMethod, pattern: PathPattern, name: &'static str, handler: Handler) -> Self {
        Self { method, pattern, name, handler }
    }

    /// Check if this route matches the request
    pub fn matches(&self, method: &str, path: &str) -> Option<HashMap<String, String>> {
        if !self.method.matches(method) {
            return None;
        }
        self.pattern.matches(path)
    }

    pub fn handle(&self, request: &MockRequest, params: &HashMap<String, String>) -> MockResponse {
        (self.handler)(request, params)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("name", &self.name)
            .finish()
    }
}

/// Summary of a route for listings
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub method: String,
    pub pattern: String,
    pub name: String,
}

impl From<&Route> for RouteInfo {
    fn from(route: &Route) -> Self {
        Self {
            method: route.method.to_string(),
            pattern: route.pattern.to_string(),
            name: route.name.to_string(),
        }
    }
}
