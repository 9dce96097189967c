//! Mock server configuration

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::TripmockError;

/// Mock server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (0 picks a free port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable request logging
    #[serde(default = "default_true")]
    pub log_requests: bool,

    /// Enable CORS headers
    #[serde(default)]
    pub cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_requests: true,
            cors: false,
        }
    }
}

impl MockServerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind host
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Enable CORS headers
    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    /// Load config from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TripmockError> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let ext = path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json");

        match ext {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content)
                    .map_err(|e| TripmockError::Config(format!("Failed to parse YAML config: {}", e)))
            }
            "toml" => {
                toml::from_str(&content)
                    .map_err(|e| TripmockError::Config(format!("Failed to parse TOML config: {}", e)))
            }
            _ => {
                serde_json::from_str(&content)
                    .map_err(|e| TripmockError::Config(format!("Failed to parse JSON config: {}", e)))
            }
        }
    }

    /// Get address string
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Parse the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr, TripmockError> {
        self.address()
            .parse()
            .map_err(|e| TripmockError::Config(format!("Invalid address '{}': {}", self.address(), e)))
    }
}
