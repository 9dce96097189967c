//! Harness configuration
//!
//! Built once at start-up from the environment (plus `.env`) or a config
//! file, then passed around explicitly.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::env::EnvVars;
use super::secret::SecretString;
use crate::errors::TripmockError;

pub const ENV_BASE_URL: &str = "API_BASE_URL";
pub const ENV_USE_MOCK: &str = "USE_MOCK_API";
pub const ENV_CUSTOMER_EMAIL: &str = "CUSTOMER_EMAIL";
pub const ENV_CUSTOMER_PASSWORD: &str = "CUSTOMER_PASSWORD";
pub const ENV_TIMEOUT: &str = "API_TIMEOUT";
pub const ENV_WORKERS: &str = "TEST_WORKERS";

/// Customer account used by the sign-in and booking checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: SecretString,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: SecretString::from(password),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Root URL of the real backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Answer calls with the in-process mock instead of the real backend
    #[serde(default = "default_true")]
    pub use_mock: bool,

    #[serde(default)]
    pub customer: Credentials,

    /// Per-request timeout for live calls
    #[serde(
        default = "default_timeout",
        serialize_with = "serialize_duration",
        deserialize_with = "deserialize_duration"
    )]
    pub timeout: Duration,

    /// Checks in flight at once
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_workers() -> usize {
    4
}

fn serialize_duration<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            use_mock: true,
            customer: Credentials::default(),
            timeout: default_timeout(),
            workers: default_workers(),
        }
    }
}

impl HarnessConfig {
    /// Build from environment variables, falling back to defaults
    pub fn from_env(env: &EnvVars) -> Result<Self, TripmockError> {
        let mut config = Self::default();

        if let Some(url) = env.get_non_empty(ENV_BASE_URL) {
            config.base_url = url.to_string();
        }
        if let Some(flag) = env.get_non_empty(ENV_USE_MOCK) {
            config.use_mock = parse_flag(ENV_USE_MOCK, flag)?;
        }
        if let Some(email) = env.get_non_empty(ENV_CUSTOMER_EMAIL) {
            config.customer.email = email.to_string();
        }
        if let Some(password) = env.get(ENV_CUSTOMER_PASSWORD).filter(|p| !p.is_empty()) {
            config.customer.password = SecretString::from(password);
        }
        if let Some(timeout) = env.get_non_empty(ENV_TIMEOUT) {
            config.timeout = humantime::parse_duration(timeout)
                .map_err(|e| TripmockError::Config(format!("Invalid {} '{}': {}", ENV_TIMEOUT, timeout, e)))?;
        }
        if let Some(workers) = env.get_non_empty(ENV_WORKERS) {
            config.workers = workers
                .parse()
                .map_err(|e| TripmockError::Config(format!("Invalid {} '{}': {}", ENV_WORKERS, workers, e)))?;
        }

        Ok(config)
    }

    /// Load config from a YAML, TOML or JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TripmockError> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let ext = path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json");

        match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| TripmockError::Config(format!("Failed to parse YAML config: {}", e))),
            "toml" => toml::from_str(&content)
                .map_err(|e| TripmockError::Config(format!("Failed to parse TOML config: {}", e))),
            _ => serde_json::from_str(&content)
                .map_err(|e| TripmockError::Config(format!("Failed to parse JSON config: {}", e))),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), TripmockError> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TripmockError::Config(format!(
                "Base URL must be http or https: {}",
                self.base_url
            )));
        }

        if self.workers == 0 {
            return Err(TripmockError::Config("Worker count must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Validate, additionally requiring customer credentials for live runs
    pub fn validate_for_checks(&self) -> Result<(), TripmockError> {
        self.validate()?;

        if !self.use_mock && !self.customer.is_complete() {
            return Err(TripmockError::Config(format!(
                "{} and {} are required against the live backend",
                ENV_CUSTOMER_EMAIL, ENV_CUSTOMER_PASSWORD
            )));
        }

        Ok(())
    }

    /// Human-readable target description
    pub fn target(&self) -> String {
        if self.use_mock {
            "in-process mock".to_string()
        } else {
            self.base_url.clone()
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, TripmockError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(TripmockError::Config(format!("Invalid boolean for {}: {}", name, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        let mut env = EnvVars::new();
        for (k, v) in pairs {
            env.set(k, v);
        }
        env
    }

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::from_env(&EnvVars::new()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.use_mock);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.workers, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env() {
        let config = HarnessConfig::from_env(&env(&[
            (ENV_BASE_URL, "https://api.example.com"),
            (ENV_USE_MOCK, "off"),
            (ENV_CUSTOMER_EMAIL, "qa@example.com"),
            (ENV_CUSTOMER_PASSWORD, "S3cret!"),
            (ENV_TIMEOUT, "2s 500ms"),
            (ENV_WORKERS, "2"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com");
        assert!(!config.use_mock);
        assert_eq!(config.customer, Credentials::new("qa@example.com", "S3cret!"));
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.workers, 2);
        assert!(config.validate_for_checks().is_ok());
    }

    #[test]
    fn test_invalid_flag() {
        let result = HarnessConfig::from_env(&env(&[(ENV_USE_MOCK, "maybe")]));
        assert!(matches!(result, Err(TripmockError::Config(_))));
    }

    #[test]
    fn test_invalid_workers() {
        assert!(HarnessConfig::from_env(&env(&[(ENV_WORKERS, "many")])).is_err());

        let config = HarnessConfig::from_env(&env(&[(ENV_WORKERS, "0")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_live_requires_credentials() {
        let config = HarnessConfig::from_env(&env(&[(ENV_USE_MOCK, "false")])).unwrap();
        assert!(config.validate().is_ok());
        let err = config.validate_for_checks().unwrap_err();
        assert!(err.to_string().contains(ENV_CUSTOMER_EMAIL));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = HarnessConfig {
            base_url: "ftp://files.example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = HarnessConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TripmockError::UrlParse(_))));
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
base_url: https://staging.example.com
use_mock: false
timeout: 3s
customer:
  email: qa@example.com
  password: S3cret!
"#;
        let config: HarnessConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.workers, 4);
        assert_eq!(config.customer.password.as_str(), "S3cret!");
    }

    #[test]
    fn test_target() {
        let mut config = HarnessConfig::default();
        assert_eq!(config.target(), "in-process mock");
        config.use_mock = false;
        assert_eq!(config.target(), "http://localhost:8080");
    }
}
