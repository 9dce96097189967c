use std::fmt;

use serde::{Deserialize, Serialize};

/// A string that redacts its value in Debug output to prevent credential leakage
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "SecretString(\"\")")
        } else {
            write!(f, "SecretString(\"[REDACTED]\")")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "")
        } else {
            write!(f, "[REDACTED]")
        }
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_output() {
        let secret = SecretString::from("hunter2");
        assert_eq!(format!("{:?}", secret), "SecretString(\"[REDACTED]\")");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.as_str(), "hunter2");
    }

    #[test]
    fn test_empty_not_redacted() {
        let secret = SecretString::default();
        assert!(secret.is_empty());
        assert_eq!(format!("{:?}", secret), "SecretString(\"\")");
    }
}
