//! .env file loading and variable expansion
//!
//! Values may reference other variables as `{{NAME}}` or `{{NAME:-default}}`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TripmockError;

static EXPAND_VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}\}").expect("Invalid expand regex")
});

/// Environment variable store
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the process environment
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Load from a .env file
    pub fn load_file(path: &Path) -> Result<Self, TripmockError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TripmockError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Load `.env` from the working directory if there is one
    pub fn try_load_default() -> Result<Self, TripmockError> {
        let env_path = Path::new(".env");
        if env_path.exists() {
            Self::load_file(env_path)
        } else {
            Ok(Self::new())
        }
    }

    /// Parse .env content, expanding references against earlier lines and
    /// the process environment
    pub fn parse(content: &str) -> Result<Self, TripmockError> {
        Self::parse_with_base(content, &Self::from_env())
    }

    /// Parse .env content, expanding references against earlier lines and
    /// `base`. A name set in both resolves to the `base` value, matching the
    /// precedence of [`EnvVars::merge`].
    pub fn parse_with_base(content: &str, base: &EnvVars) -> Result<Self, TripmockError> {
        let mut env = Self::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = parse_env_line(line).ok_or_else(|| {
                TripmockError::Config(format!("Invalid .env syntax at line {}: {}", line_num + 1, line))
            })?;
            let value = expand_with(&value, |name| base.get(name).or_else(|| env.get(name)))?;
            env.vars.insert(key, value);
        }

        Ok(env)
    }

    /// Merge with another EnvVars (other takes precedence)
    pub fn merge(&mut self, other: &EnvVars) {
        for (key, value) in &other.vars {
            self.vars.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a variable, treating blank values as unset
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// Parse a single .env line into a key-value pair
fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value_part) = line.split_once('=')?;
    let key = key.trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let value_part = value_part.trim();
    let value = if value_part.len() >= 2 && value_part.starts_with('"') && value_part.ends_with('"') {
        unescape_double_quoted(&value_part[1..value_part.len() - 1])
    } else if value_part.len() >= 2 && value_part.starts_with('\'') && value_part.ends_with('\'') {
        value_part[1..value_part.len() - 1].to_string()
    } else {
        match value_part.find(" #") {
            Some(pos) => value_part[..pos].trim().to_string(),
            None => value_part.to_string(),
        }
    };

    Some((key.to_string(), value))
}

fn unescape_double_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}

/// Expand `{{variable}}` syntax, failing on undefined names without a default
fn expand_with<'a, F>(input: &str, lookup: F) -> Result<String, TripmockError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut missing = Vec::new();

    let expanded = EXPAND_VAR_RE.replace_all(input, |cap: &regex::Captures<'_>| {
        let name = &cap[1];
        match (lookup(name), cap.get(2)) {
            (Some(value), _) => value.to_string(),
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                missing.push(name.to_string());
                cap[0].to_string()
            }
        }
    });

    if !missing.is_empty() {
        return Err(TripmockError::Config(format!(
            "Undefined environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let env = EnvVars::parse("API_BASE_URL=http://localhost:3000").unwrap();
        assert_eq!(env.get("API_BASE_URL"), Some("http://localhost:3000"));
    }

    #[test]
    fn test_parse_quoted_and_export() {
        let content = "export CUSTOMER_EMAIL=\"jane@example.com\"\nCUSTOMER_PASSWORD='p#ss word'";
        let env = EnvVars::parse(content).unwrap();
        assert_eq!(env.get("CUSTOMER_EMAIL"), Some("jane@example.com"));
        assert_eq!(env.get("CUSTOMER_PASSWORD"), Some("p#ss word"));
    }

    #[test]
    fn test_parse_comments() {
        let content = "# QA settings\nUSE_MOCK_API=false # live run\nTEST_WORKERS=4\n";
        let env = EnvVars::parse(content).unwrap();
        assert_eq!(env.get("USE_MOCK_API"), Some("false"));
        assert_eq!(env.get("TEST_WORKERS"), Some("4"));
    }

    #[test]
    fn test_parse_escape_sequences() {
        let env = EnvVars::parse(r#"GREETING="line1\nline2""#).unwrap();
        assert_eq!(env.get("GREETING"), Some("line1\nline2"));
    }

    #[test]
    fn test_parse_invalid_line() {
        let err = EnvVars::parse("JUST_A_WORD").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_expand_references_earlier_lines() {
        let content = "HOST=api.example.com\nAPI_BASE_URL=https://{{HOST}}/v1\n";
        let env = EnvVars::parse(content).unwrap();
        assert_eq!(env.get("API_BASE_URL"), Some("https://api.example.com/v1"));
    }

    #[test]
    fn test_expand_references_base_environment() {
        let mut base = EnvVars::new();
        base.set("QA_HOST", "staging.example.com");

        let env = EnvVars::parse_with_base("API_BASE_URL=https://{{QA_HOST}}/v1", &base).unwrap();
        assert_eq!(env.get("API_BASE_URL"), Some("https://staging.example.com/v1"));
        assert_eq!(env.get("QA_HOST"), None);
    }

    #[test]
    fn test_base_environment_wins_over_file_line() {
        let mut base = EnvVars::new();
        base.set("QA_HOST", "from-shell");

        let env = EnvVars::parse_with_base("QA_HOST=from-file\nURL=http://{{QA_HOST}}", &base).unwrap();
        assert_eq!(env.get("URL"), Some("http://from-shell"));
    }

    #[test]
    fn test_parse_sees_process_environment() {
        std::env::set_var("TRIPMOCK_ENV_TEST_HOST", "api.internal");
        let env = EnvVars::parse("API_BASE_URL=https://{{TRIPMOCK_ENV_TEST_HOST}}/v1").unwrap();
        assert_eq!(env.get("API_BASE_URL"), Some("https://api.internal/v1"));
    }

    #[test]
    fn test_expand_with_default() {
        let result = expand_with("{{PORT:-8080}}", |_| None).unwrap();
        assert_eq!(result, "8080");
    }

    #[test]
    fn test_expand_missing_error() {
        let result = expand_with("Hello {{MISSING}}", |_| None);
        assert!(matches!(result, Err(TripmockError::Config(msg)) if msg.contains("MISSING")));
    }

    #[test]
    fn test_get_non_empty() {
        let mut env = EnvVars::new();
        env.set("BLANK", "  ");
        env.set("SET", "x");
        assert_eq!(env.get_non_empty("BLANK"), None);
        assert_eq!(env.get_non_empty("SET"), Some("x"));
    }

    #[test]
    fn test_merge_precedence() {
        let mut base = EnvVars::parse("A=file\nB=file").unwrap();
        let mut overrides = EnvVars::new();
        overrides.set("B", "process");
        base.merge(&overrides);
        assert_eq!(base.get("A"), Some("file"));
        assert_eq!(base.get("B"), Some("process"));
    }
}
