//! Response assertions
//!
//! Field paths are dot-separated; numeric segments index into arrays
//! (`tours.0.id`).

use serde_json::Value;

use crate::client::ApiResponse;
use crate::mock::responder::is_truthy;

/// Represents an assertion to check against a response
#[derive(Debug, Clone)]
pub enum Assertion {
    /// Status must be one of the listed codes
    Status(Vec<u16>),
    /// Field equals a JSON value
    Equals(String, Value),
    /// Field is present and truthy
    Truthy(String),
    /// Field is an array of the given length
    Length(String, usize),
    /// Some element of an array has `field == value`
    AnyElement { array: String, field: String, value: Value },
}

impl Assertion {
    pub fn status(expected: &[u16]) -> Self {
        Assertion::Status(expected.to_vec())
    }

    pub fn equals(path: &str, value: impl Into<Value>) -> Self {
        Assertion::Equals(path.to_string(), value.into())
    }

    pub fn truthy(path: &str) -> Self {
        Assertion::Truthy(path.to_string())
    }

    pub fn length(path: &str, len: usize) -> Self {
        Assertion::Length(path.to_string(), len)
    }

    pub fn any_element(array: &str, field: &str, value: impl Into<Value>) -> Self {
        Assertion::AnyElement {
            array: array.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}

/// Result of an assertion check
#[derive(Debug, Clone)]
pub struct AssertionResult {
    pub assertion: String,
    pub passed: bool,
    pub message: String,
}

impl AssertionResult {
    pub fn pass(assertion: &str, message: &str) -> Self {
        Self {
            assertion: assertion.to_string(),
            passed: true,
            message: message.to_string(),
        }
    }

    pub fn fail(assertion: &str, message: &str) -> Self {
        Self {
            assertion: assertion.to_string(),
            passed: false,
            message: message.to_string(),
        }
    }
}

/// Check all assertions against a response
pub fn check_assertions(assertions: &[Assertion], response: &ApiResponse) -> Vec<AssertionResult> {
    assertions
        .iter()
        .map(|assertion| match assertion {
            Assertion::Status(expected) => check_status(response.status(), expected),
            Assertion::Equals(path, value) => check_equals(response.body(), path, value),
            Assertion::Truthy(path) => check_truthy(response.body(), path),
            Assertion::Length(path, len) => check_length(response.body(), path, *len),
            Assertion::AnyElement { array, field, value } => {
                check_any_element(response.body(), array, field, value)
            }
        })
        .collect()
}

/// Resolve a dot path inside a JSON value
pub fn lookup<'a>(body: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(body);
    }
    path.split('.').try_fold(body, |current, segment| match current {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

fn check_status(status: u16, expected: &[u16]) -> AssertionResult {
    let list = expected.iter().map(u16::to_string).collect::<Vec<_>>().join("|");
    let assertion = format!("status={}", list);

    if expected.contains(&status) {
        AssertionResult::pass(&assertion, &format!("Status {} matches", status))
    } else {
        AssertionResult::fail(&assertion, &format!("Expected {}, got {}", list, status))
    }
}

fn check_equals(body: &Value, path: &str, expected: &Value) -> AssertionResult {
    let assertion = format!("{}={}", path, expected);

    match lookup(body, path) {
        Some(actual) if actual == expected => AssertionResult::pass(&assertion, &format!("{} = {}", path, actual)),
        Some(actual) => AssertionResult::fail(&assertion, &format!("{} = {} (expected {})", path, actual, expected)),
        None => AssertionResult::fail(&assertion, &format!("{} not found", path)),
    }
}

fn check_truthy(body: &Value, path: &str) -> AssertionResult {
    let assertion = format!("{} is set", path);

    match lookup(body, path) {
        Some(value) if is_truthy(value) => AssertionResult::pass(&assertion, &format!("{} = {}", path, value)),
        Some(value) => AssertionResult::fail(&assertion, &format!("{} is falsy: {}", path, value)),
        None => AssertionResult::fail(&assertion, &format!("{} not found", path)),
    }
}

fn check_length(body: &Value, path: &str, expected: usize) -> AssertionResult {
    let assertion = format!("len({})={}", path, expected);

    match lookup(body, path) {
        Some(Value::Array(items)) if items.len() == expected => {
            AssertionResult::pass(&assertion, &format!("{} has {} items", path, expected))
        }
        Some(Value::Array(items)) => AssertionResult::fail(
            &assertion,
            &format!("{} has {} items (expected {})", path, items.len(), expected),
        ),
        Some(other) => AssertionResult::fail(&assertion, &format!("{} is not an array: {}", path, other)),
        None => AssertionResult::fail(&assertion, &format!("{} not found", path)),
    }
}

fn check_any_element(body: &Value, array: &str, field: &str, expected: &Value) -> AssertionResult {
    let assertion = format!("{}[*].{}={}", array, field, expected);

    match lookup(body, array) {
        Some(Value::Array(items)) => {
            if items.iter().any(|item| lookup(item, field) == Some(expected)) {
                AssertionResult::pass(&assertion, &format!("{} contains {}={}", array, field, expected))
            } else {
                AssertionResult::fail(&assertion, &format!("No element of {} has {}={}", array, field, expected))
            }
        }
        Some(other) => AssertionResult::fail(&assertion, &format!("{} is not an array: {}", array, other)),
        None => AssertionResult::fail(&assertion, &format!("{} not found", array)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn listing() -> ApiResponse {
        ApiResponse::new(
            200,
            json!({
                "totalItems": 2,
                "tours": [{"id": "T-0001"}, {"id": "T-0002"}],
                "empty": "",
            }),
        )
    }

    #[test]
    fn test_lookup() {
        let body = listing().body().clone();
        assert_eq!(lookup(&body, "tours.1.id"), Some(&json!("T-0002")));
        assert_eq!(lookup(&body, "tours.5.id"), None);
        assert_eq!(lookup(&body, "totalItems.x"), None);
        assert_eq!(lookup(&body, ""), Some(&body));
    }

    #[test]
    fn test_status_membership() {
        let response = ApiResponse::new(401, Value::Null);
        let results = check_assertions(&[Assertion::status(&[400, 401])], &response);
        assert!(results[0].passed);

        let results = check_assertions(&[Assertion::status(&[200])], &response);
        assert!(!results[0].passed);
        assert_eq!(results[0].message, "Expected 200, got 401");
    }

    #[test]
    fn test_field_assertions() {
        let results = check_assertions(
            &[
                Assertion::equals("totalItems", 2),
                Assertion::length("tours", 2),
                Assertion::any_element("tours", "id", "T-0001"),
                Assertion::truthy("tours.0.id"),
            ],
            &listing(),
        );
        assert!(results.iter().all(|r| r.passed), "{:?}", results);
    }

    #[test]
    fn test_field_failures() {
        let results = check_assertions(
            &[
                Assertion::equals("totalItems", 3),
                Assertion::length("totalItems", 2),
                Assertion::any_element("tours", "id", "T-9999"),
                Assertion::truthy("empty"),
                Assertion::truthy("missing"),
            ],
            &listing(),
        );
        assert!(results.iter().all(|r| !r.passed), "{:?}", results);
        assert_eq!(results[4].message, "missing not found");
    }
}
