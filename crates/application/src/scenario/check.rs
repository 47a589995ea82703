//! Assertion helpers for scenario bodies

use std::fmt::Debug;

use restcheck_domain::Response;

use crate::error::{ScenarioError, ScenarioResult};

/// Fails with `message()` unless `condition` holds.
///
/// # Errors
///
/// Returns [`ScenarioError::Assertion`].
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> ScenarioResult {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(message()))
    }
}

/// Fails unless `actual == expected`.
///
/// # Errors
///
/// Returns [`ScenarioError::Assertion`] naming `what`.
pub fn ensure_eq<T>(actual: &T, expected: &T, what: &str) -> ScenarioResult
where
    T: PartialEq + Debug + ?Sized,
{
    ensure(actual == expected, || {
        format!("{what}: expected {expected:?}, got {actual:?}")
    })
}

/// Fails unless the response carries `expected`.
///
/// # Errors
///
/// Returns [`ScenarioError::Assertion`] quoting the status line.
pub fn ensure_status(response: &Response, expected: u16) -> ScenarioResult {
    ensure(response.status == expected, || {
        format!(
            "status code: expected {expected}, got {} {}",
            response.status, response.status_text
        )
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn test_ensure_eq_message() {
        assert!(ensure_eq(&1, &1, "id").is_ok());
        let err = ensure_eq("a", "b", "title").unwrap_err();
        assert_eq!(err.to_string(), r#"assertion failed: title: expected "b", got "a""#);
    }

    #[test]
    fn test_ensure_status() {
        let response = Response::new(404, Vec::new(), Vec::new(), Duration::ZERO);
        assert!(ensure_status(&response, 404).is_ok());
        let err = ensure_status(&response, 200).unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion failed: status code: expected 200, got 404 Not Found"
        );
    }
}
