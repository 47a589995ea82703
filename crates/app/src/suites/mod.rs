//! Scenario suites for the users and products resources.

pub mod product;
pub mod user;

use restcheck_application::ScenarioError;

/// Builds the error for a required value missing from a response.
pub(crate) fn missing(what: &str) -> ScenarioError {
    ScenarioError::Assertion(format!("{what} should not be null"))
}
