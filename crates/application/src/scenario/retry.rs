//! Bounded retry of failed scenarios

use std::fmt;
use std::str::FromStr;

use restcheck_domain::{Settings, SettingsError};

use crate::error::ScenarioError;

/// Retries granted to a failed scenario when nothing else is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Setting holding the retry budget.
pub const MAX_RETRIES_KEY: &str = "retry.max";
/// Setting selecting which failures are retried.
pub const RETRY_ON_KEY: &str = "retry.on";

/// Which failures consume the retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryOn {
    /// Only transport failures (no response received).
    #[default]
    Transport,
    /// Every failure, assertions included.
    Any,
}

impl RetryOn {
    /// Returns the setting value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for RetryOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetryOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transport" => Ok(Self::Transport),
            "any" => Ok(Self::Any),
            other => Err(format!("expected 'transport' or 'any', got '{other}'")),
        }
    }
}

/// Worker-local retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Failures that are retried.
    pub on: RetryOn,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            on: RetryOn::Transport,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            on: RetryOn::Transport,
        }
    }

    /// Reads `retry.max` and `retry.on`, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is present but malformed.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            max_retries: settings
                .parse(MAX_RETRIES_KEY)?
                .unwrap_or(defaults.max_retries),
            on: settings.parse(RETRY_ON_KEY)?.unwrap_or(defaults.on),
        })
    }

    /// Decides whether to run again after `attempts` tries ended in `error`.
    #[must_use]
    pub const fn should_retry(&self, error: &ScenarioError, attempts: u32) -> bool {
        if attempts > self.max_retries {
            return false;
        }
        match self.on {
            RetryOn::Transport => error.is_transport(),
            RetryOn::Any => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::ports::HttpClientError;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn transport() -> ScenarioError {
        ClientError::Transport(HttpClientError::ConnectionFailed("reset".into())).into()
    }

    fn assertion() -> ScenarioError {
        ScenarioError::Assertion("id mismatch".into())
    }

    #[test]
    fn test_budget_is_bounded() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&transport(), 1));
        assert!(policy.should_retry(&transport(), 2));
        assert!(!policy.should_retry(&transport(), 3));
        assert!(!RetryPolicy::none().should_retry(&transport(), 1));
    }

    #[test]
    fn test_assertions_retry_only_when_asked() {
        let transport_only = RetryPolicy::default();
        assert!(!transport_only.should_retry(&assertion(), 1));

        let any = RetryPolicy {
            on: RetryOn::Any,
            ..RetryPolicy::default()
        };
        assert!(any.should_retry(&assertion(), 1));
    }

    #[test]
    fn test_from_settings() {
        let values = BTreeMap::from([
            ("base.url".to_string(), "http://x".to_string()),
            ("auth.token".to_string(), "t".to_string()),
            ("retry.max".to_string(), "5".to_string()),
            ("retry.on".to_string(), "ANY".to_string()),
        ]);
        let settings = Settings::from_values("qa", values).unwrap();

        assert_eq!(
            RetryPolicy::from_settings(&settings).unwrap(),
            RetryPolicy {
                max_retries: 5,
                on: RetryOn::Any
            }
        );
    }

    #[test]
    fn test_malformed_retry_setting() {
        let values = BTreeMap::from([
            ("base.url".to_string(), "http://x".to_string()),
            ("auth.token".to_string(), "t".to_string()),
            ("retry.on".to_string(), "sometimes".to_string()),
        ]);
        let settings = Settings::from_values("qa", values).unwrap();
        assert!(RetryPolicy::from_settings(&settings).is_err());
    }
}
