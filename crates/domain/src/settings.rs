//! Environment settings
//!
//! Typed view over the key/value settings of one environment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::DEFAULT_TIMEOUT_MS;
use crate::response::LogDetail;

/// Key holding the API base URL.
pub const BASE_URL_KEY: &str = "base.url";
/// Key holding the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth.token";
/// Key holding the transport timeout in milliseconds.
pub const TIMEOUT_KEY: &str = "timeout";
/// Key holding how much of each exchange is logged (`all`, `status`, `none`).
pub const LOG_DETAIL_KEY: &str = "log.detail";

/// Settings failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A required key is absent or blank.
    #[error("missing required setting '{0}'")]
    MissingKey(&'static str),

    /// A value could not be parsed.
    #[error("invalid value '{value}' for setting '{key}': {reason}")]
    InvalidValue {
        /// The key.
        key: String,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Immutable settings for one environment.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Environment name the settings were loaded for (e.g. "qa")
    pub environment: String,
    /// Base URL of the API under test
    pub base_url: String,
    /// Bearer token sent with authenticated requests
    pub auth_token: String,
    /// Transport timeout in milliseconds
    pub timeout_ms: u64,
    /// Logging verbosity of the default response spec
    #[serde(default)]
    pub log_detail: LogDetail,
    values: BTreeMap<String, String>,
}

impl Settings {
    /// Validates raw key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if `base.url` or `auth.token` is missing or blank, or
    /// if `timeout` is not a non-negative integer.
    pub fn from_values(
        environment: impl Into<String>,
        values: BTreeMap<String, String>,
    ) -> Result<Self, SettingsError> {
        let required = |key: &'static str| {
            values
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(SettingsError::MissingKey(key))
        };

        let base_url = required(BASE_URL_KEY)?;
        let auth_token = required(AUTH_TOKEN_KEY)?;
        let timeout_ms = match values.get(TIMEOUT_KEY).map(|v| v.trim()) {
            None | Some("") => DEFAULT_TIMEOUT_MS,
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| {
                SettingsError::InvalidValue {
                    key: TIMEOUT_KEY.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                }
            })?,
        };

        let log_detail = match values.get(LOG_DETAIL_KEY).map(|v| v.trim()) {
            None | Some("") => LogDetail::default(),
            Some(raw) => raw.parse().map_err(|reason| SettingsError::InvalidValue {
                key: LOG_DETAIL_KEY.to_string(),
                value: raw.to_string(),
                reason,
            })?,
        };

        Ok(Self {
            environment: environment.into(),
            base_url,
            auth_token,
            timeout_ms,
            log_detail,
            values,
        })
    }

    /// Returns a raw value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parses an optional value.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is present but does not parse as `T`.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, SettingsError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim().parse().map_err(|e: T::Err| SettingsError::InvalidValue {
                    key: key.to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("auth_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("log_detail", &self.log_detail)
            .finish_non_exhaustive()
    }
}
