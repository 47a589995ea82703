//! Configuration source port

use std::collections::BTreeMap;

use restcheck_domain::settings::SettingsError;
use thiserror::Error;

/// Errors raised while loading configuration. All of them abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No settings exist for the environment.
    #[error("no configuration for environment '{environment}' at {location}")]
    NotFound {
        /// Requested environment.
        environment: String,
        /// Where the source looked.
        location: String,
    },

    /// The source exists but could not be read or parsed.
    #[error("failed to read configuration {location}: {message}")]
    Unreadable {
        /// Where the source looked.
        location: String,
        /// Underlying error.
        message: String,
    },

    /// The values were read but are not usable.
    #[error("invalid configuration for environment '{environment}': {source}")]
    Invalid {
        /// Requested environment.
        environment: String,
        /// Validation failure.
        #[source]
        source: SettingsError,
    },
}

/// Supplies raw key/value settings for a named environment.
pub trait ConfigSource: Send + Sync {
    /// Loads every key of the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` or `ConfigError::Unreadable` when the
    /// settings cannot be obtained.
    fn load(&self, environment: &str) -> Result<BTreeMap<String, String>, ConfigError>;

    /// Describes where settings for `environment` come from, for logs.
    fn describe(&self, environment: &str) -> String;
}
