//! `.properties` configuration files
//!
//! Settings for environment `<env>` live in `<dir>/config-<env>.properties`.
//! Selected keys can be replaced through `RESTCHECK_*` environment variables.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use restcheck_application::ports::{ConfigError, ConfigSource};
use restcheck_domain::settings::{AUTH_TOKEN_KEY, BASE_URL_KEY, LOG_DETAIL_KEY, TIMEOUT_KEY};
use tracing::debug;

/// Prefix of environment variables that override file values.
pub const ENV_PREFIX: &str = "RESTCHECK_";

/// Keys that may be overridden from the environment.
pub const OVERRIDABLE_KEYS: &[&str] = &[
    BASE_URL_KEY,
    AUTH_TOKEN_KEY,
    TIMEOUT_KEY,
    LOG_DETAIL_KEY,
    "retry.max",
    "retry.on",
];

/// Environment variable overriding `key`: `base.url` becomes
/// `RESTCHECK_BASE_URL`.
#[must_use]
pub fn env_var_for(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

/// Reads `config-<env>.properties` from a directory.
#[derive(Debug, Clone)]
pub struct PropertiesFileSource {
    dir: PathBuf,
    overrides: BTreeMap<String, String>,
}

impl PropertiesFileSource {
    /// Creates a source rooted at `dir`, without overrides.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: BTreeMap::new(),
        }
    }

    /// Applies overrides from the current process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// Applies overrides from `(variable, value)` pairs; only the variables
    /// named by [`env_var_for`] over [`OVERRIDABLE_KEYS`] are considered.
    #[must_use]
    pub fn with_overrides_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let wanted: BTreeMap<String, &str> = OVERRIDABLE_KEYS
            .iter()
            .map(|key| (env_var_for(key), *key))
            .collect();

        for (var, value) in vars {
            if let Some(key) = wanted.get(&var) {
                debug!(variable = %var, key, "configuration override from environment");
                self.overrides.insert((*key).to_string(), value);
            }
        }
        self
    }

    /// Replaces one key regardless of the file.
    #[must_use]
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Directory holding the property files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File read for `environment`.
    #[must_use]
    pub fn path_for(&self, environment: &str) -> PathBuf {
        self.dir.join(format!("config-{environment}.properties"))
    }
}

impl ConfigSource for PropertiesFileSource {
    fn load(&self, environment: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let path = self.path_for(environment);
        let location = path.display().to_string();

        let file = File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    environment: environment.to_string(),
                    location: location.clone(),
                }
            } else {
                ConfigError::Unreadable {
                    location: location.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        let mut values: BTreeMap<String, String> = java_properties::read(BufReader::new(file))
            .map_err(|e| ConfigError::Unreadable {
                location: location.clone(),
                message: e.to_string(),
            })?
            .into_iter()
            .collect();

        debug!(path = %location, keys = values.len(), "configuration file read");
        values.extend(self.overrides.clone());
        Ok(values)
    }

    fn describe(&self, environment: &str) -> String {
        self.path_for(environment).display().to_string()
    }
}
