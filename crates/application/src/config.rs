//! Configuration provider
//!
//! Loads the settings of one environment on first access and shares them,
//! immutable, with every worker.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use restcheck_domain::Settings;
use tracing::{debug, info};

use crate::ports::{ConfigError, ConfigSource};

/// Environment used when none is selected.
pub const DEFAULT_ENVIRONMENT: &str = "qa";

/// Lazily loaded, process-wide settings for one environment.
pub struct ConfigProvider {
    environment: String,
    source: Arc<dyn ConfigSource>,
    cached: RwLock<Option<Arc<Settings>>>,
}

impl ConfigProvider {
    /// Creates a provider for `environment`. Nothing is read until the first
    /// call to [`ConfigProvider::settings`] or [`ConfigProvider::get`].
    pub fn new(environment: impl Into<String>, source: Arc<dyn ConfigSource>) -> Self {
        Self {
            environment: environment.into(),
            source,
            cached: RwLock::new(None),
        }
    }

    /// The selected environment name.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Returns the settings, loading them if this is the first access since
    /// creation or the last [`ConfigProvider::clear`].
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing, unreadable or incomplete.
    pub fn settings(&self) -> Result<Arc<Settings>, ConfigError> {
        if let Some(settings) = self.cached.read().as_ref() {
            return Ok(Arc::clone(settings));
        }

        let mut slot = self.cached.write();
        if let Some(settings) = slot.as_ref() {
            return Ok(Arc::clone(settings));
        }

        info!(
            environment = %self.environment,
            location = %self.source.describe(&self.environment),
            "loading configuration"
        );
        let values = self.source.load(&self.environment)?;
        let settings = Settings::from_values(&self.environment, values).map_err(|source| {
            ConfigError::Invalid {
                environment: self.environment.clone(),
                source,
            }
        })?;

        let settings = Arc::new(settings);
        *slot = Some(Arc::clone(&settings));
        Ok(settings)
    }

    /// Returns a raw value by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded.
    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        Ok(self.settings()?.get(key).map(str::to_string))
    }

    /// Returns true if settings are currently cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cached.read().is_some()
    }

    /// Drops the cached settings; the next access reloads them.
    pub fn clear(&self) {
        if self.cached.write().take().is_some() {
            debug!(environment = %self.environment, "configuration cache cleared");
        }
    }
}

impl std::fmt::Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigProvider")
            .field("environment", &self.environment)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}

/// Settings supplied in code, keyed by environment.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    environments: BTreeMap<String, BTreeMap<String, String>>,
}

impl StaticConfigSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the settings for one environment.
    #[must_use]
    pub fn with_environment<K, V>(
        mut self,
        environment: impl Into<String>,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.environments.insert(
            environment.into(),
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

impl ConfigSource for StaticConfigSource {
    fn load(&self, environment: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        self.environments
            .get(environment)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound {
                environment: environment.to_string(),
                location: self.describe(environment),
            })
    }

    fn describe(&self, environment: &str) -> String {
        format!("<static:{environment}>")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        inner: StaticConfigSource,
        loads: AtomicUsize,
    }

    impl ConfigSource for CountingSource {
        fn load(&self, environment: &str) -> Result<BTreeMap<String, String>, ConfigError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(environment)
        }

        fn describe(&self, environment: &str) -> String {
            self.inner.describe(environment)
        }
    }

    fn counting() -> Arc<CountingSource> {
        Arc::new(CountingSource {
            inner: StaticConfigSource::new().with_environment(
                "qa",
                [
                    ("base.url", "https://gorest.co.in"),
                    ("auth.token", "token"),
                    ("timeout", "5000"),
                ],
            ),
            loads: AtomicUsize::new(0),
        })
    }

    #[test]
    fn test_loads_once_until_cleared() {
        let source = counting();
        let provider = ConfigProvider::new("qa", source.clone());
        assert!(!provider.is_loaded());

        assert_eq!(provider.settings().unwrap().timeout_ms, 5000);
        assert_eq!(
            provider.get("base.url").unwrap().as_deref(),
            Some("https://gorest.co.in")
        );
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        provider.clear();
        assert!(!provider.is_loaded());
        provider.settings().unwrap();
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_environment_is_an_error() {
        let provider = ConfigProvider::new("prod", counting());
        let err = provider.settings().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { environment, .. } if environment == "prod"));
        assert!(!provider.is_loaded());
    }

    #[test]
    fn test_incomplete_settings_are_invalid() {
        let source = StaticConfigSource::new().with_environment("qa", [("base.url", "http://x")]);
        let provider = ConfigProvider::new("qa", Arc::new(source));
        let err = provider.settings().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("auth.token"));
    }
}
