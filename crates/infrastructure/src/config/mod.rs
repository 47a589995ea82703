//! Configuration sources backed by files and the process environment.

mod properties_source;

pub use properties_source::{ENV_PREFIX, OVERRIDABLE_KEYS, PropertiesFileSource, env_var_for};
