use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use dax_registry::DispatcherConfig;

use crate::error::ConfigError;

/// Top-level configuration.
///
/// Every field has a default, so a config file only needs the settings it
/// changes:
///
/// ```toml
/// log_level = "dax_registry=debug,info"
///
/// [dispatcher]
/// guards_enabled = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaxConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Register the built-in host processors.
    pub register_builtins: bool,
    pub dispatcher: DispatcherConfig,
}

impl Default for DaxConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            register_builtins: true,
            dispatcher: DispatcherConfig::default(),
        }
    }
}

impl DaxConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Check settings that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.log_level).map_err(|err| ConfigError::LogLevel {
            level: self.log_level.clone(),
            message: err.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_is_default() {
        let config = DaxConfig::from_toml_str("").unwrap();
        assert_eq!(config, DaxConfig::default());
        assert!(config.register_builtins);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn nested_dispatcher_table() {
        let config = DaxConfig::from_toml_str(
            r#"
            log_level = "debug"
            register_builtins = false

            [dispatcher]
            guards_enabled = false
            value_cache_capacity = 8
            "#,
        )
        .unwrap();
        assert!(!config.register_builtins);
        assert!(!config.dispatcher.guards_enabled);
        assert_eq!(config.dispatcher.value_cache_capacity, 8);
        assert!(!config.dispatcher.allow_late_registration);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = DaxConfig::from_toml_str("register_builtins = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = DaxConfig::from_toml_str("log_level = \"dax=notalevel\"").unwrap_err();
        assert!(matches!(err, ConfigError::LogLevel { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DaxConfig::load("/nonexistent/dax.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, Path::new("/nonexistent/dax.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serializes_back_to_toml() {
        let text = toml::to_string(&DaxConfig::default()).unwrap();
        assert!(text.contains("register_builtins = true"));
        assert_eq!(DaxConfig::from_toml_str(&text).unwrap(), DaxConfig::default());
    }
}
