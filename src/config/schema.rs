//! Configuration schema definitions.

use super::loader::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration of a component system.
///
/// ```toml
/// log_level = "debug"
/// startup_timeout_ms = 5000
///
/// [components.cache]
/// enabled = true
/// warm_keys = ["alice", "bob"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Upper bound on construction plus loading. `None` waits forever.
    pub startup_timeout_ms: Option<u64>,

    /// Per-component sections, keyed by component name.
    pub components: HashMap<String, ComponentConfig>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            startup_timeout_ms: None,
            components: HashMap::new(),
        }
    }
}

impl RuntimeConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Components without a section are enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.components.get(name).is_none_or(|c| c.enabled)
    }

    pub fn startup_timeout(&self) -> Option<Duration> {
        self.startup_timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".to_string()));
        }
        if self.startup_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "startup_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// One `[components.<name>]` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Every other key of the section, read by the component itself.
    #[serde(flatten)]
    pub settings: toml::Table,
}

fn default_enabled() -> bool {
    true
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            settings: toml::Table::new(),
        }
    }
}

impl ComponentConfig {
    /// Reads setting `key` as a `T`. A missing key is `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        let Some(value) = self.settings.get(key) else {
            return Ok(None);
        };
        value
            .clone()
            .try_into()
            .map(Some)
            .map_err(|source| ConfigError::Setting {
                key: key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.startup_timeout().is_none());
        assert!(config.is_enabled("anything"));
    }

    #[test]
    fn test_component_sections() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            startup_timeout_ms = 1500

            [components.cache]
            enabled = false

            [components.greeter]
            greeting = "Hi"
            "#,
        )
        .unwrap();

        assert_eq!(config.startup_timeout(), Some(Duration::from_millis(1500)));
        assert!(!config.is_enabled("cache"));
        assert!(config.is_enabled("greeter"));

        let greeter = &config.components["greeter"];
        assert_eq!(greeter.get::<String>("greeting").unwrap().as_deref(), Some("Hi"));
        assert_eq!(greeter.get::<String>("missing").unwrap(), None);
        assert!(!greeter.settings.contains_key("enabled"));
    }

    #[test]
    fn test_setting_with_wrong_type() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [components.greeter]
            greeting = 42
            "#,
        )
        .unwrap();

        let result = config.components["greeter"].get::<String>("greeting");
        assert!(matches!(result, Err(ConfigError::Setting { key, .. }) if key == "greeting"));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let result = RuntimeConfig::from_toml_str("startup_timeout_ms = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_blank_log_level_is_invalid() {
        let result = RuntimeConfig::from_toml_str("log_level = \" \"");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_document() {
        let result = RuntimeConfig::from_toml_str("log_level = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
