//! Configuration loading from disk.

use super::schema::RuntimeConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid setting {key}: {source}")]
    Setting {
        key: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RuntimeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    RuntimeConfig::from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/component-runtime.toml");
        match load_config(path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "component-runtime-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.log_level, "debug");
    }
}
