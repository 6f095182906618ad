// Configuration loading and parsing (config/rotolab.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::DataSource;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("could not determine a data directory for the session database")]
    NoDataDir,
}

/// Application configuration. Every field has a sensible default; the config
/// file itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite session database. Empty means "use the platform
    /// data directory" (resolved by [`Config::db_path`]).
    pub db_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Source assumed when the CLI is invoked without `--source`.
    pub source: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            source: "ETR".into(),
        }
    }
}

impl Config {
    /// The default source as a typed value. Validated at load time, so the
    /// fallback arm is unreachable after `load_config_from` has returned.
    pub fn default_source(&self) -> DataSource {
        self.defaults.source.parse().unwrap_or(DataSource::Etr)
    }

    /// Resolve the session database path: explicit config value if present,
    /// otherwise the platform data directory.
    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        if !self.storage.db_path.is_empty() {
            return Ok(PathBuf::from(&self.storage.db_path));
        }
        let dirs =
            directories::ProjectDirs::from("", "", "rotolab").ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().join("session.db"))
    }
}

/// Load configuration from `config/rotolab.toml` under `base_dir`. A missing
/// file yields the defaults; a present-but-malformed file is an error.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("rotolab.toml");
    if !path.exists() {
        return Ok(Config::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    load_config_from(&cwd)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.defaults.source.parse::<DataSource>().is_err() {
        return Err(ConfigError::ValidationError {
            field: "defaults.source".into(),
            message: format!(
                "unknown source '{}' (expected ETR or UA)",
                config.defaults.source
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: temp base dir with an optional config file, cleaned up by the
    /// caller.
    fn temp_base(tag: &str, contents: Option<&str>) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rotolab_cfg_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("config")).unwrap();
        if let Some(text) = contents {
            std::fs::write(dir.join("config").join("rotolab.toml"), text).unwrap();
        }
        dir
    }

    #[test]
    fn defaults_when_file_absent() {
        let dir = temp_base("none", None);
        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.default_source(), DataSource::Etr);
        assert!(config.storage.db_path.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn parses_explicit_values() {
        let dir = temp_base(
            "full",
            Some("[storage]\ndb_path = \"/tmp/rotolab-test.db\"\n\n[defaults]\nsource = \"ua\"\n"),
        );
        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.default_source(), DataSource::Ua);
        assert_eq!(
            config.db_path().unwrap(),
            PathBuf::from("/tmp/rotolab-test.db")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_source_rejected() {
        let dir = temp_base("bad", Some("[defaults]\nsource = \"razzball\"\n"));
        let err = load_config_from(&dir).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = temp_base("partial", Some("[storage]\n"));
        let config = load_config_from(&dir).unwrap();
        assert_eq!(config.default_source(), DataSource::Etr);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
