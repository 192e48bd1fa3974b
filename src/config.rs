//! Planner configuration: store connection, table names, fetch limits.
//!
//! Loaded from a TOML file (default `$XDG_CONFIG_HOME/telos/config.toml`)
//! with `TELOS_BASE_URL` / `TELOS_API_KEY` environment overrides so
//! credentials can stay out of the file.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreConfig;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(
        code(telos::config::read),
        help("Check that the file exists and is readable, or pass --config with the right path.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    #[diagnostic(
        code(telos::config::parse),
        help("The file must be valid TOML with optional [store] and [tables] sections.")
    )]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("no API key configured")]
    #[diagnostic(
        code(telos::config::missing_api_key),
        help("Set `api_key` under [store] in the config file, or export TELOS_API_KEY.")
    )]
    MissingApiKey,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Names of the five planner tables in the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub objectives: String,
    pub key_results: String,
    pub tasks: String,
    pub habits: String,
    pub habit_tracking: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            objectives: "Objectives".to_string(),
            key_results: "Key Results".to_string(),
            tasks: "Tasks".to_string(),
            habits: "Habits".to_string(),
            habit_tracking: "Habit Tracking".to_string(),
        }
    }
}

/// Full planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub store: StoreConfig,
    pub tables: TableNames,
    /// Default per-table fetch cap. The tracking table uses its own higher
    /// cap, see [`crate::store::TRACKING_FETCH_LIMIT`].
    pub fetch_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            tables: TableNames::default(),
            fetch_limit: 1000,
        }
    }
}

impl PlannerConfig {
    /// Default config file location, XDG-style with a `~/.config` fallback.
    pub fn default_path() -> PathBuf {
        std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|base| base.join("telos").join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("telos.toml"))
    }

    /// Load configuration.
    ///
    /// An explicitly given path must exist; the default path is optional and
    /// falls back to defaults when absent. Environment overrides are applied
    /// after file parsing either way.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        let config = if path.is_file() || required {
            let content =
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TELOS_BASE_URL") {
            self.store.base_url = url;
        }
        if let Ok(key) = std::env::var("TELOS_API_KEY") {
            self.store.api_key = key;
        }
        self
    }

    /// Fail early when no shared secret is configured anywhere.
    pub fn require_api_key(&self) -> ConfigResult<()> {
        if self.store.api_key.is_empty() {
            Err(ConfigError::MissingApiKey)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_all_tables() {
        let config = PlannerConfig::default();
        assert_eq!(config.tables.objectives, "Objectives");
        assert_eq!(config.tables.key_results, "Key Results");
        assert_eq!(config.tables.habit_tracking, "Habit Tracking");
        assert_eq!(config.fetch_limit, 1000);
    }

    #[test]
    fn load_parses_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            fetch_limit = 250

            [store]
            base_url = "https://records.example.com"
            api_key = "s3cret"

            [tables]
            habit_tracking = "Habit Log"
            "#
        )
        .unwrap();

        let config = PlannerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.store.base_url, "https://records.example.com");
        assert_eq!(config.fetch_limit, 250);
        assert_eq!(config.tables.habit_tracking, "Habit Log");
        // Unspecified tables keep their defaults.
        assert_eq!(config.tables.tasks, "Tasks");
    }

    #[test]
    fn load_rejects_missing_explicit_path() {
        let result = PlannerConfig::load(Some(Path::new("/nonexistent/telos.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not toml [").unwrap();
        let result = PlannerConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn require_api_key_rejects_empty() {
        let config = PlannerConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingApiKey)
        ));

        let mut config = PlannerConfig::default();
        config.store.api_key = "k".to_string();
        assert!(config.require_api_key().is_ok());
    }
}
