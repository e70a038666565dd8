//! Core configuration file.
//!
//! # Responsibility
//! - Load the JSON configuration used by executables embedding the core.
//! - Write a default file on first run.
//!
//! # Invariants
//! - Files carry `"schema": 1`; any other schema is rejected.
//! - Relative `databasePath` values resolve against the config file directory.
//! - `logDir`, when set, is absolute.

use crate::logging::{default_log_level, normalize_level};
use crate::view::progress::DEFAULT_RECENT_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_SCHEMA: u64 = 1;
const DEFAULT_DATABASE_FILE: &str = "taskdeck.sqlite3";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing schema in {}", .0.display())]
    MissingSchema(PathBuf),
    #[error("unsupported schema {schema} in {}", path.display())]
    UnsupportedSchema { schema: u64, path: PathBuf },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub schema: u64,
    pub log_level: String,
    /// Absolute directory for rolling logs; logging stays off when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    pub database_path: PathBuf,
    pub recent_completed_limit: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            schema: CONFIG_SCHEMA,
            log_level: default_log_level().to_string(),
            log_dir: None,
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            recent_completed_limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.recent_completed_limit == 0 {
            return Err(ConfigError::Invalid(
                "recentCompletedLimit must be > 0".to_string(),
            ));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "databasePath must not be empty".to_string(),
            ));
        }
        if let Some(log_dir) = &self.log_dir {
            if !log_dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "logDir must be absolute, got `{}`",
                    log_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Database location, resolving relative paths against `config_path`'s directory.
    pub fn resolve_database_path(&self, config_path: &Path) -> PathBuf {
        if self.database_path.is_absolute() {
            return self.database_path.clone();
        }
        config_path
            .parent()
            .map(|dir| dir.join(&self.database_path))
            .unwrap_or_else(|| self.database_path.clone())
    }
}

/// Writes the default configuration when `path` does not exist yet.
pub fn ensure_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let formatted = serde_json::to_string_pretty(&CoreConfig::default())?;
    fs::write(path, format!("{formatted}\n"))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<CoreConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| ConfigError::MissingSchema(path.to_path_buf()))?;
    if schema != CONFIG_SCHEMA {
        return Err(ConfigError::UnsupportedSchema {
            schema,
            path: path.to_path_buf(),
        });
    }

    let config: CoreConfig = serde_json::from_value(parsed)?;
    config.validate()?;
    Ok(config)
}
