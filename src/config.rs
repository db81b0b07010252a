//! Configuration with file persistence and environment overrides

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{RecordError, Result};

pub const CONFIG_DIR_VAR: &str = "RECORDS_CONFIG_DIR";
pub const DB_PATH_VAR: &str = "RECORDS_DB_PATH";
pub const BIND_VAR: &str = "RECORDS_BIND";
pub const LOG_VAR: &str = "RECORDS_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding every record
    pub database_path: PathBuf,
    /// Address the JSON API listens on
    pub bind: String,
    /// `tracing` env-filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("civic_records.db"),
            bind: "127.0.0.1:3000".to_string(),
            log_filter: "civic_records=info".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = env::var(CONFIG_DIR_VAR) {
            return Ok(PathBuf::from(custom_dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join("civic-records"))
            .ok_or_else(|| RecordError::Config("Could not determine config directory".to_string()))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load from the config file (defaults when it doesn't exist), then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Read one file without touching the environment
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            RecordError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            RecordError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir).map_err(|e| {
            RecordError::Config(format!("Failed to create config directory {}: {}", dir.display(), e))
        })?;
        self.save_to(&dir.join("config.toml"))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RecordError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents).map_err(|e| {
            RecordError::Config(format!("Failed to write config file {}: {}", path.display(), e))
        })
    }

    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var(DB_PATH_VAR) {
            self.database_path = PathBuf::from(path);
        }
        if let Ok(bind) = env::var(BIND_VAR) {
            self.bind = bind;
        }
        if let Ok(filter) = env::var(LOG_VAR) {
            self.log_filter = filter;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(RecordError::Config("database_path cannot be empty".to_string()));
        }
        self.bind_addr()?;
        if self.log_filter.trim().is_empty() {
            return Err(RecordError::Config("log_filter cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|_| RecordError::Config(format!("Invalid bind address: {}", self.bind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_rejects_bad_bind() {
        let config = Config {
            bind: "not-an-address".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(RecordError::Config(_))));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("bind = \"0.0.0.0:8080\"").unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("civic_records.db"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_from(Path::new("/nonexistent/civic/config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
