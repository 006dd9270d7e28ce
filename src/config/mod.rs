//! Client configuration
//!
//! Reads `~/.socket-finder/config.yaml` (or an explicit path) and merges
//! command-line overrides on top. Missing files mean defaults.

pub mod merger;

pub use merger::{ConfigMerger, PartialConfig};

use crate::models::Website;
use crate::utils::{default_config_path, ResultExt};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for talking to the search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the search service
    pub base_url: String,
    /// Milliseconds between status checks
    pub poll_interval_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Websites searched when none are given on the command line
    pub websites: Vec<Website>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
            websites: Website::all().to_vec(),
        }
    }
}

impl ClientConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(anyhow!("base_url must not be empty"));
        }
        if self.poll_interval_ms == 0 {
            return Err(anyhow!("poll_interval_ms must be greater than 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration file manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager for an explicit config file
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Manager for ~/.socket-finder/config.yaml, if a home directory exists
    pub fn user_default() -> Option<Self> {
        default_config_path().map(Self::new)
    }

    /// Check if config file exists
    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Read config from file, returning None if not found
    pub fn read(&self) -> Result<Option<ClientConfig>> {
        if !self.exists() {
            log::debug!("No config file at {}", self.config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.config_path)
            .with_context("Failed to read config file")?;
        let config = serde_yaml::from_str(&content).with_context("Failed to parse config file")?;

        log::debug!("Loaded config from {}", self.config_path.display());
        Ok(Some(config))
    }

    /// Write config to file
    pub fn write(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(config).with_context("Failed to serialize config")?;
        std::fs::write(&self.config_path, content).with_context("Failed to write config file")
    }
}

/// Load the effective configuration.
///
/// `path` selects the config file; without it the per-user file is used.
/// CLI overrides win over the file, which wins over defaults.
pub fn load_config(path: Option<&Path>, cli: Option<PartialConfig>) -> Result<ClientConfig> {
    let manager = match path {
        Some(path) => Some(ConfigManager::new(path)),
        None => ConfigManager::user_default(),
    };

    let file = match &manager {
        Some(manager) => manager.read()?,
        None => None,
    };

    // An explicitly named file has to exist
    if let (Some(path), None) = (path, &file) {
        return Err(anyhow!("Config file not found: {}", path.display()));
    }

    let config = ConfigMerger::new().with_file(file).with_cli(cli).merge();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.websites.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ClientConfig {
            poll_interval_ms: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(temp_dir.path().join("config.yaml"));
        assert!(!manager.exists());
        assert!(manager.read().unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::new(temp_dir.path().join("nested").join("config.yaml"));
        let config = ClientConfig {
            base_url: "http://parts.internal:8080".to_string(),
            websites: vec![Website::DataIo],
            ..ClientConfig::default()
        };

        manager.write(&config).unwrap();
        assert_eq!(manager.read().unwrap(), Some(config));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "base_url: http://localhost:9000\nwebsites: [bpmicro]\n").unwrap();

        let config = ConfigManager::new(&path).read().unwrap().unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.websites, vec![Website::BpMicro]);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "poll_interval_ms: [not a number").unwrap();

        let err = ConfigManager::new(&path).read().unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_load_config_applies_cli_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "base_url: http://from-file:5000\npoll_interval_ms: 500\n").unwrap();

        let cli = PartialConfig {
            base_url: Some("http://from-cli:5000".to_string()),
            ..PartialConfig::default()
        };
        let config = load_config(Some(&path), Some(cli)).unwrap();
        assert_eq!(config.base_url, "http://from-cli:5000");
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.yaml");
        assert!(load_config(Some(&path), None).is_err());
    }
}
