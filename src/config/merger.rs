// Configuration merging with priority

use super::ClientConfig;
use crate::models::Website;
use serde::{Deserialize, Serialize};

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PartialConfig {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub websites: Option<Vec<Website>>,
}

/// Configuration merger
/// Priority order: CLI -> File -> Defaults
pub struct ConfigMerger {
    defaults: ClientConfig,
    file: Option<ClientConfig>,
    cli: Option<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: ClientConfig::default(),
            file: None,
            cli: None,
        }
    }

    /// Set config read from file
    pub fn with_file(mut self, config: Option<ClientConfig>) -> Self {
        self.file = config;
        self
    }

    /// Set CLI overrides
    pub fn with_cli(mut self, config: Option<PartialConfig>) -> Self {
        self.cli = config;
        self
    }

    /// Merge all configs with priority
    pub fn merge(&self) -> ClientConfig {
        // A file config is complete: serde fills its gaps with defaults
        let mut result = self.file.clone().unwrap_or_else(|| self.defaults.clone());

        if let Some(ref cli) = self.cli {
            result = self.merge_partial(&result, cli);
        }

        result
    }

    /// Merge partial config into full config
    fn merge_partial(&self, base: &ClientConfig, partial: &PartialConfig) -> ClientConfig {
        ClientConfig {
            base_url: partial
                .base_url
                .clone()
                .unwrap_or_else(|| base.base_url.clone()),
            poll_interval_ms: partial.poll_interval_ms.unwrap_or(base.poll_interval_ms),
            request_timeout_secs: partial
                .request_timeout_secs
                .unwrap_or(base.request_timeout_secs),
            // An empty selection on the command line means "use the configured set"
            websites: partial
                .websites
                .clone()
                .filter(|websites| !websites.is_empty())
                .unwrap_or_else(|| base.websites.clone()),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_defaults_only() {
        assert_eq!(ConfigMerger::new().merge(), ClientConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = ClientConfig {
            request_timeout_secs: 5,
            ..ClientConfig::default()
        };
        let merged = ConfigMerger::new().with_file(Some(file.clone())).merge();
        assert_eq!(merged, file);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ClientConfig {
            base_url: "http://file:1".to_string(),
            poll_interval_ms: 250,
            ..ClientConfig::default()
        };
        let cli = PartialConfig {
            base_url: Some("http://cli:2".to_string()),
            websites: Some(vec![Website::SystemGeneral]),
            ..PartialConfig::default()
        };

        let merged = ConfigMerger::new()
            .with_file(Some(file))
            .with_cli(Some(cli))
            .merge();

        assert_eq!(merged.base_url, "http://cli:2");
        assert_eq!(merged.poll_interval_ms, 250);
        assert_eq!(merged.websites, vec![Website::SystemGeneral]);
    }

    #[test]
    fn test_empty_cli_websites_keep_configured_set() {
        let cli = PartialConfig {
            websites: Some(vec![]),
            ..PartialConfig::default()
        };
        let merged = ConfigMerger::new().with_cli(Some(cli)).merge();
        assert_eq!(merged.websites, Website::all().to_vec());
    }
}
