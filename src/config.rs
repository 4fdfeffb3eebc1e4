use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the orchestrator does once live search has produced listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Live results, even partial ones, are final; datasets are only consulted on total failure.
    #[default]
    LiveFirst,
    /// Datasets are always searched and appended after live results.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    #[default]
    Dataset,
    Api,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub enabled: bool,
    pub max_per_platform: usize,
    pub timeout_seconds: u64,
    pub request_delay_ms: u64,
    pub rotate_user_agents: bool,
    pub parallel: bool,
    pub cache_ttl_seconds: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_per_platform: 10,
            timeout_seconds: 10,
            request_delay_ms: 1000,
            rotate_user_agents: true,
            parallel: false,
            cache_ttl_seconds: 3600,
        }
    }
}

impl LiveConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub datasets_dir: PathBuf,
    pub data_source: DataSourceKind,
    pub live: LiveConfig,
    pub fallback_policy: FallbackPolicy,
    pub max_expanded_keywords: usize,
    pub max_visual_results: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            datasets_dir: PathBuf::from("datasets"),
            data_source: DataSourceKind::Dataset,
            live: LiveConfig::default(),
            fallback_policy: FallbackPolicy::LiveFirst,
            max_expanded_keywords: 5,
            max_visual_results: 50,
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
