//! Configuration Management
//!
//! Handles persistent defaults for apigw-resources.

use crate::aws::ClientSettings;
use crate::retry::RetryPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application name, used for the config and log directories
pub const APP_NAME: &str = "apigw-resources";

/// Retry overrides; unset fields keep the policy defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RetryOverrides {
    #[serde(default)]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub base_delay_secs: Option<u64>,
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
    /// Error codes retried on top of the built-in throttling set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_codes: Vec<String>,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Default shared-config profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Custom API Gateway endpoint (e.g. a local emulator)
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub retry: RetryOverrides,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME).join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path; missing or malformed files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Effective client settings (CLI > config > SDK default chain)
    pub fn client_settings(
        &self,
        region: Option<&str>,
        profile: Option<&str>,
        endpoint_url: Option<&str>,
    ) -> ClientSettings {
        ClientSettings {
            region: region.map(str::to_string).or_else(|| self.region.clone()),
            profile: profile.map(str::to_string).or_else(|| self.profile.clone()),
            endpoint_url: endpoint_url
                .map(str::to_string)
                .or_else(|| self.endpoint_url.clone()),
        }
    }

    /// Remember the given client settings as defaults
    pub fn remember(&mut self, settings: &ClientSettings) {
        if settings.region.is_some() {
            self.region = settings.region.clone();
        }
        if settings.profile.is_some() {
            self.profile = settings.profile.clone();
        }
        if settings.endpoint_url.is_some() {
            self.endpoint_url = settings.endpoint_url.clone();
        }
    }

    /// Default retry policy with configured overrides applied
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(max_attempts) = self.retry.max_attempts {
            policy.max_attempts = max_attempts.max(1);
        }
        if let Some(secs) = self.retry.base_delay_secs {
            policy.base_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.retry.max_delay_secs {
            policy.max_delay = Duration::from_secs(secs);
        }
        policy.with_extra_codes(self.retry.extra_codes.iter().cloned())
    }
}
