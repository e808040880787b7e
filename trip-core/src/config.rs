use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};

use crate::provider::LookupKind;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Nominatim rejects requests without a descriptive caller identity.
pub const DEFAULT_USER_AGENT: &str =
    concat!("trip-cli/", env!("CARGO_PKG_VERSION"), " (travel weather and places lookup)");

/// Override for a single lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
}

/// Top-level configuration stored on disk. Every field is optional; an absent
/// file means the public providers with default settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Per-lookup timeout in seconds.
    pub timeout_secs: Option<u64>,

    pub user_agent: Option<String>,

    /// Example TOML:
    /// [endpoints.geocoding]
    /// url = "http://localhost:8080"
    pub endpoints: HashMap<String, EndpointConfig>,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Base URL for a lookup, falling back to the public provider.
    pub fn endpoint_url(&self, kind: LookupKind) -> &str {
        self.endpoints
            .get(kind.as_str())
            .map(|ep| ep.url.as_str())
            .unwrap_or_else(|| kind.default_url())
    }

    pub fn is_endpoint_overridden(&self, kind: LookupKind) -> bool {
        self.endpoints.contains_key(kind.as_str())
    }

    /// Set/replace the base URL of a lookup endpoint.
    pub fn upsert_endpoint(&mut self, kind: LookupKind, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "Endpoint URL for '{kind}' must start with http:// or https://, got '{url}'."
            ));
        }

        self.endpoints.insert(kind.as_str().to_string(), EndpointConfig { url });
        Ok(())
    }

    /// Drop an override so the public provider is used again.
    pub fn reset_endpoint(&mut self, kind: LookupKind) {
        self.endpoints.remove(kind.as_str());
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }

        if let Some(unknown) = self
            .endpoints
            .keys()
            .find(|key| LookupKind::try_from(key.as_str()).is_err())
        {
            return Err(anyhow!(
                "Unknown endpoint '{unknown}' in config. Supported endpoints: geocoding, weather, places."
            ));
        }

        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "trip", "trip-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
