//! Configuration management

use crate::core::{DisplayUnit, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

        let app_config_dir = config_dir.join("cgm-widget");

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir)?;
        }

        Ok(app_config_dir.join("config.toml"))
    }

    /// Load configuration from disk, creating a default file on first run
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Whether Share credentials have been filled in
    pub fn has_credentials(&self) -> bool {
        !self.account.username.is_empty() && !self.account.password.is_empty()
    }
}

/// Dexcom Share account settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Share username or account email
    #[serde(default)]
    pub username: String,
    /// Share password
    #[serde(default)]
    pub password: String,
    /// Server region the account is registered in
    #[serde(default)]
    pub region: Region,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            region: Region::default(),
        }
    }
}

/// Dexcom Share server region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// United States
    Us,
    /// Outside United States
    Ous,
    /// Japan
    Jp,
}

impl Default for Region {
    fn default() -> Self {
        Region::Us
    }
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Unit shown on the widget
    #[serde(default = "default_unit")]
    pub unit: DisplayUnit,
    /// Seconds between glucose fetches
    #[serde(default = "default_update_interval")]
    pub update_interval_secs: u64,
}

fn default_unit() -> DisplayUnit {
    DisplayUnit::MmolL
}
fn default_update_interval() -> u64 {
    60
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            update_interval_secs: default_update_interval(),
        }
    }
}
