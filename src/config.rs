//! Configuration Management
//!
//! Handles persistent configuration storage for orgstream.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default batch size for row streaming
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Last used GitHub organization
    #[serde(default)]
    pub default_org: Option<String>,
    /// GitHub API base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Path to the user database
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Rows fetched per batch
    #[serde(default)]
    pub batch_size: Option<usize>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orgstream").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective API base URL (config > built-in default)
    pub fn effective_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| crate::github::client::DEFAULT_BASE_URL.to_string())
    }

    /// Get effective database path (config > "users.db")
    pub fn effective_database(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| PathBuf::from("users.db"))
    }

    /// Get effective batch size (config > built-in default)
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }

    /// Set default organization and save
    pub fn set_default_org(&mut self, org: &str) -> Result<()> {
        self.default_org = Some(org.to_string());
        self.save()
    }
}
