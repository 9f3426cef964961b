use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::value_store::FileValueStore;

const DEFAULT_BACKLOG_MINUTES: f64 = 15.0;

fn default_backlog_minutes() -> f64 {
    DEFAULT_BACKLOG_MINUTES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Value store file; the data directory default is used when unset
    #[serde(default)]
    pub store_path: Option<String>,
    /// Append `(!)`/`(!!)` markers to non-OK results
    #[serde(default)]
    pub state_markers: bool,
    #[serde(default = "default_backlog_minutes")]
    pub average_backlog_minutes: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            state_markers: false,
            average_backlog_minutes: DEFAULT_BACKLOG_MINUTES,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Missing, empty or unreadable files yield the defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_slice(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {:?}: {}", config_path, e);
            Config::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_vec_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("levelcheck").join("config.json"))
    }

    pub fn set_store_path(&mut self, path: String) {
        self.store_path = Some(path);
    }

    pub fn get_store_path(&self) -> Option<&String> {
        self.store_path.as_ref()
    }

    /// Configured store path, or the default one
    pub fn effective_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => FileValueStore::default_path().context("Could not determine store path"),
        }
    }

    pub fn set_state_markers(&mut self, enabled: bool) {
        self.state_markers = enabled;
    }
}
