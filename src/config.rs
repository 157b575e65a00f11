//! Configuration
//!
//! Read once at start-up from `config.toml`. Every field is optional.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Theme;

pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub autorun: bool,
    pub autorun_delay_ms: u64,
    pub tab_size: usize,
    pub share_base_url: String,
    pub export_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    /// Stands in for the desktop colour-scheme preference
    pub system_theme: Option<Theme>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autorun: true,
            autorun_delay_ms: 1000,
            tab_size: 2,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            export_dir: None,
            data_dir: None,
            system_theme: None,
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when none is given.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn autorun_delay(&self) -> Duration {
        Duration::from_millis(self.autorun_delay_ms)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("jsplay"))
                .context("Could not determine data directory"),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jsplay").join("config.toml"))
}
