//! # Configuration
//!
//! Optional user configuration stored in `~/.config/pcmd/config.json`.
//!
//! ## Overview
//!
//! The [`Config`] struct is deserialized from a JSON file in the user's XDG
//! config directory. The only setting is the location of the store file:
//!
//! ```json
//! { "store_path": "/home/user/.local/share/pcmd/store.txt" }
//! ```
//!
//! The store path is resolved from, in order: the `--store` flag (or
//! `PCMD_STORE`), `store_path` in this file, then `$HOME/.pcmd.txt`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File name of the default store, placed in the home directory
pub const DEFAULT_STORE_FILE: &str = ".pcmd.txt";

/// User configuration read from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Overrides the default `$HOME/.pcmd.txt` store location.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            warn!("ignoring config file: {err:#}");
            Self::default()
        })
    }

    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Pick the store file: an explicit override wins, then the configured
    /// path, then `.pcmd.txt` in the home directory.
    pub fn resolve_store_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit.or_else(|| self.store_path.clone()) {
            return Ok(path);
        }
        let dirs = directories::BaseDirs::new().context("Could not determine home directory")?;
        Ok(default_store_path(dirs.home_dir()))
    }

    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "pcmd")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}

/// The default store location inside `home`
pub fn default_store_path(home: &Path) -> PathBuf {
    home.join(DEFAULT_STORE_FILE)
}
