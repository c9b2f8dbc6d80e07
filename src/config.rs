//! User configuration loaded from `~/.config/zcalc/config.toml`.

use crate::keymap::{Keymap, KeymapError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default `tracing` filter, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Copy the display to the clipboard whenever `=` is pressed.
    pub copy_on_equals: bool,
    /// Extra key bindings, `key = "action"`.
    pub keys: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "zcalc=warn".to_string(),
            copy_on_equals: false,
            keys: HashMap::new(),
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration")
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        debug!(path = %path.display(), "loading config");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In {}", path.display()))
    }

    pub fn keymap(&self) -> Result<Keymap, KeymapError> {
        Keymap::with_overrides(&self.keys)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zcalc").join("config.toml"))
}
