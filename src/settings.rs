use crate::config::{Rgb, StyleConfig};
use crate::error::Result;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every field is optional and overrides the preset.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub style: StyleSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct StyleSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mod1: Option<f64>,
    pub mod2: Option<f64>,
    pub mod3: Option<f64>,
    pub color1: Option<Rgb>,
    pub background: Option<Rgb>,
}

impl Settings {
    /// Load from the default location. A missing or unreadable file yields the
    /// preset; a malformed one is reported and ignored.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings = Self::parse(&content)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blockforest")
            .join("config.toml")
    }

    /// Preset with this file's overrides applied.
    pub fn style(&self) -> StyleConfig {
        let base = StyleConfig::default();
        let s = &self.style;
        StyleConfig {
            width: s.width.unwrap_or(base.width),
            height: s.height.unwrap_or(base.height),
            mod1: s.mod1.unwrap_or(base.mod1),
            mod2: s.mod2.unwrap_or(base.mod2),
            mod3: s.mod3.unwrap_or(base.mod3),
            color1: s.color1.unwrap_or(base.color1),
            background: s.background.unwrap_or(base.background),
        }
    }
}
