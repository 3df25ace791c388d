//! Application Configuration
//!
//! User settings stored in TOML format. Every section falls back to its
//! defaults, so a partial file is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::overlay::OverlayStyle;
use crate::vision::DetectionConfig;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Text region detection knobs, passed to the detector unmodified
    pub detection: DetectionConfig,
    /// Region outline style
    pub overlay: OverlayStyle,
    /// OCR model location
    pub models: ModelSettings,
}

/// Where OCR models live and whether they may be downloaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Directory holding det.onnx, rec.onnx and dict.txt; defaults to the data directory
    pub models_dir: Option<PathBuf>,
    /// Never download models
    pub offline: bool,
}

/// Default configuration file location
pub fn default_config_path() -> Result<PathBuf> {
    Ok(crate::storage::get_config_dir()?.join("config.toml"))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
