//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is a
//! valid configuration.
//!
//! ```toml
//! data_dir = "./toonify-data"
//! jpeg_quality = 85
//! processing_delay_ms = 0
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "TOONIFY_CONFIG";

/// Storage key the gallery lives under.
pub const DEFAULT_GALLERY_KEY: &str = "toonify-gallery";

/// Filename used when a download is requested without one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "toonify-image.jpg";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToonifyConfig {
    /// Directory backing the file storage port.
    pub data_dir: PathBuf,
    /// Storage key holding the gallery collection.
    pub gallery_key: String,
    /// JPEG quality for transformed images (1-100).
    pub jpeg_quality: u8,
    /// Simulated processing delay before each transform, in milliseconds.
    pub processing_delay_ms: u64,
    /// Upper bound on a single transform, in milliseconds.
    pub transform_timeout_ms: u64,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
    /// Filename used when a download names none.
    pub default_download_name: String,
    /// Optional cap on the size of any stored value, in bytes.
    pub storage_quota_bytes: Option<usize>,
}

impl Default for ToonifyConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("toonify-data"),
            gallery_key: DEFAULT_GALLERY_KEY.to_string(),
            jpeg_quality: 85,
            processing_delay_ms: 2000,
            transform_timeout_ms: 30_000,
            download_dir: PathBuf::from("."),
            default_download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
            storage_quota_bytes: None,
        }
    }
}

impl ToonifyConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.display().to_string(),
            error,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from an explicit path, else from `TOONIFY_CONFIG`, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid {
                field: "jpeg_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }
        if self.transform_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "transform_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.processing_delay_ms >= self.transform_timeout_ms {
            return Err(ConfigError::Invalid {
                field: "processing_delay_ms".to_string(),
                reason: format!(
                    "must be shorter than transform_timeout_ms ({})",
                    self.transform_timeout_ms
                ),
            });
        }
        if self.gallery_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "gallery_key".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Simulated processing delay.
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Transform timeout.
    pub fn transform_timeout(&self) -> Duration {
        Duration::from_millis(self.transform_timeout_ms)
    }
}
