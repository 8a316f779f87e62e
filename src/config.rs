use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants;
use crate::error::{IngestError, Result};
use crate::types::DatasetKind;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ingest: IngestConfig,
    pub layout: LayoutConfig,
    pub sizing: SizingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_input_bytes: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: constants::MAX_INPUT_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub scatter_extent: f64,
    /// Fixed seed for synthesized positions; unseeded runs scatter differently every time
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scatter_extent: constants::SCATTER_EXTENT,
            seed: None,
        }
    }
}

/// `min(max, base + interactions * step)`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeSizing {
    pub base: f64,
    pub step: f64,
    pub max: f64,
}

impl NodeSizing {
    pub fn size_for(&self, interactions: u64) -> f64 {
        (self.base + interactions as f64 * self.step).min(self.max)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    pub participation: NodeSizing,
    pub popularity: NodeSizing,
    pub controversy: NodeSizing,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            participation: NodeSizing {
                base: 40.0,
                step: 3.0,
                max: 180.0,
            },
            popularity: NodeSizing {
                base: 50.0,
                step: 3.0,
                max: 200.0,
            },
            controversy: NodeSizing {
                base: 70.0,
                step: 0.0,
                max: 70.0,
            },
        }
    }
}

impl SizingConfig {
    pub fn for_kind(&self, kind: DatasetKind) -> NodeSizing {
        match kind {
            DatasetKind::Participation => self.participation,
            DatasetKind::Popularity => self.popularity,
            DatasetKind::Controversy => self.controversy,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            file_prefix: "vsion.log".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.layout.scatter_extent.is_finite() && self.layout.scatter_extent > 0.0) {
            return Err(IngestError::Config(format!(
                "layout.scatter_extent must be a positive number, got {}",
                self.layout.scatter_extent
            )));
        }
        if self.ingest.max_input_bytes == 0 {
            return Err(IngestError::Config(
                "ingest.max_input_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
