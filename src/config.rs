use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "eraser_config")]
pub struct EraserConfig {
    /// side length of the square eraser, in world units
    #[serde(rename = "size")]
    pub size: f64,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            size: Self::SIZE_DEFAULT,
        }
    }
}

impl EraserConfig {
    pub const SIZE_MIN: f64 = 1.0;
    pub const SIZE_MAX: f64 = 200.0;
    pub const SIZE_DEFAULT: f64 = 12.0;

    /// the half side length every erase call works with
    pub fn half_size(&self) -> f64 {
        self.size.clamp(Self::SIZE_MIN, Self::SIZE_MAX) / 2.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename = "pen_config")]
pub struct PenConfig {
    #[serde(rename = "width")]
    pub width: f64,

    /// minimum screen distance before a new raw point is sampled
    #[serde(rename = "sample_tolerance")]
    pub sample_tolerance: f32,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            width: Self::WIDTH_DEFAULT,
            sample_tolerance: 2.0,
        }
    }
}

impl PenConfig {
    pub const WIDTH_MIN: f64 = 0.5;
    pub const WIDTH_MAX: f64 = 100.0;
    pub const WIDTH_DEFAULT: f64 = 4.0;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub eraser: EraserConfig,
    pub pen: PenConfig,
}

impl SketchConfig {
    pub const FILE_NAME: &'static str = "sketchpad.json";

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: SketchConfig = serde_json::from_str(text)?;
        config.clamp();
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// read the config at `path`. a missing file just means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// like [`SketchConfig::load`], but falls back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e}, using default settings");
            Self::default()
        })
    }

    fn clamp(&mut self) {
        self.eraser.size = self
            .eraser
            .size
            .clamp(EraserConfig::SIZE_MIN, EraserConfig::SIZE_MAX);
        self.pen.width = self.pen.width.clamp(PenConfig::WIDTH_MIN, PenConfig::WIDTH_MAX);
    }
}
