use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Grid cell edge used to dice faces into patches.
pub const DEFAULT_PATCH_SIZE: f32 = 64.0;

/// How a bounce light's visibility is precomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisApprox {
    #[default]
    None,
    /// Resolve the leaf at the light position.
    Vis,
    /// Estimate a visible bounds volume around the light position.
    Rays,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BounceSettings {
    /// Blend between mid-gray (0) and the face's texture color (1).
    pub color_scale: f32,
    pub visapprox: VisApprox,
    pub patch_size: f32,
    /// Worker threads for the face pass; 0 picks rayon's default.
    pub threads: usize,
}

impl Default for BounceSettings {
    fn default() -> Self {
        Self {
            color_scale: 0.0,
            visapprox: VisApprox::None,
            patch_size: DEFAULT_PATCH_SIZE,
            threads: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    ColorScaleOutOfRange(f32),
    BadPatchSize(f32),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::ColorScaleOutOfRange(v) => {
                write!(f, "color_scale must be within [0, 1], got {}", v)
            }
            SettingsError::BadPatchSize(v) => write!(f, "patch_size must be positive, got {}", v),
        }
    }
}

impl Error for SettingsError {}

impl BounceSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.color_scale) {
            return Err(SettingsError::ColorScaleOutOfRange(self.color_scale));
        }
        if !(self.patch_size > 0.0 && self.patch_size.is_finite()) {
            return Err(SettingsError::BadPatchSize(self.patch_size));
        }
        Ok(())
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BounceSettings = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
