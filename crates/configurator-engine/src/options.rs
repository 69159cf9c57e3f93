//! Engine behaviour switches, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// The mono-pitch / 200 mm skylight exception.
///
/// With `Enabled`, every mono-pitch skylight restricted to 200 mm walls is
/// admissible whenever the building is mono-pitch with 200 mm walls, whatever
/// its size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkylightOverride {
    #[default]
    Enabled,
    Disabled,
}

/// What happens to a dimension driver that stops being admissible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DimensionFallback {
    #[default]
    Clear,
    /// Select the first admissible value of the same kind.
    FirstAdmissible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub skylight_override: SkylightOverride,
    pub dimension_fallback: DimensionFallback,
    /// Match window/door size classes against the height and skylights
    /// against the width.
    pub opening_size_filter: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            skylight_override: SkylightOverride::Enabled,
            dimension_fallback: DimensionFallback::Clear,
            opening_size_filter: true,
        }
    }
}

impl EngineOptions {
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| EngineError::Options {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_skylight_override(mut self, skylight_override: SkylightOverride) -> Self {
        self.skylight_override = skylight_override;
        self
    }

    pub fn with_dimension_fallback(mut self, dimension_fallback: DimensionFallback) -> Self {
        self.dimension_fallback = dimension_fallback;
        self
    }

    pub fn with_opening_size_filter(mut self, enabled: bool) -> Self {
        self.opening_size_filter = enabled;
        self
    }
}
