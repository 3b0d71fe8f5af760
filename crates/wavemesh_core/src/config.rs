//! # Mesh Configuration
//!
//! The handful of constants that shape the output. Defaults reproduce the
//! reference behaviour: 8000 points, 10 unit spacing, base height 1, gain 100.
//!
//! ## TOML
//!
//! ```toml
//! target_point_count = 8000
//! unit_spacing = 10.0
//! base_height = 1.0
//! height_gain = 100.0
//! output_format = "binary"   # or "ascii"
//! ```
//!
//! Missing keys fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};
use crate::stl::StlFormat;

/// Default number of points the signal is resampled to.
pub const DEFAULT_TARGET_POINT_COUNT: usize = 8000;

/// Default box footprint and grid pitch.
pub const DEFAULT_UNIT_SPACING: f32 = 10.0;

/// Default box height at zero amplitude.
pub const DEFAULT_BASE_HEIGHT: f32 = 1.0;

/// Default height added per unit of amplitude.
pub const DEFAULT_HEIGHT_GAIN: f32 = 100.0;

/// Configuration passed into the pipeline entry point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshConfig {
    /// Number of points the signal is resampled to before partitioning.
    pub target_point_count: usize,
    /// Grid pitch and box footprint.
    pub unit_spacing: f32,
    /// Box height at zero amplitude.
    pub base_height: f32,
    /// Height added per unit of amplitude.
    pub height_gain: f32,
    /// STL encoding.
    pub output_format: StlFormat,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            target_point_count: DEFAULT_TARGET_POINT_COUNT,
            unit_spacing: DEFAULT_UNIT_SPACING,
            base_height: DEFAULT_BASE_HEIGHT,
            height_gain: DEFAULT_HEIGHT_GAIN,
            output_format: StlFormat::Binary,
        }
    }
}

impl MeshConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] on syntax errors, unknown keys,
    /// negative counts or invalid values.
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| MeshError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Io`] if the file can't be read, otherwise as
    /// [`MeshConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> MeshResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> MeshResult<String> {
        toml::to_string(self).map_err(|e| MeshError::InvalidConfig(e.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if spacing is not a positive
    /// finite number, or if base height or gain are not finite.
    pub fn validate(&self) -> MeshResult<()> {
        if !self.unit_spacing.is_finite() || self.unit_spacing <= 0.0 {
            return Err(MeshError::InvalidConfig(format!(
                "unit_spacing must be positive, got {}",
                self.unit_spacing
            )));
        }
        if !self.base_height.is_finite() {
            return Err(MeshError::InvalidConfig(format!(
                "base_height must be finite, got {}",
                self.base_height
            )));
        }
        if !self.height_gain.is_finite() {
            return Err(MeshError::InvalidConfig(format!(
                "height_gain must be finite, got {}",
                self.height_gain
            )));
        }
        Ok(())
    }

    /// Box height for an amplitude: `base_height + amplitude * height_gain`.
    #[inline]
    #[must_use]
    pub fn box_height(&self, amplitude: f32) -> f32 {
        self.base_height + amplitude * self.height_gain
    }
}
