//! Scan configuration - loaded once at startup, validated before use.

use std::path::Path;

use echoloc_shared::{LayerMask, VisualMode};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Everything a scan engine needs to know, tunable from a TOML file.
///
/// Defaults match the production scanner tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Rays fired per scan.
    pub ray_count: usize,
    /// Maximum distance a ray travels, in meters.
    pub max_distance: f32,
    /// Categories the scan may hit.
    pub layer_mask: LayerMask,
    /// How far each decal floats off its surface along the hit normal, in
    /// meters. Avoids z-fighting; higher also behaves better in concave
    /// corners, at the cost of reach (see the compactor's caveat).
    pub standoff_distance: f32,
    /// Quad size in dot mode.
    pub dot_scale: f32,
    /// Quad "window" size in grid mode.
    pub grid_quad_size: f32,
    /// How far past the floating quad the grid projects onto surfaces.
    pub grid_depth: f32,
    /// Which visual the scan projects.
    pub visual_mode: VisualMode,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ray_count: 4000,
            max_distance: 50.0,
            layer_mask: LayerMask::ALL,
            standoff_distance: 0.5,
            dot_scale: 0.2,
            grid_quad_size: 5.0,
            grid_depth: 1.0,
            visual_mode: VisualMode::Grid,
        }
    }
}

impl ScanConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// `EngineError::ConfigParse` on malformed TOML.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// `EngineError::ConfigIo` if the file cannot be read,
    /// `EngineError::ConfigParse` if it cannot be parsed.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigIo(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Checks the configuration against hard requirements.
    ///
    /// # Errors
    ///
    /// `EngineError::Config` naming the offending field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.ray_count == 0 {
            return Err(EngineError::Config("ray_count must be positive".into()));
        }
        if self.max_distance <= 0.0 {
            return Err(EngineError::Config("max_distance must be positive".into()));
        }
        if self.standoff_distance < 0.0 {
            return Err(EngineError::Config("standoff_distance must not be negative".into()));
        }
        if self.dot_scale <= 0.0 || self.grid_quad_size <= 0.0 {
            return Err(EngineError::Config("decal scales must be positive".into()));
        }
        if self.grid_depth < 0.0 {
            return Err(EngineError::Config("grid_depth must not be negative".into()));
        }
        Ok(())
    }

    /// The in-plane decal scale for the active visual mode.
    #[must_use]
    pub const fn decal_scale(&self) -> f32 {
        match self.visual_mode {
            VisualMode::Dots => self.dot_scale,
            VisualMode::Grid => self.grid_quad_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScanConfig::default();
        config.validate().expect("defaults must validate");
        assert_eq!(config.ray_count, 4000);
        assert_eq!(config.visual_mode, VisualMode::Grid);
    }

    #[test]
    fn test_scale_follows_mode() {
        let mut config = ScanConfig::default();
        assert!((config.decal_scale() - config.grid_quad_size).abs() < f32::EPSILON);
        config.visual_mode = VisualMode::Dots;
        assert!((config.decal_scale() - config.dot_scale).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ScanConfig::from_toml_str(
            r#"
            ray_count = 800
            max_distance = 25.0
            visual_mode = "Dots"
            "#,
        )
        .expect("valid TOML");
        assert_eq!(config.ray_count, 800);
        assert!((config.max_distance - 25.0).abs() < f32::EPSILON);
        assert_eq!(config.visual_mode, VisualMode::Dots);
        // Unspecified fields fall back to defaults
        assert!((config.standoff_distance - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_validation_rejects_zero_rays() {
        let config = ScanConfig { ray_count: 0, ..ScanConfig::default() };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        assert!(matches!(
            ScanConfig::from_toml_str("ray_count = \"many\""),
            Err(EngineError::ConfigParse(_))
        ));
    }
}
