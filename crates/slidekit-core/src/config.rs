//! Editor configuration.

use crate::error::ConfigError;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Width of the canonical slide space.
pub const SLIDE_WIDTH: f64 = 960.0;
/// Height of the canonical slide space.
pub const SLIDE_HEIGHT: f64 = 540.0;
/// Minimum element width and height.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;
/// Snap distance in screen pixels.
pub const SNAP_THRESHOLD: f64 = 8.0;
/// Coarse rotation snap step in degrees.
pub const ROTATION_SNAP_STEP: f64 = 45.0;
/// Coarse rotation snap applies within this many degrees.
pub const ROTATION_SNAP_EPSILON: f64 = 5.0;
/// Fine rotation snap step in degrees.
pub const FINE_ROTATION_STEP: f64 = 15.0;
/// Maximum number of history entries.
pub const MAX_HISTORY: usize = 50;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_TOLERANCE: f64 = 8.0;
/// Distance of the rotate handle above the top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Tunables for geometry, snapping and history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub slide_width: f64,
    pub slide_height: f64,
    pub min_width: f64,
    pub min_height: f64,
    /// Snap distance in screen pixels; divided by the view scale.
    pub snap_threshold: f64,
    pub snapping_enabled: bool,
    pub rotation_snap_step: f64,
    pub rotation_snap_epsilon: f64,
    pub fine_rotation_step: f64,
    /// Keep element positions non-negative while moving.
    pub clamp_to_canvas: bool,
    pub history_capacity: usize,
    pub handle_tolerance: f64,
    pub rotate_handle_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            slide_width: SLIDE_WIDTH,
            slide_height: SLIDE_HEIGHT,
            min_width: MIN_ELEMENT_SIZE,
            min_height: MIN_ELEMENT_SIZE,
            snap_threshold: SNAP_THRESHOLD,
            snapping_enabled: true,
            rotation_snap_step: ROTATION_SNAP_STEP,
            rotation_snap_epsilon: ROTATION_SNAP_EPSILON,
            fine_rotation_step: FINE_ROTATION_STEP,
            clamp_to_canvas: false,
            history_capacity: MAX_HISTORY,
            handle_tolerance: HANDLE_TOLERANCE,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded editor config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn slide_size(&self) -> Size {
        Size::new(self.slide_width, self.slide_height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |field: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive number, got {value}"),
                })
            }
        };
        positive("slide_width", self.slide_width)?;
        positive("slide_height", self.slide_height)?;
        positive("min_width", self.min_width)?;
        positive("min_height", self.min_height)?;
        positive("rotation_snap_step", self.rotation_snap_step)?;
        positive("fine_rotation_step", self.fine_rotation_step)?;
        if !(self.snap_threshold.is_finite() && self.snap_threshold >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "snap_threshold",
                reason: "must be a non-negative number".to_string(),
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json_str(r#"{"snap_threshold": 4.0}"#).unwrap();
        assert!((config.snap_threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.history_capacity, MAX_HISTORY);
        assert!((config.slide_width - SLIDE_WIDTH).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = EditorConfig::from_json_str(r#"{"history_capacity": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "history_capacity", .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"min_width": 20.0, "clamp_to_canvas": true}}"#).unwrap();
        let config = EditorConfig::load(file.path()).unwrap();
        assert!((config.min_width - 20.0).abs() < f64::EPSILON);
        assert!(config.clamp_to_canvas);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
