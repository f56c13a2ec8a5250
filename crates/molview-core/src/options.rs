//! Configuration options for molview.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Session-wide configuration.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Horizontal field of view of new cameras, in degrees.
    pub field_of_view: f64,

    /// Stereo eye separation in scene units.
    pub eye_separation_scene: f64,

    /// Stereo eye separation in screen pixels.
    pub eye_separation_pixels: f64,

    /// Fraction of the window left empty around framed objects.
    pub view_pad: f64,

    /// Largest relative rotation (radians) for two models to count as moving
    /// rigidly together.
    pub rigid_max_rotation_angle: f64,

    /// Largest relative shift (scene units) for two models to count as moving
    /// rigidly together.
    pub rigid_max_shift: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            field_of_view: 45.0,
            eye_separation_scene: 1.0,
            eye_separation_pixels: 200.0,
            view_pad: 0.05,
            rigid_max_rotation_angle: 0.01,
            rigid_max_shift: 1.0,
        }
    }
}

impl Options {
    /// Parses options from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = Self::from_json(&text)?;
        log::debug!("loaded options from {}", path.display());
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.field_of_view, 45.0);
        assert_eq!(options.eye_separation_pixels, 200.0);
        assert_eq!(options.rigid_max_rotation_angle, 0.01);
        assert_eq!(options.rigid_max_shift, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = Options::from_json(r#"{ "field_of_view": 30.0 }"#).unwrap();
        assert_eq!(options.field_of_view, 30.0);
        assert_eq!(options.view_pad, 0.05);
    }

    #[test]
    fn test_json_round_trip() {
        let options = Options {
            view_pad: 0.1,
            ..Options::default()
        };
        let back = Options::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Options::load("/nonexistent/molview-options.json").unwrap_err();
        assert!(matches!(err, crate::MolviewError::IoError(_)));
    }
}
