//! Mono and sequential-stereo camera modes.
//!
//! A mode turns the single logical camera into the eye viewpoints actually
//! rendered. Stereo eyes look in the same direction and are offset sideways
//! (parallel, not toed-in); the projection compensates with a horizontal
//! pixel shift so both eye images superpose at the focal plane.

use glam::DVec3;
use molview_core::Place;
use serde::{Deserialize, Serialize};

use crate::render_target::{DrawBuffer, RenderTarget};

/// Camera rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    /// One view.
    #[default]
    Mono,
    /// Left and right eye views rendered in sequence.
    Stereo {
        /// Eye separation in scene units.
        eye_separation_scene: f64,
        /// Eye separation in screen pixels.
        eye_separation_pixels: f64,
    },
}

impl CameraMode {
    /// Stereo mode with the given separations.
    #[must_use]
    pub fn stereo(eye_separation_scene: f64, eye_separation_pixels: f64) -> Self {
        CameraMode::Stereo {
            eye_separation_scene,
            eye_separation_pixels,
        }
    }

    /// Name of the mode.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CameraMode::Mono => "mono",
            CameraMode::Stereo { .. } => "stereo",
        }
    }

    /// Number of views rendered per frame.
    #[must_use]
    pub fn number_of_views(&self) -> usize {
        match self {
            CameraMode::Mono => 1,
            CameraMode::Stereo { .. } => 2,
        }
    }

    /// Camera coordinate frame of view `view_num`.
    ///
    /// `None` returns the base frame. Stereo eye 0 is the left eye.
    #[must_use]
    pub fn view(&self, camera_position: Place, view_num: Option<usize>) -> Place {
        match (self, view_num) {
            (
                CameraMode::Stereo {
                    eye_separation_scene,
                    ..
                },
                Some(eye),
            ) => {
                let shift = eye_sign(eye) * 0.5 * eye_separation_scene;
                camera_position * Place::translation(DVec3::new(shift, 0.0, 0.0))
            }
            _ => camera_position,
        }
    }

    /// Shift of the view center away from the window center, in pixels.
    #[must_use]
    pub fn pixel_shift(&self, view_num: Option<usize>) -> (f64, f64) {
        match (self, view_num) {
            (
                CameraMode::Stereo {
                    eye_separation_pixels,
                    ..
                },
                Some(eye),
            ) => (eye_sign(eye) * 0.5 * eye_separation_pixels, 0.0),
            _ => (0.0, 0.0),
        }
    }

    /// Drawing buffer for view `view_num`.
    #[must_use]
    pub fn render_buffer(&self, view_num: usize) -> DrawBuffer {
        match self {
            CameraMode::Mono => DrawBuffer::Mono,
            CameraMode::Stereo { .. } if view_num == 0 => DrawBuffer::Left,
            CameraMode::Stereo { .. } => DrawBuffer::Right,
        }
    }

    /// Points the render target at the buffer for view `view_num`.
    pub fn set_render_target(&self, view_num: usize, target: &mut dyn RenderTarget) {
        target.select_buffer(self.render_buffer(view_num));
    }

    /// Combines the rendered views into a single image.
    ///
    /// Sequential stereo draws straight into the eye buffers, so neither
    /// built-in mode touches the target here.
    pub fn combine_rendered_camera_views(&self, _target: &mut dyn RenderTarget) {}

    /// Stereo eye separation in scene units.
    #[must_use]
    pub fn eye_separation_scene(&self) -> Option<f64> {
        match self {
            CameraMode::Mono => None,
            CameraMode::Stereo {
                eye_separation_scene,
                ..
            } => Some(*eye_separation_scene),
        }
    }

    /// Stereo eye separation in pixels.
    #[must_use]
    pub fn eye_separation_pixels(&self) -> Option<f64> {
        match self {
            CameraMode::Mono => None,
            CameraMode::Stereo {
                eye_separation_pixels,
                ..
            } => Some(*eye_separation_pixels),
        }
    }
}

/// -1 for the left eye (0), +1 for the right.
fn eye_sign(eye: usize) -> f64 {
    if eye == 0 {
        -1.0
    } else {
        1.0
    }
}
