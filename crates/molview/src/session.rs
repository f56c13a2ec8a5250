//! The session handle owning all view state.

use glam::DVec3;
use molview_core::{ClipPlanes, Models, Options};
use molview_render::{Camera, CameraMode};

use crate::named_view::NamedViews;

/// Everything the view commands read and modify.
///
/// There is no global session; callers own one and pass it explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    /// The main view's camera.
    pub camera: Camera,

    /// Scene clip planes of the main view.
    pub clip_planes: ClipPlanes,

    /// All models in the scene.
    pub models: Models,

    /// Saved views by name.
    pub named_views: NamedViews,

    /// Scene point the camera rotates about and focuses on.
    pub center_of_rotation: DVec3,

    /// Session options.
    pub options: Options,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_options(Options::default())
    }
}

impl Session {
    /// Creates an empty session with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session whose camera uses the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            camera: Camera::with_field_of_view(options.field_of_view),
            clip_planes: ClipPlanes::new(),
            models: Models::new(),
            named_views: NamedViews::new(),
            center_of_rotation: DVec3::ZERO,
            options,
        }
    }

    /// Switches the camera between mono and stereo.
    ///
    /// Stereo uses the eye separations from the session options.
    pub fn set_stereo(&mut self, stereo: bool) {
        let mode = if stereo {
            CameraMode::stereo(
                self.options.eye_separation_scene,
                self.options.eye_separation_pixels,
            )
        } else {
            CameraMode::Mono
        };
        log::debug!("camera mode set to {}", mode.name());
        self.camera.set_mode(mode);
    }
}
