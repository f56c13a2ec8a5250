//! molview: camera, stereo projection and named views for a molecular scene.
//!
//! A [`Session`] owns the camera, clip planes, models and saved views. The
//! view commands in [`view`] frame models, save and delete named views, and
//! start transitions between them.
//!
//! # Quick Start
//!
//! ```
//! use molview::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut session = Session::new();
//!     let bounds = Bounds::new(DVec3::splat(-1.0), DVec3::splat(1.0));
//!     session
//!         .models
//!         .add(Model::new(ModelId(1), "protein").with_geometry_bounds(bounds))?;
//!
//!     view_all(&mut session, None);
//!     view_name(&mut session, "home");
//!
//!     // Wander off, then glide back over 30 frames.
//!     view_orient(&mut session, Some(0.2));
//!     let mut transition = show_view(&session, "home", Some(30))?;
//!     while transition.step(&mut session) != InterpolationState::Finished {}
//!
//!     Ok(())
//! }
//! ```
//!
//! # Stereo
//!
//! [`Session::set_stereo`] switches the camera to sequential stereo. The
//! renderer then draws [`Camera::number_of_views`] views per frame, each
//! with its own [`Camera::get_position`] and [`Camera::projection_matrix`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod args;
pub mod interpolate;
pub mod named_view;
pub mod session;
pub mod view;

pub use molview_core::{
    bounds::{point_bounds, union_bounds, Bounds},
    clip_plane::{ClipPlane, ClipPlanes, FAR_PLANE, NEAR_PLANE},
    error::{MolviewError, Result},
    interpolate_points, interpolate_rotation,
    model::{Model, ModelId, Models},
    options::Options,
    place::Place,
};
pub use molview_render::{
    camera_framing_bounds, Camera, CameraMode, CameraUniforms, DrawBuffer, Projection,
    RenderTarget,
};

pub use args::{parse_model_places, parse_place, position_string};
pub use interpolate::{InterpolationState, MotionCenters, ViewInterpolation};
pub use named_view::{CameraAttributes, NamedView, NamedViews};
pub use session::Session;
pub use view::{
    camera_framing_models, report_positions, show_view, view_all, view_delete, view_initial,
    view_list, view_matrix, view_name, view_objects, view_orient, view_position,
};

// Re-export glam types for convenience
pub use glam::{DMat4, DVec3};

/// Installs the `env_logger` backend for the `log` facade.
///
/// The level comes from `RUST_LOG`. Calling this more than once is harmless.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("logging initialized");
    }
}
