//! Camera and projection for molview.
//!
//! This crate provides:
//! - [`Camera`] positioning, framing and pixel-size queries
//! - [`CameraMode`] mono and sequential-stereo eye views
//! - Projection matrices with fractional window shift
//! - The [`RenderTarget`] seam used to route eye views to draw buffers

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Projection matrices take the classic glFrustum argument list
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]

pub mod camera;
pub mod camera_mode;
pub mod projection;
pub mod render_target;

pub use camera::{
    camera_framing_bounds, Camera, CameraUniforms, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW,
    MIN_FIELD_WIDTH,
};
pub use camera_mode::CameraMode;
pub use projection::{frustum, ortho, Projection};
pub use render_target::{DrawBuffer, RenderTarget};
