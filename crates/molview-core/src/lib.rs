//! Core geometry for molview.
//!
//! This crate provides the value types the camera and view interpolation are
//! built on:
//! - [`Place`] rigid coordinate frames with shortest-arc interpolation
//! - [`Bounds`] axis-aligned boxes
//! - [`ClipPlanes`] named scene clip planes
//! - [`Models`] the registry of placed scene objects
//! - [`Options`] session configuration

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod bounds;
pub mod clip_plane;
pub mod error;
pub mod model;
pub mod options;
pub mod place;

pub use bounds::{copies_bounding_box, point_bounds, union_bounds, Bounds};
pub use clip_plane::{ClipPlane, ClipPlaneUniforms, ClipPlanes, FAR_PLANE, MAX_CLIP_PLANES, NEAR_PLANE};
pub use error::{MolviewError, Result};
pub use model::{Model, ModelId, Models};
pub use options::Options;
pub use place::{interpolate_points, interpolate_rotation, rotation_angle_between, Place};

// Re-export glam types for convenience
pub use glam::{DMat4, DVec3};
