//! Named clip planes.
//!
//! A clip plane hides scene content on its negative side. Planes are
//! identified by name; `near` and `far` are the conventional planes placed in
//! front of and behind a framed selection.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Name of the plane clipping content in front of the focus.
pub const NEAR_PLANE: &str = "near";

/// Name of the plane clipping content behind the focus.
pub const FAR_PLANE: &str = "far";

/// A named plane through `plane_point` with unit `normal`.
///
/// Points with negative signed distance (opposite to the normal) are clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipPlane {
    name: String,
    normal: DVec3,
    plane_point: DVec3,
}

impl ClipPlane {
    /// Creates a plane; the normal is normalized.
    pub fn new(name: impl Into<String>, normal: DVec3, plane_point: DVec3) -> Self {
        Self {
            name: name.into(),
            normal: normal.normalize(),
            plane_point,
        }
    }

    /// Returns the name of this plane.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Sets the normal; it is normalized.
    pub fn set_normal(&mut self, normal: DVec3) {
        self.normal = normal.normalize();
    }

    /// Returns the reference point on the plane.
    pub fn plane_point(&self) -> DVec3 {
        self.plane_point
    }

    /// Moves the plane to pass through `point`.
    pub fn set_plane_point(&mut self, point: DVec3) {
        self.plane_point = point;
    }

    /// Signed distance from the plane, positive on the normal side.
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        (point - self.plane_point).dot(self.normal)
    }

    /// Whether a point is hidden by this plane.
    pub fn is_clipped(&self, point: DVec3) -> bool {
        self.signed_distance(point) < 0.0
    }

    /// Projects a point onto the plane.
    pub fn project(&self, point: DVec3) -> DVec3 {
        point - self.signed_distance(point) * self.normal
    }
}

/// The ordered set of clip planes of a view, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipPlanes {
    planes: Vec<ClipPlane>,
}

impl ClipPlanes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All planes in insertion order.
    pub fn planes(&self) -> &[ClipPlane] {
        &self.planes
    }

    /// Mutable access to all planes.
    pub fn planes_mut(&mut self) -> &mut [ClipPlane] {
        &mut self.planes
    }

    /// Finds a plane by name.
    pub fn find_plane(&self, name: &str) -> Option<&ClipPlane> {
        self.planes.iter().find(|p| p.name == name)
    }

    /// Finds a plane by name for modification.
    pub fn find_plane_mut(&mut self, name: &str) -> Option<&mut ClipPlane> {
        self.planes.iter_mut().find(|p| p.name == name)
    }

    /// Adds a plane, replacing any existing plane with the same name.
    pub fn add_plane(&mut self, plane: ClipPlane) {
        match self.find_plane_mut(&plane.name) {
            Some(existing) => *existing = plane,
            None => self.planes.push(plane),
        }
    }

    /// Replaces the whole set.
    pub fn replace_planes(&mut self, planes: Vec<ClipPlane>) {
        self.planes.clear();
        for plane in planes {
            self.add_plane(plane);
        }
    }

    /// Removes a plane by name, returning it if present.
    pub fn remove_plane(&mut self, name: &str) -> Option<ClipPlane> {
        let index = self.planes.iter().position(|p| p.name == name)?;
        Some(self.planes.remove(index))
    }

    /// Removes all planes.
    pub fn clear(&mut self) {
        self.planes.clear();
    }

    /// Number of planes.
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Returns true if there are no planes.
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Places the named plane through `point`, facing along the camera view.
    ///
    /// The far plane faces back toward the camera; every other plane keeps
    /// what lies beyond it along `view_direction`.
    pub fn set_clip_position(&mut self, name: &str, point: DVec3, view_direction: DVec3) {
        let normal = if name == FAR_PLANE {
            -view_direction
        } else {
            view_direction
        };
        self.add_plane(ClipPlane::new(name, normal, point));
    }

    /// Whether a point is hidden by any plane.
    pub fn is_clipped(&self, point: DVec3) -> bool {
        self.planes.iter().any(|p| p.is_clipped(point))
    }
}

/// GPU-compatible clip plane uniforms.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ClipPlaneUniforms {
    /// A point on the plane.
    pub plane_point: [f32; 3],
    /// Whether this slot holds a plane (1.0) or is unused (0.0).
    pub enabled: f32,
    /// Unit normal of the plane.
    pub normal: [f32; 3],
    /// Padding for alignment.
    pub _padding: f32,
}

impl From<&ClipPlane> for ClipPlaneUniforms {
    fn from(plane: &ClipPlane) -> Self {
        Self {
            plane_point: plane.plane_point.as_vec3().to_array(),
            enabled: 1.0,
            normal: plane.normal.as_vec3().to_array(),
            _padding: 0.0,
        }
    }
}

impl Default for ClipPlaneUniforms {
    fn default() -> Self {
        Self {
            plane_point: [0.0; 3],
            enabled: 0.0,
            normal: [0.0, 0.0, 1.0],
            _padding: 0.0,
        }
    }
}

/// Maximum number of clip planes a renderer is handed.
pub const MAX_CLIP_PLANES: usize = 8;

impl ClipPlanes {
    /// Fixed-size uniform array; planes beyond [`MAX_CLIP_PLANES`] are dropped.
    pub fn uniforms(&self) -> [ClipPlaneUniforms; MAX_CLIP_PLANES] {
        let mut out = [ClipPlaneUniforms::default(); MAX_CLIP_PLANES];
        if self.planes.len() > MAX_CLIP_PLANES {
            log::warn!(
                "{} clip planes exceed the renderer limit of {MAX_CLIP_PLANES}",
                self.planes.len()
            );
        }
        for (slot, plane) in out.iter_mut().zip(&self.planes) {
            *slot = plane.into();
        }
        out
    }
}
