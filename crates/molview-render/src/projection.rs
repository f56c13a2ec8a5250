//! Projection matrices.
//!
//! Matrices follow the OpenGL convention: right-handed eye coordinates with
//! the camera looking down -z, column vectors, clip-space depth in [-1, 1].

use glam::{DMat4, DVec4};
use serde::{Deserialize, Serialize};

/// How the camera maps eye space to clip space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective with a horizontal field of view in degrees.
    Perspective {
        /// Horizontal field of view in degrees.
        field_of_view: f64,
    },
    /// Orthographic with a horizontal field width in scene units.
    Orthographic {
        /// Width of the view in scene units.
        field_width: f64,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective {
            field_of_view: 45.0,
        }
    }
}

/// Perspective frustum matrix (as `glFrustum`) with a fractional window shift.
///
/// `xshift` and `yshift` are fractions of the window width and height; they
/// slide the image sideways without changing the view direction, which is how
/// stereo eyes and supersampling offsets are superposed.
///
/// With `A = (r+l)/(r-l) - 2 xshift`, `B = (t+b)/(t-b) - 2 yshift`,
/// `C = -(f+n)/(f-n)`, `D = -2fn/(f-n)`, `E = 2n/(r-l)`, `F = 2n/(t-b)` the
/// columns are `(E,0,0,0) (0,F,0,0) (A,B,C,-1) (0,0,D,0)`.
#[must_use]
pub fn frustum(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    near: f64,
    far: f64,
    xshift: f64,
    yshift: f64,
) -> DMat4 {
    let a = (right + left) / (right - left) - 2.0 * xshift;
    let b = (top + bottom) / (top - bottom) - 2.0 * yshift;
    let c = -(far + near) / (far - near);
    let d = -(2.0 * far * near) / (far - near);
    let e = 2.0 * near / (right - left);
    let f = 2.0 * near / (top - bottom);
    DMat4::from_cols(
        DVec4::new(e, 0.0, 0.0, 0.0),
        DVec4::new(0.0, f, 0.0, 0.0),
        DVec4::new(a, b, c, -1.0),
        DVec4::new(0.0, 0.0, d, 0.0),
    )
}

/// Orthographic matrix (as `glOrtho`) with the same fractional window shift.
#[must_use]
pub fn ortho(
    left: f64,
    right: f64,
    bottom: f64,
    top: f64,
    near: f64,
    far: f64,
    xshift: f64,
    yshift: f64,
) -> DMat4 {
    let a = 2.0 / (right - left);
    let b = 2.0 / (top - bottom);
    let c = -2.0 / (far - near);
    let tx = -(right + left) / (right - left) - 2.0 * xshift;
    let ty = -(top + bottom) / (top - bottom) - 2.0 * yshift;
    let tz = -(far + near) / (far - near);
    DMat4::from_cols(
        DVec4::new(a, 0.0, 0.0, 0.0),
        DVec4::new(0.0, b, 0.0, 0.0),
        DVec4::new(0.0, 0.0, c, 0.0),
        DVec4::new(tx, ty, tz, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_frustum_layout() {
        let m = frustum(-1.0, 1.0, -0.5, 0.5, 1.0, 11.0, 0.0, 0.0);
        assert_eq!(m.x_axis, DVec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(m.y_axis, DVec4::new(0.0, 2.0, 0.0, 0.0));
        assert_eq!(m.z_axis, DVec4::new(0.0, 0.0, -1.2, -1.0));
        assert_eq!(m.w_axis, DVec4::new(0.0, 0.0, -2.2, 0.0));
    }

    #[test]
    fn test_frustum_matches_glam_when_symmetric() {
        let near = 0.5;
        let far = 100.0;
        let fovy: f64 = 60f64.to_radians();
        let aspect = 1.5;
        let h = near * (0.5 * fovy).tan();
        let w = h * aspect;
        let ours = frustum(-w, w, -h, h, near, far, 0.0, 0.0);
        let glam = DMat4::perspective_rh_gl(fovy, aspect, near, far);
        assert!(ours.abs_diff_eq(glam, 1e-12));
    }

    #[test]
    fn test_frustum_near_far_depths() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 10.0, 0.0, 0.0);
        let near = m.project_point3(DVec3::new(0.0, 0.0, -2.0));
        let far = m.project_point3(DVec3::new(0.0, 0.0, -10.0));
        assert!((near.z + 1.0).abs() < 1e-12);
        assert!((far.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shift_moves_image_sideways() {
        let m = frustum(-1.0, 1.0, -1.0, 1.0, 1.0, 10.0, 0.25, 0.0);
        // A point straight ahead lands a quarter window-width right of
        // center (NDC spans 2 units across the window).
        let p = m.project_point3(DVec3::new(0.0, 0.0, -5.0));
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn test_ortho_matches_glam() {
        let ours = ortho(-2.0, 2.0, -1.0, 1.0, 0.1, 50.0, 0.0, 0.0);
        let glam = DMat4::orthographic_rh_gl(-2.0, 2.0, -1.0, 1.0, 0.1, 50.0);
        assert!(ours.abs_diff_eq(glam, 1e-12));
    }
}
