//! Rigid coordinate frames.
//!
//! A [`Place`] maps local coordinates to scene (or parent) coordinates. It is
//! a plain value: composition, inversion and interpolation all return new
//! places. Interpolation decomposes the relative motion into a shortest-arc
//! rotation about a center plus a shift, so intermediate frames stay rigid.

use std::ops::Mul;

use glam::{DAffine3, DMat3, DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// A rotation (or rotation/scale) block followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Place {
    affine: DAffine3,
}

impl Place {
    /// The identity placement.
    pub const IDENTITY: Self = Self {
        affine: DAffine3::IDENTITY,
    };

    /// Wraps an affine transform.
    #[must_use]
    pub fn from_affine(affine: DAffine3) -> Self {
        Self { affine }
    }

    /// Returns the identity placement.
    #[must_use]
    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// A pure translation.
    #[must_use]
    pub fn translation(shift: DVec3) -> Self {
        Self::from_affine(DAffine3::from_translation(shift))
    }

    /// Rotation by `angle_degrees` about `axis` through the point `center`.
    #[must_use]
    pub fn rotation(axis: DVec3, angle_degrees: f64, center: DVec3) -> Self {
        Self::rotation_radians(axis.normalize(), angle_degrees.to_radians(), center)
    }

    /// Rotation about a unit `axis` through `center`, angle in radians.
    fn rotation_radians(axis: DVec3, angle: f64, center: DVec3) -> Self {
        let matrix3 = DMat3::from_axis_angle(axis, angle);
        Self::from_affine(DAffine3::from_mat3_translation(
            matrix3,
            center - matrix3 * center,
        ))
    }

    /// Builds a placement from a rotation quaternion and a translation.
    #[must_use]
    pub fn from_rotation_translation(rotation: DQuat, translation: DVec3) -> Self {
        Self::from_affine(DAffine3::from_rotation_translation(rotation, translation))
    }

    /// Builds a placement from the 12 numbers of a 3x4 matrix given row by row.
    ///
    /// The first three columns are the rotation, the last column is the
    /// translation applied after the rotation.
    #[must_use]
    pub fn from_rows(rows: [f64; 12]) -> Self {
        let [r00, r01, r02, t0, r10, r11, r12, t1, r20, r21, r22, t2] = rows;
        let matrix3 = DMat3::from_cols(
            DVec3::new(r00, r10, r20),
            DVec3::new(r01, r11, r21),
            DVec3::new(r02, r12, r22),
        );
        Self::from_affine(DAffine3::from_mat3_translation(
            matrix3,
            DVec3::new(t0, t1, t2),
        ))
    }

    /// Returns the 3x4 matrix row by row (inverse of [`Place::from_rows`]).
    #[must_use]
    pub fn to_rows(&self) -> [f64; 12] {
        let m = self.affine.matrix3;
        let t = self.affine.translation;
        [
            m.x_axis.x, m.y_axis.x, m.z_axis.x, t.x, //
            m.x_axis.y, m.y_axis.y, m.z_axis.y, t.y, //
            m.x_axis.z, m.y_axis.z, m.z_axis.z, t.z,
        ]
    }

    /// The underlying affine transform.
    #[must_use]
    pub fn affine(&self) -> DAffine3 {
        self.affine
    }

    /// The rotation (or rotation/scale) block.
    #[must_use]
    pub fn matrix3(&self) -> DMat3 {
        self.affine.matrix3
    }

    /// The 4x4 homogeneous matrix.
    #[must_use]
    pub fn to_mat4(&self) -> DMat4 {
        DMat4::from(self.affine)
    }

    /// The image of the local origin.
    #[must_use]
    pub fn origin(&self) -> DVec3 {
        self.affine.translation
    }

    /// Local x axis in the target coordinates.
    #[must_use]
    pub fn x_axis(&self) -> DVec3 {
        self.affine.matrix3.x_axis
    }

    /// Local y axis in the target coordinates.
    #[must_use]
    pub fn y_axis(&self) -> DVec3 {
        self.affine.matrix3.y_axis
    }

    /// Local z axis in the target coordinates.
    #[must_use]
    pub fn z_axis(&self) -> DVec3 {
        self.affine.matrix3.z_axis
    }

    /// The inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_affine(self.affine.inverse())
    }

    /// Same rotation with the translation removed.
    #[must_use]
    pub fn zero_translation(&self) -> Self {
        Self::from_affine(DAffine3::from_mat3(self.affine.matrix3))
    }

    /// Transforms a point.
    #[must_use]
    pub fn transform_point(&self, point: DVec3) -> DVec3 {
        self.affine.transform_point3(point)
    }

    /// Transforms a direction (translation ignored).
    #[must_use]
    pub fn transform_vector(&self, vector: DVec3) -> DVec3 {
        self.affine.transform_vector3(vector)
    }

    /// Transforms a list of points.
    #[must_use]
    pub fn transform_points(&self, points: &[DVec3]) -> Vec<DVec3> {
        points.iter().map(|&p| self.transform_point(p)).collect()
    }

    /// Rotation axis and angle (radians, in `[0, pi]`) of the rotation block.
    ///
    /// The block is assumed to be orthonormal. A zero rotation reports the
    /// x axis with angle 0.
    #[must_use]
    pub fn rotation_axis_angle(&self) -> (DVec3, f64) {
        let mut q = DQuat::from_mat3(&self.affine.matrix3).normalize();
        // q and -q are the same rotation; the non-negative w one is the short way.
        if q.w < 0.0 {
            q = -q;
        }
        q.to_axis_angle()
    }

    /// How far `center` moves under this transform and the rotation angle
    /// in radians.
    #[must_use]
    pub fn shift_and_angle(&self, center: DVec3) -> (f64, f64) {
        let shift = (self.transform_point(center) - center).length();
        let (_, angle) = self.rotation_axis_angle();
        (shift, angle)
    }

    /// Interpolates from this placement toward `other`.
    ///
    /// The relative motion `self⁻¹ · other` is treated as a rotation about
    /// `center` (given in this placement's local coordinates) followed by a
    /// shift; fraction `f` of both is applied. `f == 0` returns `self`
    /// exactly.
    #[must_use]
    pub fn interpolate(&self, other: &Self, center: DVec3, f: f64) -> Self {
        let relative = self.inverse() * *other;
        let (axis, angle) = relative.rotation_axis_angle();
        let shift = relative.transform_point(center) - center;
        let partial = Self::translation(f * shift) * Self::rotation_radians(axis, f * angle, center);
        *self * partial
    }

    /// Whether this placement is within `tolerance` of the identity in every
    /// matrix entry.
    #[must_use]
    pub fn is_identity(&self, tolerance: f64) -> bool {
        self.affine.abs_diff_eq(DAffine3::IDENTITY, tolerance)
    }
}

impl Default for Place {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Place {
    type Output = Place;

    fn mul(self, rhs: Place) -> Place {
        Place::from_affine(self.affine * rhs.affine)
    }
}

impl Mul<DVec3> for Place {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> DVec3 {
        self.transform_point(rhs)
    }
}

/// Interpolates only the rotation parts of two placements.
///
/// Translations are dropped; the result rotates about the origin along the
/// shortest arc from `p1`'s orientation to `p2`'s.
#[must_use]
pub fn interpolate_rotation(p1: &Place, p2: &Place, f: f64) -> Place {
    p1.zero_translation()
        .interpolate(&p2.zero_translation(), DVec3::ZERO, f)
}

/// Linear interpolation between two points; `f == 0` returns `a` exactly.
#[must_use]
pub fn interpolate_points(a: DVec3, b: DVec3, f: f64) -> DVec3 {
    (1.0 - f) * a + f * b
}

/// Angle in radians between the rotation parts of two placements.
#[must_use]
pub fn rotation_angle_between(p1: &Place, p2: &Place) -> f64 {
    (p1.zero_translation().inverse() * p2.zero_translation())
        .rotation_axis_angle()
        .1
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: DVec3, b: DVec3) -> bool {
        a.abs_diff_eq(b, EPS)
    }

    #[test]
    fn test_rows_round_trip() {
        let rows = [0.0, -1.0, 0.0, 1.5, 1.0, 0.0, 0.0, -2.0, 0.0, 0.0, 1.0, 3.25];
        let p = Place::from_rows(rows);
        assert_eq!(p.to_rows(), rows);
        assert_eq!(p.origin(), DVec3::new(1.5, -2.0, 3.25));
        // First column of the rotation is the image of the x axis.
        assert_eq!(p.x_axis(), DVec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_compose_and_inverse() {
        let p = Place::rotation(DVec3::Z, 90.0, DVec3::ZERO) * Place::translation(DVec3::X);
        assert!(approx(p * DVec3::ZERO, DVec3::Y));
        let q = p * p.inverse();
        assert!(q.is_identity(EPS));
    }

    #[test]
    fn test_rotation_about_center_fixes_center() {
        let center = DVec3::new(3.0, -1.0, 2.0);
        let p = Place::rotation(DVec3::new(1.0, 1.0, 0.0), 73.0, center);
        assert!(approx(p * center, center));
        let (axis, angle) = p.rotation_axis_angle();
        assert!((angle - 73f64.to_radians()).abs() < EPS);
        assert!(approx(axis, DVec3::new(1.0, 1.0, 0.0).normalize()));
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Place::translation(DVec3::new(1.0, 2.0, 3.0));
        let b = Place::rotation(DVec3::Y, 120.0, DVec3::new(0.0, 0.0, 5.0))
            * Place::translation(DVec3::new(-4.0, 0.0, 1.0));
        let c = DVec3::new(0.5, 0.5, 0.5);
        assert_eq!(a.interpolate(&b, c, 0.0), a);
        assert!(a.interpolate(&b, c, 1.0).affine().abs_diff_eq(b.affine(), 1e-9));
    }

    #[test]
    fn test_interpolate_rotates_about_center() {
        let center = DVec3::new(10.0, 0.0, 0.0);
        let a = Place::IDENTITY;
        let b = Place::rotation(DVec3::Z, 90.0, center);
        let half = a.interpolate(&b, center, 0.5);
        // The pivot never moves.
        assert!(approx(half * center, center));
        let (_, angle) = half.rotation_axis_angle();
        assert!((angle - 45f64.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_interpolate_pure_shift() {
        let a = Place::translation(DVec3::new(1.0, 0.0, 0.0));
        let b = Place::translation(DVec3::new(6.0, 0.0, 0.0));
        let half = a.interpolate(&b, DVec3::new(7.0, 7.0, 7.0), 0.5);
        assert!(approx(half.origin(), DVec3::new(3.5, 0.0, 0.0)));
    }

    #[test]
    fn test_interpolate_rotation_takes_short_arc() {
        let a = Place::IDENTITY;
        // 270 degrees one way is 90 degrees the other.
        let b = Place::rotation(DVec3::Z, 270.0, DVec3::ZERO);
        let half = interpolate_rotation(&a, &b, 0.5);
        let (axis, angle) = half.rotation_axis_angle();
        assert!((angle - 45f64.to_radians()).abs() < EPS);
        assert!(approx(axis, DVec3::NEG_Z));
    }

    #[test]
    fn test_interpolate_rotation_ignores_translation() {
        let a = Place::translation(DVec3::new(4.0, 4.0, 4.0));
        let b = Place::rotation(DVec3::X, 60.0, DVec3::new(1.0, 2.0, 3.0));
        let r = interpolate_rotation(&a, &b, 0.5);
        assert_eq!(r.origin(), DVec3::ZERO);
        assert!((rotation_angle_between(&a, &r) - 30f64.to_radians()).abs() < EPS);
    }

    #[test]
    fn test_shift_and_angle() {
        let p = Place::translation(DVec3::new(0.0, 3.0, 4.0));
        let (shift, angle) = p.shift_and_angle(DVec3::ZERO);
        assert!((shift - 5.0).abs() < EPS);
        assert!(angle.abs() < EPS);
    }

    #[test]
    fn test_interpolate_points() {
        let a = DVec3::new(0.1, 0.2, 0.3);
        let b = DVec3::new(1.0, -1.0, 2.0);
        assert_eq!(interpolate_points(a, b, 0.0), a);
        assert!(approx(interpolate_points(a, b, 1.0), b));
    }

    #[test]
    fn test_serde_round_trip_is_exact() {
        let p = Place::rotation(DVec3::new(0.3, -0.7, 0.1), 33.3, DVec3::new(1.1, 2.2, 3.3));
        let text = serde_json::to_string(&p).unwrap();
        let back: Place = serde_json::from_str(&text).unwrap();
        assert_eq!(p, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn unit_axis() -> impl Strategy<Value = DVec3> {
            (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
                .prop_filter("non-degenerate axis", |(x, y, z)| x * x + y * y + z * z > 0.01)
                .prop_map(|(x, y, z)| DVec3::new(x, y, z).normalize())
        }

        proptest! {
            #[test]
            fn rotation_interpolation_stays_on_the_arc(
                axis1 in unit_axis(),
                angle1 in -179.0f64..179.0,
                axis2 in unit_axis(),
                angle2 in -179.0f64..179.0,
                f in 0.0f64..1.0,
            ) {
                let p1 = Place::rotation(axis1, angle1, DVec3::ZERO);
                let p2 = Place::rotation(axis2, angle2, DVec3::ZERO);
                let total = rotation_angle_between(&p1, &p2);
                prop_assume!(total < 3.1);
                let r = interpolate_rotation(&p1, &p2, f);
                let to_start = rotation_angle_between(&p1, &r);
                let to_end = rotation_angle_between(&r, &p2);
                prop_assert!((to_start + to_end - total).abs() < 1e-6);
                prop_assert!((to_start - f * total).abs() < 1e-6);
            }

            #[test]
            fn interpolation_at_zero_is_exact(
                axis in unit_axis(),
                angle in -179.0f64..179.0,
                x in -50.0f64..50.0,
                y in -50.0f64..50.0,
            ) {
                let p1 = Place::translation(DVec3::new(x, y, 0.0));
                let p2 = Place::rotation(axis, angle, DVec3::new(y, x, 1.0));
                prop_assert_eq!(p1.interpolate(&p2, DVec3::new(1.0, 2.0, 3.0), 0.0), p1);
            }
        }
    }
}
