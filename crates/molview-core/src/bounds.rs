//! Axis-aligned bounding boxes.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::place::Place;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Bounds {
    /// Creates bounds from two corners.
    #[must_use]
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        0.5 * (self.min + self.max)
    }

    /// Largest edge length.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.max - self.min).max_element()
    }

    /// Radius of the sphere through the corners.
    #[must_use]
    pub fn radius(&self) -> f64 {
        0.5 * (self.max - self.min).length()
    }

    /// The eight corners.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// Bounds of a point set, optionally replicated by each of `placements`.
///
/// Returns `None` for an empty point set.
#[must_use]
pub fn point_bounds(points: &[DVec3], placements: &[Place]) -> Option<Bounds> {
    let first = *points.first()?;
    if placements.is_empty() {
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        return Some(Bounds::new(min, max));
    }
    union_bounds(
        placements
            .iter()
            .map(|place| point_bounds(&place.transform_points(points), &[])),
    )
}

/// Union of a sequence of optional bounds, skipping `None` entries.
pub fn union_bounds<I>(bounds: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Option<Bounds>>,
{
    bounds
        .into_iter()
        .flatten()
        .reduce(|acc, b| acc.union(&b))
}

/// Scene bounds of a box copied at each placement.
#[must_use]
pub fn copies_bounding_box(bounds: Option<Bounds>, positions: &[Place]) -> Option<Bounds> {
    let corners = bounds?.corners();
    union_bounds(
        positions
            .iter()
            .map(|p| point_bounds(&p.transform_points(&corners), &[])),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_width_radius() {
        let b = Bounds::new(DVec3::ZERO, DVec3::new(2.0, 4.0, 4.0));
        assert_eq!(b.center(), DVec3::new(1.0, 2.0, 2.0));
        assert_eq!(b.width(), 4.0);
        assert!((b.radius() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_point_bounds() {
        assert!(point_bounds(&[], &[]).is_none());
        let pts = [DVec3::new(1.0, -1.0, 0.0), DVec3::new(-2.0, 3.0, 5.0)];
        let b = point_bounds(&pts, &[]).unwrap();
        assert_eq!(b.min, DVec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 3.0, 5.0));
    }

    #[test]
    fn test_point_bounds_with_placements() {
        let pts = [DVec3::ZERO];
        let copies = [
            Place::translation(DVec3::new(-1.0, 0.0, 0.0)),
            Place::translation(DVec3::new(4.0, 2.0, 0.0)),
        ];
        let b = point_bounds(&pts, &copies).unwrap();
        assert_eq!(b.min, DVec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, DVec3::new(4.0, 2.0, 0.0));
    }

    #[test]
    fn test_union_skips_missing() {
        let a = Bounds::new(DVec3::ZERO, DVec3::ONE);
        let b = Bounds::new(DVec3::splat(2.0), DVec3::splat(3.0));
        let u = union_bounds([Some(a), None, Some(b)]).unwrap();
        assert_eq!(u, Bounds::new(DVec3::ZERO, DVec3::splat(3.0)));
        assert!(union_bounds([None, None]).is_none());
    }

    #[test]
    fn test_copies_bounding_box() {
        let unit = Bounds::new(DVec3::ZERO, DVec3::ONE);
        let b = copies_bounding_box(
            Some(unit),
            &[Place::IDENTITY, Place::translation(DVec3::new(0.0, 0.0, 10.0))],
        )
        .unwrap();
        assert_eq!(b.max, DVec3::new(1.0, 1.0, 11.0));
        assert!(copies_bounding_box(None, &[Place::IDENTITY]).is_none());
        assert!(copies_bounding_box(Some(unit), &[]).is_none());
    }
}
