//! Smooth transitions between two named views.
//!
//! A [`ViewInterpolation`] is driven once per rendered frame. Intermediate
//! frames blend camera, field of view, clip planes and model placements; the
//! last frame applies the end view exactly, so floating point drift never
//! decides where the animation stops.
//!
//! Pieces of the two views that cannot be blended consistently (planes whose
//! normals differ, models whose instance count changed, models missing from
//! one view) are left alone until the final snap.

use std::collections::BTreeMap;

use glam::DVec3;
use molview_core::{
    interpolate_points, interpolate_rotation, union_bounds, Bounds, ClipPlane, ClipPlanes,
    ModelId, Models, Options, Place,
};
use molview_render::Camera;

use crate::named_view::NamedView;
use crate::session::Session;

/// Rotation center of each moving model, in its parent's coordinates.
pub type MotionCenters = BTreeMap<ModelId, DVec3>;

/// Progress of a [`ViewInterpolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationState {
    /// No frame applied yet.
    Pending,
    /// Some intermediate frames applied.
    Interpolating,
    /// The end view has been applied.
    Finished,
}

/// An in-progress transition from one view to another.
#[derive(Debug, Clone)]
pub struct ViewInterpolation {
    start: NamedView,
    end: NamedView,
    frames: usize,
    centers: MotionCenters,
    next_frame: usize,
}

impl ViewInterpolation {
    /// Prepares a transition over `frames` frames (at least one).
    ///
    /// Motion centers are computed from the session's current model bounds,
    /// which should correspond to `start`.
    pub fn new(session: &Session, start: NamedView, end: NamedView, frames: usize) -> Self {
        let centers = model_motion_centers(
            &start.positions,
            &end.positions,
            &session.models,
            &session.options,
        );
        Self {
            start,
            end,
            frames: frames.max(1),
            centers,
            next_frame: 0,
        }
    }

    pub fn start(&self) -> &NamedView {
        &self.start
    }

    pub fn end(&self) -> &NamedView {
        &self.end
    }

    /// Total number of frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Index of the frame [`step`](Self::step) applies next.
    pub fn next_frame(&self) -> usize {
        self.next_frame
    }

    pub fn motion_centers(&self) -> &MotionCenters {
        &self.centers
    }

    /// Current progress.
    pub fn state(&self) -> InterpolationState {
        if self.next_frame == 0 {
            InterpolationState::Pending
        } else if self.next_frame < self.frames {
            InterpolationState::Interpolating
        } else {
            InterpolationState::Finished
        }
    }

    /// Applies frame `frame` of the transition to the session.
    ///
    /// Frame `frames - 1` (and anything past it) snaps to the end view.
    #[allow(clippy::cast_precision_loss)]
    pub fn frame(&self, session: &mut Session, frame: usize) {
        if frame + 1 >= self.frames {
            self.end.apply(session);
        } else {
            let f = frame as f64 / self.frames as f64;
            interpolate_views(&self.start, &self.end, f, session, &self.centers);
        }
    }

    /// Applies the next frame, if any, and reports the progress.
    pub fn step(&mut self, session: &mut Session) -> InterpolationState {
        if self.next_frame < self.frames {
            self.frame(session, self.next_frame);
            self.next_frame += 1;
        }
        self.state()
    }

    /// Steps until the end view has been applied.
    pub fn finish(&mut self, session: &mut Session) {
        while self.step(session) != InterpolationState::Finished {}
    }
}

/// Blends every part of two views into the session at fraction `f`.
pub fn interpolate_views(
    v1: &NamedView,
    v2: &NamedView,
    f: f64,
    session: &mut Session,
    centers: &MotionCenters,
) {
    interpolate_camera(v1, v2, f, &mut session.camera);
    interpolate_clip_planes(v1, v2, f, &mut session.clip_planes);
    interpolate_model_positions(v1, v2, centers, f, &mut session.models);
}

/// Moves the camera part way between two views.
///
/// The orientation follows the shortest arc. The position is chosen so the
/// interpolated look-at point, expressed in interpolated camera coordinates,
/// lands on the interpolated scene look-at point; the subject therefore
/// stays put on screen during a combined pan and turn.
pub fn interpolate_camera(v1: &NamedView, v2: &NamedView, f: f64, camera: &mut Camera) {
    let (c1, c2) = (&v1.camera, &v2.camera);
    let (p1, p2) = (c1.position, c2.position);
    let rotation = interpolate_rotation(&p1, &p2, f);
    let look_at = interpolate_points(v1.look_at, v2.look_at, f);
    let camera_look_at1 = p1.inverse() * v1.look_at;
    let camera_look_at2 = p2.inverse() * v2.look_at;
    let camera_look_at = interpolate_points(camera_look_at1, camera_look_at2, f);
    let translation = Place::translation(look_at - rotation * camera_look_at);
    camera.set_position(translation * rotation);

    match (c1.field_of_view, c2.field_of_view, c1.field_width, c2.field_width) {
        (Some(fov1), Some(fov2), _, _) => {
            camera.set_field_of_view((1.0 - f) * fov1 + f * fov2);
        }
        (_, _, Some(w1), Some(w2)) => {
            camera.set_field_width((1.0 - f) * w1 + f * w2);
        }
        _ => log::debug!("views use different projections, field of view not interpolated"),
    }

    camera.mark_redraw_needed();
}

/// Planes of `v1` blended toward `v2`.
///
/// Only planes present in both views with identical normals are included;
/// their normal is kept and their point moves linearly.
pub fn interpolated_clip_planes(v1: &NamedView, v2: &NamedView, f: f64) -> Vec<ClipPlane> {
    let mut planes = Vec::new();
    for p1 in &v1.clip_planes {
        let Some(p2) = v2.clip_planes.iter().find(|p| p.name() == p1.name()) else {
            continue;
        };
        if p1.normal() != p2.normal() {
            log::debug!("clip plane '{}' changes normal, not interpolated", p1.name());
            continue;
        }
        let mut plane = p1.clone();
        plane.set_plane_point(interpolate_points(p1.plane_point(), p2.plane_point(), f));
        planes.push(plane);
    }
    planes
}

/// Updates live clip planes that can be blended between two views.
///
/// Planes the session no longer has are not recreated.
pub fn interpolate_clip_planes(v1: &NamedView, v2: &NamedView, f: f64, clip_planes: &mut ClipPlanes) {
    for plane in interpolated_clip_planes(v1, v2, f) {
        if let Some(live) = clip_planes.find_plane_mut(plane.name()) {
            *live = plane;
        }
    }
}

/// Moves models part way between their placements in two views.
///
/// A model is moved only if it is placed in both views, its placements
/// differ, its instance count is unchanged, it has a motion center and it
/// still exists.
pub fn interpolate_model_positions(
    v1: &NamedView,
    v2: &NamedView,
    centers: &MotionCenters,
    f: f64,
    models: &mut Models,
) {
    for (&id, places1) in &v1.positions {
        let Some(places2) = v2.positions.get(&id) else {
            log::debug!("model {id} is not in the end view, not interpolated");
            continue;
        };
        if places1 == places2 {
            continue;
        }
        if places1.len() != places2.len() {
            log::debug!(
                "model {id} has {} instances then {}, not interpolated",
                places1.len(),
                places2.len()
            );
            continue;
        }
        let Some(&center) = centers.get(&id) else {
            log::debug!("model {id} has no motion center, not interpolated");
            continue;
        };
        let Some(model) = models.get_mut(id) else {
            log::debug!("model {id} was closed, not interpolated");
            continue;
        };
        model.set_positions(interpolated_positions(places1, places2, center, f));
    }
}

/// Blends each instance placement about a center given in parent
/// coordinates.
pub fn interpolated_positions(
    places1: &[Place],
    places2: &[Place],
    center: DVec3,
    f: f64,
) -> Vec<Place> {
    places1
        .iter()
        .zip(places2)
        .map(|(p1, p2)| p1.interpolate(p2, p1.inverse() * center, f))
        .collect()
}

/// Models with the same parent and nearly the same motion, rotating about
/// one shared center.
struct RigidGroup {
    motion: Place,
    members: Vec<ModelId>,
    bounds: Vec<Bounds>,
}

/// Finds a common rotation center for models that move rigidly together.
///
/// Models placed in both position sets are grouped by parent and by the
/// motion of their first instance; two motions match when the rotation
/// between them is within `options.rigid_max_rotation_angle` radians and
/// it moves the origin by at most `options.rigid_max_shift`. Each group's
/// center is the center of the union of its members' current scene bounds,
/// stored in each member's parent coordinates. Hidden models and models
/// without bounds get no center.
pub fn model_motion_centers(
    positions1: &BTreeMap<ModelId, Vec<Place>>,
    positions2: &BTreeMap<ModelId, Vec<Place>>,
    models: &Models,
    options: &Options,
) -> MotionCenters {
    let mut groups: Vec<RigidGroup> = Vec::new();
    let mut groups_by_parent: BTreeMap<Option<ModelId>, Vec<usize>> = BTreeMap::new();

    for (&id, places1) in positions1 {
        let Some(places2) = positions2.get(&id) else {
            continue;
        };
        let (Some(first1), Some(first2)) = (places1.first(), places2.first()) else {
            continue;
        };
        let Some(model) = models.get(id) else {
            continue;
        };
        let Some(bounds) = models.scene_bounds(id) else {
            continue;
        };

        let motion = *first2 * first1.inverse();
        let inverse = motion.inverse();
        let candidates = groups_by_parent.entry(model.parent()).or_default();
        let matching = candidates.iter().copied().find(|&g| {
            let (shift, angle) = (inverse * groups[g].motion).shift_and_angle(DVec3::ZERO);
            angle <= options.rigid_max_rotation_angle && shift <= options.rigid_max_shift
        });
        let group = match matching {
            Some(g) => &mut groups[g],
            None => {
                candidates.push(groups.len());
                groups.push(RigidGroup {
                    motion,
                    members: Vec::new(),
                    bounds: Vec::new(),
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        group.members.push(id);
        group.bounds.push(bounds);
    }

    let mut centers = MotionCenters::new();
    for group in groups {
        let Some(bounds) = union_bounds(group.bounds.into_iter().map(Some)) else {
            continue;
        };
        let scene_center = bounds.center();
        for id in group.members {
            centers.insert(id, models.scene_to_parent(id, scene_center));
        }
    }
    log::debug!("computed motion centers for {} models", centers.len());
    centers
}
