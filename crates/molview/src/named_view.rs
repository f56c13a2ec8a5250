//! Named views: saved camera, clip plane and model placements.
//!
//! A [`NamedView`] is an immutable snapshot taken from a [`Session`]. Showing
//! it later either snaps back to it or interpolates toward it (see
//! [`crate::interpolate`]). Views persist as versioned records so a session
//! file written by an incompatible version is rejected rather than misread.

use std::collections::BTreeMap;

use glam::DVec3;
use molview_core::{ClipPlane, ModelId, MolviewError, Place, Result};
use molview_render::Camera;
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Record version written by [`NamedView::take_snapshot`].
pub const NAMED_VIEW_VERSION: u32 = 1;

/// Record version written by [`NamedViews::take_snapshot`].
pub const NAMED_VIEWS_VERSION: u32 = 1;

/// The camera attributes saved in a named view.
///
/// Attributes the camera does not define (field width of a perspective
/// camera, eye separations of a mono camera) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraAttributes {
    pub position: Place,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_view: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_separation_scene: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_separation_pixels: Option<f64>,
}

impl CameraAttributes {
    /// Reads the attributes of a camera.
    pub fn capture(camera: &Camera) -> Self {
        Self {
            position: camera.position(),
            field_of_view: camera.field_of_view(),
            field_width: camera.field_width(),
            eye_separation_scene: camera.eye_separation_scene(),
            eye_separation_pixels: camera.eye_separation_pixels(),
        }
    }

    /// Writes the defined attributes back to a camera.
    ///
    /// Eye separations only take effect on a stereo camera.
    pub fn apply(&self, camera: &mut Camera) {
        camera.set_position(self.position);
        if let Some(fov) = self.field_of_view {
            camera.set_field_of_view(fov);
        } else if let Some(width) = self.field_width {
            camera.set_field_width(width);
        }
        if let Some(separation) = self.eye_separation_scene {
            camera.set_eye_separation_scene(separation);
        }
        if let Some(separation) = self.eye_separation_pixels {
            camera.set_eye_separation_pixels(separation);
        }
    }
}

/// A saved view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedView {
    /// Camera attributes.
    pub camera: CameraAttributes,

    /// Copies of the clip planes.
    pub clip_planes: Vec<ClipPlane>,

    /// Scene point that was the focus of attention. Interpolation keeps it
    /// steady on screen while the camera moves and turns.
    pub look_at: DVec3,

    /// Instance placements of every model.
    pub positions: BTreeMap<ModelId, Vec<Place>>,
}

impl NamedView {
    /// Captures the current state of a session.
    pub fn capture(session: &Session) -> Self {
        Self {
            camera: CameraAttributes::capture(&session.camera),
            clip_planes: session.clip_planes.planes().to_vec(),
            look_at: session.center_of_rotation,
            positions: session
                .models
                .iter()
                .map(|m| (m.id(), m.positions().to_vec()))
                .collect(),
        }
    }

    /// Restores this view exactly.
    ///
    /// Models created after the view was saved keep their placements; saved
    /// models that no longer exist are ignored.
    pub fn apply(&self, session: &mut Session) {
        self.camera.apply(&mut session.camera);
        session.clip_planes.replace_planes(self.clip_planes.clone());
        for model in session.models.iter_mut() {
            if let Some(positions) = self.positions.get(&model.id()) {
                if model.positions() != positions.as_slice() {
                    model.set_positions(positions.clone());
                }
            }
        }
    }

    /// Versioned record of this view.
    pub fn take_snapshot(&self) -> NamedViewSnapshot {
        NamedViewSnapshot {
            version: NAMED_VIEW_VERSION,
            view: self.clone(),
        }
    }

    /// Rebuilds a view from a record.
    pub fn restore_snapshot(snapshot: NamedViewSnapshot) -> Result<Self> {
        check_version("named view", NAMED_VIEW_VERSION, snapshot.version)?;
        Ok(snapshot.view)
    }
}

/// Persisted form of a [`NamedView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedViewSnapshot {
    pub version: u32,
    #[serde(rename = "view attrs")]
    pub view: NamedView,
}

/// Persisted form of [`NamedViews`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedViewsSnapshot {
    pub version: u32,
    pub views: BTreeMap<String, NamedViewSnapshot>,
}

fn check_version(kind: &'static str, expected: u32, found: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(MolviewError::VersionMismatch {
            kind,
            expected,
            found,
        })
    }
}

/// The table of saved views, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedViews {
    views: BTreeMap<String, NamedView>,
}

impl NamedViews {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a view, returning the one it replaces.
    pub fn insert(&mut self, name: impl Into<String>, view: NamedView) -> Option<NamedView> {
        self.views.insert(name.into(), view)
    }

    /// Looks up a view.
    pub fn get(&self, name: &str) -> Option<&NamedView> {
        self.views.get(name)
    }

    /// Looks up a view or reports it as missing.
    pub fn require(&self, name: &str) -> Result<&NamedView> {
        self.get(name)
            .ok_or_else(|| MolviewError::ViewNotFound(name.to_string()))
    }

    /// Deletes a view.
    pub fn remove(&mut self, name: &str) -> Option<NamedView> {
        self.views.remove(name)
    }

    /// Deletes every view.
    pub fn clear(&mut self) {
        self.views.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }

    /// View names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.views.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NamedView)> {
        self.views.iter().map(|(name, view)| (name.as_str(), view))
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Versioned record of the whole table.
    pub fn take_snapshot(&self) -> NamedViewsSnapshot {
        NamedViewsSnapshot {
            version: NAMED_VIEWS_VERSION,
            views: self
                .views
                .iter()
                .map(|(name, view)| (name.clone(), view.take_snapshot()))
                .collect(),
        }
    }

    /// Replaces the table with the contents of a record.
    ///
    /// Every version is checked before anything changes, so a rejected
    /// record leaves the table as it was.
    pub fn restore_snapshot(&mut self, snapshot: NamedViewsSnapshot) -> Result<()> {
        check_version("named views", NAMED_VIEWS_VERSION, snapshot.version)?;
        let views = snapshot
            .views
            .into_iter()
            .map(|(name, view)| Ok((name, NamedView::restore_snapshot(view)?)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        self.views = views;
        log::debug!("restored {} named views", self.views.len());
        Ok(())
    }

    /// Serializes the table as a JSON record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.take_snapshot())?)
    }

    /// Replaces the table with a JSON record.
    pub fn restore_json(&mut self, text: &str) -> Result<()> {
        let snapshot: NamedViewsSnapshot = serde_json::from_str(text)?;
        self.restore_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molview_core::{Bounds, Model};
    use molview_render::CameraMode;

    fn sample_session() -> Session {
        let mut session = Session::new();
        let bounds = Bounds::new(DVec3::ZERO, DVec3::ONE);
        session
            .models
            .add(Model::new(ModelId(1), "a").with_geometry_bounds(bounds))
            .unwrap();
        session
            .models
            .add(
                Model::new(ModelId(2), "b")
                    .with_geometry_bounds(bounds)
                    .with_position(Place::translation(DVec3::new(3.0, 0.0, 0.0))),
            )
            .unwrap();
        session.camera.set_position(
            Place::translation(DVec3::new(0.1, 0.2, 30.0))
                * Place::rotation(DVec3::new(1.0, 1.0, 0.0), 17.0, DVec3::ZERO),
        );
        session
            .clip_planes
            .set_clip_position("near", DVec3::new(0.0, 0.0, 2.0), DVec3::NEG_Z);
        session.center_of_rotation = DVec3::new(1.5, 0.5, 0.5);
        session
    }

    #[test]
    fn test_capture_perspective_mono() {
        let session = sample_session();
        let view = NamedView::capture(&session);
        assert_eq!(view.camera.field_of_view, Some(45.0));
        assert_eq!(view.camera.field_width, None);
        assert_eq!(view.camera.eye_separation_scene, None);
        assert_eq!(view.clip_planes.len(), 1);
        assert_eq!(view.look_at, DVec3::new(1.5, 0.5, 0.5));
        assert_eq!(view.positions.len(), 2);
    }

    #[test]
    fn test_capture_stereo() {
        let mut session = sample_session();
        session.camera.set_mode(CameraMode::stereo(0.7, 150.0));
        let view = NamedView::capture(&session);
        assert_eq!(view.camera.eye_separation_scene, Some(0.7));
        assert_eq!(view.camera.eye_separation_pixels, Some(150.0));
    }

    #[test]
    fn test_apply_restores_exactly() {
        let mut session = sample_session();
        let view = NamedView::capture(&session);

        session.camera.set_position(Place::IDENTITY);
        session.camera.set_field_of_view(80.0);
        session.clip_planes.clear();
        session
            .models
            .get_mut(ModelId(2))
            .unwrap()
            .set_position(Place::IDENTITY);

        view.apply(&mut session);
        assert_eq!(NamedView::capture(&session), view);
    }

    #[test]
    fn test_apply_leaves_new_models_alone() {
        let mut session = sample_session();
        let view = NamedView::capture(&session);
        let moved = Place::translation(DVec3::new(0.0, 9.0, 0.0));
        session
            .models
            .add(Model::new(ModelId(3), "c").with_position(moved))
            .unwrap();
        session.models.remove(ModelId(1));

        view.apply(&mut session);
        assert_eq!(session.models.get(ModelId(3)).unwrap().position(), moved);
    }

    #[test]
    fn test_names_sorted() {
        let session = sample_session();
        let mut views = NamedViews::new();
        for name in ["side", "front", "top"] {
            views.insert(name, NamedView::capture(&session));
        }
        assert_eq!(views.names(), vec!["front", "side", "top"]);
        assert!(views.remove("side").is_some());
        assert!(views.remove("side").is_none());
        assert_eq!(views.len(), 2);
        assert!(matches!(
            views.require("side"),
            Err(MolviewError::ViewNotFound(name)) if name == "side"
        ));
    }

    #[test]
    fn test_json_round_trip_is_exact() {
        let session = sample_session();
        let mut views = NamedViews::new();
        views.insert("front", NamedView::capture(&session));
        let json = views.to_json().unwrap();

        let mut restored = NamedViews::new();
        restored.restore_json(&json).unwrap();
        assert_eq!(restored, views);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let session = sample_session();
        let mut views = NamedViews::new();
        views.insert("front", NamedView::capture(&session));

        let mut snapshot = views.take_snapshot();
        snapshot.version = 2;
        let mut target = NamedViews::new();
        target.insert("keep", NamedView::capture(&session));
        let err = target.restore_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            MolviewError::VersionMismatch {
                expected: 1,
                found: 2,
                ..
            }
        ));
        assert_eq!(target.names(), vec!["keep"]);

        let mut snapshot = views.take_snapshot();
        snapshot.views.get_mut("front").unwrap().version = 0;
        assert!(target.restore_snapshot(snapshot).is_err());
        assert_eq!(target.names(), vec!["keep"]);
    }
}
