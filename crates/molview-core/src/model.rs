//! Models and the model registry.
//!
//! A model is anything placed in the scene: it has one or more instance
//! placements relative to its parent model (or the scene when it has none)
//! and, if it has geometry, bounds in its own coordinates.

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::bounds::{copies_bounding_box, union_bounds, Bounds};
use crate::error::{MolviewError, Result};
use crate::place::Place;

/// Identity of a model, stable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u32);

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A placed scene object.
#[derive(Debug, Clone)]
pub struct Model {
    id: ModelId,
    name: String,
    parent: Option<ModelId>,
    positions: Vec<Place>,
    geometry_bounds: Option<Bounds>,
    display: bool,
}

impl Model {
    /// Creates a displayed model with a single identity placement.
    pub fn new(id: ModelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            parent: None,
            positions: vec![Place::IDENTITY],
            geometry_bounds: None,
            display: true,
        }
    }

    /// Sets the parent model.
    #[must_use]
    pub fn with_parent(mut self, parent: ModelId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the bounds of the model's geometry in its own coordinates.
    #[must_use]
    pub fn with_geometry_bounds(mut self, bounds: Bounds) -> Self {
        self.geometry_bounds = Some(bounds);
        self
    }

    /// Sets the single placement.
    #[must_use]
    pub fn with_position(mut self, position: Place) -> Self {
        self.positions = vec![position];
        self
    }

    /// Sets all instance placements.
    #[must_use]
    pub fn with_positions(mut self, positions: Vec<Place>) -> Self {
        self.positions = positions;
        self
    }

    /// Returns the id of this model.
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Returns the name of this model.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent model, if any.
    pub fn parent(&self) -> Option<ModelId> {
        self.parent
    }

    /// The first instance placement (identity if there are none).
    pub fn position(&self) -> Place {
        self.positions.first().copied().unwrap_or_default()
    }

    /// Replaces all instances with a single placement.
    pub fn set_position(&mut self, position: Place) {
        self.positions = vec![position];
    }

    /// All instance placements.
    pub fn positions(&self) -> &[Place] {
        &self.positions
    }

    /// Replaces all instance placements.
    pub fn set_positions(&mut self, positions: Vec<Place>) {
        self.positions = positions;
    }

    /// Geometry bounds in model coordinates.
    pub fn geometry_bounds(&self) -> Option<Bounds> {
        self.geometry_bounds
    }

    /// Sets the geometry bounds in model coordinates.
    pub fn set_geometry_bounds(&mut self, bounds: Option<Bounds>) {
        self.geometry_bounds = bounds;
    }

    /// Whether the model is shown.
    pub fn display(&self) -> bool {
        self.display
    }

    /// Shows or hides the model.
    pub fn set_display(&mut self, display: bool) {
        self.display = display;
    }
}

/// Registry of all models in a session, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct Models {
    models: BTreeMap<ModelId, Model>,
}

impl Models {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model.
    ///
    /// Returns an error if a model with the same id already exists.
    pub fn add(&mut self, model: Model) -> Result<()> {
        if self.models.contains_key(&model.id) {
            return Err(MolviewError::ModelExists(model.id.0));
        }
        self.models.insert(model.id, model);
        Ok(())
    }

    /// Gets a model by id.
    pub fn get(&self, id: ModelId) -> Option<&Model> {
        self.models.get(&id)
    }

    /// Gets a model by id for modification.
    pub fn get_mut(&mut self, id: ModelId) -> Option<&mut Model> {
        self.models.get_mut(&id)
    }

    /// Gets a model or reports it as missing.
    pub fn require(&self, id: ModelId) -> Result<&Model> {
        self.get(id).ok_or(MolviewError::ModelNotFound(id.0))
    }

    /// Checks if a model exists.
    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Removes a model.
    pub fn remove(&mut self, id: ModelId) -> Option<Model> {
        self.models.remove(&id)
    }

    /// Removes all models.
    pub fn clear(&mut self) {
        self.models.clear();
    }

    /// Iterates over models in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Iterates mutably over models in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.models.values_mut()
    }

    /// All model ids in order.
    pub fn ids(&self) -> Vec<ModelId> {
        self.models.keys().copied().collect()
    }

    /// Models in id order, optionally only the displayed ones.
    pub fn list(&self, displayed_only: bool) -> Vec<&Model> {
        self.iter().filter(|m| !displayed_only || m.display()).collect()
    }

    /// Returns the number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if there are no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Placement of a model's parent coordinates in the scene.
    ///
    /// Composes the first instance placement of every ancestor. Missing
    /// ancestors end the chain.
    pub fn parent_scene_position(&self, id: ModelId) -> Place {
        let mut place = Place::IDENTITY;
        let mut next = self.get(id).and_then(Model::parent);
        // Guard against accidental parent cycles.
        let mut depth = 0;
        while let Some(pid) = next {
            let Some(parent) = self.get(pid) else { break };
            place = parent.position() * place;
            next = parent.parent();
            depth += 1;
            if depth > self.models.len() {
                log::warn!("parent cycle detected at model {pid}");
                break;
            }
        }
        place
    }

    /// Scene placement of a model's first instance.
    pub fn scene_position(&self, id: ModelId) -> Option<Place> {
        let model = self.get(id)?;
        Some(self.parent_scene_position(id) * model.position())
    }

    /// Scene bounds of a displayed model over all of its instances.
    ///
    /// Returns `None` when the model is hidden, has no geometry or no
    /// instances.
    pub fn scene_bounds(&self, id: ModelId) -> Option<Bounds> {
        let model = self.get(id)?;
        if !model.display {
            return None;
        }
        let parent = self.parent_scene_position(id);
        let scene_positions: Vec<Place> = model.positions.iter().map(|&p| parent * p).collect();
        copies_bounding_box(model.geometry_bounds, &scene_positions)
    }

    /// Union of the scene bounds of the given models.
    pub fn bounds(&self, ids: &[ModelId]) -> Option<Bounds> {
        union_bounds(ids.iter().map(|&id| self.scene_bounds(id)))
    }

    /// Union of the scene bounds of every displayed model.
    pub fn all_bounds(&self) -> Option<Bounds> {
        union_bounds(self.models.keys().map(|&id| self.scene_bounds(id)))
    }

    /// Converts a scene point into the parent coordinates of a model.
    pub fn scene_to_parent(&self, id: ModelId, point: DVec3) -> DVec3 {
        self.parent_scene_position(id).inverse() * point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Bounds {
        Bounds::new(DVec3::ZERO, DVec3::ONE)
    }

    #[test]
    fn test_add_duplicate_fails() {
        let mut models = Models::new();
        models.add(Model::new(ModelId(1), "a")).unwrap();
        let err = models.add(Model::new(ModelId(1), "b")).unwrap_err();
        assert!(matches!(err, MolviewError::ModelExists(1)));
        assert_eq!(models.len(), 1);
    }

    #[test]
    fn test_require_missing() {
        let models = Models::new();
        assert!(matches!(
            models.require(ModelId(9)),
            Err(MolviewError::ModelNotFound(9))
        ));
    }

    #[test]
    fn test_scene_position_composes_parents() {
        let mut models = Models::new();
        models
            .add(Model::new(ModelId(1), "parent").with_position(Place::translation(DVec3::X)))
            .unwrap();
        models
            .add(
                Model::new(ModelId(2), "child")
                    .with_parent(ModelId(1))
                    .with_position(Place::translation(DVec3::Y)),
            )
            .unwrap();
        let p = models.scene_position(ModelId(2)).unwrap();
        assert_eq!(p.origin(), DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(
            models.scene_to_parent(ModelId(2), DVec3::new(1.0, 0.0, 0.0)),
            DVec3::ZERO
        );
    }

    #[test]
    fn test_scene_bounds_hidden_and_instances() {
        let mut models = Models::new();
        models
            .add(
                Model::new(ModelId(1), "copies")
                    .with_geometry_bounds(unit_box())
                    .with_positions(vec![
                        Place::IDENTITY,
                        Place::translation(DVec3::new(5.0, 0.0, 0.0)),
                    ]),
            )
            .unwrap();
        models.add(Model::new(ModelId(2), "empty")).unwrap();

        let b = models.scene_bounds(ModelId(1)).unwrap();
        assert_eq!(b.max, DVec3::new(6.0, 1.0, 1.0));
        assert!(models.scene_bounds(ModelId(2)).is_none());

        assert_eq!(models.list(true).len(), 2);

        models.get_mut(ModelId(1)).unwrap().set_display(false);
        assert!(models.scene_bounds(ModelId(1)).is_none());
        assert!(models.all_bounds().is_none());
        let shown: Vec<ModelId> = models.list(true).iter().map(|m| m.id()).collect();
        assert_eq!(shown, vec![ModelId(2)]);
        assert_eq!(models.list(false).len(), 2);
    }

    #[test]
    fn test_parent_cycle_terminates() {
        let mut models = Models::new();
        models
            .add(Model::new(ModelId(1), "a").with_parent(ModelId(2)))
            .unwrap();
        models
            .add(Model::new(ModelId(2), "b").with_parent(ModelId(1)))
            .unwrap();
        assert!(models.scene_position(ModelId(1)).is_some());
    }
}
