//! ECS resources for AR interaction.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::interaction::InteractionController;
use crate::scene::ObjectId;
use crate::smoothing::{Smoothing, SmoothingConfig};
use crate::surface::DetectedPlane;

/// The interaction controller, owned by the app.
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct InteractionRes(pub InteractionController);

/// Quality of the AR session's camera tracking.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    /// No camera pose; every drag, teleport and rotation is skipped.
    NotAvailable,
    /// Pose available with reduced quality.
    Limited,
    #[default]
    Normal,
}

impl TrackingState {
    pub fn has_pose(self) -> bool {
        self != Self::NotAvailable
    }
}

/// Planes currently reported by the AR session.
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct DetectedPlanes(pub Vec<DetectedPlane>);

/// Feature point cloud of the current frame, in world space.
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct FeaturePoints(pub Vec<Vec3>);

/// Smoothing strategy applied to estimated placements.
#[derive(Resource)]
pub struct PlacementSmoothing(pub Box<dyn Smoothing>);

impl PlacementSmoothing {
    pub fn from_config(config: &SmoothingConfig) -> Self {
        Self(config.build())
    }

    pub fn strategy(&self) -> &dyn Smoothing {
        self.0.as_ref()
    }
}

impl Default for PlacementSmoothing {
    fn default() -> Self {
        Self::from_config(&SmoothingConfig::default())
    }
}

/// Bidirectional mapping between object handles and entities.
///
/// Handles are assigned in spawn order and never reused.
#[derive(Resource, Debug, Default)]
pub struct ObjectEntityMap {
    next_id: u64,
    entities: HashMap<ObjectId, Entity>,
    ids: HashMap<Entity, ObjectId>,
}

impl ObjectEntityMap {
    /// Returns the handle of `entity`, assigning a new one on first sight.
    pub fn register(&mut self, entity: Entity) -> ObjectId {
        if let Some(id) = self.ids.get(&entity) {
            return *id;
        }
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.entities.insert(id, entity);
        self.ids.insert(entity, id);
        id
    }

    /// Forgets an entity. Returns the handle it had.
    pub fn remove_entity(&mut self, entity: Entity) -> Option<ObjectId> {
        let id = self.ids.remove(&entity)?;
        self.entities.remove(&id);
        Some(id)
    }

    pub fn entity(&self, id: ObjectId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn id(&self, entity: Entity) -> Option<ObjectId> {
        self.ids.get(&entity).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
