//! Collaborator contracts consumed by the interaction controller.
//!
//! The controller never owns objects or the camera. It talks to the scene
//! through [`SceneView`] (camera, hit testing, projection, world position
//! resolution) and [`VirtualObjects`] (the placed objects themselves).
//! Every query is fallible; callers skip the update and keep their state.

use std::fmt;

use bevy::math::{Vec2, Vec3};
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};

use crate::interaction::InteractionError;

/// Stable handle of a virtual object.
///
/// Handles are never reused, so a stale handle simply stops resolving once
/// its object has been removed from the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Result of resolving a screen point into the tracked world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldHit {
    /// Resolved world position.
    pub position: Vec3,
    /// Normal of the detected plane that was hit, if any.
    pub plane_normal: Option<Vec3>,
    /// Whether the position is anchored on a plane rather than estimated.
    pub on_detected_plane: bool,
}

impl WorldHit {
    /// A hit anchored on a plane.
    pub fn on_plane(position: Vec3, plane_normal: Option<Vec3>) -> Self {
        Self {
            position,
            plane_normal,
            on_detected_plane: true,
        }
    }

    /// An estimated hit (feature points, extrapolation).
    pub fn estimated(position: Vec3) -> Self {
        Self {
            position,
            plane_normal: None,
            on_detected_plane: false,
        }
    }
}

/// Camera, hit testing and screen/world conversion.
pub trait SceneView {
    /// Current camera pose, or `None` while tracking is unavailable.
    fn camera_transform(&self) -> Option<Transform>;

    /// Object under a screen point.
    fn hit_test_object(&self, screen: Vec2) -> Option<ObjectId>;

    /// Projects a world position onto the screen.
    fn project_to_screen(&self, world: Vec3) -> Option<Vec2>;

    /// Resolves a screen point to a world position.
    ///
    /// `near` biases the result toward an existing object position and is the
    /// reference height for the infinite plane fallback.
    fn world_position(&self, screen: Vec2, near: Option<Vec3>, infinite_plane: bool)
    -> Option<WorldHit>;
}

/// Placed objects the controller manipulates.
pub trait VirtualObjects {
    fn position(&self, id: ObjectId) -> Option<Vec3>;

    /// Moves an object, relative to the camera it was resolved from.
    fn set_position(
        &mut self,
        id: ObjectId,
        position: Vec3,
        camera: &Transform,
        smooth: bool,
    ) -> Result<Vec3, InteractionError>;

    /// Rotation about the vertical (up) axis, in radians.
    fn vertical_rotation(&self, id: ObjectId) -> Option<f32>;

    fn set_vertical_rotation(&mut self, id: ObjectId, angle: f32) -> Result<(), InteractionError>;
}
