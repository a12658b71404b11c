//! ECS components for the AR scene.

use bevy::prelude::*;

use crate::projection::CameraIntrinsics;
use crate::smoothing::SmoothingHistory;

/// Default bounding sphere radius for hit testing (meters).
pub const DEFAULT_HIT_RADIUS: f32 = 0.15;

/// A placed virtual object that gestures can select, drag and rotate.
///
/// The `ObjectId` handle is assigned when the entity is first seen, see
/// [`ObjectEntityMap`](crate::bevy::ObjectEntityMap).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
#[require(Transform, PlacementHistory)]
pub struct VirtualObject {
    /// Radius of the bounding sphere used for hit testing.
    pub hit_radius: f32,
    /// Rotation about the vertical axis, in radians.
    pub yaw: f32,
}

impl Default for VirtualObject {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            yaw: 0.0,
        }
    }
}

impl VirtualObject {
    pub fn with_radius(hit_radius: f32) -> Self {
        Self {
            hit_radius,
            ..Self::default()
        }
    }
}

/// Smoothing memory of a placed object.
#[derive(Component, Debug, Clone, Default, Deref, DerefMut)]
pub struct PlacementHistory(pub SmoothingHistory);

/// The device camera. Its `Transform` is the tracked camera pose.
#[derive(Component, Debug, Clone, Copy, Default, Deref)]
#[require(Transform)]
pub struct ArCamera(pub CameraIntrinsics);
