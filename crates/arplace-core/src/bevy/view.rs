//! The ECS world seen through the controller's collaborator traits.

use bevy::ecs::system::SystemParam;
use bevy::math::Ray3d;
use bevy::prelude::*;

use crate::bevy::components::{ArCamera, PlacementHistory, VirtualObject};
use crate::bevy::resources::{
    DetectedPlanes, FeaturePoints, ObjectEntityMap, PlacementSmoothing, TrackingState,
};
use crate::interaction::InteractionError;
use crate::projection::CameraIntrinsics;
use crate::scene::{ObjectId, SceneView, VirtualObjects, WorldHit};
use crate::smoothing::place_relative_to_camera;
use crate::surface::{ray_sphere_distance, resolve_world_position};

/// Camera, tracked surfaces and virtual objects of the AR scene.
#[derive(SystemParam)]
pub struct ArSceneView<'w, 's> {
    tracking: Res<'w, TrackingState>,
    planes: Res<'w, DetectedPlanes>,
    features: Res<'w, FeaturePoints>,
    smoothing: Res<'w, PlacementSmoothing>,
    object_map: Res<'w, ObjectEntityMap>,
    cameras: Query<'w, 's, (&'static Transform, &'static ArCamera), Without<VirtualObject>>,
    objects: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Transform,
            &'static mut VirtualObject,
            &'static mut PlacementHistory,
        ),
        Without<ArCamera>,
    >,
}

impl ArSceneView<'_, '_> {
    fn camera(&self) -> Option<(Transform, CameraIntrinsics)> {
        if !self.tracking.has_pose() {
            return None;
        }
        let (transform, camera) = self.cameras.single().ok()?;
        Some((*transform, camera.0))
    }

    fn ray(&self, screen: Vec2) -> Option<Ray3d> {
        let (transform, intrinsics) = self.camera()?;
        intrinsics.ray(&transform, screen)
    }
}

impl SceneView for ArSceneView<'_, '_> {
    fn camera_transform(&self) -> Option<Transform> {
        self.camera().map(|(transform, _)| transform)
    }

    fn hit_test_object(&self, screen: Vec2) -> Option<ObjectId> {
        let ray = self.ray(screen)?;
        self.objects
            .iter()
            .filter_map(|(entity, transform, object, _)| {
                ray_sphere_distance(&ray, transform.translation, object.hit_radius)
                    .map(|distance| (distance, entity))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .and_then(|(_, entity)| self.object_map.id(entity))
    }

    fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let (transform, intrinsics) = self.camera()?;
        intrinsics.project(&transform, world)
    }

    fn world_position(
        &self,
        screen: Vec2,
        near: Option<Vec3>,
        infinite_plane: bool,
    ) -> Option<WorldHit> {
        let ray = self.ray(screen)?;
        resolve_world_position(&ray, &self.planes, &self.features, near, infinite_plane)
    }
}

impl VirtualObjects for ArSceneView<'_, '_> {
    fn position(&self, id: ObjectId) -> Option<Vec3> {
        let entity = self.object_map.entity(id)?;
        let (_, transform, _, _) = self.objects.get(entity).ok()?;
        Some(transform.translation)
    }

    fn set_position(
        &mut self,
        id: ObjectId,
        position: Vec3,
        camera: &Transform,
        smooth: bool,
    ) -> Result<Vec3, InteractionError> {
        let entity = self
            .object_map
            .entity(id)
            .ok_or(InteractionError::UnknownObject(id))?;
        let Ok((_, mut transform, _, mut history)) = self.objects.get_mut(entity) else {
            return Err(InteractionError::UnknownObject(id));
        };

        let placed = place_relative_to_camera(
            self.smoothing.strategy(),
            &mut history,
            camera,
            position,
            smooth,
        );
        transform.translation = placed;
        tracing::trace!("[placement] {} -> {:?} (smooth: {})", id, placed, smooth);
        Ok(placed)
    }

    fn vertical_rotation(&self, id: ObjectId) -> Option<f32> {
        let entity = self.object_map.entity(id)?;
        let (_, _, object, _) = self.objects.get(entity).ok()?;
        Some(object.yaw)
    }

    fn set_vertical_rotation(&mut self, id: ObjectId, angle: f32) -> Result<(), InteractionError> {
        let entity = self
            .object_map
            .entity(id)
            .ok_or(InteractionError::UnknownObject(id))?;
        let Ok((_, mut transform, mut object, _)) = self.objects.get_mut(entity) else {
            return Err(InteractionError::UnknownObject(id));
        };

        object.yaw = angle;
        transform.rotation = Quat::from_rotation_y(angle);
        Ok(())
    }
}
