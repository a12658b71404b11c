//! Pinhole camera projection between screen and world space.
//!
//! Screen coordinates are logical pixels with the origin at the top-left and
//! y pointing down, matching window and touch coordinates. The camera looks
//! down its local -Z axis.

use bevy::math::{Dir3, Ray3d, Vec2, Vec3};
use bevy::transform::components::Transform;

/// Points closer than this in front of the camera do not project.
const NEAR_PLANE: f32 = 0.01;

/// Intrinsics of the device camera feeding the AR view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Vertical field of view in radians.
    pub vertical_fov: f32,
    /// Viewport size in logical pixels.
    pub viewport_size: Vec2,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        Self {
            vertical_fov: 60f32.to_radians(),
            viewport_size: Vec2::new(390.0, 844.0),
        }
    }
}

impl CameraIntrinsics {
    pub fn new(vertical_fov: f32, viewport_size: Vec2) -> Self {
        Self {
            vertical_fov,
            viewport_size,
        }
    }

    fn aspect(&self) -> f32 {
        self.viewport_size.x / self.viewport_size.y
    }

    fn half_height(&self) -> f32 {
        (self.vertical_fov / 2.0).tan()
    }

    /// Projects a world point onto the screen. `None` behind the camera.
    pub fn project(&self, camera: &Transform, world: Vec3) -> Option<Vec2> {
        let local = camera.rotation.inverse() * (world - camera.translation);
        let depth = -local.z;
        if depth < NEAR_PLANE {
            return None;
        }

        let ndc_x = local.x / depth / (self.half_height() * self.aspect());
        let ndc_y = local.y / depth / self.half_height();
        Some(Vec2::new(
            (ndc_x + 1.0) / 2.0 * self.viewport_size.x,
            (1.0 - ndc_y) / 2.0 * self.viewport_size.y,
        ))
    }

    /// World-space ray from the camera through a screen point.
    pub fn ray(&self, camera: &Transform, screen: Vec2) -> Option<Ray3d> {
        let ndc_x = screen.x / self.viewport_size.x * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / self.viewport_size.y * 2.0;
        let local = Vec3::new(
            ndc_x * self.half_height() * self.aspect(),
            ndc_y * self.half_height(),
            -1.0,
        );
        let direction = Dir3::new(camera.rotation * local).ok()?;
        Some(Ray3d {
            origin: camera.translation,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics::new(90f32.to_radians(), Vec2::new(200.0, 200.0))
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let screen = intrinsics()
            .project(&Transform::IDENTITY, Vec3::new(0.0, 0.0, -5.0))
            .unwrap();
        assert!((screen - Vec2::new(100.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn test_point_behind_does_not_project() {
        assert!(intrinsics()
            .project(&Transform::IDENTITY, Vec3::new(0.0, 0.0, 5.0))
            .is_none());
    }

    #[test]
    fn test_up_is_screen_top() {
        // 90 degree fov: at depth 1, y = 1 is the top edge
        let screen = intrinsics()
            .project(&Transform::IDENTITY, Vec3::new(0.0, 1.0, -1.0))
            .unwrap();
        assert!((screen - Vec2::new(100.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_ray_round_trips_projection() {
        let camera = Transform::from_xyz(0.5, 1.5, 2.0).looking_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        let world = Vec3::new(0.3, 0.2, -1.4);
        let screen = intrinsics().project(&camera, world).unwrap();

        let ray = intrinsics().ray(&camera, screen).unwrap();
        let to_point = (world - ray.origin).normalize();
        assert!(to_point.dot(*ray.direction) > 0.9999);
    }
}
