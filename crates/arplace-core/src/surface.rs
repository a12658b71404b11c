//! Resolving camera rays against tracked surfaces.
//!
//! Inputs are what an AR session reports: detected planes with a finite
//! extent and a sparse cloud of feature points. Plane hits are reliable;
//! feature-point hits are estimates.

use bevy::math::primitives::InfinitePlane3d;
use bevy::math::{Dir3, Quat, Ray3d, Vec2, Vec3};

use crate::scene::WorldHit;

/// Opening angle of the cone used for high quality feature hits (degrees).
const FEATURE_CONE_DEGREES: f32 = 18.0;
/// Distance range along the ray for high quality feature hits (meters).
const FEATURE_MIN_DISTANCE: f32 = 0.2;
const FEATURE_MAX_DISTANCE: f32 = 2.0;

/// A plane reported by the tracking session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedPlane {
    pub center: Vec3,
    /// Local +Y is the plane normal; local X and Z span the extent.
    pub orientation: Quat,
    /// Half size of the observed extent along local X and Z.
    pub half_extents: Vec2,
}

impl DetectedPlane {
    /// A horizontal plane facing up.
    pub fn horizontal(center: Vec3, half_extents: Vec2) -> Self {
        Self {
            center,
            orientation: Quat::IDENTITY,
            half_extents,
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Intersection with the plane, restricted to its observed extent.
    pub fn intersect(&self, ray: &Ray3d) -> Option<(f32, Vec3)> {
        let normal = Dir3::new(self.normal()).ok()?;
        let distance = ray.intersect_plane(self.center, InfinitePlane3d { normal })?;
        let point = ray.get_point(distance);

        let local = self.orientation.inverse() * (point - self.center);
        let inside = local.x.abs() <= self.half_extents.x && local.z.abs() <= self.half_extents.y;
        inside.then_some((distance, point))
    }
}

/// A feature point matched against a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureHit {
    /// Projection of the feature onto the ray.
    pub position: Vec3,
    /// Distance of `position` from the ray origin.
    pub distance_along_ray: f32,
    /// Perpendicular distance of the feature from the ray.
    pub distance_from_ray: f32,
}

fn feature_hit(ray: &Ray3d, feature: Vec3) -> FeatureHit {
    let to_feature = feature - ray.origin;
    let along = to_feature.dot(*ray.direction);
    let position = ray.get_point(along);
    FeatureHit {
        position,
        distance_along_ray: along,
        distance_from_ray: to_feature.cross(*ray.direction).length(),
    }
}

/// Feature points inside a narrow cone around the ray, nearest first.
pub fn cone_feature_hits(ray: &Ray3d, features: &[Vec3]) -> Vec<FeatureHit> {
    let max_angle = FEATURE_CONE_DEGREES.to_radians() / 2.0;
    let mut hits: Vec<FeatureHit> = features
        .iter()
        .filter_map(|&feature| {
            let hit = feature_hit(ray, feature);
            if !(FEATURE_MIN_DISTANCE..=FEATURE_MAX_DISTANCE).contains(&hit.distance_along_ray) {
                return None;
            }
            let direction = (feature - ray.origin).normalize_or_zero();
            let angle = direction.dot(*ray.direction).clamp(-1.0, 1.0).acos();
            (angle <= max_angle).then_some(hit)
        })
        .collect();
    hits.sort_by(|a, b| a.distance_along_ray.total_cmp(&b.distance_along_ray));
    hits
}

/// The feature closest to the ray, anywhere in front of the camera.
pub fn closest_feature_hit(ray: &Ray3d, features: &[Vec3]) -> Option<FeatureHit> {
    features
        .iter()
        .map(|&feature| feature_hit(ray, feature))
        .filter(|hit| hit.distance_along_ray > 0.0)
        .min_by(|a, b| a.distance_from_ray.total_cmp(&b.distance_from_ray))
}

/// Intersection with the horizontal plane through `point_on_plane`.
pub fn infinite_horizontal_hit(ray: &Ray3d, point_on_plane: Vec3) -> Option<Vec3> {
    let distance = ray.intersect_plane(point_on_plane, InfinitePlane3d { normal: Dir3::Y })?;
    Some(ray.get_point(distance))
}

/// Resolves a camera ray to a world position.
///
/// Order of preference:
/// 1. detected planes within their extent
/// 2. the infinite horizontal plane through `near`, only when `infinite_plane`
///    is set
/// 3. the nearest feature point inside the ray cone
/// 4. the feature point closest to the ray
///
/// With `infinite_plane` unset and nothing detected under the ray, there is
/// no position.
pub fn resolve_world_position(
    ray: &Ray3d,
    planes: &[DetectedPlane],
    features: &[Vec3],
    near: Option<Vec3>,
    infinite_plane: bool,
) -> Option<WorldHit> {
    let plane_hit = planes
        .iter()
        .filter_map(|plane| plane.intersect(ray).map(|(distance, point)| (distance, point, plane)))
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((_, point, plane)) = plane_hit {
        return Some(WorldHit::on_plane(point, Some(plane.normal())));
    }

    let cone_hit = cone_feature_hits(ray, features).into_iter().next();

    if infinite_plane {
        if let Some(point) = near.and_then(|near| infinite_horizontal_hit(ray, near)) {
            return Some(WorldHit::on_plane(point, None));
        }
    }

    if let Some(hit) = cone_hit {
        return Some(WorldHit::estimated(hit.position));
    }

    closest_feature_hit(ray, features).map(|hit| WorldHit::estimated(hit.position))
}

/// Distance along the ray to a sphere, if the ray hits it.
pub fn ray_sphere_distance(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - ray.origin;
    let along = to_center.dot(*ray.direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;
    if far < 0.0 {
        None
    } else if near < 0.0 {
        Some(0.0)
    } else {
        Some(near)
    }
}
