//! Bevy plugin for AR object interaction.
//!
//! `ArInteractionPlugin` carries no rendering or window dependencies; pair it
//! with `MinimalPlugins` and `InputPlugin` to run headless.

use bevy::input::touch::TouchInput;
use bevy::prelude::*;

use crate::bevy::events::ObjectSelectedEvent;
use crate::bevy::resources::*;
use crate::bevy::state_store::InteractionStore;
use crate::bevy::systems;
use crate::smoothing::SmoothingConfig;

/// Touch interaction with virtual objects.
///
/// Hosts feed the AR session into `TrackingState`, `DetectedPlanes`,
/// `FeaturePoints` and the `ArCamera` transform; the plugin moves
/// `VirtualObject` entities in response to touches.
#[derive(Default)]
pub struct ArInteractionPlugin {
    pub smoothing: SmoothingConfig,
    pub store: Option<InteractionStore>,
}

impl Plugin for ArInteractionPlugin {
    fn build(&self, app: &mut App) {
        let smoothing = match self.smoothing.validate() {
            Ok(()) => self.smoothing,
            Err(err) => {
                tracing::warn!("[interaction] {err}, falling back to default smoothing");
                SmoothingConfig::default()
            }
        };

        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(InteractionRes::default())
            .insert_resource(PlacementSmoothing::from_config(&smoothing))
            .insert_resource(ObjectEntityMap::default())
            .insert_resource(self.store.clone().unwrap_or_default());

        // Session inputs; hosts may have inserted them already
        app.init_resource::<TrackingState>()
            .init_resource::<DetectedPlanes>()
            .init_resource::<FeaturePoints>();

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<TouchInput>()
            .add_message::<ObjectSelectedEvent>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.add_systems(
            Update,
            (
                systems::index_virtual_objects,
                systems::apply_pending_selection,
                systems::handle_touch_input,
                systems::advance_tracking,
                systems::emit_selection_changes,
            )
                .chain(),
        );

        app.add_systems(PostUpdate, systems::sync_interaction_store);

        tracing::info!("[interaction] plugin ready (smoothing: {:?})", smoothing);
    }
}

#[cfg(test)]
mod tests {
    use bevy::input::touch::TouchPhase;

    use super::*;
    use crate::bevy::components::VirtualObject;
    use crate::bevy::test_utils::{PIXELS_PER_METER, SCREEN_CENTER, TestApp};
    use crate::scene::ObjectId;

    fn screen(x_meters: f32, z_meters: f32) -> Vec2 {
        SCREEN_CENTER + Vec2::new(x_meters, z_meters) * PIXELS_PER_METER
    }

    /// Picks up the object at the origin and drags it to x = 1m.
    fn drag_to_one_meter(test: &mut TestApp) {
        test.touch(1, TouchPhase::Started, screen(0.0, 0.0));
        test.touch(1, TouchPhase::Moved, screen(0.2, 0.0));
        test.touch(1, TouchPhase::Moved, screen(1.0, 0.0));
        test.update();
    }

    fn assert_near(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < 1e-3,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_tap_selects_object() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);

        test.tap(1, screen(0.1, 0.0));
        test.update();

        assert_eq!(test.interaction().selected_object(), Some(id));
        assert_eq!(test.store().get_selected_object(), Some(id));
        assert_eq!(test.selections().len(), 1);
        assert_eq!(test.selections()[0].entity, Some(entity));
        assert_near(test.translation(entity), Vec3::ZERO);
    }

    #[test]
    fn test_drag_follows_finger_on_plane() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);

        drag_to_one_meter(&mut test);

        assert_eq!(test.interaction().tracked_object(), Some(id));
        assert_eq!(test.store().get_tracked_object(), Some(id));
        assert_near(test.translation(entity), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_camera_motion_moves_held_object() {
        let mut test = TestApp::new();
        let (entity, _) = test.spawn_object(Vec3::ZERO);
        drag_to_one_meter(&mut test);

        test.move_camera(0.5, 0.0);
        test.update();
        assert_near(test.translation(entity), Vec3::new(1.5, 0.0, 0.0));

        // released objects stay put
        test.touch(1, TouchPhase::Ended, screen(1.0, 0.0));
        test.update();
        test.move_camera(-1.0, 0.0);
        test.update();
        assert_near(test.translation(entity), Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(test.interaction().tracked_object(), None);
    }

    #[test]
    fn test_lost_tracking_freezes_drag() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);
        drag_to_one_meter(&mut test);

        test.set_tracking(TrackingState::NotAvailable);
        test.move_camera(0.5, 0.0);
        test.update();

        assert_near(test.translation(entity), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(test.interaction().tracked_object(), Some(id));
        assert!(!test.store().summary().tracking_available);

        test.set_tracking(TrackingState::Limited);
        test.update();
        assert_near(test.translation(entity), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_tap_on_floor_teleports_selection() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);
        test.tap(1, screen(0.0, 0.0));
        test.update();

        test.tap(2, screen(1.0, 1.0));
        test.update();

        assert_near(test.translation(entity), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(test.interaction().selected_object(), Some(id));
    }

    #[test]
    fn test_tap_off_any_surface_leaves_selection() {
        let mut test = TestApp::new();
        test.world_mut().insert_resource(DetectedPlanes(Vec::new()));
        let (entity, id) = test.spawn_object(Vec3::ZERO);
        test.tap(1, screen(0.0, 0.0));
        test.update();

        test.tap(2, screen(1.0, 1.0));
        test.update();

        assert_near(test.translation(entity), Vec3::ZERO);
        assert_eq!(test.interaction().selected_object(), Some(id));
    }

    #[test]
    fn test_fast_drag_picks_up_object() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);

        test.touch(1, TouchPhase::Started, screen(0.0, 0.0));
        test.touch(1, TouchPhase::Moved, screen(1.0, 0.0));
        test.touch(1, TouchPhase::Moved, screen(1.2, 0.0));
        test.update();

        assert_eq!(test.interaction().tracked_object(), Some(id));
        assert_near(test.translation(entity), Vec3::new(1.2, 0.0, 0.0));
    }

    #[test]
    fn test_two_finger_twist_rotates_object() {
        let mut test = TestApp::new();
        let (entity, _) = test.spawn_object(Vec3::ZERO);

        test.touch(1, TouchPhase::Started, SCREEN_CENTER + Vec2::new(-10.0, 0.0));
        test.touch(2, TouchPhase::Started, SCREEN_CENTER + Vec2::new(10.0, 0.0));
        test.touch(2, TouchPhase::Moved, SCREEN_CENTER + Vec2::new(10.0, 10.0));
        test.touch(2, TouchPhase::Moved, SCREEN_CENTER + Vec2::new(0.0, 20.0));
        test.update();

        let expected = -Vec2::new(10.0, 20.0).to_angle();
        let object = test.world().get::<VirtualObject>(entity).unwrap();
        assert!((object.yaw - expected).abs() < 1e-4);

        let rotation = test.world().get::<Transform>(entity).unwrap().rotation;
        assert!(rotation.angle_between(Quat::from_rotation_y(expected)) < 1e-4);
    }

    #[test]
    fn test_despawned_object_is_forgotten() {
        let mut test = TestApp::new();
        let (entity, id) = test.spawn_object(Vec3::ZERO);
        test.tap(1, screen(0.0, 0.0));
        test.update();
        assert_eq!(test.store().get_selected_object(), Some(id));

        test.world_mut().despawn(entity);
        test.update();

        assert_eq!(test.interaction().selected_object(), None);
        assert_eq!(test.store().get_selected_object(), None);
        assert_eq!(test.selections().last().map(|event| event.object), Some(None));
        assert!(test.world().resource::<ObjectEntityMap>().is_empty());
    }

    #[test]
    fn test_ui_selection_requests() {
        let mut test = TestApp::new();
        let (_, first) = test.spawn_object(Vec3::ZERO);
        let (second_entity, second) = test.spawn_object(Vec3::new(1.0, 0.0, 1.0));
        assert_ne!(first, second);

        test.store().select_object(Some(second));
        test.update();
        assert_eq!(test.interaction().selected_object(), Some(second));
        assert_eq!(test.selections().last().unwrap().entity, Some(second_entity));

        test.store().select_object(Some(ObjectId(999)));
        test.update();
        assert_eq!(test.interaction().selected_object(), Some(second));

        test.store().select_object(None);
        test.update();
        assert_eq!(test.store().get_selected_object(), None);
    }

    #[test]
    fn test_invalid_smoothing_config_still_builds() {
        let mut test = TestApp::with_plugin(ArInteractionPlugin {
            smoothing: SmoothingConfig::ExponentialLerp { factor: 4.0 },
            store: None,
        });
        let (entity, _) = test.spawn_object(Vec3::ZERO);
        drag_to_one_meter(&mut test);
        assert_near(test.translation(entity), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_shared_store_reaches_ui_handle() {
        let ui_handle = InteractionStore::new();
        let mut test = TestApp::with_plugin(ArInteractionPlugin {
            smoothing: SmoothingConfig::default(),
            store: Some(ui_handle.clone()),
        });
        let (_, id) = test.spawn_object(Vec3::ZERO);

        test.tap(1, screen(0.0, 0.0));
        test.update();

        assert_eq!(ui_handle.get_selected_object(), Some(id));
        assert!(ui_handle.get_version() > 0);
    }
}
