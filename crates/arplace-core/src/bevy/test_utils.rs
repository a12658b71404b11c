//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `InputPlugin` + `ArInteractionPlugin`, with an overhead
//! camera looking straight down at a detected floor plane.

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;

use crate::bevy::components::{ArCamera, VirtualObject};
use crate::bevy::events::ObjectSelectedEvent;
use crate::bevy::plugin::ArInteractionPlugin;
use crate::bevy::resources::{DetectedPlanes, InteractionRes, ObjectEntityMap, TrackingState};
use crate::bevy::state_store::InteractionStore;
use crate::bevy::systems;
use crate::interaction::InteractionController;
use crate::projection::CameraIntrinsics;
use crate::scene::ObjectId;
use crate::surface::DetectedPlane;

/// Camera height above the floor (meters).
pub const CAMERA_HEIGHT: f32 = 2.0;

/// Screen pixels per meter on the floor, for the test camera at rest:
/// 90 degree fov over 200px at a depth of 2m.
pub const PIXELS_PER_METER: f32 = 50.0;

/// Screen point straight below the camera.
pub const SCREEN_CENTER: Vec2 = Vec2::new(100.0, 100.0);

/// Hit radius of test objects (15px on screen).
pub const TEST_OBJECT_RADIUS: f32 = 0.3;

/// Selection messages seen so far.
#[derive(Resource, Default)]
pub struct SelectionLog(pub Vec<ObjectSelectedEvent>);

fn record_selections(
    mut reader: MessageReader<ObjectSelectedEvent>,
    mut log: ResMut<SelectionLog>,
) {
    log.0.extend(reader.read().cloned());
}

/// Overhead camera above `(x, 0, z)`; screen right is +X, screen down is +Z.
pub fn overhead_camera(x: f32, z: f32) -> Transform {
    Transform::from_xyz(x, CAMERA_HEIGHT, z).looking_at(Vec3::new(x, 0.0, z), Vec3::NEG_Z)
}

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
    pub camera: Entity,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_plugin(ArInteractionPlugin::default())
    }

    pub fn with_plugin(plugin: ArInteractionPlugin) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(plugin);

        app.init_resource::<SelectionLog>();
        app.add_systems(
            Update,
            record_selections.after(systems::emit_selection_changes),
        );

        app.insert_resource(DetectedPlanes(vec![DetectedPlane::horizontal(
            Vec3::ZERO,
            Vec2::splat(5.0),
        )]));
        let camera = app
            .world_mut()
            .spawn((
                ArCamera(CameraIntrinsics::new(
                    90f32.to_radians(),
                    Vec2::new(200.0, 200.0),
                )),
                overhead_camera(0.0, 0.0),
            ))
            .id();

        // Run one update to initialize all resources
        app.update();
        Self { app, camera }
    }

    pub fn update(&mut self) {
        self.app.update();
    }

    /// Spawn an object and run an update so it gets a handle.
    pub fn spawn_object(&mut self, position: Vec3) -> (Entity, ObjectId) {
        let entity = self
            .app
            .world_mut()
            .spawn((
                VirtualObject::with_radius(TEST_OBJECT_RADIUS),
                Transform::from_translation(position),
            ))
            .id();
        self.update();
        let id = self
            .world()
            .resource::<ObjectEntityMap>()
            .id(entity)
            .expect("object was not indexed");
        (entity, id)
    }

    /// Queue a touch for the next update.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        self.app.world_mut().write_message(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    /// Queue a complete tap for the next update.
    pub fn tap(&mut self, id: u64, position: Vec2) {
        self.touch(id, TouchPhase::Started, position);
        self.touch(id, TouchPhase::Ended, position);
    }

    pub fn move_camera(&mut self, x: f32, z: f32) {
        *self
            .app
            .world_mut()
            .get_mut::<Transform>(self.camera)
            .expect("camera entity") = overhead_camera(x, z);
    }

    pub fn set_tracking(&mut self, state: TrackingState) {
        self.app.insert_resource(state);
    }

    pub fn translation(&self, entity: Entity) -> Vec3 {
        self.world()
            .get::<Transform>(entity)
            .expect("object entity")
            .translation
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.world().resource::<InteractionRes>().0
    }

    pub fn store(&self) -> &InteractionStore {
        self.world().resource::<InteractionStore>()
    }

    pub fn selections(&self) -> &[ObjectSelectedEvent] {
        &self.world().resource::<SelectionLog>().0
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
