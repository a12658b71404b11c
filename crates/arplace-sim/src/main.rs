//! Headless scripted AR session.
//!
//! Spawns a camera above a detected floor plane with two objects, then plays
//! a touch script through `ArInteractionPlugin`: tap-select, drag, a drag held
//! while the camera moves, a two finger twist and a teleport. Object
//! transforms are logged after every step.
//!
//! Run with `RUST_LOG=debug` to see skipped updates, `trace` for per-frame
//! placement.

use std::f32::consts::FRAC_PI_4;

use arplace_core::bevy::{
    ArCamera, ArInteractionPlugin, DetectedPlanes, FeaturePoints, InteractionRes,
    ObjectEntityMap, VirtualObject,
};
use arplace_core::{CameraIntrinsics, DetectedPlane, SmoothingConfig};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Frames a finger takes to travel between two script points.
const DRAG_FRAMES: usize = 8;

struct Session {
    app: App,
    camera: Entity,
    intrinsics: CameraIntrinsics,
}

impl Session {
    fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(ArInteractionPlugin {
            smoothing: SmoothingConfig::default(),
            store: None,
        });

        app.insert_resource(DetectedPlanes(vec![DetectedPlane::horizontal(
            Vec3::new(0.0, 0.0, -1.5),
            Vec2::new(1.5, 1.5),
        )]));
        app.insert_resource(FeaturePoints(vec![
            Vec3::new(-0.4, 0.72, -1.1),
            Vec3::new(0.3, 0.45, -0.9),
            Vec3::new(1.2, 0.0, -2.4),
        ]));

        let intrinsics = CameraIntrinsics::default();
        let camera = app
            .world_mut()
            .spawn((ArCamera(intrinsics), camera_pose(0.0)))
            .id();

        app.update();
        Self {
            app,
            camera,
            intrinsics,
        }
    }

    fn spawn_object(&mut self, name: &'static str, position: Vec3) -> Entity {
        let entity = self
            .app
            .world_mut()
            .spawn((
                Name::new(name),
                VirtualObject::with_radius(0.2),
                Transform::from_translation(position),
            ))
            .id();
        self.app.update();
        entity
    }

    /// Screen position of a world point for the current camera pose.
    fn screen_of(&self, world: Vec3) -> Vec2 {
        let projected = self
            .app
            .world()
            .get::<Transform>(self.camera)
            .and_then(|camera| self.intrinsics.project(camera, world));
        projected.unwrap_or_else(|| {
            tracing::warn!("[sim] {world:?} is off screen, using viewport center");
            self.intrinsics.viewport_size / 2.0
        })
    }

    fn object_screen(&self, entity: Entity) -> Vec2 {
        let position = self
            .app
            .world()
            .get::<Transform>(entity)
            .map_or(Vec3::ZERO, |transform| transform.translation);
        self.screen_of(position)
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        self.app.world_mut().write_message(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    fn frame(&mut self) {
        self.app.update();
    }

    fn tap(&mut self, id: u64, position: Vec2) {
        self.touch(id, TouchPhase::Started, position);
        self.frame();
        self.touch(id, TouchPhase::Ended, position);
        self.frame();
    }

    /// Moves a finger that is already down, one step per frame.
    fn slide(&mut self, id: u64, from: Vec2, to: Vec2) {
        for step in 1..=DRAG_FRAMES {
            #[allow(clippy::cast_precision_loss)]
            let t = step as f32 / DRAG_FRAMES as f32;
            self.touch(id, TouchPhase::Moved, from.lerp(to, t));
            self.frame();
        }
    }

    fn set_camera(&mut self, transform: Transform) {
        if let Some(mut camera) = self.app.world_mut().get_mut::<Transform>(self.camera) {
            *camera = transform;
        }
    }

    fn report(&mut self, step: &str) {
        let world = self.app.world_mut();
        let interaction = &world.resource::<InteractionRes>().0;
        tracing::info!(
            "[sim] after {step}: selected {:?}, tracked {:?}",
            interaction.selected_object(),
            interaction.tracked_object()
        );

        let mut objects = world.query::<(Entity, &Name, &Transform, &VirtualObject)>();
        for (entity, name, transform, object) in objects.iter(world) {
            let id = world.resource::<ObjectEntityMap>().id(entity);
            tracing::info!(
                "[sim]   {name} {:?}: position {:.3?}, yaw {:.1} deg",
                id,
                transform.translation,
                object.yaw.to_degrees()
            );
        }
    }
}

/// Device held 1.4m up, looking at the floor 1.5m ahead, slid sideways by `x`.
fn camera_pose(x: f32) -> Transform {
    Transform::from_xyz(x, 1.4, 0.0).looking_at(Vec3::new(x, 0.0, -1.5), Vec3::Y)
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut session = Session::new();
    let chair = session.spawn_object("chair", Vec3::new(0.0, 0.0, -1.2));
    let lamp = session.spawn_object("lamp", Vec3::new(0.6, 0.0, -1.8));
    session.report("setup");

    // Tap the chair to select it
    let at = session.object_screen(chair);
    session.tap(1, at);
    session.report("tap on chair");

    // Drag the chair along the floor
    let from = session.object_screen(chair);
    let to = session.screen_of(Vec3::new(-0.5, 0.0, -1.0));
    session.touch(2, TouchPhase::Started, from);
    session.frame();
    session.slide(2, from, to);
    session.touch(2, TouchPhase::Ended, to);
    session.frame();
    session.report("drag chair");

    // Hold the lamp and walk sideways without moving the finger
    let from = session.object_screen(lamp);
    let to = from + Vec2::new(0.0, 30.0);
    session.touch(3, TouchPhase::Started, from);
    session.frame();
    session.slide(3, from, to);
    for step in 1..=DRAG_FRAMES {
        #[allow(clippy::cast_precision_loss)]
        let x = 0.4 * step as f32 / DRAG_FRAMES as f32;
        session.set_camera(camera_pose(x));
        session.frame();
    }
    session.touch(3, TouchPhase::Ended, to);
    session.frame();
    session.report("camera-only drag of lamp");

    // Twist the lamp with two fingers, pivoting on the first
    let pivot = session.object_screen(lamp);
    let arm = Vec2::new(80.0, 0.0);
    session.touch(4, TouchPhase::Started, pivot);
    session.touch(5, TouchPhase::Started, pivot + arm);
    session.frame();
    for step in 1..=DRAG_FRAMES {
        #[allow(clippy::cast_precision_loss)]
        let angle = FRAC_PI_4 * step as f32 / DRAG_FRAMES as f32;
        session.touch(5, TouchPhase::Moved, pivot + Vec2::from_angle(angle).rotate(arm));
        session.frame();
    }
    session.touch(5, TouchPhase::Ended, pivot + Vec2::from_angle(FRAC_PI_4).rotate(arm));
    session.touch(4, TouchPhase::Ended, pivot);
    session.frame();
    session.report("twist lamp");

    // Select the chair again and teleport it by tapping the floor
    let at = session.object_screen(chair);
    session.tap(6, at);
    let target = session.screen_of(Vec3::new(0.2, 0.0, -2.2));
    session.tap(7, target);
    session.report("teleport chair");
}
