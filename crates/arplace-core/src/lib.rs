//! arplace core library
//!
//! Touch-driven placement of virtual objects in an AR scene: gesture
//! recognition, the interaction controller that turns gestures into object
//! moves and rotations, and world position resolution against tracked
//! surfaces.
//!
//! The controller is engine agnostic and talks to the scene through the
//! [`scene::SceneView`] and [`scene::VirtualObjects`] traits. The [`bevy`]
//! module wires it into a Bevy app.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod gesture;
pub mod interaction;
pub mod projection;
pub mod scene;
pub mod smoothing;
pub mod surface;

// Bevy integration
pub mod bevy;

pub use gesture::{
    ActiveTouches, GestureKind, GestureRecognizers, GestureState, PAN_THRESHOLD, RotationGesture,
    TAP_SLOP, TapGesture, ThresholdPanGesture, TouchSample,
};
pub use interaction::{InteractionController, InteractionError, Placement};
pub use projection::CameraIntrinsics;
pub use scene::{ObjectId, SceneView, VirtualObjects, WorldHit};
pub use smoothing::{
    ConfigError, DistanceAverage, ExponentialLerp, MAX_CAMERA_DISTANCE, Smoothing,
    SmoothingConfig, SmoothingHistory,
};
pub use surface::{DetectedPlane, resolve_world_position};
