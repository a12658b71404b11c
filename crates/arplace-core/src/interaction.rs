//! Gesture interaction controller.
//!
//! Routes recognizer actions to object moves and rotations:
//! - pan: pick an object under the touches, then drag it along tracked surfaces
//! - rotation: twist the dragged object about the vertical axis
//! - tap: select the object under the finger, or teleport the selection
//!
//! Drags are re-projected every frame in [`InteractionController::advance_tracking`],
//! so moving the device alone keeps a held object under the finger.

use bevy::math::{Vec2, Vec3};

use crate::gesture::{ActiveTouches, GestureKind, GestureRecognizers, GestureState, TouchSample};
use crate::scene::{ObjectId, SceneView, VirtualObjects};

/// Why a drag, teleport or rotation update was skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InteractionError {
    #[error("Camera tracking is unavailable")]
    TrackingUnavailable,

    #[error("No world position under screen point ({}, {})", .screen.x, .screen.y)]
    NoWorldPosition { screen: Vec2 },

    #[error("Object position does not project onto the screen")]
    ProjectionFailed,

    #[error("Unknown object: {0}")]
    UnknownObject(ObjectId),
}

/// Outcome of a successful placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub object: ObjectId,
    pub position: Vec3,
    pub smoothed: bool,
}

/// Owns the gesture recognizers and the tracking/selection session.
///
/// Invariant: `current_tracking_position` is only set while an object is
/// tracked.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    recognizers: GestureRecognizers,
    /// Object held by the active pan/rotate gesture.
    tracked_object: Option<ObjectId>,
    /// Most recently interacted object.
    selected_object: Option<ObjectId>,
    /// Screen anchor accumulating pan deltas while an object is tracked.
    current_tracking_position: Option<Vec2>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        self.selected_object
    }

    pub fn tracked_object(&self) -> Option<ObjectId> {
        self.tracked_object
    }

    pub fn current_tracking_position(&self) -> Option<Vec2> {
        self.current_tracking_position
    }

    pub fn recognizers(&self) -> &GestureRecognizers {
        &self.recognizers
    }

    /// Selects an object from outside the gesture flow (e.g. a UI list).
    pub fn select(&mut self, object: Option<ObjectId>) {
        if self.selected_object != object {
            tracing::info!("[selection] selected {:?} (external)", object);
        }
        self.selected_object = object;
    }

    /// Drops every reference to an object that left the scene.
    pub fn forget_object(&mut self, object: ObjectId) {
        if self.tracked_object == Some(object) {
            tracing::info!("[interaction] tracked {} removed, stopping drag", object);
            self.stop_tracking();
        }
        if self.selected_object == Some(object) {
            self.selected_object = None;
        }
    }

    /// Feeds one touch through the recognizers and runs the actions they fire.
    pub fn handle_touch<S>(&mut self, sample: &TouchSample, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        for kind in self.recognizers.handle_touch(sample) {
            self.dispatch(kind, scene);
        }
    }

    /// Cancels gestures in progress, e.g. when the surface loses focus.
    pub fn cancel_gestures<S>(&mut self, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        for kind in self.recognizers.cancel_all() {
            self.dispatch(kind, scene);
        }
    }

    /// Per-frame hook: re-resolves the held screen point against the current
    /// camera pose and moves the tracked object there.
    pub fn advance_tracking<S>(&mut self, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        let (Some(object), Some(screen)) = (self.tracked_object, self.current_tracking_position)
        else {
            return;
        };

        match translate(scene, object, screen, true) {
            Ok(placement) => tracing::trace!(
                "[interaction] {} tracked to {:?} (smoothed: {})",
                object,
                placement.position,
                placement.smoothed
            ),
            Err(err) => tracing::debug!("[interaction] tracking update skipped: {err}"),
        }
    }

    fn dispatch<S>(&mut self, kind: GestureKind, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        match kind {
            GestureKind::Pan => self.did_pan(scene),
            GestureKind::Rotation => self.did_rotate(scene),
            GestureKind::Tap => self.did_tap(scene),
        }
    }

    fn did_pan<S>(&mut self, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        let pan = &mut self.recognizers.pan;
        match pan.state() {
            GestureState::Began => {
                if let Some(object) = object_interacting(pan.touches(), scene) {
                    self.set_tracked_object(object);
                }
            }
            GestureState::Changed if pan.is_threshold_exceeded() => {
                let Some(object) = self.tracked_object else {
                    return;
                };

                let anchor = match self.current_tracking_position {
                    Some(anchor) => anchor,
                    None => {
                        let seeded = scene
                            .position(object)
                            .ok_or(InteractionError::UnknownObject(object))
                            .and_then(|position| {
                                scene
                                    .project_to_screen(position)
                                    .ok_or(InteractionError::ProjectionFailed)
                            });
                        match seeded {
                            Ok(anchor) => anchor,
                            Err(err) => {
                                tracing::debug!("[interaction] drag anchor unavailable: {err}");
                                return;
                            }
                        }
                    }
                };

                self.current_tracking_position = Some(anchor + pan.translation());
                pan.set_translation(Vec2::ZERO);
            }
            // Ignore changes until the displacement threshold is exceeded.
            GestureState::Changed | GestureState::Possible => {}
            GestureState::Ended | GestureState::Cancelled | GestureState::Failed => {
                self.stop_tracking();
            }
        }
    }

    fn did_rotate<S>(&mut self, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        let rotation = &mut self.recognizers.rotation;
        if rotation.state() != GestureState::Changed {
            return;
        }

        if let Some(object) = self.tracked_object {
            // Screen-space twist is clockwise-positive; looking down on the
            // object that is a negative turn about +Y.
            let applied = scene
                .vertical_rotation(object)
                .ok_or(InteractionError::UnknownObject(object))
                .and_then(|angle| scene.set_vertical_rotation(object, angle - rotation.rotation()));
            if let Err(err) = applied {
                tracing::debug!("[interaction] rotation skipped: {err}");
            }
        }
        rotation.set_rotation(0.0);
    }

    fn did_tap<S>(&mut self, scene: &mut S)
    where
        S: SceneView + VirtualObjects,
    {
        let tap = &self.recognizers.tap;
        if tap.state() != GestureState::Ended {
            return;
        }
        let Some(location) = tap.location() else {
            return;
        };

        if let Some(object) = scene.hit_test_object(location) {
            if self.selected_object != Some(object) {
                tracing::info!("[selection] selected {} (tap)", object);
            }
            self.selected_object = Some(object);
        } else if let Some(object) = self.selected_object {
            match translate(scene, object, location, false) {
                Ok(placement) => tracing::info!(
                    "[interaction] teleported {} to {:?}",
                    object,
                    placement.position
                ),
                Err(err) => tracing::debug!("[interaction] teleport skipped: {err}"),
            }
        }
    }

    fn set_tracked_object(&mut self, object: ObjectId) {
        if self.tracked_object != Some(object) {
            tracing::info!("[interaction] tracking {}", object);
        }
        self.tracked_object = Some(object);
        self.selected_object = Some(object);
    }

    fn stop_tracking(&mut self) {
        if let Some(object) = self.tracked_object.take() {
            tracing::debug!("[interaction] released {}", object);
        }
        self.current_tracking_position = None;
    }
}

/// Resolves which object a set of touches targets.
///
/// Hit tests where each touch landed, in arrival order; if none lands on an
/// object, the midpoint of the touch-down bounding box is tried, which
/// catches fingers straddling a small object. Touch-down points are used so
/// a fast first move cannot carry the fingers off the object.
pub fn object_interacting<S>(touches: &ActiveTouches, scene: &S) -> Option<ObjectId>
where
    S: SceneView + ?Sized,
{
    (0..touches.len())
        .filter_map(|index| touches.origin(index))
        .find_map(|origin| scene.hit_test_object(origin))
        .or_else(|| {
            touches
                .origin_bounds_center()
                .and_then(|center| scene.hit_test_object(center))
        })
}

/// Moves an object to the world position under a screen point.
///
/// Positions that did not land on a plane are smoothed; plane hits are
/// applied directly.
pub fn translate<S>(
    scene: &mut S,
    object: ObjectId,
    screen: Vec2,
    infinite_plane: bool,
) -> Result<Placement, InteractionError>
where
    S: SceneView + VirtualObjects + ?Sized,
{
    let camera = scene
        .camera_transform()
        .ok_or(InteractionError::TrackingUnavailable)?;
    let near = scene.position(object);
    let hit = scene
        .world_position(screen, near, infinite_plane)
        .ok_or(InteractionError::NoWorldPosition { screen })?;

    let smoothed = !hit.on_detected_plane;
    let position = scene.set_position(object, hit.position, &camera, smoothed)?;
    Ok(Placement {
        object,
        position,
        smoothed,
    })
}
