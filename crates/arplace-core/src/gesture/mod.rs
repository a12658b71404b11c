//! Touch gesture recognizers.
//!
//! Three recognizers share every touch:
//! - `ThresholdPanGesture`: one or two finger drag, gated by a displacement threshold
//! - `RotationGesture`: two finger twist
//! - `TapGesture`: single finger tap
//!
//! Recognizers keep differential accumulators (translation, rotation) that the
//! consumer zeroes after reading them.

mod pan;
mod rotate;
mod tap;

pub use pan::*;
pub use rotate::*;
pub use tap::*;

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::math::Vec2;

/// Lifecycle of a gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Waiting for touches to match the gesture.
    #[default]
    Possible,
    Began,
    Changed,
    /// Finished normally. For discrete gestures (tap) this means recognized.
    Ended,
    Cancelled,
    Failed,
}

impl GestureState {
    /// Whether the gesture is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Began | Self::Changed)
    }

    /// Whether the gesture has finished and waits for all touches to lift.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// A single touch update, in logical screen pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchSample {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Vec2,
}

impl TouchSample {
    pub fn new(id: u64, phase: TouchPhase, position: Vec2) -> Self {
        Self { id, phase, position }
    }

    pub fn started(id: u64, position: Vec2) -> Self {
        Self::new(id, TouchPhase::Started, position)
    }

    pub fn moved(id: u64, position: Vec2) -> Self {
        Self::new(id, TouchPhase::Moved, position)
    }

    pub fn ended(id: u64, position: Vec2) -> Self {
        Self::new(id, TouchPhase::Ended, position)
    }

    pub fn canceled(id: u64, position: Vec2) -> Self {
        Self::new(id, TouchPhase::Canceled, position)
    }
}

impl From<&TouchInput> for TouchSample {
    fn from(input: &TouchInput) -> Self {
        Self::new(input.id, input.phase, input.position)
    }
}

/// A touch on the surface: where it landed and where it is now.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Touch {
    id: u64,
    origin: Vec2,
    position: Vec2,
}

/// Touches currently on the surface, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ActiveTouches {
    touches: Vec<Touch>,
}

impl ActiveTouches {
    /// Applies a touch update. Returns false for moves of unknown touches.
    pub fn apply(&mut self, sample: &TouchSample) -> bool {
        match sample.phase {
            TouchPhase::Started => {
                let touch = Touch {
                    id: sample.id,
                    origin: sample.position,
                    position: sample.position,
                };
                if let Some(slot) = self.touches.iter_mut().find(|t| t.id == sample.id) {
                    *slot = touch;
                } else {
                    self.touches.push(touch);
                }
                true
            }
            TouchPhase::Moved => match self.touches.iter_mut().find(|t| t.id == sample.id) {
                Some(slot) => {
                    slot.position = sample.position;
                    true
                }
                None => false,
            },
            TouchPhase::Ended | TouchPhase::Canceled => {
                let before = self.touches.len();
                self.touches.retain(|t| t.id != sample.id);
                self.touches.len() != before
            }
        }
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    /// Current location of the touch at `index` (arrival order).
    pub fn location(&self, index: usize) -> Option<Vec2> {
        self.touches.get(index).map(|t| t.position)
    }

    pub fn locations(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.touches.iter().map(|t| t.position)
    }

    /// Where the touch at `index` landed.
    pub fn origin(&self, index: usize) -> Option<Vec2> {
        self.touches.get(index).map(|t| t.origin)
    }

    /// Mean of all current touch locations.
    pub fn centroid(&self) -> Option<Vec2> {
        if self.touches.is_empty() {
            return None;
        }
        let sum: Vec2 = self.locations().sum();
        #[allow(clippy::cast_precision_loss)]
        Some(sum / self.touches.len() as f32)
    }

    /// Midpoint of the bounding box around the touch-down locations.
    pub fn origin_bounds_center(&self) -> Option<Vec2> {
        let first = self.origin(0)?;
        let (min, max) = self
            .touches
            .iter()
            .fold((first, first), |(min, max), t| (min.min(t.origin), max.max(t.origin)));
        Some((min + max) / 2.0)
    }
}

/// Which recognizer produced an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Pan,
    Rotation,
    Tap,
}

/// The three recognizers attached to the interaction surface.
///
/// Every touch goes to every recognizer, so a two finger gesture can pan and
/// rotate at the same time.
#[derive(Debug, Clone, Default)]
pub struct GestureRecognizers {
    pub pan: ThresholdPanGesture,
    pub rotation: RotationGesture,
    pub tap: TapGesture,
}

impl GestureRecognizers {
    /// Feeds a touch to all recognizers.
    ///
    /// Returns the recognizers whose action fires for this touch, in the order
    /// pan, rotation, tap.
    pub fn handle_touch(&mut self, sample: &TouchSample) -> Vec<GestureKind> {
        let mut fired = Vec::with_capacity(3);
        if self.pan.handle_touch(sample).is_some() {
            fired.push(GestureKind::Pan);
        }
        if self.rotation.handle_touch(sample).is_some() {
            fired.push(GestureKind::Rotation);
        }
        if self.tap.handle_touch(sample).is_some() {
            fired.push(GestureKind::Tap);
        }
        fired
    }

    /// Cancels every gesture in progress.
    ///
    /// Returns the recognizers whose action fires for the cancellation.
    pub fn cancel_all(&mut self) -> Vec<GestureKind> {
        let mut fired = Vec::with_capacity(2);
        if self.pan.cancel().is_some() {
            fired.push(GestureKind::Pan);
        }
        if self.rotation.cancel().is_some() {
            fired.push(GestureKind::Rotation);
        }
        self.tap.cancel();
        fired
    }
}

/// Wraps an angle difference into `(-PI, PI]`.
pub(crate) fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}
