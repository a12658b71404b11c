//! Threshold-gated pan recognizer.

use bevy::input::touch::TouchPhase;
use bevy::math::Vec2;

use super::{ActiveTouches, GestureState, TouchSample};

/// Displacement (logical pixels) a pan must cover before it reports changes.
pub const PAN_THRESHOLD: f32 = 10.0;

/// Maximum number of fingers a pan follows; more touches fail the gesture.
pub const PAN_MAX_TOUCHES: usize = 2;

/// Pan recognizer that withholds `Changed` until the touches have moved
/// [`PAN_THRESHOLD`] pixels since the gesture started.
///
/// The translation is differential: it accumulates centroid movement until
/// the consumer resets it with `set_translation(Vec2::ZERO)`. The first
/// change reported after the threshold carries everything accumulated since
/// the gesture began.
#[derive(Debug, Clone, Default)]
pub struct ThresholdPanGesture {
    state: GestureState,
    touches: ActiveTouches,
    /// Centroid at the last processed touch, re-anchored when fingers change.
    anchor: Option<Vec2>,
    /// Cumulative centroid movement since the gesture started.
    displacement: Vec2,
    /// Unconsumed centroid movement.
    translation: Vec2,
    threshold_exceeded: bool,
}

impl ThresholdPanGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_threshold_exceeded(&self) -> bool {
        self.threshold_exceeded
    }

    /// Unconsumed translation since the last reset.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Vec2) {
        self.translation = translation;
    }

    pub fn touches(&self) -> &ActiveTouches {
        &self.touches
    }

    /// Feeds a touch. Returns the new state when the pan action should fire.
    pub fn handle_touch(&mut self, sample: &TouchSample) -> Option<GestureState> {
        match sample.phase {
            TouchPhase::Started => {
                if self.touches.is_empty() && self.state != GestureState::Possible {
                    self.reset();
                }
                self.touches.apply(sample);
                self.anchor = self.touches.centroid();

                if self.state.is_active() && self.touches.len() > PAN_MAX_TOUCHES {
                    tracing::debug!(
                        "[gesture] pan failed: {} touches on surface",
                        self.touches.len()
                    );
                    return self.finish(GestureState::Failed);
                }
                None
            }
            TouchPhase::Moved => {
                if !self.touches.apply(sample) || self.state.is_finished() {
                    return None;
                }
                if self.touches.len() > PAN_MAX_TOUCHES {
                    return None;
                }
                let centroid = self.touches.centroid()?;
                let delta = centroid - self.anchor.unwrap_or(centroid);
                self.anchor = Some(centroid);
                if delta == Vec2::ZERO {
                    return None;
                }

                self.displacement += delta;
                self.translation += delta;
                self.update_threshold();

                match self.state {
                    GestureState::Possible => {
                        self.state = GestureState::Began;
                        Some(GestureState::Began)
                    }
                    GestureState::Began | GestureState::Changed => {
                        self.state = GestureState::Changed;
                        // Below the threshold the change is swallowed.
                        self.threshold_exceeded.then_some(GestureState::Changed)
                    }
                    _ => None,
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if !self.touches.apply(sample) {
                    return None;
                }
                self.anchor = self.touches.centroid();

                if !self.state.is_active() {
                    return None;
                }
                if sample.phase == TouchPhase::Canceled {
                    return self.finish(GestureState::Cancelled);
                }
                if self.touches.is_empty() {
                    return self.finish(GestureState::Ended);
                }
                None
            }
        }
    }

    /// Cancels the pan if it is in progress.
    pub fn cancel(&mut self) -> Option<GestureState> {
        if self.state.is_active() {
            self.finish(GestureState::Cancelled)
        } else {
            None
        }
    }

    fn update_threshold(&mut self) {
        if !self.threshold_exceeded && self.displacement.length() >= PAN_THRESHOLD {
            self.threshold_exceeded = true;
            tracing::trace!(
                "[gesture] pan threshold exceeded (displacement {:.1}px)",
                self.displacement.length()
            );
        }
    }

    fn finish(&mut self, state: GestureState) -> Option<GestureState> {
        self.state = state;
        self.threshold_exceeded = false;
        self.translation = Vec2::ZERO;
        self.displacement = Vec2::ZERO;
        Some(state)
    }

    fn reset(&mut self) {
        let touches = std::mem::take(&mut self.touches);
        *self = Self {
            touches,
            ..Self::default()
        };
    }
}
