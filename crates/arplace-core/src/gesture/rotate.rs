//! Two finger rotation recognizer.

use bevy::input::touch::TouchPhase;
use bevy::math::Vec2;

use super::{wrap_angle, ActiveTouches, GestureState, TouchSample};

/// Tracks the angle of the line between the first two touches.
///
/// Angles are measured in screen space (y down), so a clockwise twist on
/// screen is positive. `rotation` accumulates until the consumer resets it
/// with `set_rotation(0.0)`.
#[derive(Debug, Clone, Default)]
pub struct RotationGesture {
    state: GestureState,
    touches: ActiveTouches,
    last_angle: Option<f32>,
    rotation: f32,
}

impl RotationGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Unconsumed rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn handle_touch(&mut self, sample: &TouchSample) -> Option<GestureState> {
        match sample.phase {
            TouchPhase::Started => {
                if self.touches.is_empty() && self.state != GestureState::Possible {
                    self.reset();
                }
                self.touches.apply(sample);
                self.last_angle = self.pair_angle();
                None
            }
            TouchPhase::Moved => {
                if !self.touches.apply(sample) || self.state.is_finished() {
                    return None;
                }
                let angle = self.pair_angle()?;
                let delta = wrap_angle(angle - self.last_angle.unwrap_or(angle));
                self.last_angle = Some(angle);
                if delta == 0.0 {
                    return None;
                }
                self.rotation += delta;

                match self.state {
                    GestureState::Possible => {
                        self.state = GestureState::Began;
                        Some(GestureState::Began)
                    }
                    GestureState::Began | GestureState::Changed => {
                        self.state = GestureState::Changed;
                        Some(GestureState::Changed)
                    }
                    _ => None,
                }
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if !self.touches.apply(sample) {
                    return None;
                }
                self.last_angle = self.pair_angle();

                if !self.state.is_active() {
                    return None;
                }
                if sample.phase == TouchPhase::Canceled {
                    return self.finish(GestureState::Cancelled);
                }
                if self.touches.len() < 2 {
                    return self.finish(GestureState::Ended);
                }
                None
            }
        }
    }

    /// Cancels the rotation if it is in progress.
    pub fn cancel(&mut self) -> Option<GestureState> {
        if self.state.is_active() {
            self.finish(GestureState::Cancelled)
        } else {
            None
        }
    }

    fn pair_angle(&self) -> Option<f32> {
        let first = self.touches.location(0)?;
        let second = self.touches.location(1)?;
        let line = second - first;
        (line != Vec2::ZERO).then(|| line.to_angle())
    }

    fn finish(&mut self, state: GestureState) -> Option<GestureState> {
        self.state = state;
        self.rotation = 0.0;
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
