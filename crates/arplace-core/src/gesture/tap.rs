//! Single finger tap recognizer.

use bevy::input::touch::TouchPhase;
use bevy::math::Vec2;

use super::{ActiveTouches, GestureState, TouchSample};

/// Movement (logical pixels) a touch may drift and still count as a tap.
pub const TAP_SLOP: f32 = 10.0;

/// Discrete recognizer: reports `Ended` once, when a lone touch lifts close to
/// where it landed.
#[derive(Debug, Clone, Default)]
pub struct TapGesture {
    state: GestureState,
    touches: ActiveTouches,
    start: Option<(u64, Vec2)>,
    location: Option<Vec2>,
}

impl TapGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Where the recognized tap lifted.
    pub fn location(&self) -> Option<Vec2> {
        self.location
    }

    pub fn handle_touch(&mut self, sample: &TouchSample) -> Option<GestureState> {
        let known = self.touches.apply(sample);
        match sample.phase {
            TouchPhase::Started => {
                if self.touches.len() == 1 {
                    self.state = GestureState::Possible;
                    self.start = Some((sample.id, sample.position));
                    self.location = None;
                } else {
                    self.fail();
                }
                None
            }
            TouchPhase::Moved => {
                if let Some((id, origin)) = self.start {
                    if known && id == sample.id && origin.distance(sample.position) > TAP_SLOP {
                        self.fail();
                    }
                }
                None
            }
            TouchPhase::Ended => {
                let (id, _) = self.start?;
                if self.state != GestureState::Possible || id != sample.id {
                    return None;
                }
                self.start = None;
                self.state = GestureState::Ended;
                self.location = Some(sample.position);
                Some(GestureState::Ended)
            }
            TouchPhase::Canceled => {
                self.fail();
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        self.fail();
    }

    fn fail(&mut self) {
        if self.state == GestureState::Possible && self.start.is_some() {
            self.state = GestureState::Failed;
        }
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_recognized_on_lift() {
        let mut tap = TapGesture::new();
        assert_eq!(tap.handle_touch(&TouchSample::started(1, Vec2::new(50.0, 60.0))), None);
        tap.handle_touch(&TouchSample::moved(1, Vec2::new(53.0, 62.0)));
        assert_eq!(
            tap.handle_touch(&TouchSample::ended(1, Vec2::new(53.0, 62.0))),
            Some(GestureState::Ended)
        );
        assert_eq!(tap.location(), Some(Vec2::new(53.0, 62.0)));
    }

    #[test]
    fn test_drag_beyond_slop_fails_tap() {
        let mut tap = TapGesture::new();
        tap.handle_touch(&TouchSample::started(1, Vec2::ZERO));
        tap.handle_touch(&TouchSample::moved(1, Vec2::new(15.0, 0.0)));
        assert_eq!(tap.state(), GestureState::Failed);
        assert_eq!(tap.handle_touch(&TouchSample::ended(1, Vec2::ZERO)), None);
    }

    #[test]
    fn test_second_finger_fails_tap() {
        let mut tap = TapGesture::new();
        tap.handle_touch(&TouchSample::started(1, Vec2::ZERO));
        tap.handle_touch(&TouchSample::started(2, Vec2::new(40.0, 0.0)));
        assert_eq!(tap.handle_touch(&TouchSample::ended(2, Vec2::new(40.0, 0.0))), None);
        assert_eq!(tap.handle_touch(&TouchSample::ended(1, Vec2::ZERO)), None);
        assert_eq!(tap.state(), GestureState::Failed);
    }

    #[test]
    fn test_next_touch_starts_fresh_tap() {
        let mut tap = TapGesture::new();
        tap.handle_touch(&TouchSample::started(1, Vec2::ZERO));
        tap.handle_touch(&TouchSample::canceled(1, Vec2::ZERO));
        assert_eq!(tap.state(), GestureState::Failed);

        tap.handle_touch(&TouchSample::started(2, Vec2::new(5.0, 5.0)));
        assert_eq!(
            tap.handle_touch(&TouchSample::ended(2, Vec2::new(5.0, 5.0))),
            Some(GestureState::Ended)
        );
    }
}
