//! Camera-relative placement and motion smoothing.
//!
//! Positions resolved from feature points or extrapolation jitter from frame
//! to frame. Those placements go through a [`Smoothing`] strategy; plane
//! anchored placements are applied as-is.

use std::collections::VecDeque;

use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};

/// Objects are never placed farther than this from the camera (meters).
pub const MAX_CAMERA_DISTANCE: f32 = 10.0;

/// Default number of recent camera distances averaged by `DistanceAverage`.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 10;

/// Errors from loading smoothing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid smoothing config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Smoothing window must hold at least one sample")]
    EmptyWindow,

    #[error("Lerp factor must be in (0, 1], got {0}")]
    FactorOutOfRange(f32),
}

/// Per-object smoothing memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothingHistory {
    /// Camera distances of recent smoothed placements, oldest first.
    pub recent_distances: VecDeque<f32>,
    /// Camera-relative offset of the last placement.
    pub last_offset: Option<Vec3>,
}

/// A smoothing strategy for camera-relative offsets.
pub trait Smoothing: Send + Sync + 'static {
    /// Returns the smoothed offset for a new camera-relative `offset`.
    fn smooth(&self, history: &mut SmoothingHistory, offset: Vec3) -> Vec3;
}

/// Keeps the new direction but uses the mean camera distance of the last
/// `window` smoothed placements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceAverage {
    pub window: usize,
}

impl Default for DistanceAverage {
    fn default() -> Self {
        Self {
            window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl Smoothing for DistanceAverage {
    fn smooth(&self, history: &mut SmoothingHistory, offset: Vec3) -> Vec3 {
        let distance = offset.length();
        history.recent_distances.push_back(distance);
        while history.recent_distances.len() > self.window.max(1) {
            history.recent_distances.pop_front();
        }

        #[allow(clippy::cast_precision_loss)]
        let average = history.recent_distances.iter().sum::<f32>()
            / history.recent_distances.len() as f32;
        offset.normalize_or_zero() * average
    }
}

/// Moves the previous offset a fixed fraction toward the new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialLerp {
    pub factor: f32,
}

impl Smoothing for ExponentialLerp {
    fn smooth(&self, history: &mut SmoothingHistory, offset: Vec3) -> Vec3 {
        match history.last_offset {
            Some(previous) => previous.lerp(offset, self.factor),
            None => offset,
        }
    }
}

/// Serializable choice of smoothing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SmoothingConfig {
    DistanceAverage { window: usize },
    ExponentialLerp { factor: f32 },
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self::DistanceAverage {
            window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}

impl SmoothingConfig {
    /// Parses and validates a JSON config such as
    /// `{"strategy": "exponential_lerp", "factor": 0.3}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::DistanceAverage { window } if window == 0 => Err(ConfigError::EmptyWindow),
            Self::ExponentialLerp { factor } if !(factor > 0.0 && factor <= 1.0) => {
                Err(ConfigError::FactorOutOfRange(factor))
            }
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Box<dyn Smoothing> {
        match *self {
            Self::DistanceAverage { window } => Box::new(DistanceAverage { window }),
            Self::ExponentialLerp { factor } => Box::new(ExponentialLerp { factor }),
        }
    }
}

/// Places a target position relative to the camera it was resolved from.
///
/// The camera-relative offset is clamped to [`MAX_CAMERA_DISTANCE`], then
/// smoothed when `smooth` is set. Returns the final world position.
pub fn place_relative_to_camera(
    smoothing: &dyn Smoothing,
    history: &mut SmoothingHistory,
    camera: &Transform,
    target: Vec3,
    smooth: bool,
) -> Vec3 {
    let camera_position = camera.translation;
    let mut offset = target - camera_position;
    if offset.length() > MAX_CAMERA_DISTANCE {
        offset = offset.normalize() * MAX_CAMERA_DISTANCE;
    }

    if smooth {
        offset = smoothing.smooth(history, offset);
    }
    history.last_offset = Some(offset);

    camera_position + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at_origin() -> Transform {
        Transform::IDENTITY
    }

    #[test]
    fn test_direct_placement_is_exact() {
        let mut history = SmoothingHistory::default();
        let placed = place_relative_to_camera(
            &DistanceAverage::default(),
            &mut history,
            &camera_at_origin(),
            Vec3::new(0.0, -1.0, -2.0),
            false,
        );
        assert_eq!(placed, Vec3::new(0.0, -1.0, -2.0));
        assert!(history.recent_distances.is_empty());
    }

    #[test]
    fn test_far_targets_are_clamped() {
        let mut history = SmoothingHistory::default();
        let camera = Transform::from_xyz(1.0, 0.0, 0.0);
        let placed = place_relative_to_camera(
            &DistanceAverage::default(),
            &mut history,
            &camera,
            Vec3::new(1.0, 0.0, -50.0),
            false,
        );
        assert!((placed - Vec3::new(1.0, 0.0, -MAX_CAMERA_DISTANCE)).length() < 1e-4);
    }

    #[test]
    fn test_distance_average_damps_jumps() {
        let smoothing = DistanceAverage { window: 2 };
        let mut history = SmoothingHistory::default();
        let camera = camera_at_origin();

        place_relative_to_camera(&smoothing, &mut history, &camera, Vec3::new(0.0, 0.0, -1.0), true);
        let placed =
            place_relative_to_camera(&smoothing, &mut history, &camera, Vec3::new(0.0, 0.0, -3.0), true);
        assert!((placed - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);

        // window of two: the first sample falls out
        let placed =
            place_relative_to_camera(&smoothing, &mut history, &camera, Vec3::new(0.0, 0.0, -3.0), true);
        assert!((placed - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_exponential_lerp_starts_from_last_offset() {
        let smoothing = ExponentialLerp { factor: 0.5 };
        let mut history = SmoothingHistory::default();
        let camera = camera_at_origin();

        place_relative_to_camera(&smoothing, &mut history, &camera, Vec3::new(0.0, 0.0, -2.0), false);
        let placed =
            place_relative_to_camera(&smoothing, &mut history, &camera, Vec3::new(2.0, 0.0, -2.0), true);
        assert!((placed - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_config_from_json() {
        let config = SmoothingConfig::from_json(r#"{"strategy": "exponential_lerp", "factor": 0.25}"#)
            .unwrap();
        assert_eq!(config, SmoothingConfig::ExponentialLerp { factor: 0.25 });

        let config =
            SmoothingConfig::from_json(r#"{"strategy": "distance_average", "window": 4}"#).unwrap();
        assert_eq!(config, SmoothingConfig::DistanceAverage { window: 4 });
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(matches!(
            SmoothingConfig::from_json(r#"{"strategy": "distance_average", "window": 0}"#),
            Err(ConfigError::EmptyWindow)
        ));
        assert!(matches!(
            SmoothingConfig::from_json(r#"{"strategy": "exponential_lerp", "factor": 1.5}"#),
            Err(ConfigError::FactorOutOfRange(_))
        ));
        assert!(matches!(
            SmoothingConfig::from_json(r#"{"strategy": "kalman"}"#),
            Err(ConfigError::Json(_))
        ));
    }
}
