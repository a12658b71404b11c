//! Per-frame drag tracking.

use bevy::prelude::*;

use crate::bevy::resources::InteractionRes;
use crate::bevy::view::ArSceneView;

/// System to keep the tracked object under the finger as the camera moves.
pub fn advance_tracking(mut interaction: ResMut<InteractionRes>, mut scene: ArSceneView) {
    interaction.advance_tracking(&mut scene);
}
