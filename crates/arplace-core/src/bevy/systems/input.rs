//! Touch input handling.

use bevy::input::touch::TouchInput;
use bevy::prelude::*;

use crate::bevy::resources::InteractionRes;
use crate::bevy::view::ArSceneView;
use crate::gesture::TouchSample;

/// System to feed touch input through the gesture recognizers.
///
/// Touches are handled in arrival order; each may fire pan, rotation and tap
/// actions on the controller.
pub fn handle_touch_input(
    mut touches: MessageReader<TouchInput>,
    mut interaction: ResMut<InteractionRes>,
    mut scene: ArSceneView,
) {
    for touch in touches.read() {
        interaction.handle_touch(&TouchSample::from(touch), &mut scene);
    }
}
