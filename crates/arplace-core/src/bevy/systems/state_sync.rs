//! Publishing interaction state to the UI store.

use bevy::prelude::*;

use crate::bevy::resources::{InteractionRes, TrackingState};
use crate::bevy::state_store::InteractionStore;

/// System to mirror the controller state into the `InteractionStore`.
pub fn sync_interaction_store(
    interaction: Res<InteractionRes>,
    tracking: Res<TrackingState>,
    store: Res<InteractionStore>,
) {
    store.sync_from_bevy(&interaction, *tracking);
}
