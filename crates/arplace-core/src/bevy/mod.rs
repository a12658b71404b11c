//! Bevy integration for AR object interaction.
//!
//! Touch input flows from Bevy `TouchInput` messages into the
//! [`InteractionController`](crate::interaction::InteractionController),
//! which moves `VirtualObject` entities through [`ArSceneView`].

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state_store;
pub mod systems;
pub mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::ArInteractionPlugin;
pub use resources::*;
pub use state_store::{InteractionStore, InteractionSummary};
pub use view::ArSceneView;
