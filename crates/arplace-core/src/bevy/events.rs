//! ECS messages for AR interaction.

use bevy::prelude::*;

use crate::scene::ObjectId;

/// Message fired when the selected object changes.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct ObjectSelectedEvent {
    /// The newly selected object, `None` when the selection was cleared.
    pub object: Option<ObjectId>,
    /// Entity of the selected object, if it is still in the world.
    pub entity: Option<Entity>,
}
