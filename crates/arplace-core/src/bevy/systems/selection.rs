//! Object bookkeeping and selection systems.

use bevy::prelude::*;

use crate::bevy::components::VirtualObject;
use crate::bevy::events::ObjectSelectedEvent;
use crate::bevy::resources::{InteractionRes, ObjectEntityMap};
use crate::bevy::state_store::InteractionStore;
use crate::scene::ObjectId;

/// System to assign handles to new objects and drop despawned ones.
pub fn index_virtual_objects(
    added: Query<Entity, Added<VirtualObject>>,
    mut removed: RemovedComponents<VirtualObject>,
    mut object_map: ResMut<ObjectEntityMap>,
    mut interaction: ResMut<InteractionRes>,
) {
    for entity in removed.read() {
        if let Some(id) = object_map.remove_entity(entity) {
            tracing::info!("[scene] {} removed", id);
            interaction.forget_object(id);
        }
    }

    for entity in &added {
        let id = object_map.register(entity);
        tracing::info!("[scene] {} added ({:?})", id, entity);
    }
}

/// System to apply selection requests from the UI store.
pub fn apply_pending_selection(
    store: Res<InteractionStore>,
    object_map: Res<ObjectEntityMap>,
    mut interaction: ResMut<InteractionRes>,
) {
    let Some(selection) = store.take_pending_selection() else {
        return;
    };

    if let Some(id) = selection.filter(|id| !object_map.contains(*id)) {
        tracing::warn!("[selection] ignoring request for unknown {}", id);
        return;
    }
    interaction.select(selection);
}

/// System to fire `ObjectSelectedEvent` when the selection changes.
pub fn emit_selection_changes(
    interaction: Res<InteractionRes>,
    object_map: Res<ObjectEntityMap>,
    mut last_selected: Local<Option<ObjectId>>,
    mut writer: MessageWriter<ObjectSelectedEvent>,
) {
    let selected = interaction.selected_object();
    if selected == *last_selected {
        return;
    }
    *last_selected = selected;

    writer.write(ObjectSelectedEvent {
        object: selected,
        entity: selected.and_then(|id| object_map.entity(id)),
    });
}
