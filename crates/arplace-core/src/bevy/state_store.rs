//! Shared interaction state for UI code outside the ECS.
//!
//! The store is polled by the host UI and accepts selection requests from it.
//! Bevy systems apply pending requests at the start of the frame and publish
//! the controller state at the end of it.

use std::sync::Arc;

use bevy::prelude::Resource;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::bevy::resources::TrackingState;
use crate::interaction::InteractionController;
use crate::scene::ObjectId;

/// Snapshot of the interaction session for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionSummary {
    pub selected_object: Option<ObjectId>,
    pub tracked_object: Option<ObjectId>,
    pub tracking_available: bool,
}

/// Interaction state store for UI synchronization.
#[derive(Resource, Clone, Default)]
pub struct InteractionStore {
    inner: Arc<RwLock<InteractionStoreInner>>,
}

#[derive(Default)]
struct InteractionStoreInner {
    summary: InteractionSummary,
    version: u64,
    /// Pending selection change from the UI.
    pending_selection: Option<Option<ObjectId>>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> InteractionSummary {
        self.inner.read().summary
    }

    pub fn get_selected_object(&self) -> Option<ObjectId> {
        self.inner.read().summary.selected_object
    }

    pub fn get_tracked_object(&self) -> Option<ObjectId> {
        self.inner.read().summary.tracked_object
    }

    /// Version for change detection; bumps whenever the summary changes.
    pub fn get_version(&self) -> u64 {
        self.inner.read().version
    }

    /// Requests a selection change (from the UI).
    pub fn select_object(&self, object: Option<ObjectId>) {
        self.inner.write().pending_selection = Some(object);
    }

    /// Take pending selection (called by Bevy systems).
    pub fn take_pending_selection(&self) -> Option<Option<ObjectId>> {
        self.inner.write().pending_selection.take()
    }

    /// Update state from Bevy.
    pub fn sync_from_bevy(&self, controller: &InteractionController, tracking: TrackingState) {
        let summary = InteractionSummary {
            selected_object: controller.selected_object(),
            tracked_object: controller.tracked_object(),
            tracking_available: tracking.has_pose(),
        };

        let mut inner = self.inner.write();
        if inner.summary != summary {
            inner.summary = summary;
            inner.version += 1;
        }
    }
}
