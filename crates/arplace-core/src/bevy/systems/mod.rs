//! ECS systems for AR interaction.
//!
//! Frame order (`Update`, chained):
//! 1. `index_virtual_objects`: assign handles, forget despawned objects
//! 2. `apply_pending_selection`: selection requests from the UI store
//! 3. `handle_touch_input`: touches through the recognizers and controller
//! 4. `advance_tracking`: re-project the held object against the new camera pose
//! 5. `emit_selection_changes`
//!
//! `sync_interaction_store` publishes the result in `PostUpdate`.

pub mod input;
pub mod selection;
pub mod state_sync;
pub mod tracking;

pub use input::*;
pub use selection::*;
pub use state_sync::*;
pub use tracking::*;
