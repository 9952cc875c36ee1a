//! Save-all coordination of pending entity changes.

mod coordinator;

pub use coordinator::{
    persist_fn, PersistChange, SaveAllCoordinator, SaveCompletionHook, SaveOutcome, SaveStatus,
    DEFAULT_SUCCESS_RESET,
};

use crate::signal::SignalBus;

/// After a full save every preview, in every context, re-derives.
impl SaveCompletionHook for SignalBus {
    fn on_all_saved(&self) {
        self.emit_refresh();
    }
}
