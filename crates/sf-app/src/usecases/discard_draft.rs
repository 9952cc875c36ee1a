use sf_core::{ChangeId, DraftKey};
use tracing::{info, info_span};

use crate::drafts::DraftStores;
use crate::save::SaveAllCoordinator;
use crate::signal::SignalBus;

/// Throw away a draft and its pending change; previews fall back to baseline.
pub struct DiscardDraft {
    stores: DraftStores,
    bus: SignalBus,
    coordinator: SaveAllCoordinator,
}

impl DiscardDraft {
    pub fn new(stores: DraftStores, bus: SignalBus, coordinator: SaveAllCoordinator) -> Self {
        Self {
            stores,
            bus,
            coordinator,
        }
    }

    /// Returns true when a pending change was dropped.
    pub fn execute(&self, key: &DraftKey) -> bool {
        let span = info_span!("usecase.discard_draft.execute", key = %key);
        let _enter = span.enter();

        self.stores.clear(key);
        self.bus.emit(&key.storage_key());
        let dropped = self
            .coordinator
            .unregister(&ChangeId::for_entity(key.kind(), key.entity_id()));

        info!(dropped, "draft discarded");
        dropped
    }
}
