//! 编辑草稿的用例

use std::sync::Arc;

use anyhow::Context;
use sf_core::ports::EntityWritePort;
use sf_core::{ChangeId, DraftKey, DraftPayload};
use tracing::{debug, info, info_span};

use crate::drafts::DraftStores;
use crate::save::{persist_fn, PersistChange, SaveAllCoordinator};
use crate::signal::SignalBus;

#[derive(Debug, thiserror::Error)]
pub enum EditDraftError {
    #[error("draft for {key} cannot hold a {payload_kind} payload")]
    KindMismatch { key: DraftKey, payload_kind: String },

    #[error("failed to write draft {0}")]
    WriteFailed(DraftKey),
}

/// Write a draft, notify previews, and register the entity for save-all.
///
/// # Behavior / 行为
/// - 1. Overwrite the draft record for `key`
/// - 2. Emit `key` on the signal bus
/// - 3. Register a pending change whose persist step pushes the stored draft
///   to the content API, then clears it and emits again
pub struct EditDraft {
    stores: DraftStores,
    bus: SignalBus,
    coordinator: SaveAllCoordinator,
    writer: Arc<dyn EntityWritePort>,
}

impl EditDraft {
    pub fn new(
        stores: DraftStores,
        bus: SignalBus,
        coordinator: SaveAllCoordinator,
        writer: Arc<dyn EntityWritePort>,
    ) -> Self {
        Self {
            stores,
            bus,
            coordinator,
            writer,
        }
    }

    pub fn execute(
        &self,
        key: &DraftKey,
        payload: DraftPayload,
    ) -> Result<ChangeId, EditDraftError> {
        let span = info_span!("usecase.edit_draft.execute", key = %key);
        let _enter = span.enter();

        if payload.kind() != key.kind() {
            return Err(EditDraftError::KindMismatch {
                key: key.clone(),
                payload_kind: payload.kind().to_string(),
            });
        }
        if !self.stores.save_payload(key, &payload) {
            return Err(EditDraftError::WriteFailed(key.clone()));
        }
        self.bus.emit(&key.storage_key());

        let change_id = ChangeId::for_entity(key.kind(), key.entity_id());
        self.coordinator
            .register(change_id.clone(), key.kind(), self.persist_step(key.clone()));

        info!(change = %change_id, "draft updated");
        Ok(change_id)
    }

    /// Register a pending change for a draft that is already stored, e.g. one
    /// written by an earlier session. Returns `None` when there is no usable
    /// draft under `key`.
    pub fn resume(&self, key: &DraftKey) -> Option<ChangeId> {
        self.stores.load_payload(key)?;
        let change_id = ChangeId::for_entity(key.kind(), key.entity_id());
        self.coordinator
            .register(change_id.clone(), key.kind(), self.persist_step(key.clone()));
        debug!(change = %change_id, "resumed pending change");
        Some(change_id)
    }

    fn persist_step(&self, key: DraftKey) -> Arc<dyn PersistChange> {
        let stores = self.stores.clone();
        let bus = self.bus.clone();
        let writer = self.writer.clone();

        persist_fn(move || {
            let stores = stores.clone();
            let bus = bus.clone();
            let writer = writer.clone();
            let key = key.clone();
            async move {
                // Read at persist time: the draft may have changed in another context.
                let Some(payload) = stores.load_payload(&key) else {
                    debug!(key = %key, "draft gone before save; nothing to persist");
                    return Ok(true);
                };

                writer
                    .update_entity(key.kind(), key.entity_id(), &payload)
                    .await
                    .with_context(|| format!("failed to update {key}"))?;

                // Keep a newer draft written while the update was in flight.
                if stores.load_payload(&key).as_ref() == Some(&payload) {
                    stores.clear(&key);
                }
                bus.emit(&key.storage_key());
                Ok(true)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{SaveOutcome, SaveStatus};
    use crate::test_support::{FixedClock, MemoryStorage};
    use async_trait::async_trait;
    use sf_core::content::{BaselineEntity, ContentKind, Project};
    use sf_core::draft::{AboutDraft, ProjectDraft};
    use sf_core::ports::EntityError;
    use std::sync::Mutex;

    /// Records every update; fails when `fail` is set.
    #[derive(Default)]
    struct MockEntityWriter {
        updates: Mutex<Vec<(ContentKind, Option<String>, DraftPayload)>>,
        fail: bool,
    }

    #[async_trait]
    impl EntityWritePort for MockEntityWriter {
        async fn update_entity(
            &self,
            kind: ContentKind,
            id: Option<&str>,
            partial: &DraftPayload,
        ) -> Result<BaselineEntity, EntityError> {
            if self.fail {
                return Err(EntityError::Backend("rejected".to_string()));
            }
            self.updates
                .lock()
                .unwrap()
                .push((kind, id.map(str::to_string), partial.clone()));
            Ok(BaselineEntity::Project(Project::default()))
        }
    }

    struct Fixture {
        stores: DraftStores,
        bus: SignalBus,
        coordinator: SaveAllCoordinator,
        writer: Arc<MockEntityWriter>,
        edit: EditDraft,
    }

    fn fixture(fail: bool) -> Fixture {
        let clock = Arc::new(FixedClock(5));
        let stores = DraftStores::new(Arc::new(MemoryStorage::default()), clock.clone());
        let bus = SignalBus::local("admin", clock);
        let coordinator = SaveAllCoordinator::default();
        let writer = Arc::new(MockEntityWriter {
            fail,
            ..Default::default()
        });
        let edit = EditDraft::new(stores.clone(), bus.clone(), coordinator.clone(), writer.clone());
        Fixture {
            stores,
            bus,
            coordinator,
            writer,
            edit,
        }
    }

    fn title(title: &str) -> DraftPayload {
        DraftPayload::Project(ProjectDraft {
            title: Some(title.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn edit_writes_draft_emits_and_registers() {
        let f = fixture(false);
        let key = DraftKey::entity(ContentKind::Project, "p1");
        let watched = vec![key.storage_key()];
        let before = f.bus.snapshot(Some(&watched));

        let change = f.edit.execute(&key, title("New Title")).unwrap();

        assert_eq!(change.as_ref(), "project:p1");
        assert_eq!(f.stores.load_payload(&key), Some(title("New Title")));
        assert_ne!(f.bus.snapshot(Some(&watched)), before);
        assert_eq!(f.coordinator.pending_ids(), vec![change]);
    }

    #[test]
    fn edit_rejects_payload_of_another_kind() {
        let f = fixture(false);
        let key = DraftKey::single(ContentKind::About);

        let result = f.edit.execute(&key, title("Wrong"));

        assert!(matches!(result, Err(EditDraftError::KindMismatch { .. })));
        assert!(!f.coordinator.is_dirty());
    }

    #[tokio::test]
    async fn saving_pushes_latest_draft_and_clears_it() {
        let f = fixture(false);
        let key = DraftKey::entity(ContentKind::Project, "p1");
        f.edit.execute(&key, title("First")).unwrap();
        f.edit.execute(&key, title("Second")).unwrap();

        assert_eq!(f.coordinator.save_all().await, SaveOutcome::Saved(1));

        let updates = f.writer.updates.lock().unwrap().clone();
        assert_eq!(
            updates,
            vec![(ContentKind::Project, Some("p1".to_string()), title("Second"))]
        );
        assert_eq!(f.stores.load_payload(&key), None);
        assert_eq!(f.coordinator.status(), SaveStatus::Success);
    }

    #[tokio::test]
    async fn resume_registers_stored_drafts_only() {
        let f = fixture(false);
        let stored = DraftKey::entity(ContentKind::Project, "p7");
        let missing = DraftKey::entity(ContentKind::Project, "p8");
        assert!(f.stores.save_payload(&stored, &title("From Yesterday")));

        assert!(f.edit.resume(&stored).is_some());
        assert!(f.edit.resume(&missing).is_none());
        assert_eq!(f.coordinator.pending_count(), 1);

        assert_eq!(f.coordinator.save_all().await, SaveOutcome::Saved(1));
        assert_eq!(f.writer.updates.lock().unwrap().len(), 1);
        assert_eq!(f.stores.load_payload(&stored), None);
    }

    #[tokio::test]
    async fn rejected_update_keeps_draft_and_change() {
        let f = fixture(true);
        let key = DraftKey::single(ContentKind::About);
        let payload = DraftPayload::About(AboutDraft {
            headline: Some("Hi".to_string()),
            ..Default::default()
        });
        f.edit.execute(&key, payload.clone()).unwrap();

        let outcome = f.coordinator.save_all().await;

        assert_eq!(outcome, SaveOutcome::Failed { failed: 1, total: 1 });
        assert_eq!(f.stores.load_payload(&key), Some(payload));
        assert!(f.coordinator.is_dirty());
    }
}
