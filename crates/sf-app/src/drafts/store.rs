use std::marker::PhantomData;
use std::sync::Arc;

use sf_core::draft::{DraftKey, DraftRecord, DraftSchema};
use sf_core::ports::{ClockPort, KeyValueStoragePort};
use tracing::{debug, warn};

/// Typed draft persistence for one content kind.
///
/// 草稿存储：读取时逐字段校验，写入时整体覆盖。
pub struct DraftStore<D: DraftSchema> {
    storage: Arc<dyn KeyValueStoragePort>,
    clock: Arc<dyn ClockPort>,
    _schema: PhantomData<fn() -> D>,
}

impl<D: DraftSchema> Clone for DraftStore<D> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            clock: self.clock.clone(),
            _schema: PhantomData,
        }
    }
}

impl<D: DraftSchema> DraftStore<D> {
    pub fn new(storage: Arc<dyn KeyValueStoragePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            storage,
            clock,
            _schema: PhantomData,
        }
    }

    /// Draft key for `id`; the id is ignored for single-instance kinds.
    pub fn key(&self, id: Option<&str>) -> DraftKey {
        DraftKey::new(D::KIND, id)
    }

    /// Load the normalized draft, or `None` when absent, unreadable or empty.
    pub fn load(&self, id: Option<&str>) -> Option<D> {
        self.load_record(id).map(|record| record.payload)
    }

    pub fn load_record(&self, id: Option<&str>) -> Option<DraftRecord<D>> {
        let key = self.key(id).storage_key();
        let raw = match self.storage.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                debug!(error = %err, key = %key, "draft read failed");
                return None;
            }
        };
        let record = DraftRecord::<D>::parse(&raw);
        if record.is_none() {
            debug!(key = %key, "ignoring unreadable draft");
        }
        record
    }

    /// Overwrite the draft with `payload`, stamped with the current time.
    /// Returns false when the write failed.
    pub fn save(&self, id: Option<&str>, payload: &D) -> bool {
        let key = self.key(id).storage_key();
        let record = DraftRecord::new(payload.clone(), self.clock.now_ms());
        let raw = match record.to_json() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, key = %key, "draft encode failed");
                return false;
            }
        };
        match self.storage.set(&key, &raw) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, key = %key, "draft write failed");
                false
            }
        }
    }

    pub fn clear(&self, id: Option<&str>) {
        let key = self.key(id).storage_key();
        if let Err(err) = self.storage.remove(&key) {
            warn!(error = %err, key = %key, "draft remove failed");
        }
    }
}
