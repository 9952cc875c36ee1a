use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sf_core::ports::{KeyValueStoragePort, SignalMessage, StorageChange, StorageError};
use tokio::sync::mpsc;
use tracing::trace;

use super::context::BrowsingContext;

/// Which cross-context transports the profile supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileOptions {
    pub storage_events: bool,
    pub broadcast_channel: bool,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            storage_events: true,
            broadcast_channel: true,
        }
    }
}

/// Plain in-memory storage area.
#[derive(Default)]
struct MemoryArea {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStoragePort for MemoryArea {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type Listeners<T> = Mutex<Vec<(u64, mpsc::UnboundedSender<T>)>>;

pub(crate) struct ProfileInner {
    pub(crate) options: ProfileOptions,
    pub(crate) local: Arc<dyn KeyValueStoragePort>,
    storage_listeners: Listeners<StorageChange>,
    channel_listeners: Listeners<SignalMessage>,
    next_context: AtomicU64,
}

/// One browser profile: local storage shared by every context, storage
/// events delivered to every context except the writer, and a broadcast
/// channel that never echoes to the poster.
#[derive(Clone)]
pub struct BrowserProfile {
    inner: Arc<ProfileInner>,
}

impl Default for BrowserProfile {
    fn default() -> Self {
        Self::new(ProfileOptions::default())
    }
}

impl BrowserProfile {
    pub fn new(options: ProfileOptions) -> Self {
        Self::with_backing(Arc::new(MemoryArea::default()), options)
    }

    /// Profile whose local storage is persisted by `backing`.
    pub fn with_backing(backing: Arc<dyn KeyValueStoragePort>, options: ProfileOptions) -> Self {
        Self {
            inner: Arc::new(ProfileInner {
                options,
                local: backing,
                storage_listeners: Mutex::new(Vec::new()),
                channel_listeners: Mutex::new(Vec::new()),
                next_context: AtomicU64::new(1),
            }),
        }
    }

    pub fn options(&self) -> ProfileOptions {
        self.inner.options
    }

    /// Open a new browsing context (a tab) with its own session storage.
    pub fn open_context(&self) -> BrowsingContext {
        let seq = self.inner.next_context.fetch_add(1, Ordering::SeqCst);
        BrowsingContext::new(seq, self.inner.clone(), Arc::new(MemoryArea::default()))
    }

    /// Raw local storage, bypassing event delivery.
    pub fn local_storage(&self) -> Arc<dyn KeyValueStoragePort> {
        self.inner.local.clone()
    }
}

impl ProfileInner {
    pub(crate) fn add_storage_listener(
        &self,
        context: u64,
    ) -> mpsc::UnboundedReceiver<StorageChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.storage_listeners).push((context, tx));
        rx
    }

    pub(crate) fn add_channel_listener(
        &self,
        context: u64,
    ) -> mpsc::UnboundedReceiver<SignalMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.channel_listeners).push((context, tx));
        rx
    }

    /// Deliver a storage write to every other context.
    pub(crate) fn storage_changed(&self, writer: u64, change: StorageChange) {
        if !self.options.storage_events {
            return;
        }
        fan_out(&self.storage_listeners, writer, &change);
        trace!(key = %change.key, writer, "storage event delivered");
    }

    pub(crate) fn broadcast(&self, poster: u64, message: &SignalMessage) {
        fan_out(&self.channel_listeners, poster, message);
        trace!(key = %message.key, poster, "broadcast delivered");
    }
}

/// Send to every listener not owned by `origin`; closed listeners are dropped.
fn fan_out<T: Clone>(listeners: &Listeners<T>, origin: u64, item: &T) {
    lock(listeners).retain(|(context, tx)| {
        if *context == origin {
            return !tx.is_closed();
        }
        tx.send(item.clone()).is_ok()
    });
}
