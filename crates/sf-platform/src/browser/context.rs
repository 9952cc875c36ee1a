use std::sync::Arc;

use sf_core::ports::{
    BroadcastChannelPort, KeyValueStoragePort, SignalMessage, StorageChange, StorageError,
    StorageEventsPort, TransportError, Visibility, VisibilityPort,
};
use tokio::sync::mpsc;

use super::profile::ProfileInner;
use super::visibility::VisibilityController;

/// One tab of a [`super::BrowserProfile`].
///
/// Hands out port adapters bound to this context: writes through
/// [`BrowsingContext::local_storage`] raise storage events in every other
/// context of the profile, never in this one.
#[derive(Clone)]
pub struct BrowsingContext {
    seq: u64,
    id: String,
    profile: Arc<ProfileInner>,
    session: Arc<dyn KeyValueStoragePort>,
    visibility: Arc<VisibilityController>,
}

impl BrowsingContext {
    pub(crate) fn new(
        seq: u64,
        profile: Arc<ProfileInner>,
        session: Arc<dyn KeyValueStoragePort>,
    ) -> Self {
        Self {
            seq,
            id: format!("ctx-{seq}"),
            profile,
            session,
            visibility: Arc::new(VisibilityController::default()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn local_storage(&self) -> Arc<dyn KeyValueStoragePort> {
        Arc::new(ContextLocalStorage {
            seq: self.seq,
            profile: self.profile.clone(),
        })
    }

    /// Per-context storage; no events.
    pub fn session_storage(&self) -> Arc<dyn KeyValueStoragePort> {
        self.session.clone()
    }

    pub fn storage_events(&self) -> Arc<dyn StorageEventsPort> {
        Arc::new(ContextStorageEvents {
            seq: self.seq,
            profile: self.profile.clone(),
        })
    }

    pub fn broadcast(&self) -> Arc<dyn BroadcastChannelPort> {
        Arc::new(ContextBroadcast {
            seq: self.seq,
            profile: self.profile.clone(),
        })
    }

    pub fn visibility(&self) -> Arc<dyn VisibilityPort> {
        self.visibility.clone()
    }

    /// Hide or show this tab.
    pub fn set_visibility(&self, visibility: Visibility) {
        self.visibility.set(visibility);
    }
}

struct ContextLocalStorage {
    seq: u64,
    profile: Arc<ProfileInner>,
}

impl KeyValueStoragePort for ContextLocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.profile.local.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.profile.local.set(key, value)?;
        self.profile.storage_changed(
            self.seq,
            StorageChange {
                key: key.to_string(),
                new_value: Some(value.to_string()),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.profile.local.remove(key)?;
        self.profile.storage_changed(
            self.seq,
            StorageChange {
                key: key.to_string(),
                new_value: None,
            },
        );
        Ok(())
    }
}

struct ContextStorageEvents {
    seq: u64,
    profile: Arc<ProfileInner>,
}

impl StorageEventsPort for ContextStorageEvents {
    fn watch(&self) -> Result<mpsc::UnboundedReceiver<StorageChange>, TransportError> {
        if !self.profile.options.storage_events {
            return Err(TransportError::Unsupported);
        }
        Ok(self.profile.add_storage_listener(self.seq))
    }
}

struct ContextBroadcast {
    seq: u64,
    profile: Arc<ProfileInner>,
}

impl BroadcastChannelPort for ContextBroadcast {
    fn post(&self, message: &SignalMessage) -> Result<(), TransportError> {
        if !self.profile.options.broadcast_channel {
            return Err(TransportError::Unsupported);
        }
        self.profile.broadcast(self.seq, message);
        Ok(())
    }

    fn listen(&self) -> Result<mpsc::UnboundedReceiver<SignalMessage>, TransportError> {
        if !self.profile.options.broadcast_channel {
            return Err(TransportError::Unsupported);
        }
        Ok(self.profile.add_channel_listener(self.seq))
    }
}
