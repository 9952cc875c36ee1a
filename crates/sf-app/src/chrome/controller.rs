use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sf_core::ports::KeyValueStoragePort;
use sf_core::preview::preview_url;
use tracing::{debug, warn};

use crate::save::SaveCompletionHook;

/// Session storage key of the preview modal state.
pub const PREVIEW_MODAL_KEY: &str = "preview.modal";

/// Persisted modal state; survives reloads within one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewModalState {
    pub open: bool,
    pub path: Option<String>,
}

/// Admin-side preview modal with an embedded frame.
///
/// The frame URL always carries `preview=draft`; `refresh_preview` bumps a
/// nonce so the frame reloads. The nonce lives only in memory.
pub struct PreviewController {
    session: Arc<dyn KeyValueStoragePort>,
    refresh: AtomicU64,
}

impl PreviewController {
    pub fn new(session: Arc<dyn KeyValueStoragePort>) -> Self {
        Self {
            session,
            refresh: AtomicU64::new(0),
        }
    }

    /// Current modal state. Missing or corrupt data reads as closed.
    pub fn state(&self) -> PreviewModalState {
        match self.session.get(PREVIEW_MODAL_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                debug!(error = %err, "discarding unreadable preview modal state");
                PreviewModalState::default()
            }),
            Ok(None) => PreviewModalState::default(),
            Err(err) => {
                debug!(error = %err, "preview modal state unavailable");
                PreviewModalState::default()
            }
        }
    }

    fn store(&self, state: &PreviewModalState) {
        let raw = match serde_json::to_string(state) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to encode preview modal state");
                return;
            }
        };
        if let Err(err) = self.session.set(PREVIEW_MODAL_KEY, &raw) {
            debug!(error = %err, "failed to persist preview modal state");
        }
    }

    pub fn open_preview(&self, path: &str) {
        self.store(&PreviewModalState {
            open: true,
            path: Some(path.to_string()),
        });
    }

    /// Close the modal, remembering the last path.
    pub fn close_preview(&self) {
        let mut state = self.state();
        state.open = false;
        self.store(&state);
    }

    /// Force the embedded frame to reload. Returns the new nonce.
    pub fn refresh_preview(&self) -> u64 {
        self.refresh.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn path(&self) -> Option<String> {
        self.state().path
    }

    /// URL of the embedded frame, or `None` while closed.
    pub fn frame_url(&self) -> Option<String> {
        let state = self.state();
        if !state.open {
            return None;
        }
        let path = state.path.unwrap_or_else(|| "/".to_string());
        Some(preview_url(&path, self.refresh.load(Ordering::SeqCst)))
    }
}

impl SaveCompletionHook for PreviewController {
    fn on_all_saved(&self) {
        self.refresh_preview();
    }
}
