//! # Dependency wiring / 依赖装配
//!
//! Builds one browsing context over the file-backed stores named in
//! [`AppConfig`] and hands back a ready [`PreviewSession`].

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sf_app::{PreviewDeps, PreviewSession, SessionOptions};
use sf_core::config::AppConfig;
use sf_core::DraftKey;
use sf_infra::{CachedPhotoLookup, FileKeyValueStore, InMemoryContentRepository, SystemClock};
use sf_platform::{BrowserProfile, ProfileOptions};
use tracing::{debug, info};

/// Everything one command invocation works with.
pub struct Site {
    pub config: AppConfig,
    pub session: PreviewSession,
    drafts: Arc<FileKeyValueStore>,
}

/// Wire the preview session for one context.
/// 为一个浏览上下文装配预览会话。
pub async fn wire_site(config: AppConfig) -> anyhow::Result<Site> {
    let drafts = Arc::new(
        FileKeyValueStore::open(&config.drafts_path).context("failed to open draft storage")?,
    );
    let session_storage = Arc::new(
        FileKeyValueStore::open(&config.session_path).context("failed to open session storage")?,
    );
    let content = Arc::new(
        InMemoryContentRepository::open(&config.content_path)
            .await
            .context("failed to open content document")?,
    );

    let profile = BrowserProfile::with_backing(drafts.clone(), ProfileOptions::default());
    let context = profile.open_context();

    let deps = PreviewDeps {
        context_id: context.id().to_string(),
        local_storage: context.local_storage(),
        session_storage,
        storage_events: context.storage_events(),
        broadcast: context.broadcast(),
        visibility: context.visibility(),
        entity_read: content.clone(),
        entity_write: content.clone(),
        photos: Arc::new(CachedPhotoLookup::new(
            content.clone(),
            config.photo_cache_entries,
        )),
        clock: Arc::new(SystemClock),
    };
    let session = PreviewSession::new(
        deps,
        SessionOptions {
            success_reset: Duration::from_millis(config.success_reset_ms),
        },
    );
    debug!(context = %context.id(), drafts = %config.drafts_path.display(), "site wired");

    Ok(Site {
        config,
        session,
        drafts,
    })
}

impl Site {
    /// Keys of every draft currently on disk, in storage order.
    pub fn stored_draft_keys(&self) -> Vec<DraftKey> {
        self.drafts
            .keys()
            .iter()
            .filter_map(|key| DraftKey::from_storage_key(key))
            .collect()
    }

    /// Register a pending change for every stored draft. Returns how many
    /// were registered.
    pub fn resume_pending(&self) -> usize {
        let edit = self.session.edit_draft();
        let resumed = self
            .stored_draft_keys()
            .iter()
            .filter_map(|key| edit.resume(key))
            .count();
        info!(resumed, "pending changes restored from stored drafts");
        resumed
    }
}
