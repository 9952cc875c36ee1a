use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use sf_core::{ChangeId, ContentKind};
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

pub const DEFAULT_SUCCESS_RESET: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Success,
    Error,
}

/// Persists one pending change. `Ok(false)`, `Err` and a panic all count as a
/// failed save.
#[async_trait]
pub trait PersistChange: Send + Sync {
    async fn persist(&self) -> Result<bool>;
}

struct FnPersist<F>(F);

#[async_trait]
impl<F, Fut> PersistChange for FnPersist<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    async fn persist(&self) -> Result<bool> {
        (self.0)().await
    }
}

/// Wrap an async closure as a [`PersistChange`].
pub fn persist_fn<F, Fut>(f: F) -> Arc<dyn PersistChange>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool>> + Send + 'static,
{
    Arc::new(FnPersist(f))
}

/// Called once after a save-all in which every change persisted.
pub trait SaveCompletionHook: Send + Sync {
    fn on_all_saved(&self);
}

#[derive(Clone)]
struct PendingChange {
    id: ChangeId,
    kind: ContentKind,
    persist: Arc<dyn PersistChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    NothingToSave,
    /// Another save-all is still running; this call did nothing.
    AlreadySaving,
    Saved(usize),
    Failed { failed: usize, total: usize },
}

#[derive(Default)]
struct CoordinatorState {
    pending: Vec<PendingChange>,
    status: SaveStatus,
    error_message: Option<String>,
    /// Bumped on every status change; a stale reset timer compares against it.
    generation: u64,
}

struct CoordinatorInner {
    state: Mutex<CoordinatorState>,
    status_tx: watch::Sender<SaveStatus>,
    hooks: Mutex<Vec<Arc<dyn SaveCompletionHook>>>,
    success_reset: Duration,
}

/// Registry of unsaved entity changes with one "save everything" action.
///
/// 保存协调器：登记待保存的变更，并发执行，汇总结果。
#[derive(Clone)]
pub struct SaveAllCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl Default for SaveAllCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_RESET)
    }
}

impl SaveAllCoordinator {
    pub fn new(success_reset: Duration) -> Self {
        let (status_tx, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(CoordinatorInner {
                state: Mutex::new(CoordinatorState::default()),
                status_tx,
                hooks: Mutex::new(Vec::new()),
                success_reset,
            }),
        }
    }

    pub fn add_completion_hook(&self, hook: Arc<dyn SaveCompletionHook>) {
        self.inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    /// Add a pending change, replacing any existing one with the same id.
    pub fn register(&self, id: ChangeId, kind: ContentKind, persist: Arc<dyn PersistChange>) {
        let change = PendingChange {
            id: id.clone(),
            kind,
            persist,
        };
        let mut state = self.inner.lock();
        match state.pending.iter_mut().find(|pending| pending.id == id) {
            Some(existing) => *existing = change,
            None => state.pending.push(change),
        }
        debug!(change = %id, kind = %kind, pending = state.pending.len(), "change registered");
    }

    pub fn unregister(&self, id: &ChangeId) -> bool {
        let mut state = self.inner.lock();
        let before = state.pending.len();
        state.pending.retain(|pending| &pending.id != id);
        before != state.pending.len()
    }

    /// Persist every pending change concurrently and report the aggregate.
    pub async fn save_all(&self) -> SaveOutcome {
        let span = info_span!("usecase.save_all.execute");
        self.save_all_inner().instrument(span).await
    }

    async fn save_all_inner(&self) -> SaveOutcome {
        let batch = {
            let mut state = self.inner.lock();
            if state.pending.is_empty() {
                return SaveOutcome::NothingToSave;
            }
            if state.status == SaveStatus::Saving {
                debug!("save-all already running");
                return SaveOutcome::AlreadySaving;
            }
            self.inner.set_status(&mut state, SaveStatus::Saving, None);
            state.pending.clone()
        };

        let total = batch.len();
        info!(total, "saving pending changes");

        let tasks = batch.iter().map(|change| {
            let persist = change.persist.clone();
            tokio::spawn(async move { persist.persist().await })
        });
        let results = join_all(tasks).await;

        let mut failed = 0;
        for (change, result) in batch.iter().zip(results) {
            let saved = match result {
                Ok(Ok(true)) => true,
                Ok(Ok(false)) => {
                    warn!(change = %change.id, kind = %change.kind, "change not saved");
                    false
                }
                Ok(Err(err)) => {
                    warn!(
                        change = %change.id,
                        kind = %change.kind,
                        error = %err,
                        "change failed to save"
                    );
                    false
                }
                Err(err) => {
                    warn!(
                        change = %change.id,
                        kind = %change.kind,
                        error = %err,
                        "change persist aborted"
                    );
                    false
                }
            };
            if !saved {
                failed += 1;
            }
        }

        if failed > 0 {
            let message = format!("{failed} item(s) failed to save");
            let mut state = self.inner.lock();
            self.inner
                .set_status(&mut state, SaveStatus::Error, Some(message));
            warn!(failed, total, "save-all finished with failures");
            return SaveOutcome::Failed { failed, total };
        }

        let generation = {
            let mut state = self.inner.lock();
            // Changes registered while saving (or replaced since) stay pending.
            state.pending.retain(|pending| {
                !batch
                    .iter()
                    .any(|saved| {
                        saved.id == pending.id && Arc::ptr_eq(&saved.persist, &pending.persist)
                    })
            });
            self.inner.set_status(&mut state, SaveStatus::Success, None);
            state.generation
        };
        info!(total, "all changes saved");

        self.schedule_idle(generation);
        let hooks = self
            .inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook.on_all_saved();
        }

        SaveOutcome::Saved(total)
    }

    fn schedule_idle(&self, generation: u64) {
        let weak: Weak<CoordinatorInner> = Arc::downgrade(&self.inner);
        let delay = self.inner.success_reset;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.lock();
            if state.generation == generation && state.status == SaveStatus::Success {
                inner.set_status(&mut state, SaveStatus::Idle, None);
            }
        });
    }

    pub fn status(&self) -> SaveStatus {
        self.inner.lock().status
    }

    pub fn watch_status(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status_tx.subscribe()
    }

    /// `"<n> item(s) failed to save"` while in the error state.
    pub fn error_message(&self) -> Option<String> {
        self.inner.lock().error_message.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn pending_ids(&self) -> Vec<ChangeId> {
        self.inner
            .lock()
            .pending
            .iter()
            .map(|pending| pending.id.clone())
            .collect()
    }

    /// Drop every pending change and return to idle.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.pending.clear();
        self.inner.set_status(&mut state, SaveStatus::Idle, None);
    }
}

impl CoordinatorInner {
    fn lock(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(
        &self,
        state: &mut CoordinatorState,
        status: SaveStatus,
        message: Option<String>,
    ) {
        state.status = status;
        state.error_message = message;
        state.generation += 1;
        self.status_tx.send_replace(status);
    }
}
