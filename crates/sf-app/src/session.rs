//! Per-context preview session.
//!
//! Everything that used to be process-global (signal counters, the pending
//! change registry) is built here at session start and reset with it.

use std::sync::Arc;
use std::time::Duration;

use sf_core::content::{BaselineEntity, ContentKind, Photo};
use sf_core::{PreviewEntity, PreviewMode};

use crate::chrome::PreviewController;
use crate::deps::PreviewDeps;
use crate::drafts::DraftStores;
use crate::preview::{ComponentDeps, PreviewComponent, RenderView};
use crate::save::{SaveAllCoordinator, DEFAULT_SUCCESS_RESET};
use crate::signal::{SignalBus, SignalTransports};
use crate::usecases::{DiscardDraft, EditDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// How long the save-all success status shows before returning to idle.
    pub success_reset: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            success_reset: DEFAULT_SUCCESS_RESET,
        }
    }
}

pub struct PreviewSession {
    deps: PreviewDeps,
    bus: SignalBus,
    stores: DraftStores,
    coordinator: SaveAllCoordinator,
    controller: Arc<PreviewController>,
}

impl PreviewSession {
    pub fn new(deps: PreviewDeps, options: SessionOptions) -> Self {
        let bus = SignalBus::with_transports(
            deps.context_id.clone(),
            deps.clock.clone(),
            SignalTransports {
                storage: deps.local_storage.clone(),
                storage_events: deps.storage_events.clone(),
                channel: deps.broadcast.clone(),
                visibility: deps.visibility.clone(),
            },
        );
        let stores = DraftStores::new(deps.local_storage.clone(), deps.clock.clone());
        let coordinator = SaveAllCoordinator::new(options.success_reset);
        let controller = Arc::new(PreviewController::new(deps.session_storage.clone()));

        coordinator.add_completion_hook(Arc::new(bus.clone()));
        coordinator.add_completion_hook(controller.clone());

        Self {
            deps,
            bus,
            stores,
            coordinator,
            controller,
        }
    }

    pub fn context_id(&self) -> &str {
        &self.deps.context_id
    }

    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    pub fn stores(&self) -> &DraftStores {
        &self.stores
    }

    pub fn coordinator(&self) -> &SaveAllCoordinator {
        &self.coordinator
    }

    pub fn controller(&self) -> &PreviewController {
        &self.controller
    }

    pub fn edit_draft(&self) -> EditDraft {
        EditDraft::new(
            self.stores.clone(),
            self.bus.clone(),
            self.coordinator.clone(),
            self.deps.entity_write.clone(),
        )
    }

    pub fn discard_draft(&self) -> DiscardDraft {
        DiscardDraft::new(self.stores.clone(), self.bus.clone(), self.coordinator.clone())
    }

    pub fn component_deps(&self) -> ComponentDeps {
        ComponentDeps {
            bus: self.bus.clone(),
            storage: self.deps.local_storage.clone(),
            clock: self.deps.clock.clone(),
            photos: self.deps.photos.clone(),
            reader: self.deps.entity_read.clone(),
        }
    }

    /// Mount a component over a baseline already in hand.
    pub fn mount<E>(&self, baseline: E, photos: Vec<Photo>, url: &str) -> PreviewComponent<E>
    where
        E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
    {
        PreviewComponent::mount(
            baseline,
            photos,
            PreviewMode::from_url(url),
            &self.component_deps(),
        )
    }

    /// Fetch a baseline from the content API and mount a component over it.
    pub async fn load<E>(
        &self,
        kind: ContentKind,
        id: Option<&str>,
        url: &str,
    ) -> anyhow::Result<PreviewComponent<E>>
    where
        E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
    {
        PreviewComponent::load(kind, id, PreviewMode::from_url(url), &self.component_deps()).await
    }

    /// Drop listeners, subscribers and pending changes. Drafts stay stored.
    pub fn reset(&self) {
        self.bus.reset();
        self.coordinator.reset();
    }
}
