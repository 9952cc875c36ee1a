use std::sync::Arc;

use anyhow::{Context, Result};
use sf_core::content::{BaselineEntity, ContentKind, Photo};
use sf_core::ports::{ClockPort, EntityReadPort, KeyValueStoragePort, PhotoLookupPort};
use sf_core::{merge_draft, PreviewEntity, PreviewMode};
use tracing::debug;

use super::render::{PhotoSet, RenderView, RenderedView};
use crate::drafts::DraftStore;
use crate::signal::{PreviewSignal, SignalBus};

/// Rendering state of a preview component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Not in preview mode; drafts are never read.
    BaselineOnly,
    /// Preview mode, no usable draft for this entity.
    PreviewNoDraft,
    /// Preview mode with a draft merged over the baseline.
    PreviewDrafted,
}

/// What a component needs from the session.
#[derive(Clone)]
pub struct ComponentDeps {
    pub bus: SignalBus,
    pub storage: Arc<dyn KeyValueStoragePort>,
    pub clock: Arc<dyn ClockPort>,
    pub photos: Arc<dyn PhotoLookupPort>,
    pub reader: Arc<dyn EntityReadPort>,
}

struct BaselineSource {
    reader: Arc<dyn EntityReadPort>,
    kind: ContentKind,
    id: Option<String>,
}

/// Renders one entity, merging its local draft in preview mode.
///
/// The component re-derives only on signal ticks and mode changes. Backend
/// failures never blank it: the previous baseline and photo set are kept.
pub struct PreviewComponent<E>
where
    E: PreviewEntity + RenderView,
{
    mode: PreviewMode,
    baseline: E,
    source: Option<BaselineSource>,
    store: DraftStore<E::Draft>,
    bus: SignalBus,
    signal: PreviewSignal,
    lookup: Arc<dyn PhotoLookupPort>,
    photos: PhotoSet,
    draft: Option<E::Draft>,
    merged: E,
    view: RenderedView,
}

impl<E> PreviewComponent<E>
where
    E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
{
    /// Mount over a baseline already in hand, with the photos that came with
    /// it. Synchronous: the first render never waits on the backend.
    pub fn mount(
        baseline: E,
        initial_photos: Vec<Photo>,
        mode: PreviewMode,
        deps: &ComponentDeps,
    ) -> Self {
        let store = DraftStore::new(deps.storage.clone(), deps.clock.clone());
        let signal = Self::signal_for(&deps.bus, &baseline, mode);
        let photos = PhotoSet::new(initial_photos);
        let view = baseline.render(&photos);

        let mut component = Self {
            mode,
            merged: baseline.clone(),
            baseline,
            source: None,
            store,
            bus: deps.bus.clone(),
            signal,
            lookup: deps.photos.clone(),
            photos,
            draft: None,
            view,
        };
        component.derive();
        component
    }

    /// Fetch the baseline (and its photos) from the content API, then mount.
    /// Later refreshes re-fetch it.
    pub async fn load(
        kind: ContentKind,
        id: Option<&str>,
        mode: PreviewMode,
        deps: &ComponentDeps,
    ) -> Result<Self> {
        let entity = deps
            .reader
            .get_entity(kind, id)
            .await
            .with_context(|| format!("failed to load {kind} baseline"))?;
        let baseline = E::try_from(entity)
            .map_err(|other| anyhow::anyhow!("expected {kind} baseline, got {}", other.kind()))?;
        let photos = deps
            .reader
            .get_photos_by_ids(&baseline.referenced_photo_ids())
            .await
            .unwrap_or_else(|err| {
                debug!(error = %err, "baseline photos unavailable");
                Vec::new()
            });

        let mut component = Self::mount(baseline, photos, mode, deps);
        component.source = Some(BaselineSource {
            reader: deps.reader.clone(),
            kind,
            id: id.map(str::to_string),
        });
        Ok(component)
    }

    fn signal_for(bus: &SignalBus, baseline: &E, mode: PreviewMode) -> PreviewSignal {
        let key = baseline.draft_key().storage_key();
        PreviewSignal::new(bus, [key], mode.is_draft())
    }

    /// Recompute draft, merge and view from current state. No I/O beyond the
    /// synchronous draft read, and none at all outside preview mode.
    fn derive(&mut self) -> bool {
        self.draft = if self.mode.is_draft() {
            let key = self.baseline.draft_key();
            self.store.load(key.entity_id())
        } else {
            None
        };
        self.merged = merge_draft(&self.baseline, self.draft.as_ref());

        let view = self.merged.render(&self.photos);
        let changed = view != self.view;
        self.view = view;
        changed
    }

    pub fn set_mode(&mut self, mode: PreviewMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        self.signal = Self::signal_for(&self.bus, &self.baseline, mode);
        self.derive()
    }

    /// Re-fetch the baseline when it came from the backend, re-read the
    /// draft, and resolve photos for the merged entity. Returns true when the
    /// rendered view changed.
    pub async fn refresh(&mut self) -> bool {
        if let Some(source) = &self.source {
            match source.reader.get_entity(source.kind, source.id.as_deref()).await {
                Ok(entity) => match E::try_from(entity) {
                    Ok(baseline) => self.baseline = baseline,
                    Err(other) => debug!(kind = %other.kind(), "ignoring baseline of another kind"),
                },
                Err(err) => debug!(error = %err, "baseline refresh failed; keeping previous"),
            }
        }

        self.derive();

        if self.mode.is_draft() {
            let ids = self.merged.referenced_photo_ids();
            match self.lookup.lookup(&ids).await {
                Ok(photos) => self.photos = PhotoSet::new(photos),
                Err(err) => debug!(error = %err, "photo lookup failed; keeping previous set"),
            }
        }

        let view = self.merged.render(&self.photos);
        let changed = view != self.view;
        self.view = view;
        changed
    }

    /// Wait for the next relevant signal tick, then refresh. Never resolves
    /// outside preview mode.
    pub async fn next_update(&mut self) -> bool {
        self.signal.changed().await;
        self.refresh().await
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn state(&self) -> ViewState {
        match (self.mode.is_draft(), &self.draft) {
            (false, _) => ViewState::BaselineOnly,
            (true, None) => ViewState::PreviewNoDraft,
            (true, Some(_)) => ViewState::PreviewDrafted,
        }
    }

    pub fn baseline(&self) -> &E {
        &self.baseline
    }

    pub fn draft(&self) -> Option<&E::Draft> {
        self.draft.as_ref()
    }

    pub fn merged(&self) -> &E {
        &self.merged
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn photos(&self) -> &PhotoSet {
        &self.photos
    }

    pub fn is_listening(&self) -> bool {
        self.signal.is_subscribed()
    }
}
