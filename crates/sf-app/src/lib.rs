//! Shutterfolio draft-preview orchestration layer
//!
//! This crate wires the draft-preview subsystem together: the cross-context
//! signal bus, typed draft stores, the preview signal hook, draft-merging
//! preview components, the save-all coordinator, and the preview chrome.
//! Every piece is an explicit object built per session from [`PreviewDeps`].

pub mod chrome;
pub mod deps;
pub mod drafts;
pub mod preview;
pub mod save;
pub mod session;
pub mod signal;
pub mod usecases;

pub use chrome::{PreviewBanner, PreviewController};
pub use deps::PreviewDeps;
pub use drafts::{DraftStore, DraftStores};
pub use preview::{PreviewComponent, RenderedView, ViewState};
pub use save::{SaveAllCoordinator, SaveOutcome, SaveStatus};
pub use session::{PreviewSession, SessionOptions};
pub use signal::{PreviewSignal, SignalBus};

#[cfg(test)]
pub(crate) mod test_support;
