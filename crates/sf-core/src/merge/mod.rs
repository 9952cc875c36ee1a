//! Render-time merge of draft overrides onto baseline entities.
//!
//! Baselines are never mutated; every merge produces a new value.

mod ordering;
mod overlay;

pub use ordering::order_by_draft;
pub use overlay::{merge_draft, DraftOverlay, PreviewEntity};
