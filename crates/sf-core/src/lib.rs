//! # sf-core
//!
//! Core domain models and draft-preview rules for Shutterfolio.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! content models, draft schemas with field-level normalization, the merge and
//! ordering rules applied at render time, the preview URL convention, and the
//! ports implemented by the infrastructure and platform layers.

// Public module exports
pub mod app_dirs;
pub mod config;
pub mod content;
pub mod draft;
pub mod ids;
pub mod merge;
pub mod ports;
pub mod preview;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use content::{BaselineEntity, ContentKind};
pub use draft::{DraftKey, DraftPayload, DraftRecord, DraftSchema};
pub use ids::ChangeId;
pub use merge::{merge_draft, order_by_draft, DraftOverlay, PreviewEntity};
pub use preview::PreviewMode;
