//! Editor-side use cases over drafts.

mod discard_draft;
mod edit_draft;

pub use discard_draft::DiscardDraft;
pub use edit_draft::{EditDraft, EditDraftError};
