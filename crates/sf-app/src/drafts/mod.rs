//! Typed draft stores over browser-profile storage.

mod store;
mod stores;

pub use store::DraftStore;
pub use stores::*;
