//! In-process browser profile.
//!
//! Models the browser facilities the preview subsystem relies on: one local
//! storage area per profile with cross-context change events, per-context
//! session storage, a same-origin broadcast channel and page visibility.

mod context;
mod profile;
mod visibility;

pub use context::BrowsingContext;
pub use profile::{BrowserProfile, ProfileOptions};
