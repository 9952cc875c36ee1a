//! Local content repository.
//!
//! Serves baselines and photo lookups from a JSON content document and applies
//! partial updates the same way a remote content API would.

mod repository;
mod snapshot;

pub use repository::InMemoryContentRepository;
pub use snapshot::ContentSnapshot;
