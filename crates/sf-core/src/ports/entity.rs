//! Content API ports.
//!
//! The read side feeds baselines and photo lookups; the write side is only
//! called from inside pending-change persist closures.

use async_trait::async_trait;

use super::errors::EntityError;
use crate::content::{BaselineEntity, ContentKind, Photo};
use crate::draft::DraftPayload;

#[async_trait]
pub trait EntityReadPort: Send + Sync {
    /// Fetch the confirmed state of one entity. `id` is ignored for
    /// single-instance kinds.
    async fn get_entity(
        &self,
        kind: ContentKind,
        id: Option<&str>,
    ) -> Result<BaselineEntity, EntityError>;

    /// Batch photo lookup. Unknown ids are omitted from the result.
    async fn get_photos_by_ids(&self, ids: &[String]) -> Result<Vec<Photo>, EntityError>;
}

#[async_trait]
pub trait EntityWritePort: Send + Sync {
    /// Apply a partial update and return the persisted entity.
    async fn update_entity(
        &self,
        kind: ContentKind,
        id: Option<&str>,
        partial: &DraftPayload,
    ) -> Result<BaselineEntity, EntityError>;
}

/// Photo resolution for rendering.
///
/// Implementations may cache by the requested id set; callers always pass a
/// deduplicated, sorted list.
#[async_trait]
pub trait PhotoLookupPort: Send + Sync {
    async fn lookup(&self, ids: &[String]) -> Result<Vec<Photo>, EntityError>;
}
