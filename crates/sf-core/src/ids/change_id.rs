use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;
use crate::content::ContentKind;

/// Synthetic identity of a pending change: `<kind>` for single-instance
/// content, `<kind>:<entity id>` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl_id!(ChangeId);

impl ChangeId {
    pub fn for_entity(kind: ContentKind, id: Option<&str>) -> Self {
        match id.filter(|id| kind.is_multi_instance() && !id.is_empty()) {
            Some(id) => Self(format!("{}:{}", kind.as_str(), id)),
            None => Self(kind.as_str().to_string()),
        }
    }
}
