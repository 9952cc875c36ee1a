use std::fmt;

use crate::content::ContentKind;

const DRAFT_KEY_PREFIX: &str = "draft";

/// Storage key of one draft record.
///
/// Single-instance kinds map to a fixed key (`draft.about`); multi-instance
/// kinds embed the entity id (`draft.project.<id>`) so drafts for different
/// entities never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DraftKey {
    kind: ContentKind,
    entity_id: Option<String>,
}

impl DraftKey {
    /// Build the key for `kind`. The id is ignored for single-instance kinds.
    pub fn new(kind: ContentKind, id: Option<&str>) -> Self {
        let entity_id = id
            .filter(|id| kind.is_multi_instance() && !id.is_empty())
            .map(str::to_string);
        Self { kind, entity_id }
    }

    pub fn single(kind: ContentKind) -> Self {
        Self::new(kind, None)
    }

    pub fn entity(kind: ContentKind, id: &str) -> Self {
        Self::new(kind, Some(id))
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn storage_key(&self) -> String {
        match &self.entity_id {
            Some(id) => format!("{DRAFT_KEY_PREFIX}.{}.{id}", self.kind.as_str()),
            None => format!("{DRAFT_KEY_PREFIX}.{}", self.kind.as_str()),
        }
    }

    /// True when `storage_key` names a draft record (any kind).
    pub fn is_draft_storage_key(storage_key: &str) -> bool {
        storage_key
            .strip_prefix(DRAFT_KEY_PREFIX)
            .is_some_and(|rest| rest.starts_with('.'))
    }

    /// Inverse of [`DraftKey::storage_key`]. Single-instance keys with a
    /// trailing id and multi-instance keys without one are rejected.
    pub fn from_storage_key(storage_key: &str) -> Option<Self> {
        let rest = storage_key
            .strip_prefix(DRAFT_KEY_PREFIX)?
            .strip_prefix('.')?;
        let (kind, id) = match rest.split_once('.') {
            Some((kind, id)) => (kind, Some(id)),
            None => (rest, None),
        };
        let kind: ContentKind = kind.parse().ok()?;
        match id {
            Some(id) if kind.is_multi_instance() && !id.is_empty() => Some(Self::entity(kind, id)),
            None if !kind.is_multi_instance() => Some(Self::single(kind)),
            _ => None,
        }
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_instance_kinds_use_fixed_keys() {
        assert_eq!(DraftKey::single(ContentKind::About).storage_key(), "draft.about");
        assert_eq!(
            DraftKey::new(ContentKind::WorkIndex, Some("ignored")).storage_key(),
            "draft.work-index"
        );
    }

    #[test]
    fn multi_instance_kinds_embed_entity_id() {
        assert_eq!(
            DraftKey::entity(ContentKind::Project, "p-42").storage_key(),
            "draft.project.p-42"
        );
        assert_eq!(
            DraftKey::entity(ContentKind::JournalPost, "j-1").storage_key(),
            "draft.journal.j-1"
        );
        assert_ne!(
            DraftKey::entity(ContentKind::Project, "a"),
            DraftKey::entity(ContentKind::Project, "b")
        );
    }

    #[test]
    fn recognizes_draft_storage_keys() {
        assert!(DraftKey::is_draft_storage_key("draft.project.p1"));
        assert!(DraftKey::is_draft_storage_key("draft.home"));
        assert!(!DraftKey::is_draft_storage_key("drafty"));
        assert!(!DraftKey::is_draft_storage_key("preview.signal"));
    }

    #[test]
    fn parses_storage_keys_back() {
        for key in [
            DraftKey::single(ContentKind::HomeLayout),
            DraftKey::entity(ContentKind::Project, "p.1"),
            DraftKey::entity(ContentKind::Page, "services"),
        ] {
            assert_eq!(DraftKey::from_storage_key(&key.storage_key()), Some(key));
        }
        assert_eq!(DraftKey::from_storage_key("draft.project"), None);
        assert_eq!(DraftKey::from_storage_key("draft.about.extra"), None);
        assert_eq!(DraftKey::from_storage_key("draft.gallery"), None);
        assert_eq!(DraftKey::from_storage_key("preview.signal"), None);
    }
}
