use serde::Serialize;
use serde_json::Value;

use super::schema::*;
use crate::content::ContentKind;

/// A normalized draft payload of any content kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DraftPayload {
    Page(PageDraft),
    About(AboutDraft),
    Contact(ContactDraft),
    HomeLayout(HomeLayoutDraft),
    WorkIndex(WorkIndexDraft),
    JournalIndex(JournalIndexDraft),
    Project(ProjectDraft),
    JournalPost(JournalPostDraft),
    Profile(ProfileDraft),
}

impl DraftPayload {
    /// Normalize an untrusted JSON payload against the schema of `kind`.
    pub fn normalize(kind: ContentKind, value: &Value) -> Option<Self> {
        match kind {
            ContentKind::Page => PageDraft::normalize(value).map(Self::Page),
            ContentKind::About => AboutDraft::normalize(value).map(Self::About),
            ContentKind::Contact => ContactDraft::normalize(value).map(Self::Contact),
            ContentKind::HomeLayout => HomeLayoutDraft::normalize(value).map(Self::HomeLayout),
            ContentKind::WorkIndex => WorkIndexDraft::normalize(value).map(Self::WorkIndex),
            ContentKind::JournalIndex => {
                JournalIndexDraft::normalize(value).map(Self::JournalIndex)
            }
            ContentKind::Project => ProjectDraft::normalize(value).map(Self::Project),
            ContentKind::JournalPost => JournalPostDraft::normalize(value).map(Self::JournalPost),
            ContentKind::Profile => ProfileDraft::normalize(value).map(Self::Profile),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            DraftPayload::Page(_) => ContentKind::Page,
            DraftPayload::About(_) => ContentKind::About,
            DraftPayload::Contact(_) => ContentKind::Contact,
            DraftPayload::HomeLayout(_) => ContentKind::HomeLayout,
            DraftPayload::WorkIndex(_) => ContentKind::WorkIndex,
            DraftPayload::JournalIndex(_) => ContentKind::JournalIndex,
            DraftPayload::Project(_) => ContentKind::Project,
            DraftPayload::JournalPost(_) => ContentKind::JournalPost,
            DraftPayload::Profile(_) => ContentKind::Profile,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_dispatches_on_kind() {
        let value = json!({ "projectIds": ["b", "a"] });

        let payload = DraftPayload::normalize(ContentKind::WorkIndex, &value).unwrap();
        assert_eq!(payload.kind(), ContentKind::WorkIndex);
        assert_eq!(payload.to_value(), value);

        // Same JSON has no valid field for a project draft.
        assert_eq!(DraftPayload::normalize(ContentKind::Project, &value), None);
    }
}
