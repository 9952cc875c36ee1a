use std::sync::Arc;

use sf_core::draft::*;
use sf_core::ports::{ClockPort, KeyValueStoragePort};
use sf_core::ContentKind;
use tracing::warn;

use super::store::DraftStore;

pub type PageDraftStore = DraftStore<PageDraft>;
pub type AboutDraftStore = DraftStore<AboutDraft>;
pub type ContactDraftStore = DraftStore<ContactDraft>;
pub type HomeLayoutDraftStore = DraftStore<HomeLayoutDraft>;
pub type WorkIndexDraftStore = DraftStore<WorkIndexDraft>;
pub type JournalIndexDraftStore = DraftStore<JournalIndexDraft>;
pub type ProjectDraftStore = DraftStore<ProjectDraft>;
pub type JournalPostDraftStore = DraftStore<JournalPostDraft>;
pub type ProfileDraftStore = DraftStore<ProfileDraft>;

/// One typed store per content kind, all over the same storage.
#[derive(Clone)]
pub struct DraftStores {
    pub page: PageDraftStore,
    pub about: AboutDraftStore,
    pub contact: ContactDraftStore,
    pub home: HomeLayoutDraftStore,
    pub work_index: WorkIndexDraftStore,
    pub journal_index: JournalIndexDraftStore,
    pub project: ProjectDraftStore,
    pub journal_post: JournalPostDraftStore,
    pub profile: ProfileDraftStore,
}

impl DraftStores {
    pub fn new(storage: Arc<dyn KeyValueStoragePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            page: DraftStore::new(storage.clone(), clock.clone()),
            about: DraftStore::new(storage.clone(), clock.clone()),
            contact: DraftStore::new(storage.clone(), clock.clone()),
            home: DraftStore::new(storage.clone(), clock.clone()),
            work_index: DraftStore::new(storage.clone(), clock.clone()),
            journal_index: DraftStore::new(storage.clone(), clock.clone()),
            project: DraftStore::new(storage.clone(), clock.clone()),
            journal_post: DraftStore::new(storage.clone(), clock.clone()),
            profile: DraftStore::new(storage, clock),
        }
    }

    /// Load the draft named by `key` as a kind-tagged payload.
    pub fn load_payload(&self, key: &DraftKey) -> Option<DraftPayload> {
        let id = key.entity_id();
        match key.kind() {
            ContentKind::Page => self.page.load(id).map(DraftPayload::Page),
            ContentKind::About => self.about.load(id).map(DraftPayload::About),
            ContentKind::Contact => self.contact.load(id).map(DraftPayload::Contact),
            ContentKind::HomeLayout => self.home.load(id).map(DraftPayload::HomeLayout),
            ContentKind::WorkIndex => self.work_index.load(id).map(DraftPayload::WorkIndex),
            ContentKind::JournalIndex => {
                self.journal_index.load(id).map(DraftPayload::JournalIndex)
            }
            ContentKind::Project => self.project.load(id).map(DraftPayload::Project),
            ContentKind::JournalPost => self.journal_post.load(id).map(DraftPayload::JournalPost),
            ContentKind::Profile => self.profile.load(id).map(DraftPayload::Profile),
        }
    }

    /// Save `payload` under `key`. A payload of another kind is refused.
    pub fn save_payload(&self, key: &DraftKey, payload: &DraftPayload) -> bool {
        if payload.kind() != key.kind() {
            warn!(key = %key, payload_kind = %payload.kind(), "draft kind mismatch");
            return false;
        }
        let id = key.entity_id();
        match payload {
            DraftPayload::Page(draft) => self.page.save(id, draft),
            DraftPayload::About(draft) => self.about.save(id, draft),
            DraftPayload::Contact(draft) => self.contact.save(id, draft),
            DraftPayload::HomeLayout(draft) => self.home.save(id, draft),
            DraftPayload::WorkIndex(draft) => self.work_index.save(id, draft),
            DraftPayload::JournalIndex(draft) => self.journal_index.save(id, draft),
            DraftPayload::Project(draft) => self.project.save(id, draft),
            DraftPayload::JournalPost(draft) => self.journal_post.save(id, draft),
            DraftPayload::Profile(draft) => self.profile.save(id, draft),
        }
    }

    pub fn clear(&self, key: &DraftKey) {
        let id = key.entity_id();
        match key.kind() {
            ContentKind::Page => self.page.clear(id),
            ContentKind::About => self.about.clear(id),
            ContentKind::Contact => self.contact.clear(id),
            ContentKind::HomeLayout => self.home.clear(id),
            ContentKind::WorkIndex => self.work_index.clear(id),
            ContentKind::JournalIndex => self.journal_index.clear(id),
            ContentKind::Project => self.project.clear(id),
            ContentKind::JournalPost => self.journal_post.clear(id),
            ContentKind::Profile => self.profile.clear(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedClock, MemoryStorage};

    fn stores() -> (Arc<MemoryStorage>, DraftStores) {
        let storage = Arc::new(MemoryStorage::default());
        let stores = DraftStores::new(storage.clone(), Arc::new(FixedClock(42)));
        (storage, stores)
    }

    #[test]
    fn save_writes_record_with_timestamp() {
        let (storage, stores) = stores();
        let draft = AboutDraft {
            headline: Some("Hello".to_string()),
            ..Default::default()
        };

        assert!(stores.about.save(None, &draft));

        assert_eq!(
            storage.raw("draft.about").as_deref(),
            Some(r#"{"payload":{"headline":"Hello"},"updatedAt":42}"#)
        );
        assert_eq!(stores.about.load(None), Some(draft));
    }

    #[test]
    fn save_overwrites_without_merging() {
        let (_, stores) = stores();
        stores.contact.save(
            None,
            &ContactDraft {
                headline: Some("A".to_string()),
                ..Default::default()
            },
        );
        stores.contact.save(
            None,
            &ContactDraft {
                email: Some("b@example.com".to_string()),
                ..Default::default()
            },
        );

        let loaded = stores.contact.load(None).unwrap();
        assert_eq!(loaded.headline, None);
        assert_eq!(loaded.email.as_deref(), Some("b@example.com"));
    }

    #[test]
    fn multi_instance_drafts_do_not_collide() {
        let (_, stores) = stores();
        let a = ProjectDraft {
            title: Some("A".to_string()),
            ..Default::default()
        };
        let b = ProjectDraft {
            title: Some("B".to_string()),
            ..Default::default()
        };

        stores.project.save(Some("p-a"), &a);
        stores.project.save(Some("p-b"), &b);
        stores.project.clear(Some("p-a"));

        assert_eq!(stores.project.load(Some("p-a")), None);
        assert_eq!(stores.project.load(Some("p-b")), Some(b));
    }

    #[test]
    fn corrupt_and_wrong_shaped_records_load_as_none() {
        let (storage, stores) = stores();

        for raw in ["{", "[]", r#"{"payload": []}"#, r#"{"payload": {"headline": 7}}"#] {
            storage.put("draft.home", raw);
            assert_eq!(stores.home.load(None), None, "{raw}");
        }
    }

    #[test]
    fn partially_corrupt_record_keeps_valid_fields() {
        let (storage, stores) = stores();
        storage.put(
            "draft.project.p1",
            r#"{"payload":{"title":"Kept","year":"1999","photoIds":["a",3,"b"]},"updatedAt":1}"#,
        );

        let draft = stores.project.load(Some("p1")).unwrap();
        assert_eq!(draft.title.as_deref(), Some("Kept"));
        assert_eq!(draft.year, None);
        assert_eq!(draft.photo_ids, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn unavailable_storage_loads_none_and_save_reports_failure() {
        let storage = Arc::new(MemoryStorage::failing());
        let stores = DraftStores::new(storage, Arc::new(FixedClock(1)));
        let draft = ProfileDraft {
            name: Some("Ana".to_string()),
            ..Default::default()
        };

        assert!(!stores.profile.save(None, &draft));
        assert_eq!(stores.profile.load(None), None);
    }

    #[test]
    fn payload_dispatch_follows_key_kind() {
        let (_, stores) = stores();
        let key = DraftKey::entity(ContentKind::JournalPost, "j1");
        let payload = DraftPayload::JournalPost(JournalPostDraft {
            excerpt: Some("Short".to_string()),
            ..Default::default()
        });

        assert!(stores.save_payload(&key, &payload));
        assert_eq!(stores.load_payload(&key), Some(payload.clone()));
        assert!(!stores.save_payload(&DraftKey::single(ContentKind::About), &payload));

        stores.clear(&key);
        assert_eq!(stores.load_payload(&key), None);
    }
}
