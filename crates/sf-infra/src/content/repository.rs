use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sf_core::content::*;
use sf_core::draft::DraftPayload;
use sf_core::merge::DraftOverlay;
use sf_core::ports::{EntityError, EntityReadPort, EntityWritePort};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::snapshot::ContentSnapshot;

/// Content API backed by an in-memory [`ContentSnapshot`].
///
/// When opened from a file, every successful update is written back to it.
pub struct InMemoryContentRepository {
    content: RwLock<ContentSnapshot>,
    path: Option<PathBuf>,
}

impl InMemoryContentRepository {
    pub fn new(content: ContentSnapshot) -> Self {
        Self {
            content: RwLock::new(content),
            path: None,
        }
    }

    /// Load the content document at `path`. A missing file yields empty content.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("parse content document failed: {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "content document missing; starting empty");
                ContentSnapshot::default()
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read content document failed: {}", path.display()))
            }
        };

        Ok(Self {
            content: RwLock::new(content),
            path: Some(path),
        })
    }

    pub async fn snapshot(&self) -> ContentSnapshot {
        self.content.read().await.clone()
    }

    async fn write_back(&self, content: &ContentSnapshot) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create content dir failed: {}", dir.display()))?;
        }
        let raw = serde_json::to_string_pretty(content).context("serialize content failed")?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, raw)
            .await
            .with_context(|| format!("write temp content failed: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).await.with_context(|| {
            format!(
                "rename temp content to target failed: {} -> {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}

fn require_id(kind: ContentKind, id: Option<&str>) -> Result<&str, EntityError> {
    id.ok_or_else(|| EntityError::InvalidUpdate {
        kind: kind.to_string(),
        reason: "missing entity id".to_string(),
    })
}

fn not_found(kind: ContentKind, id: &str) -> EntityError {
    EntityError::NotFound(format!("{kind}/{id}"))
}

fn mismatch(kind: ContentKind, payload: &DraftPayload) -> EntityError {
    EntityError::InvalidUpdate {
        kind: kind.to_string(),
        reason: format!("payload is for {}", payload.kind()),
    }
}

/// Overlay `draft` onto the entity of `kind` inside `content`.
fn apply(
    content: &mut ContentSnapshot,
    kind: ContentKind,
    id: Option<&str>,
    payload: &DraftPayload,
) -> Result<BaselineEntity, EntityError> {
    let updated = match (kind, payload) {
        (ContentKind::Page, DraftPayload::Page(draft)) => {
            let id = require_id(kind, id)?;
            let page = content
                .pages
                .iter_mut()
                .find(|p| p.slug == id)
                .ok_or_else(|| not_found(kind, id))?;
            *page = page.overlay(draft);
            BaselineEntity::Page(page.clone())
        }
        (ContentKind::About, DraftPayload::About(draft)) => {
            content.about = content.about.overlay(draft);
            BaselineEntity::About(content.about.clone())
        }
        (ContentKind::Contact, DraftPayload::Contact(draft)) => {
            content.contact = content.contact.overlay(draft);
            BaselineEntity::Contact(content.contact.clone())
        }
        (ContentKind::HomeLayout, DraftPayload::HomeLayout(draft)) => {
            content.home = content.home.overlay(draft);
            BaselineEntity::HomeLayout(content.home.clone())
        }
        (ContentKind::WorkIndex, DraftPayload::WorkIndex(draft)) => {
            let index = content.work_index().overlay(draft);
            content.projects = index.projects.clone();
            BaselineEntity::WorkIndex(index)
        }
        (ContentKind::JournalIndex, DraftPayload::JournalIndex(draft)) => {
            let index = content.journal_index().overlay(draft);
            content.journal = index.posts.clone();
            BaselineEntity::JournalIndex(index)
        }
        (ContentKind::Project, DraftPayload::Project(draft)) => {
            let id = require_id(kind, id)?;
            let project = content
                .projects
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(kind, id))?;
            *project = project.overlay(draft);
            BaselineEntity::Project(project.clone())
        }
        (ContentKind::JournalPost, DraftPayload::JournalPost(draft)) => {
            let id = require_id(kind, id)?;
            let post = content
                .journal
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found(kind, id))?;
            *post = post.overlay(draft);
            BaselineEntity::JournalPost(post.clone())
        }
        (ContentKind::Profile, DraftPayload::Profile(draft)) => {
            content.profile = content.profile.overlay(draft);
            BaselineEntity::Profile(content.profile.clone())
        }
        (kind, payload) => return Err(mismatch(kind, payload)),
    };
    Ok(updated)
}

#[async_trait]
impl EntityReadPort for InMemoryContentRepository {
    async fn get_entity(
        &self,
        kind: ContentKind,
        id: Option<&str>,
    ) -> Result<BaselineEntity, EntityError> {
        let content = self.content.read().await;
        let entity = match kind {
            ContentKind::Page => {
                let id = require_id(kind, id)?;
                content
                    .pages
                    .iter()
                    .find(|p| p.slug == id)
                    .cloned()
                    .map(BaselineEntity::Page)
                    .ok_or_else(|| not_found(kind, id))?
            }
            ContentKind::About => BaselineEntity::About(content.about.clone()),
            ContentKind::Contact => BaselineEntity::Contact(content.contact.clone()),
            ContentKind::HomeLayout => BaselineEntity::HomeLayout(content.home.clone()),
            ContentKind::WorkIndex => BaselineEntity::WorkIndex(content.work_index()),
            ContentKind::JournalIndex => BaselineEntity::JournalIndex(content.journal_index()),
            ContentKind::Project => {
                let id = require_id(kind, id)?;
                content
                    .projects
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .map(BaselineEntity::Project)
                    .ok_or_else(|| not_found(kind, id))?
            }
            ContentKind::JournalPost => {
                let id = require_id(kind, id)?;
                content
                    .journal
                    .iter()
                    .find(|p| p.id == id)
                    .cloned()
                    .map(BaselineEntity::JournalPost)
                    .ok_or_else(|| not_found(kind, id))?
            }
            ContentKind::Profile => BaselineEntity::Profile(content.profile.clone()),
        };
        Ok(entity)
    }

    async fn get_photos_by_ids(&self, ids: &[String]) -> Result<Vec<Photo>, EntityError> {
        let content = self.content.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| content.photos.iter().find(|photo| &photo.id == id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EntityWritePort for InMemoryContentRepository {
    async fn update_entity(
        &self,
        kind: ContentKind,
        id: Option<&str>,
        partial: &DraftPayload,
    ) -> Result<BaselineEntity, EntityError> {
        let mut content = self.content.write().await;
        let mut next = content.clone();
        let updated = apply(&mut next, kind, id, partial)?;

        self.write_back(&next)
            .await
            .map_err(|err| EntityError::Backend(format!("{err:#}")))?;
        *content = next;

        debug!(kind = %kind, id = ?id, "entity updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::draft::{ProjectDraft, WorkIndexDraft};
    use tempfile::TempDir;

    fn project(id: &str, title: &str) -> Project {
        Project {
            id: id.to_string(),
            slug: id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn content() -> ContentSnapshot {
        ContentSnapshot {
            projects: vec![project("p1", "One"), project("p2", "Two")],
            photos: vec![
                Photo {
                    id: "ph1".to_string(),
                    src: "/ph1.jpg".to_string(),
                    ..Default::default()
                },
                Photo {
                    id: "ph2".to_string(),
                    src: "/ph2.jpg".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn get_entity_resolves_multi_instance_by_id() {
        let repo = InMemoryContentRepository::new(content());

        let entity = repo.get_entity(ContentKind::Project, Some("p2")).await.unwrap();
        assert_eq!(entity, BaselineEntity::Project(project("p2", "Two")));

        let missing = repo.get_entity(ContentKind::Project, Some("nope")).await;
        assert!(matches!(missing, Err(EntityError::NotFound(_))));

        let no_id = repo.get_entity(ContentKind::Project, None).await;
        assert!(matches!(no_id, Err(EntityError::InvalidUpdate { .. })));
    }

    #[tokio::test]
    async fn photo_lookup_omits_unknown_ids() {
        let repo = InMemoryContentRepository::new(content());

        let photos = repo
            .get_photos_by_ids(&["ph2".to_string(), "ghost".to_string(), "ph1".to_string()])
            .await
            .unwrap();

        let ids: Vec<_> = photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ph2", "ph1"]);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let repo = InMemoryContentRepository::new(content());
        let payload = DraftPayload::Project(ProjectDraft {
            title: Some("Renamed".to_string()),
            ..Default::default()
        });

        let updated = repo
            .update_entity(ContentKind::Project, Some("p1"), &payload)
            .await
            .unwrap();

        let BaselineEntity::Project(updated) = updated else {
            panic!("expected a project");
        };
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.slug, "p1");
        assert_eq!(repo.snapshot().await.projects[0].title, "Renamed");
    }

    #[tokio::test]
    async fn work_index_update_reorders_projects() {
        let repo = InMemoryContentRepository::new(content());
        let payload = DraftPayload::WorkIndex(WorkIndexDraft {
            project_ids: Some(vec!["p2".to_string(), "p1".to_string()]),
        });

        repo.update_entity(ContentKind::WorkIndex, None, &payload)
            .await
            .unwrap();

        let order: Vec<_> = repo
            .snapshot()
            .await
            .projects
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(order, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn update_rejects_payload_of_another_kind() {
        let repo = InMemoryContentRepository::new(content());
        let payload = DraftPayload::Project(ProjectDraft::default());

        let result = repo.update_entity(ContentKind::About, None, &payload).await;

        assert!(matches!(result, Err(EntityError::InvalidUpdate { .. })));
        assert_eq!(repo.snapshot().await, content());
    }

    #[tokio::test]
    async fn opened_repository_writes_updates_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("content.json");
        fs::write(&path, serde_json::to_string(&content()).unwrap())
            .await
            .unwrap();

        let repo = InMemoryContentRepository::open(&path).await.unwrap();
        let payload = DraftPayload::Project(ProjectDraft {
            summary: Some("Coastline".to_string()),
            ..Default::default()
        });
        repo.update_entity(ContentKind::Project, Some("p2"), &payload)
            .await
            .unwrap();

        let reopened = InMemoryContentRepository::open(&path).await.unwrap();
        assert_eq!(reopened.snapshot().await.projects[1].summary, "Coastline");
    }

    #[tokio::test]
    async fn missing_document_starts_empty() {
        let dir = TempDir::new().unwrap();
        let repo = InMemoryContentRepository::open(dir.path().join("none.json"))
            .await
            .unwrap();

        assert_eq!(repo.snapshot().await, ContentSnapshot::default());
    }
}
