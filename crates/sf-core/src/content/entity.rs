use serde::{Deserialize, Serialize};

use super::kind::ContentKind;
use super::model::*;

/// Server-confirmed state of one editable entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity", rename_all = "kebab-case")]
pub enum BaselineEntity {
    Page(PageContent),
    About(AboutContent),
    Contact(ContactContent),
    HomeLayout(HomeLayout),
    WorkIndex(WorkIndex),
    JournalIndex(JournalIndex),
    Project(Project),
    JournalPost(JournalPost),
    Profile(Profile),
}

impl BaselineEntity {
    pub fn kind(&self) -> ContentKind {
        match self {
            BaselineEntity::Page(_) => ContentKind::Page,
            BaselineEntity::About(_) => ContentKind::About,
            BaselineEntity::Contact(_) => ContentKind::Contact,
            BaselineEntity::HomeLayout(_) => ContentKind::HomeLayout,
            BaselineEntity::WorkIndex(_) => ContentKind::WorkIndex,
            BaselineEntity::JournalIndex(_) => ContentKind::JournalIndex,
            BaselineEntity::Project(_) => ContentKind::Project,
            BaselineEntity::JournalPost(_) => ContentKind::JournalPost,
            BaselineEntity::Profile(_) => ContentKind::Profile,
        }
    }

    /// Entity id for multi-instance kinds (page slug, project id, post id).
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            BaselineEntity::Page(page) => Some(&page.slug),
            BaselineEntity::Project(project) => Some(&project.id),
            BaselineEntity::JournalPost(post) => Some(&post.id),
            _ => None,
        }
    }
}

macro_rules! impl_try_from_baseline {
    ($($variant:ident => $model:ty),* $(,)?) => {
        $(
            impl From<$model> for BaselineEntity {
                fn from(model: $model) -> Self {
                    BaselineEntity::$variant(model)
                }
            }

            impl TryFrom<BaselineEntity> for $model {
                type Error = BaselineEntity;

                fn try_from(entity: BaselineEntity) -> Result<Self, Self::Error> {
                    match entity {
                        BaselineEntity::$variant(model) => Ok(model),
                        other => Err(other),
                    }
                }
            }
        )*
    };
}

impl_try_from_baseline!(
    Page => PageContent,
    About => AboutContent,
    Contact => ContactContent,
    HomeLayout => HomeLayout,
    WorkIndex => WorkIndex,
    JournalIndex => JournalIndex,
    Project => Project,
    JournalPost => JournalPost,
    Profile => Profile,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_matches_variant_only() {
        let entity = BaselineEntity::from(Project {
            id: "p1".to_string(),
            ..Default::default()
        });

        assert_eq!(entity.kind(), ContentKind::Project);
        assert_eq!(entity.entity_id(), Some("p1"));
        assert!(Profile::try_from(entity.clone()).is_err());
        assert_eq!(Project::try_from(entity).unwrap().id, "p1");
    }
}
