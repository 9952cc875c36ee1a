use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::Fields;
use super::payload::DraftPayload;
use crate::content::ContentKind;

/// Validated partial-update schema of one content kind.
pub trait DraftSchema:
    Clone + Default + PartialEq + Serialize + Send + Sync + std::fmt::Debug + 'static
{
    const KIND: ContentKind;

    /// Read every known field independently, keeping only well-typed values.
    fn from_fields(fields: &Fields<'_>) -> Self;

    fn into_payload(self) -> DraftPayload;

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Normalize an untrusted payload. Non-objects and payloads without a
    /// single valid field yield `None`.
    fn normalize(value: &Value) -> Option<Self> {
        let draft = Self::from_fields(&Fields::from_value(value)?);
        (!draft.is_empty()).then_some(draft)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_photo_id: Option<String>,
}

impl DraftSchema for PageDraft {
    const KIND: ContentKind = ContentKind::Page;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            title: fields.string("title"),
            intro: fields.string("intro"),
            body: fields.string("body"),
            hero_photo_id: fields.string("heroPhotoId"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::Page(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<String>>,
}

impl BioDraft {
    fn parse(fields: &Fields<'_>) -> Option<Self> {
        let bio = Self {
            heading: fields.string("heading"),
            paragraphs: fields.strings("paragraphs"),
        };
        (bio != Self::default()).then_some(bio)
    }
}

/// One approach item; items without a string id are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachItemDraft {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApproachItemDraft {
    fn parse(fields: &Fields<'_>) -> Option<Self> {
        let id = fields.string("id").filter(|id| !id.is_empty())?;
        Some(Self {
            id,
            title: fields.string("title"),
            description: fields.string("description"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<BioDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portrait_photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<Vec<ApproachItemDraft>>,
}

impl DraftSchema for AboutDraft {
    const KIND: ContentKind = ContentKind::About;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            headline: fields.string("headline"),
            bio: fields.record("bio", BioDraft::parse),
            portrait_photo_id: fields.string("portraitPhotoId"),
            approach: fields.records("approach", ApproachItemDraft::parse),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::About(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
}

impl DraftSchema for ContactDraft {
    const KIND: ContentKind = ContentKind::Contact;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            headline: fields.string("headline"),
            intro: fields.string("intro"),
            email: fields.string("email"),
            phone: fields.string("phone"),
            location: fields.string("location"),
            availability: fields.string("availability"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::Contact(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeLayoutDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_photo_ids: Option<Vec<String>>,
}

impl DraftSchema for HomeLayoutDraft {
    const KIND: ContentKind = ContentKind::HomeLayout;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            headline: fields.string("headline"),
            tagline: fields.string("tagline"),
            hero_photo_id: fields.string("heroPhotoId"),
            featured_photo_ids: fields.strings("featuredPhotoIds"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::HomeLayout(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkIndexDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,
}

impl DraftSchema for WorkIndexDraft {
    const KIND: ContentKind = ContentKind::WorkIndex;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            project_ids: fields.strings("projectIds"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::WorkIndex(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalIndexDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_ids: Option<Vec<String>>,
}

impl DraftSchema for JournalIndexDraft {
    const KIND: ContentKind = ContentKind::JournalIndex;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            post_ids: fields.strings("postIds"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::JournalIndex(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl DraftSchema for ProjectDraft {
    const KIND: ContentKind = ContentKind::Project;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            title: fields.string("title"),
            summary: fields.string("summary"),
            description: fields.string("description"),
            location: fields.string("location"),
            year: fields.i32("year"),
            hero_photo_id: fields.string("heroPhotoId"),
            photo_ids: fields.strings("photoIds"),
            published: fields.bool("published"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::Project(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalPostDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_photo_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl DraftSchema for JournalPostDraft {
    const KIND: ContentKind = ContentKind::JournalPost;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            title: fields.string("title"),
            excerpt: fields.string("excerpt"),
            body: fields.string("body"),
            published_on: fields.string("publishedOn"),
            hero_photo_id: fields.string("heroPhotoId"),
            photo_ids: fields.strings("photoIds"),
            published: fields.bool("published"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::JournalPost(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_photo_id: Option<String>,
}

impl DraftSchema for ProfileDraft {
    const KIND: ContentKind = ContentKind::Profile;

    fn from_fields(fields: &Fields<'_>) -> Self {
        Self {
            name: fields.string("name"),
            title: fields.string("title"),
            bio: fields.string("bio"),
            email: fields.string("email"),
            instagram: fields.string("instagram"),
            avatar_photo_id: fields.string("avatarPhotoId"),
        }
    }

    fn into_payload(self) -> DraftPayload {
        DraftPayload::Profile(self)
    }
}
