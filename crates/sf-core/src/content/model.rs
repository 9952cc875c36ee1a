use serde::{Deserialize, Serialize};

/// A resolved photo record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Photo {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub location: Option<String>,
    pub year: Option<i32>,
    pub hero_photo_id: Option<String>,
    pub photo_ids: Vec<String>,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub published_on: Option<String>,
    pub hero_photo_id: Option<String>,
    pub photo_ids: Vec<String>,
    pub published: bool,
}

/// Free-form page content, keyed by page slug.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContent {
    pub slug: String,
    pub title: String,
    pub intro: String,
    pub body: String,
    pub hero_photo_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bio {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApproachItem {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub headline: String,
    pub bio: Bio,
    pub portrait_photo_id: Option<String>,
    pub approach: Vec<ApproachItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactContent {
    pub headline: String,
    pub intro: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeLayout {
    pub headline: String,
    pub tagline: String,
    pub hero_photo_id: Option<String>,
    pub featured_photo_ids: Vec<String>,
}

/// Projects in their confirmed display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkIndex {
    pub projects: Vec<Project>,
}

/// Journal posts in their confirmed display order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JournalIndex {
    pub posts: Vec<JournalPost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub instagram: Option<String>,
    pub avatar_photo_id: Option<String>,
}
