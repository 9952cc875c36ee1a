use std::collections::BTreeSet;

use super::ordering::order_by_draft;
use crate::content::*;
use crate::draft::*;

/// Overlay of a draft schema onto its baseline entity.
///
/// Fields present in the draft replace the baseline value; absent fields keep
/// it. Ordered collections with stable ids go through [`order_by_draft`].
pub trait DraftOverlay: Clone {
    type Draft: DraftSchema;

    fn overlay(&self, draft: &Self::Draft) -> Self;
}

/// Entity that can be rendered in preview mode.
pub trait PreviewEntity: DraftOverlay + std::fmt::Debug + Send + Sync + 'static {
    /// Key of the draft that overrides this entity.
    fn draft_key(&self) -> DraftKey;

    /// Every photo id the entity references, in no particular order.
    fn photo_refs(&self) -> Vec<&str>;

    /// Deduplicated, sorted photo ids; the lookup key for photo resolution.
    fn referenced_photo_ids(&self) -> Vec<String> {
        self.photo_refs()
            .into_iter()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Merge an optional draft over a baseline.
pub fn merge_draft<E: DraftOverlay>(baseline: &E, draft: Option<&E::Draft>) -> E {
    match draft {
        Some(draft) => baseline.overlay(draft),
        None => baseline.clone(),
    }
}

fn pick<T: Clone>(draft: &Option<T>, baseline: &T) -> T {
    draft.as_ref().unwrap_or(baseline).clone()
}

fn pick_opt<T: Clone>(draft: &Option<T>, baseline: &Option<T>) -> Option<T> {
    draft.as_ref().or(baseline.as_ref()).cloned()
}

impl DraftOverlay for PageContent {
    type Draft = PageDraft;

    fn overlay(&self, draft: &PageDraft) -> Self {
        Self {
            slug: self.slug.clone(),
            title: pick(&draft.title, &self.title),
            intro: pick(&draft.intro, &self.intro),
            body: pick(&draft.body, &self.body),
            hero_photo_id: pick_opt(&draft.hero_photo_id, &self.hero_photo_id),
        }
    }
}

impl PreviewEntity for PageContent {
    fn draft_key(&self) -> DraftKey {
        DraftKey::entity(ContentKind::Page, &self.slug)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.hero_photo_id.as_deref().into_iter().collect()
    }
}

fn merge_approach(baseline: &[ApproachItem], draft: &[ApproachItemDraft]) -> Vec<ApproachItem> {
    // Draft items overlay the baseline item with the same id, or stand alone.
    let mut candidates: Vec<ApproachItem> = draft
        .iter()
        .map(|item| {
            let base = baseline.iter().find(|b| b.id == item.id);
            ApproachItem {
                id: item.id.clone(),
                title: item
                    .title
                    .clone()
                    .or_else(|| base.map(|b| b.title.clone()))
                    .unwrap_or_default(),
                description: item
                    .description
                    .clone()
                    .or_else(|| base.map(|b| b.description.clone()))
                    .unwrap_or_default(),
            }
        })
        .collect();
    candidates.extend(
        baseline
            .iter()
            .filter(|b| !draft.iter().any(|item| item.id == b.id))
            .cloned(),
    );

    let order: Vec<String> = draft.iter().map(|item| item.id.clone()).collect();
    order_by_draft(&candidates, &order, |item| item.id.as_str())
}

impl DraftOverlay for AboutContent {
    type Draft = AboutDraft;

    fn overlay(&self, draft: &AboutDraft) -> Self {
        let bio = match &draft.bio {
            Some(bio) => Bio {
                heading: pick(&bio.heading, &self.bio.heading),
                paragraphs: pick(&bio.paragraphs, &self.bio.paragraphs),
            },
            None => self.bio.clone(),
        };
        let approach = match &draft.approach {
            Some(items) => merge_approach(&self.approach, items),
            None => self.approach.clone(),
        };

        Self {
            headline: pick(&draft.headline, &self.headline),
            bio,
            portrait_photo_id: pick_opt(&draft.portrait_photo_id, &self.portrait_photo_id),
            approach,
        }
    }
}

impl PreviewEntity for AboutContent {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::About)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.portrait_photo_id.as_deref().into_iter().collect()
    }
}

impl DraftOverlay for ContactContent {
    type Draft = ContactDraft;

    fn overlay(&self, draft: &ContactDraft) -> Self {
        Self {
            headline: pick(&draft.headline, &self.headline),
            intro: pick(&draft.intro, &self.intro),
            email: pick(&draft.email, &self.email),
            phone: pick_opt(&draft.phone, &self.phone),
            location: pick_opt(&draft.location, &self.location),
            availability: pick_opt(&draft.availability, &self.availability),
        }
    }
}

impl PreviewEntity for ContactContent {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::Contact)
    }

    fn photo_refs(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl DraftOverlay for HomeLayout {
    type Draft = HomeLayoutDraft;

    fn overlay(&self, draft: &HomeLayoutDraft) -> Self {
        Self {
            headline: pick(&draft.headline, &self.headline),
            tagline: pick(&draft.tagline, &self.tagline),
            hero_photo_id: pick_opt(&draft.hero_photo_id, &self.hero_photo_id),
            featured_photo_ids: pick(&draft.featured_photo_ids, &self.featured_photo_ids),
        }
    }
}

impl PreviewEntity for HomeLayout {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::HomeLayout)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.hero_photo_id
            .as_deref()
            .into_iter()
            .chain(self.featured_photo_ids.iter().map(String::as_str))
            .collect()
    }
}

impl DraftOverlay for WorkIndex {
    type Draft = WorkIndexDraft;

    fn overlay(&self, draft: &WorkIndexDraft) -> Self {
        match &draft.project_ids {
            Some(order) => Self {
                projects: order_by_draft(&self.projects, order, |p| p.id.as_str()),
            },
            None => self.clone(),
        }
    }
}

impl PreviewEntity for WorkIndex {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::WorkIndex)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.projects
            .iter()
            .filter_map(|p| p.hero_photo_id.as_deref())
            .collect()
    }
}

impl DraftOverlay for JournalIndex {
    type Draft = JournalIndexDraft;

    fn overlay(&self, draft: &JournalIndexDraft) -> Self {
        match &draft.post_ids {
            Some(order) => Self {
                posts: order_by_draft(&self.posts, order, |p| p.id.as_str()),
            },
            None => self.clone(),
        }
    }
}

impl PreviewEntity for JournalIndex {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::JournalIndex)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.posts
            .iter()
            .filter_map(|p| p.hero_photo_id.as_deref())
            .collect()
    }
}

impl DraftOverlay for Project {
    type Draft = ProjectDraft;

    fn overlay(&self, draft: &ProjectDraft) -> Self {
        Self {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: pick(&draft.title, &self.title),
            summary: pick(&draft.summary, &self.summary),
            description: pick(&draft.description, &self.description),
            location: pick_opt(&draft.location, &self.location),
            year: pick_opt(&draft.year, &self.year),
            hero_photo_id: pick_opt(&draft.hero_photo_id, &self.hero_photo_id),
            photo_ids: pick(&draft.photo_ids, &self.photo_ids),
            published: pick(&draft.published, &self.published),
        }
    }
}

impl PreviewEntity for Project {
    fn draft_key(&self) -> DraftKey {
        DraftKey::entity(ContentKind::Project, &self.id)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.hero_photo_id
            .as_deref()
            .into_iter()
            .chain(self.photo_ids.iter().map(String::as_str))
            .collect()
    }
}

impl DraftOverlay for JournalPost {
    type Draft = JournalPostDraft;

    fn overlay(&self, draft: &JournalPostDraft) -> Self {
        Self {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: pick(&draft.title, &self.title),
            excerpt: pick(&draft.excerpt, &self.excerpt),
            body: pick(&draft.body, &self.body),
            published_on: pick_opt(&draft.published_on, &self.published_on),
            hero_photo_id: pick_opt(&draft.hero_photo_id, &self.hero_photo_id),
            photo_ids: pick(&draft.photo_ids, &self.photo_ids),
            published: pick(&draft.published, &self.published),
        }
    }
}

impl PreviewEntity for JournalPost {
    fn draft_key(&self) -> DraftKey {
        DraftKey::entity(ContentKind::JournalPost, &self.id)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.hero_photo_id
            .as_deref()
            .into_iter()
            .chain(self.photo_ids.iter().map(String::as_str))
            .collect()
    }
}

impl DraftOverlay for Profile {
    type Draft = ProfileDraft;

    fn overlay(&self, draft: &ProfileDraft) -> Self {
        Self {
            name: pick(&draft.name, &self.name),
            title: pick(&draft.title, &self.title),
            bio: pick(&draft.bio, &self.bio),
            email: pick(&draft.email, &self.email),
            instagram: pick_opt(&draft.instagram, &self.instagram),
            avatar_photo_id: pick_opt(&draft.avatar_photo_id, &self.avatar_photo_id),
        }
    }
}

impl PreviewEntity for Profile {
    fn draft_key(&self) -> DraftKey {
        DraftKey::single(ContentKind::Profile)
    }

    fn photo_refs(&self) -> Vec<&str> {
        self.avatar_photo_id.as_deref().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> Project {
        Project {
            id: "p1".to_string(),
            slug: "dunes".to_string(),
            title: "Old Title".to_string(),
            summary: "Sand and wind".to_string(),
            description: "A long walk.".to_string(),
            location: Some("Namib".to_string()),
            year: Some(2019),
            hero_photo_id: Some("ph-1".to_string()),
            photo_ids: vec!["ph-2".to_string(), "ph-1".to_string()],
            published: true,
        }
    }

    #[test]
    fn draft_fields_win_and_absent_fields_fall_back() {
        let baseline = project();
        let draft = ProjectDraft {
            title: Some("New Title".to_string()),
            year: Some(2024),
            ..Default::default()
        };

        let merged = merge_draft(&baseline, Some(&draft));

        assert_eq!(merged.title, "New Title");
        assert_eq!(merged.year, Some(2024));
        assert_eq!(merged.summary, baseline.summary);
        assert_eq!(merged.location, baseline.location);
        assert_eq!(merged.photo_ids, baseline.photo_ids);
        assert_eq!(merged.id, baseline.id);
    }

    #[test]
    fn merge_without_draft_is_baseline() {
        let baseline = project();
        assert_eq!(merge_draft(&baseline, None), baseline);
    }

    #[test]
    fn photo_list_override_replaces_whole_list() {
        let draft = ProjectDraft {
            photo_ids: Some(vec!["ph-9".to_string()]),
            ..Default::default()
        };

        assert_eq!(project().overlay(&draft).photo_ids, vec!["ph-9".to_string()]);
    }

    #[test]
    fn referenced_photo_ids_are_deduplicated_and_sorted() {
        assert_eq!(
            project().referenced_photo_ids(),
            vec!["ph-1".to_string(), "ph-2".to_string()]
        );
    }

    #[test]
    fn work_index_applies_draft_order_with_remainder() {
        let index = WorkIndex {
            projects: ["a", "b", "c", "d"]
                .iter()
                .map(|id| Project {
                    id: id.to_string(),
                    ..Default::default()
                })
                .collect(),
        };
        let draft = WorkIndexDraft {
            project_ids: Some(vec!["c".to_string(), "gone".to_string(), "a".to_string()]),
        };

        let ids: Vec<String> = index
            .overlay(&draft)
            .projects
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn about_overlays_bio_subfields_and_orders_approach_items() {
        let baseline = AboutContent {
            headline: "About".to_string(),
            bio: Bio {
                heading: "Hi".to_string(),
                paragraphs: vec!["one".to_string()],
            },
            portrait_photo_id: None,
            approach: vec![
                ApproachItem {
                    id: "light".to_string(),
                    title: "Light".to_string(),
                    description: "Natural light".to_string(),
                },
                ApproachItem {
                    id: "story".to_string(),
                    title: "Story".to_string(),
                    description: "Story first".to_string(),
                },
                ApproachItem {
                    id: "care".to_string(),
                    title: "Care".to_string(),
                    description: "Slow work".to_string(),
                },
            ],
        };
        let draft = AboutDraft {
            bio: Some(BioDraft {
                heading: Some("Hello".to_string()),
                paragraphs: None,
            }),
            approach: Some(vec![
                ApproachItemDraft {
                    id: "care".to_string(),
                    title: Some("Patience".to_string()),
                    description: None,
                },
                ApproachItemDraft {
                    id: "new".to_string(),
                    title: Some("Prints".to_string()),
                    description: None,
                },
            ]),
            ..Default::default()
        };

        let merged = baseline.overlay(&draft);

        assert_eq!(merged.headline, "About");
        assert_eq!(merged.bio.heading, "Hello");
        assert_eq!(merged.bio.paragraphs, vec!["one".to_string()]);
        let ids: Vec<&str> = merged.approach.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["care", "new", "light", "story"]);
        assert_eq!(merged.approach[0].title, "Patience");
        assert_eq!(merged.approach[0].description, "Slow work");
        assert_eq!(merged.approach[1].description, "");
    }
}
