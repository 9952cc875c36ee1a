use sf_core::content::{JournalIndex, JournalPost, Project, WorkIndex};

use super::{article, Html, PhotoSet, RenderView, RenderedView};

fn card(
    html: &mut Html,
    photos: &PhotoSet,
    href: &str,
    title: &str,
    hero: Option<&str>,
    teaser: &str,
) {
    html.open("li", "card");
    if let Some(photo) = photos.resolve(hero) {
        html.image(photo);
    }
    html.link(href, title).text_opt("p", Some(teaser)).close("li");
}

impl RenderView for WorkIndex {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("work-index", "Work", |html| {
            html.open("ul", "projects");
            for project in self.projects.iter().filter(|p| p.published) {
                card(
                    html,
                    photos,
                    &format!("/work/{}", project.slug),
                    &project.title,
                    project.hero_photo_id.as_deref(),
                    &project.summary,
                );
            }
            html.close("ul");
        })
    }
}

impl RenderView for JournalIndex {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("journal-index", "Journal", |html| {
            html.open("ul", "posts");
            for post in self.posts.iter().filter(|p| p.published) {
                card(
                    html,
                    photos,
                    &format!("/journal/{}", post.slug),
                    &post.title,
                    post.hero_photo_id.as_deref(),
                    &post.excerpt,
                );
            }
            html.close("ul");
        })
    }
}

impl RenderView for Project {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("project", &self.title, |html| {
            html.hero(photos.resolve(self.hero_photo_id.as_deref()));

            let meta: Vec<String> = self
                .location
                .iter()
                .cloned()
                .chain(self.year.map(|year| year.to_string()))
                .collect();
            if !meta.is_empty() {
                html.text("p", &meta.join(" · "));
            }

            html.text_opt("p", Some(&self.summary))
                .paragraphs(&self.description)
                .gallery(photos, &self.photo_ids);
        })
    }
}

impl RenderView for JournalPost {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("journal-post", &self.title, |html| {
            html.hero(photos.resolve(self.hero_photo_id.as_deref()))
                .text_opt("time", self.published_on.as_deref())
                .text_opt("p", Some(&self.excerpt))
                .paragraphs(&self.body)
                .gallery(photos, &self.photo_ids);
        })
    }
}
