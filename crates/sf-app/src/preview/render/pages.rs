use sf_core::content::{AboutContent, ContactContent, HomeLayout, PageContent, Profile};

use super::{article, PhotoSet, RenderView, RenderedView};

impl RenderView for PageContent {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("page", &self.title, |html| {
            html.hero(photos.resolve(self.hero_photo_id.as_deref()))
                .text_opt("p", Some(&self.intro))
                .paragraphs(&self.body);
        })
    }
}

impl RenderView for AboutContent {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("about", &self.headline, |html| {
            if let Some(portrait) = photos.resolve(self.portrait_photo_id.as_deref()) {
                html.open("figure", "portrait").image(portrait).close("figure");
            }

            html.open("section", "bio").text_opt("h2", Some(&self.bio.heading));
            for paragraph in &self.bio.paragraphs {
                html.text("p", paragraph);
            }
            html.close("section");

            if !self.approach.is_empty() {
                html.open("ol", "approach");
                for item in &self.approach {
                    html.open("li", "approach-item")
                        .text("h3", &item.title)
                        .text_opt("p", Some(&item.description))
                        .close("li");
                }
                html.close("ol");
            }
        })
    }
}

impl RenderView for ContactContent {
    fn render(&self, _photos: &PhotoSet) -> RenderedView {
        article("contact", &self.headline, |html| {
            html.text_opt("p", Some(&self.intro));
            html.open("ul", "contact-details");
            if !self.email.is_empty() {
                html.open("li", "email")
                    .link(&format!("mailto:{}", self.email), &self.email)
                    .close("li");
            }
            html.text_opt("li", self.phone.as_deref())
                .text_opt("li", self.location.as_deref())
                .text_opt("li", self.availability.as_deref())
                .close("ul");
        })
    }
}

impl RenderView for HomeLayout {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("home", &self.headline, |html| {
            html.hero(photos.resolve(self.hero_photo_id.as_deref()))
                .text_opt("p", Some(&self.tagline))
                .gallery(photos, &self.featured_photo_ids);
        })
    }
}

impl RenderView for Profile {
    fn render(&self, photos: &PhotoSet) -> RenderedView {
        article("profile", &self.name, |html| {
            if let Some(avatar) = photos.resolve(self.avatar_photo_id.as_deref()) {
                html.open("figure", "avatar").image(avatar).close("figure");
            }
            html.text_opt("h2", Some(&self.title)).paragraphs(&self.bio);
            if !self.email.is_empty() {
                html.link(&format!("mailto:{}", self.email), &self.email);
            }
            if let Some(handle) = self.instagram.as_deref().filter(|h| !h.is_empty()) {
                let handle = handle.trim_start_matches('@');
                html.link(
                    &format!("https://instagram.com/{handle}"),
                    &format!("@{handle}"),
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::content::{ApproachItem, Bio, Photo};

    #[test]
    fn page_without_resolvable_hero_omits_hero_section() {
        let page = PageContent {
            slug: "prints".to_string(),
            title: "Prints".to_string(),
            hero_photo_id: Some("gone".to_string()),
            body: "First.\n\nSecond.".to_string(),
            ..Default::default()
        };

        let view = page.render(&PhotoSet::default());

        assert_eq!(view.title, "Prints");
        assert!(!view.html.contains("hero"));
        assert!(view.html.contains("<p>First.</p><p>Second.</p>"));
    }

    #[test]
    fn about_renders_bio_and_approach_in_order() {
        let about = AboutContent {
            headline: "About".to_string(),
            bio: Bio {
                heading: "Story".to_string(),
                paragraphs: vec!["One".to_string()],
            },
            portrait_photo_id: Some("me".to_string()),
            approach: vec![
                ApproachItem {
                    id: "b".to_string(),
                    title: "Second".to_string(),
                    description: String::new(),
                },
                ApproachItem {
                    id: "a".to_string(),
                    title: "First".to_string(),
                    description: String::new(),
                },
            ],
        };
        let photos = PhotoSet::new([Photo {
            id: "me".to_string(),
            src: "/me.jpg".to_string(),
            ..Default::default()
        }]);

        let html = about.render(&photos).html;

        assert!(html.contains("class=\"portrait\""));
        assert!(html.find("Second").unwrap() < html.find("First").unwrap());
    }

    #[test]
    fn profile_escapes_text() {
        let profile = Profile {
            name: "A <b>bold</b> name".to_string(),
            ..Default::default()
        };

        let html = profile.render(&PhotoSet::default()).html;

        assert!(html.contains("<h1>A &lt;b&gt;bold&lt;/b&gt; name</h1>"));
    }
}
