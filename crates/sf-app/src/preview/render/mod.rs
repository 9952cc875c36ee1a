//! HTML rendering of merged entities.
//!
//! Renderers never fail: a photo id that does not resolve omits its image or
//! section, and every text value is escaped.

mod collections;
mod pages;

use std::collections::HashMap;

use sf_core::content::Photo;

/// Rendered output of one preview component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    /// Page heading, also emitted as the only `<h1>`.
    pub title: String,
    pub html: String,
}

/// Photos resolved for one render, indexed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoSet {
    photos: HashMap<String, Photo>,
}

impl PhotoSet {
    pub fn new(photos: impl IntoIterator<Item = Photo>) -> Self {
        Self {
            photos: photos
                .into_iter()
                .map(|photo| (photo.id.clone(), photo))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.photos.get(id)
    }

    pub fn resolve(&self, id: Option<&str>) -> Option<&Photo> {
        id.and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

pub trait RenderView {
    fn render(&self, photos: &PhotoSet) -> RenderedView;
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Small append-only HTML writer.
#[derive(Default)]
struct Html {
    out: String,
}

impl Html {
    fn open(&mut self, tag: &str, class: &str) -> &mut Self {
        self.out.push_str(&format!("<{tag} class=\"{class}\">"));
        self
    }

    fn close(&mut self, tag: &str) -> &mut Self {
        self.out.push_str(&format!("</{tag}>"));
        self
    }

    fn text(&mut self, tag: &str, text: &str) -> &mut Self {
        self.out
            .push_str(&format!("<{tag}>{}</{tag}>", escape_html(text)));
        self
    }

    /// Like [`Html::text`], skipped when `text` is empty.
    fn text_opt(&mut self, tag: &str, text: Option<&str>) -> &mut Self {
        match text {
            Some(text) if !text.is_empty() => self.text(tag, text),
            _ => self,
        }
    }

    fn paragraphs(&mut self, body: &str) -> &mut Self {
        for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            self.text("p", paragraph);
        }
        self
    }

    fn image(&mut self, photo: &Photo) -> &mut Self {
        self.out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" width=\"{}\" height=\"{}\">",
            escape_html(&photo.src),
            escape_html(&photo.alt),
            photo.width,
            photo.height
        ));
        self
    }

    /// Hero section; omitted entirely when the photo did not resolve.
    fn hero(&mut self, photo: Option<&Photo>) -> &mut Self {
        if let Some(photo) = photo {
            self.open("figure", "hero").image(photo).close("figure");
        }
        self
    }

    /// Gallery of the resolvable photos, in the given order.
    fn gallery(&mut self, photos: &PhotoSet, ids: &[String]) -> &mut Self {
        let resolved: Vec<&Photo> = ids.iter().filter_map(|id| photos.get(id)).collect();
        if resolved.is_empty() {
            return self;
        }
        self.open("div", "gallery");
        for photo in resolved {
            self.image(photo);
        }
        self.close("div")
    }

    fn link(&mut self, href: &str, text: &str) -> &mut Self {
        self.out.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            escape_html(href),
            escape_html(text)
        ));
        self
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

fn article(class: &str, title: &str, body: impl FnOnce(&mut Html)) -> RenderedView {
    let mut html = Html::default();
    html.open("article", class).text("h1", title);
    body(&mut html);
    html.close("article");
    RenderedView {
        title: title.to_string(),
        html: html.finish(),
    }
}
