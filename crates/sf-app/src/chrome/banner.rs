use sf_core::preview::{query_pairs, url_path, PREVIEW_PARAM, REFRESH_PARAM};
use sf_core::PreviewMode;

use crate::preview::escape_html;

/// Banner shown on public pages rendered in draft preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBanner {
    exit_url: String,
}

impl PreviewBanner {
    /// Present only when `url` carries `preview=draft`.
    pub fn from_url(url: &str) -> Option<Self> {
        if !PreviewMode::from_url(url).is_draft() {
            return None;
        }

        let kept: Vec<String> = query_pairs(url)
            .filter(|(name, _)| *name != PREVIEW_PARAM && *name != REFRESH_PARAM)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let path = match url_path(url) {
            "" => "/",
            path => path,
        };
        let exit_url = if kept.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", kept.join("&"))
        };

        Some(Self { exit_url })
    }

    /// Same page without the preview flags.
    pub fn exit_url(&self) -> &str {
        &self.exit_url
    }

    pub fn render_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"preview-banner\" role=\"status\">",
                "Previewing unsaved drafts. <a href=\"{}\">Exit preview</a></div>"
            ),
            escape_html(&self.exit_url)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_only_in_draft_preview() {
        assert!(PreviewBanner::from_url("/about").is_none());
        assert!(PreviewBanner::from_url("/about?preview=live").is_none());
        assert!(PreviewBanner::from_url("/about?preview=draft").is_some());
    }

    #[test]
    fn exit_url_drops_preview_flags_only() {
        let banner = PreviewBanner::from_url("/work/dunes?tab=2&preview=draft&refresh=4").unwrap();

        assert_eq!(banner.exit_url(), "/work/dunes?tab=2");
        assert!(banner.render_html().contains("href=\"/work/dunes?tab=2\""));
    }
}
