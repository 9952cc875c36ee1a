//! Preview-mode URL convention shared with the page-rendering layer.
//!
//! Public pages render draft overrides only when the URL carries
//! `preview=draft`. An embedded preview frame additionally carries
//! `refresh=<n>`; bumping `n` forces the frame to reload.

use serde::{Deserialize, Serialize};

pub const PREVIEW_PARAM: &str = "preview";
pub const PREVIEW_DRAFT_VALUE: &str = "draft";
pub const REFRESH_PARAM: &str = "refresh";

/// Storage slot written on every signal emit.
pub const SIGNAL_SLOT_KEY: &str = "preview.signal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// Render the server-confirmed content only.
    #[default]
    Baseline,
    /// Overlay local drafts before rendering.
    Draft,
}

impl PreviewMode {
    pub fn is_draft(&self) -> bool {
        matches!(self, PreviewMode::Draft)
    }

    /// Derive the mode from a full URL, a path with query, or a bare query.
    pub fn from_url(url: &str) -> Self {
        let draft = query_pairs(url)
            .any(|(name, value)| name == PREVIEW_PARAM && value == PREVIEW_DRAFT_VALUE);
        if draft {
            PreviewMode::Draft
        } else {
            PreviewMode::Baseline
        }
    }
}

/// Iterate `name=value` pairs of the query part of `url`. Fragments are ignored.
pub fn query_pairs(url: &str) -> impl Iterator<Item = (&str, &str)> {
    let without_fragment = url.split('#').next().unwrap_or_default();
    let query = match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if !without_fragment.contains('/') && without_fragment.contains('=') => {
            without_fragment
        }
        None => "",
    };
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

/// The path part of `url` (everything before `?` or `#`).
pub fn url_path(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or_default()
}

/// Build the preview URL for `path`, replacing any existing `preview` and
/// `refresh` parameters and keeping the others.
pub fn preview_url(path: &str, refresh: u64) -> String {
    let kept: Vec<String> = query_pairs(path)
        .filter(|(name, _)| *name != PREVIEW_PARAM && *name != REFRESH_PARAM)
        .map(|(name, value)| format!("{name}={value}"))
        .collect();

    let mut params = kept;
    params.push(format!("{PREVIEW_PARAM}={PREVIEW_DRAFT_VALUE}"));
    if refresh > 0 {
        params.push(format!("{REFRESH_PARAM}={refresh}"));
    }

    let base = match url_path(path) {
        "" => "/",
        base => base,
    };
    format!("{base}?{}", params.join("&"))
}
