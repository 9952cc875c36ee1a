use sf_core::preview::url_path;
use sf_core::ContentKind;

/// Entity rendered at a public site path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub kind: ContentKind,
    pub id: Option<String>,
}

impl Route {
    fn single(kind: ContentKind) -> Self {
        Self { kind, id: None }
    }

    fn entity(kind: ContentKind, id: &str) -> Self {
        Self {
            kind,
            id: Some(id.to_string()),
        }
    }
}

/// Map a site path (query ignored) to the entity it shows.
///
/// ```text
/// /               home
/// /about          about
/// /contact        contact
/// /profile        profile
/// /work           work index
/// /work/<id>      project
/// /journal        journal index
/// /journal/<id>   journal post
/// /<slug>         page
/// ```
pub fn route(path: &str) -> Option<Route> {
    let segments: Vec<&str> = url_path(path)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let route = match segments.as_slice() {
        [] => Route::single(ContentKind::HomeLayout),
        ["about"] => Route::single(ContentKind::About),
        ["contact"] => Route::single(ContentKind::Contact),
        ["profile"] => Route::single(ContentKind::Profile),
        ["work"] => Route::single(ContentKind::WorkIndex),
        ["work", id] => Route::entity(ContentKind::Project, id),
        ["journal"] => Route::single(ContentKind::JournalIndex),
        ["journal", id] => Route::entity(ContentKind::JournalPost, id),
        [slug] => Route::entity(ContentKind::Page, slug),
        _ => return None,
    };
    Some(route)
}
