//! Shared fixtures: one content repository, one browser profile, one preview
//! session per tab.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sf_app::preview::RenderView;
use sf_app::{PreviewComponent, PreviewDeps, PreviewSession, SessionOptions};
use sf_core::content::{Photo, Project};
use sf_core::ports::EntityWritePort;
use sf_core::{BaselineEntity, PreviewEntity};
use sf_infra::{
    CachedPhotoLookup, ContentSnapshot, InMemoryContentRepository, InMemoryKeyValueStore,
    SystemClock,
};
use sf_platform::BrowsingContext;

pub const PROJECT_URL: &str = "/work/p1?preview=draft";

pub fn project(id: &str, title: &str) -> Project {
    Project {
        id: id.to_string(),
        slug: id.to_string(),
        title: title.to_string(),
        summary: format!("{title} summary"),
        hero_photo_id: Some("ph1".to_string()),
        published: true,
        ..Default::default()
    }
}

pub fn repository() -> Arc<InMemoryContentRepository> {
    Arc::new(InMemoryContentRepository::new(ContentSnapshot {
        projects: vec![
            project("p1", "Old Title"),
            project("p2", "Second"),
            project("p3", "Third"),
        ],
        photos: vec![Photo {
            id: "ph1".to_string(),
            src: "/img/ph1.jpg".to_string(),
            alt: "Harbour at dawn".to_string(),
            width: 1600,
            height: 1067,
        }],
        ..Default::default()
    }))
}

pub fn session_with_writer(
    ctx: &BrowsingContext,
    repo: Arc<InMemoryContentRepository>,
    writer: Arc<dyn EntityWritePort>,
    options: SessionOptions,
) -> PreviewSession {
    let deps = PreviewDeps {
        context_id: ctx.id().to_string(),
        local_storage: ctx.local_storage(),
        session_storage: Arc::new(InMemoryKeyValueStore::new()),
        storage_events: ctx.storage_events(),
        broadcast: ctx.broadcast(),
        visibility: ctx.visibility(),
        entity_read: repo.clone(),
        entity_write: writer,
        photos: Arc::new(CachedPhotoLookup::new(repo, 8)),
        clock: Arc::new(SystemClock),
    };
    PreviewSession::new(deps, options)
}

pub fn session(ctx: &BrowsingContext, repo: Arc<InMemoryContentRepository>) -> PreviewSession {
    session_with_writer(ctx, repo.clone(), repo, SessionOptions::default())
}

/// Drive `component` through signal updates until `done` holds.
pub async fn settle<E>(
    component: &mut PreviewComponent<E>,
    done: impl Fn(&PreviewComponent<E>) -> bool,
) where
    E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
{
    for _ in 0..16 {
        if done(component) {
            return;
        }
        tokio::time::timeout(Duration::from_secs(1), component.next_update())
            .await
            .expect("preview update was not delivered");
    }
    assert!(done(component), "preview never reached the expected state");
}

/// True when no update reaches `component` within a short window.
pub async fn stays_quiet<E>(component: &mut PreviewComponent<E>) -> bool
where
    E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
{
    tokio::time::timeout(Duration::from_millis(50), component.next_update())
        .await
        .is_err()
}
