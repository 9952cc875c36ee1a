use anyhow::{anyhow, bail, Context, Result};
use sf_app::preview::RenderView;
use sf_app::{PreviewBanner, PreviewSession, RenderedView, SaveOutcome};
use sf_core::content::*;
use sf_core::preview::preview_url;
use sf_core::{DraftKey, DraftPayload, PreviewEntity};
use tracing::{info, info_span, Instrument};

use super::route::route;
use super::{Command, DraftCommand, DraftTarget, PreviewCommand};
use crate::bootstrap::Site;

/// Execute one command against `site` and return what should be printed.
pub async fn run(site: &Site, command: Command) -> Result<String> {
    match command {
        Command::Draft { command } => draft(site, command),
        Command::Render(args) => {
            let span = info_span!("command.render", path = %args.path, preview = args.preview);
            render(site, &args.path, args.preview).instrument(span).await
        }
        Command::Save => save(site).instrument(info_span!("command.save")).await,
        Command::Preview { command } => Ok(preview(site, command)),
    }
}

fn draft_key(target: &DraftTarget) -> Result<DraftKey> {
    match (&target.id, target.kind.is_multi_instance()) {
        (Some(id), true) => Ok(DraftKey::entity(target.kind, id)),
        (None, true) => bail!("{} drafts need an entity id", target.kind),
        (Some(_), false) => bail!("{} has a single draft; drop the id", target.kind),
        (None, false) => Ok(DraftKey::single(target.kind)),
    }
}

fn draft(site: &Site, command: DraftCommand) -> Result<String> {
    let session = &site.session;
    match command {
        DraftCommand::Show(target) => {
            let key = draft_key(&target)?;
            match session.stores().load_payload(&key) {
                Some(payload) => serde_json::to_string_pretty(&payload.to_value())
                    .context("failed to format draft"),
                None => Ok(format!("no draft for {key}")),
            }
        }
        DraftCommand::Set { target, json } => {
            let key = draft_key(&target)?;
            let value: serde_json::Value =
                serde_json::from_str(&json).context("draft is not valid JSON")?;
            let payload = DraftPayload::normalize(key.kind(), &value)
                .ok_or_else(|| anyhow!("draft has no valid {} fields", key.kind()))?;
            session.edit_draft().execute(&key, payload)?;
            Ok(format!("draft saved: {key}"))
        }
        DraftCommand::Clear(target) => {
            let key = draft_key(&target)?;
            session.discard_draft().execute(&key);
            Ok(format!("draft discarded: {key}"))
        }
        DraftCommand::List => {
            let keys: Vec<String> = site
                .stored_draft_keys()
                .iter()
                .map(DraftKey::to_string)
                .collect();
            if keys.is_empty() {
                Ok("no drafts".to_string())
            } else {
                Ok(keys.join("\n"))
            }
        }
    }
}

async fn load_view<E>(
    session: &PreviewSession,
    kind: ContentKind,
    id: Option<&str>,
    url: &str,
) -> Result<RenderedView>
where
    E: PreviewEntity + RenderView + TryFrom<BaselineEntity, Error = BaselineEntity>,
{
    let mut component = session.load::<E>(kind, id, url).await?;
    // Drafts may reference photos the baseline did not.
    if component.mode().is_draft() {
        component.refresh().await;
    }
    Ok(component.view().clone())
}

async fn render(site: &Site, path: &str, preview: bool) -> Result<String> {
    let target = route(path).ok_or_else(|| anyhow!("no page at {path}"))?;
    let url = if preview {
        preview_url(path, 0)
    } else {
        path.to_string()
    };
    let session = &site.session;
    let id = target.id.as_deref();

    let view = match target.kind {
        ContentKind::Page => load_view::<PageContent>(session, target.kind, id, &url).await,
        ContentKind::About => load_view::<AboutContent>(session, target.kind, id, &url).await,
        ContentKind::Contact => load_view::<ContactContent>(session, target.kind, id, &url).await,
        ContentKind::HomeLayout => load_view::<HomeLayout>(session, target.kind, id, &url).await,
        ContentKind::WorkIndex => load_view::<WorkIndex>(session, target.kind, id, &url).await,
        ContentKind::JournalIndex => {
            load_view::<JournalIndex>(session, target.kind, id, &url).await
        }
        ContentKind::Project => load_view::<Project>(session, target.kind, id, &url).await,
        ContentKind::JournalPost => load_view::<JournalPost>(session, target.kind, id, &url).await,
        ContentKind::Profile => load_view::<Profile>(session, target.kind, id, &url).await,
    }?;

    let mut out = String::new();
    if let Some(banner) = PreviewBanner::from_url(&url) {
        out.push_str(&banner.render_html());
        out.push('\n');
    }
    out.push_str(&view.html);
    Ok(out)
}

async fn save(site: &Site) -> Result<String> {
    site.resume_pending();
    let coordinator = site.session.coordinator();

    match coordinator.save_all().await {
        SaveOutcome::NothingToSave => Ok("nothing to save".to_string()),
        SaveOutcome::AlreadySaving => Ok("save already in progress".to_string()),
        SaveOutcome::Saved(count) => {
            info!(count, "drafts published");
            Ok(format!("saved {count} change(s)"))
        }
        SaveOutcome::Failed { failed, total } => {
            let message = coordinator
                .error_message()
                .unwrap_or_else(|| format!("{failed} item(s) failed to save"));
            bail!("{message} ({total} attempted)")
        }
    }
}

fn preview(site: &Site, command: PreviewCommand) -> String {
    let controller = site.session.controller();
    match command {
        PreviewCommand::Open { path } => controller.open_preview(&path),
        PreviewCommand::Close => controller.close_preview(),
        PreviewCommand::Status => {}
    }

    match controller.frame_url() {
        Some(frame) => format!(
            "open: {}{frame}",
            site.config.site_base_url.trim_end_matches('/')
        ),
        None => match controller.path() {
            Some(path) => format!("closed (last: {path})"),
            None => "closed".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(kind: ContentKind, id: Option<&str>) -> DraftTarget {
        DraftTarget {
            kind,
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn draft_key_requires_id_for_multi_instance_kinds() {
        assert!(draft_key(&target(ContentKind::Project, None)).is_err());
        assert_eq!(
            draft_key(&target(ContentKind::Project, Some("p1"))).unwrap(),
            DraftKey::entity(ContentKind::Project, "p1")
        );
    }

    #[test]
    fn draft_key_rejects_id_for_single_kinds() {
        assert!(draft_key(&target(ContentKind::About, Some("x"))).is_err());
        assert_eq!(
            draft_key(&target(ContentKind::About, None)).unwrap(),
            DraftKey::single(ContentKind::About)
        );
    }
}
