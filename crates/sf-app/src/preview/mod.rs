//! Preview components: draft-aware rendering of one entity.

mod component;
pub mod render;

pub use component::{ComponentDeps, PreviewComponent, ViewState};
pub use render::{escape_html, PhotoSet, RenderView, RenderedView};
