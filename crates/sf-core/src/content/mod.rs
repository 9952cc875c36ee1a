//! Content models served by the public site and edited in the admin panel.

mod entity;
mod kind;
mod model;

pub use entity::BaselineEntity;
pub use kind::{ContentKind, ParseContentKindError};
pub use model::*;
