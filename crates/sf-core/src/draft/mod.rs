//! Draft records: locally persisted, partial overrides of content entities.
//!
//! A draft payload is never trusted. Every field is validated on load, and a
//! field that fails validation is dropped on its own so the rest of the draft
//! survives and the dropped field falls back to the baseline value.

mod fields;
mod key;
mod payload;
mod record;
mod schema;

pub use fields::Fields;
pub use key::DraftKey;
pub use payload::DraftPayload;
pub use record::DraftRecord;
pub use schema::*;
