//! Preview chrome: public-page banner and the admin preview modal.

mod banner;
mod controller;

pub use banner::PreviewBanner;
pub use controller::{PreviewController, PreviewModalState, PREVIEW_MODAL_KEY};
