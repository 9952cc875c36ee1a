//! # sf-platform
//!
//! Platform implementations for Shutterfolio.
//!
//! This crate hosts the in-process browser profile used to run several
//! browsing contexts (admin tab, public preview tab) against shared storage
//! and a broadcast channel, and resolves application directories.

pub mod app_dirs;
pub mod browser;

pub use app_dirs::DirsAppDirsAdapter;
pub use browser::{BrowserProfile, BrowsingContext, ProfileOptions};
