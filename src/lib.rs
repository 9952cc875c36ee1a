//! Shutterfolio draft-preview command line.
//!
//! `bootstrap` loads configuration, installs tracing and wires the preview
//! session for one browsing context; `cli` turns parsed commands into use
//! case calls on that session.

pub mod bootstrap;
pub mod cli;
