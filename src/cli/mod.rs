//! Command line surface.

mod commands;
mod route;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sf_core::ContentKind;

pub use commands::run;
pub use route::{route, Route};

/// Shutterfolio - draft preview for the portfolio CMS
#[derive(Parser, Debug)]
#[command(name = "shutterfolio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to <data dir>/shutterfolio.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or edit local drafts
    Draft {
        #[command(subcommand)]
        command: DraftCommand,
    },

    /// Render a public page
    Render(RenderArgs),

    /// Persist every stored draft to the content document
    Save,

    /// Admin preview modal
    Preview {
        #[command(subcommand)]
        command: PreviewCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct DraftTarget {
    /// Content kind (page, about, contact, home, work-index, journal-index,
    /// project, journal, profile)
    pub kind: ContentKind,

    /// Entity id, required for page, project and journal
    pub id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Print the stored draft
    Show(DraftTarget),

    /// Write a draft from a JSON object
    Set {
        #[command(flatten)]
        target: DraftTarget,

        /// Draft fields as JSON, e.g. '{"title":"Harbour"}'
        #[arg(long)]
        json: String,
    },

    /// Discard the stored draft
    Clear(DraftTarget),

    /// List every stored draft
    List,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Site path, e.g. /work/harbour
    pub path: String,

    /// Merge local drafts into the output
    #[arg(long)]
    pub preview: bool,
}

#[derive(Subcommand, Debug)]
pub enum PreviewCommand {
    /// Open the modal on a site path
    Open {
        path: String,
    },

    /// Close the modal
    Close,

    /// Print the modal state and frame URL
    Status,
}
