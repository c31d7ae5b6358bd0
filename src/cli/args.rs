//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Auto-link images in rendered Divi pages to a lightbox
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "lightbox.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// JSON page data object (`{selectors, imageExtensions, debug}`); overrides --config
    #[arg(short = 'D', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Never bind the standalone overlay; text links get the native class
    #[arg(long, global = true)]
    pub no_overlay: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Process HTML pages and write the marked-up result
    #[command(visible_alias = "a")]
    Apply {
        #[command(flatten)]
        args: ApplyArgs,
    },

    /// Report what would happen to every candidate link; writes nothing
    #[command(visible_alias = "c")]
    Check {
        /// HTML files or directories
        #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },

    /// Keep a page processed while its source changes
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        args: WatchArgs,
    },
}

/// Apply command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ApplyArgs {
    /// HTML files or directories (walked for *.html / *.htm)
    #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Write results under this directory instead of in place
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Only report counts, do not write
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// Watch command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct WatchArgs {
    /// Source page
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub page: PathBuf,

    /// Where the processed page is written after every pass
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}
