//! autolightbox - automatic lightbox wiring for image links in Divi pages.

mod actor;
mod cli;
mod config;
mod dom;
mod engine;
mod host;
mod logger;
mod overlay;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use overlay::{MagnificOverlay, Overlay};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = cli::common::load_config(&cli)?;
    let library: Option<Arc<dyn Overlay>> = if cli.no_overlay {
        None
    } else {
        Some(Arc::new(MagnificOverlay))
    };

    match (&cli.command, config) {
        // The page actor reports missing configuration itself
        (Commands::Watch { args }, config) => cli::watch::watch(args, config, library),
        (_, None) => {
            cli::common::warn_missing_config(&cli);
            Ok(())
        }
        (Commands::Apply { args }, Some(config)) => {
            cli::apply::apply(args, &config, library.as_deref())
        }
        (Commands::Check { paths }, Some(config)) => {
            cli::check::check(paths, &config, library.as_deref())
        }
    }
}
