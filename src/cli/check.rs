//! `check`: per-file outcome report, no writes.

use std::path::PathBuf;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use rayon::prelude::*;

use super::common::{ProcessedPage, process_file};
use crate::config::LightboxConfig;
use crate::engine::{LinkEngine, LinkReport, Outcome, ProcessCounts};
use crate::log;
use crate::overlay::Overlay;
use crate::utils::fs::collect_pages;
use crate::utils::plural_count;

pub fn check(paths: &[PathBuf], config: &LightboxConfig, library: Option<&dyn Overlay>) -> Result<()> {
    let pages = collect_pages(paths);
    if pages.is_empty() {
        log!("check"; "no html pages found");
        return Ok(());
    }

    let engine = LinkEngine::new(config)?;
    let results: Vec<(PathBuf, Result<ProcessedPage>)> = pages
        .par_iter()
        .map(|page| {
            let result = process_file(page, &engine, config.overlay.mode, library);
            (page.clone(), result)
        })
        .collect();

    let mut total = ProcessCounts::default();
    for (page, result) in &results {
        match result {
            Ok(processed) => {
                print_page(page, processed);
                total += processed.counts;
            }
            Err(e) => log!("error"; "{}: {:#}", page.display(), e),
        }
    }

    println!();
    log!("check"; "{} in {}", total, plural_count(results.len(), "page"));
    Ok(())
}

fn print_page(page: &std::path::Path, processed: &ProcessedPage) {
    let counts = processed.counts.to_string();
    println!(
        "{}{}{} {}",
        "[".if_supports_color(Stream::Stdout, |t| t.dimmed()),
        page.display().if_supports_color(Stream::Stdout, |t| t.cyan()),
        "]".if_supports_color(Stream::Stdout, |t| t.dimmed()),
        counts.if_supports_color(Stream::Stdout, |t| t.dimmed())
    );
    for link in &processed.links {
        println!("  {}", format_link(link));
    }
}

fn format_link(link: &LinkReport) -> String {
    // Pad before coloring so escape codes do not eat the column width.
    let label = format!("{:<28}", link.outcome.label());
    let label = match link.outcome {
        Outcome::TreatedAsBuilderLightbox | Outcome::TreatedAsStandalonePopup => label
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        Outcome::SkippedGalleryMember | Outcome::SkippedAlreadyHandled => label
            .if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string(),
        Outcome::SkippedNonImage => label
            .if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string(),
    };
    let href = if link.href.is_empty() {
        "(no href)"
    } else {
        &link.href
    };
    format!("{label} {href}")
}
