//! `apply`: process pages in parallel and write the results.

use std::path::PathBuf;

use anyhow::{Result, bail};
use rayon::prelude::*;

use super::ApplyArgs;
use super::common::{ProcessedPage, process_file, relative_to_roots};
use crate::config::LightboxConfig;
use crate::engine::{LinkEngine, ProcessCounts};
use crate::overlay::Overlay;
use crate::utils::fs::{collect_pages, write_if_changed};
use crate::utils::plural_count;
use crate::{debug, log};

/// Result for one page.
struct PageResult {
    source: PathBuf,
    counts: ProcessCounts,
    written: bool,
}

pub fn apply(args: &ApplyArgs, config: &LightboxConfig, library: Option<&dyn Overlay>) -> Result<()> {
    let pages = collect_pages(&args.paths);
    if pages.is_empty() {
        log!("apply"; "no html pages found");
        return Ok(());
    }

    let engine = LinkEngine::new(config)?;
    log!("apply"; "processing {}", plural_count(pages.len(), "page"));

    let results: Vec<(PathBuf, Result<PageResult>)> = pages
        .par_iter()
        .map(|page| (page.clone(), apply_one(page, args, &engine, config, library)))
        .collect();

    let mut total = ProcessCounts::default();
    let mut written = 0;
    let mut failed = 0;

    for (page, result) in results {
        match result {
            Ok(result) => {
                debug!("apply"; "{}: {}", result.source.display(), result.counts);
                total += result.counts;
                written += usize::from(result.written);
            }
            Err(e) => {
                log!("error"; "{}: {:#}", page.display(), e);
                failed += 1;
            }
        }
    }

    log!("apply"; "{}", total);
    if args.dry_run {
        log!("apply"; "dry run, nothing written");
    } else {
        log!("apply"; "wrote {}", plural_count(written, "page"));
    }

    if failed > 0 {
        bail!("{} failed", plural_count(failed, "page"));
    }
    Ok(())
}

fn apply_one(
    page: &std::path::Path,
    args: &ApplyArgs,
    engine: &LinkEngine,
    config: &LightboxConfig,
    library: Option<&dyn Overlay>,
) -> Result<PageResult> {
    let ProcessedPage { html, counts, .. } =
        process_file(page, engine, config.overlay.mode, library)?;

    let dest = match &args.output {
        Some(dir) => dir.join(relative_to_roots(page, &args.paths)),
        None => page.to_path_buf(),
    };

    let written = !args.dry_run && write_if_changed(&dest, html.as_bytes())?;

    Ok(PageResult {
        source: page.to_path_buf(),
        counts,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::MagnificOverlay;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><body><div class="entry-content"><a href="/a.jpg"><img src="/t.jpg"></a></div></body></html>"#;

    fn args(paths: Vec<PathBuf>, output: Option<PathBuf>, dry_run: bool) -> ApplyArgs {
        ApplyArgs {
            paths,
            output,
            dry_run,
        }
    }

    #[test]
    fn test_apply_in_place_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("index.html");
        fs::write(&page, PAGE).unwrap();
        let config = LightboxConfig::default();

        apply(&args(vec![page.clone()], None, false), &config, Some(&MagnificOverlay)).unwrap();
        let first = fs::read_to_string(&page).unwrap();
        assert!(first.contains(r#"class="et_pb_lightbox_image""#));

        apply(&args(vec![page.clone()], None, false), &config, Some(&MagnificOverlay)).unwrap();
        assert_eq!(fs::read_to_string(&page).unwrap(), first);
    }

    #[test]
    fn test_apply_into_output_dir_keeps_layout() {
        let temp = TempDir::new().unwrap();
        let site = temp.path().join("site");
        fs::create_dir_all(site.join("blog")).unwrap();
        fs::write(site.join("blog/post.html"), PAGE).unwrap();
        fs::write(site.join("notes.txt"), "not a page").unwrap();
        let out = temp.path().join("out");

        apply(&args(vec![site.clone()], Some(out.clone()), false), &LightboxConfig::default(), None)
            .unwrap();

        assert!(out.join("blog/post.html").exists());
        assert!(!out.join("notes.txt").exists());
        assert_eq!(fs::read_to_string(site.join("blog/post.html")).unwrap(), PAGE);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("index.html");
        fs::write(&page, PAGE).unwrap();

        apply(&args(vec![page.clone()], None, true), &LightboxConfig::default(), None).unwrap();
        assert_eq!(fs::read_to_string(&page).unwrap(), PAGE);
    }

    #[test]
    fn test_unreadable_page_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.html");
        let result = apply(&args(vec![missing], None, false), &LightboxConfig::default(), None);
        assert!(result.is_err());
    }
}
