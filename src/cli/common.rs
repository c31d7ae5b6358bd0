//! Common utilities shared across CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{ConfigSource, LightboxConfig, OverlayMode};
use crate::dom;
use crate::engine::{LinkEngine, LinkReport, ProcessCounts};
use crate::host::HostContext;
use crate::log;
use crate::overlay::Overlay;

use super::Cli;

/// Resolve and load configuration from the global flags.
///
/// `Ok(None)` means no configuration exists.
pub fn load_config(cli: &Cli) -> Result<Option<LightboxConfig>> {
    let source = ConfigSource::resolve(&cli.config, cli.data.as_deref());
    let name = source
        .as_ref()
        .map_or_else(|| cli.config.clone(), |s| s.path().to_path_buf());

    LightboxConfig::load(source.as_ref())
        .with_context(|| format!("failed to load {}", name.display()))
}

/// Log the missing-configuration warning used by batch commands.
pub fn warn_missing_config(cli: &Cli) {
    log!(
        "warning";
        "no configuration found ({} or --data), pages left untouched",
        cli.config.display()
    );
}

/// One page after a single processing pass.
#[derive(Debug)]
pub struct ProcessedPage {
    pub html: String,
    pub links: Vec<LinkReport>,
    pub counts: ProcessCounts,
    pub host: HostContext,
}

/// Parse, process and render one page.
///
/// The overlay library is only used when the overlay mode allows it for
/// this page.
pub fn process_html(
    html: &str,
    engine: &LinkEngine,
    mode: OverlayMode,
    library: Option<&dyn Overlay>,
) -> ProcessedPage {
    let mut doc = dom::parse(html);
    let host = HostContext::detect(&doc);
    let overlay = library.filter(|_| mode.is_available(host.overlay_available));

    let body = doc.body();
    let links = engine.process_links(&mut doc, body, overlay);
    let mut counts = ProcessCounts::default();
    for link in &links {
        counts.record(link.outcome);
    }

    ProcessedPage {
        html: dom::render(&doc),
        links,
        counts,
        host,
    }
}

/// Read and process a page file.
pub fn process_file(
    path: &Path,
    engine: &LinkEngine,
    mode: OverlayMode,
    library: Option<&dyn Overlay>,
) -> Result<ProcessedPage> {
    let html =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(process_html(&html, engine, mode, library))
}

/// Path relative to the user-supplied root it was found under.
pub fn relative_to_roots(page: &Path, roots: &[PathBuf]) -> PathBuf {
    roots
        .iter()
        .filter(|root| root.is_dir())
        .find_map(|root| page.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .or_else(|| page.file_name().map(PathBuf::from))
        .unwrap_or_else(|| page.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Outcome;
    use crate::overlay::MagnificOverlay;
    use tempfile::TempDir;

    const PAGE: &str = r#"<html><head><script id="magnific-popup-js" src="/m.js"></script></head><body><div class="entry-content"><a href="/a.png">a</a></div></body></html>"#;

    #[test]
    fn test_process_html_binds_overlay_when_page_has_library() {
        let engine = LinkEngine::new(&LightboxConfig::default()).unwrap();
        let page = process_html(PAGE, &engine, OverlayMode::Auto, Some(&MagnificOverlay));

        assert!(page.host.overlay_available);
        assert_eq!(page.counts.get(Outcome::TreatedAsStandalonePopup), 1);
        assert!(page.html.contains(r#"data-lightbox="overlay""#));
        assert!(page.html.contains(r#"<script id="autolightbox-magnific-init">"#));
    }

    #[test]
    fn test_process_html_without_library() {
        let engine = LinkEngine::new(&LightboxConfig::default()).unwrap();
        let page = process_html(PAGE, &engine, OverlayMode::Auto, None);

        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].outcome, Outcome::TreatedAsBuilderLightbox);
        assert!(page.html.contains("et_pb_lightbox_image"));
    }

    #[test]
    fn test_relative_to_roots() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let page = root.join("blog/post.html");

        assert_eq!(
            relative_to_roots(&page, &[root]),
            PathBuf::from("blog/post.html")
        );
        assert_eq!(
            relative_to_roots(Path::new("/elsewhere/index.html"), &[]),
            PathBuf::from("index.html")
        );
    }
}
