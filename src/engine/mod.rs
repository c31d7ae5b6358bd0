//! Link processing engine.
//!
//! One pass walks every link matched by the configured selectors below a
//! root node and classifies it. The first matching rule wins:
//!
//! ```text
//! href ──► navigable? ──► image extension? ──► inside gallery? ──► already marked?
//!            │ no             │ no                  │ yes              │ yes
//!            ▼                ▼                     ▼                  ▼
//!       skipped-non-image  skipped-non-image  skipped-gallery   skipped-already-handled
//!
//!   not marked ──► has <img>? ── yes ──► add native class       (builder-lightbox)
//!                      │ no
//!                      ├── overlay ──► bind popup + marker      (standalone-popup)
//!                      └── none ────► add native class         (builder-lightbox)
//! ```
//!
//! A pass that bound any popup then lets the overlay install its page-level
//! initializer.
//!
//! Both treatments leave a marker ([`NATIVE_LIGHTBOX_CLASS`] or
//! `data-lightbox="overlay"`), so a second pass over the same tree only
//! produces skips. The engine keeps no state between passes.

mod matcher;
mod outcome;
mod target;

pub use matcher::{BUILTIN_EXTENSIONS, ExtensionMatcher};
pub use outcome::{Outcome, ProcessCounts};
pub use target::LinkTarget;

use thiserror::Error;

use crate::config::LightboxConfig;
use crate::debug_if;
use crate::dom::{Document, NodeId, Selector, SelectorError};
use crate::host::{LIGHTBOX_ATTR, NATIVE_LIGHTBOX_CLASS, OVERLAY_MARKER, is_gallery_container};
use crate::overlay::{Overlay, PopupOptions};

/// Failure compiling a configuration into an engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("invalid image extension pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Classification of one link, as reported by [`LinkEngine::process_links`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    pub anchor: NodeId,
    pub href: String,
    pub outcome: Outcome,
}

/// A configuration compiled for repeated passes.
#[derive(Debug, Clone)]
pub struct LinkEngine {
    selector: Selector,
    matcher: ExtensionMatcher,
    options: PopupOptions,
    debug: bool,
}

impl LinkEngine {
    pub fn new(config: &LightboxConfig) -> Result<Self, EngineError> {
        let matcher = ExtensionMatcher::new(&config.image_extensions)?;
        debug_if!(config.debug, "engine"; "image extensions: {}", matcher.extensions().join(", "));

        Ok(Self {
            selector: config.selector()?,
            matcher,
            options: config.popup_options(),
            debug: config.debug,
        })
    }

    /// Run one pass and return outcome counts.
    pub fn process(
        &self,
        doc: &mut Document,
        root: NodeId,
        overlay: Option<&dyn Overlay>,
    ) -> ProcessCounts {
        let mut counts = ProcessCounts::default();
        for report in self.process_links(doc, root, overlay) {
            counts.record(report.outcome);
        }
        counts
    }

    /// Run one pass and return the outcome of every candidate link.
    ///
    /// Candidates are the `<a>` elements below `root` matched by the
    /// selector list, each visited once in document order.
    pub fn process_links(
        &self,
        doc: &mut Document,
        root: NodeId,
        overlay: Option<&dyn Overlay>,
    ) -> Vec<LinkReport> {
        let candidates: Vec<NodeId> = doc
            .select(root, &self.selector)
            .into_iter()
            .filter(|&id| doc.tag(id) == Some("a"))
            .collect();

        let mut reports = Vec::with_capacity(candidates.len());
        for anchor in candidates {
            let href = doc
                .get_attr(anchor, "href")
                .map(|h| h.trim().to_string())
                .unwrap_or_default();
            let outcome = self.handle(doc, anchor, &href, overlay);

            debug_if!(self.debug, "engine"; "{} {}", outcome.label(), display_href(&href));
            reports.push(LinkReport {
                anchor,
                href,
                outcome,
            });
        }

        if let Some(overlay) = overlay
            && reports
                .iter()
                .any(|r| r.outcome == Outcome::TreatedAsStandalonePopup)
        {
            overlay.install(doc);
        }
        reports
    }

    fn handle(
        &self,
        doc: &mut Document,
        anchor: NodeId,
        href: &str,
        overlay: Option<&dyn Overlay>,
    ) -> Outcome {
        let Some(path) = LinkTarget::parse(Some(href)).path() else {
            return Outcome::SkippedNonImage;
        };
        if !self.matcher.is_match(path) {
            return Outcome::SkippedNonImage;
        }
        if in_gallery(doc, anchor) {
            return Outcome::SkippedGalleryMember;
        }
        if is_handled(doc, anchor) {
            return Outcome::SkippedAlreadyHandled;
        }

        if has_image(doc, anchor) {
            doc.add_class(anchor, NATIVE_LIGHTBOX_CLASS);
            return Outcome::TreatedAsBuilderLightbox;
        }

        match overlay {
            Some(overlay) => {
                overlay.bind(doc, anchor, href, &self.options);
                doc.set_attr(anchor, LIGHTBOX_ATTR, OVERLAY_MARKER);
                Outcome::TreatedAsStandalonePopup
            }
            None => {
                doc.add_class(anchor, NATIVE_LIGHTBOX_CLASS);
                Outcome::TreatedAsBuilderLightbox
            }
        }
    }
}

/// Compile `config` and run a single pass.
pub fn process(
    doc: &mut Document,
    root: NodeId,
    config: &LightboxConfig,
    overlay: Option<&dyn Overlay>,
) -> Result<ProcessCounts, EngineError> {
    Ok(LinkEngine::new(config)?.process(doc, root, overlay))
}

// =============================================================================
// Predicates
// =============================================================================

/// The link itself or any ancestor is a gallery/slider container.
fn in_gallery(doc: &Document, anchor: NodeId) -> bool {
    std::iter::once(anchor)
        .chain(doc.ancestors(anchor))
        .any(|id| is_gallery_container(doc, id))
}

/// The link already carries the native class or a lightbox attribute.
fn is_handled(doc: &Document, anchor: NodeId) -> bool {
    doc.has_class(anchor, NATIVE_LIGHTBOX_CLASS) || doc.has_attr(anchor, LIGHTBOX_ATTR)
}

/// The link wraps an `<img>` at any depth.
fn has_image(doc: &Document, anchor: NodeId) -> bool {
    doc.descendants(anchor)
        .into_iter()
        .any(|id| doc.tag(id) == Some("img"))
}

fn display_href(href: &str) -> &str {
    if href.is_empty() { "(no href)" } else { href }
}

#[cfg(test)]
mod tests;
