use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::config::test_parse_config;
use crate::dom::{self, render};
use crate::overlay::{MFP_SRC_ATTR, MagnificOverlay};

fn page(content: &str) -> Document {
    dom::parse(&format!(
        r#"<html><body><div class="entry-content">{content}</div></body></html>"#
    ))
}

fn engine() -> LinkEngine {
    LinkEngine::new(&LightboxConfig::default()).unwrap()
}

fn first_anchor(doc: &Document) -> NodeId {
    doc.descendants(doc.root())
        .into_iter()
        .find(|&id| doc.tag(id) == Some("a"))
        .unwrap()
}

/// Overlay that counts bindings.
#[derive(Default)]
struct CountingOverlay {
    binds: AtomicUsize,
}

impl Overlay for CountingOverlay {
    fn name(&self) -> &str {
        "counting"
    }

    fn bind(&self, doc: &mut Document, anchor: NodeId, url: &str, _options: &PopupOptions) {
        self.binds.fetch_add(1, Ordering::SeqCst);
        doc.set_attr(anchor, "data-bound", url);
    }
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_image_child_gets_native_class() {
    let mut doc = page(r#"<a href="/big.jpg"><img src="/thumb.jpg"></a>"#);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));

    assert_eq!(counts.get(Outcome::TreatedAsBuilderLightbox), 1);
    let a = first_anchor(&doc);
    assert!(doc.has_class(a, NATIVE_LIGHTBOX_CLASS));
    assert!(!doc.has_attr(a, MFP_SRC_ATTR));
}

#[test]
fn test_nested_image_counts_as_image_child() {
    let mut doc = page(r#"<a href="/big.png"><span><img src="/t.png"></span></a>"#);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));
    assert_eq!(counts.get(Outcome::TreatedAsBuilderLightbox), 1);
}

#[test]
fn test_text_link_binds_overlay_when_available() {
    let mut doc = page(r#"<a href="/photo.webp?v=1">see photo</a>"#);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));

    assert_eq!(counts.get(Outcome::TreatedAsStandalonePopup), 1);
    let a = first_anchor(&doc);
    assert_eq!(doc.get_attr(a, LIGHTBOX_ATTR), Some(OVERLAY_MARKER));
    assert_eq!(doc.get_attr(a, MFP_SRC_ATTR), Some("/photo.webp?v=1"));
    assert!(!doc.has_class(a, NATIVE_LIGHTBOX_CLASS));
}

#[test]
fn test_text_link_falls_back_without_overlay() {
    let mut doc = page(r#"<a href="/photo.gif">see photo</a>"#);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, None);

    assert_eq!(counts.get(Outcome::TreatedAsBuilderLightbox), 1);
    let a = first_anchor(&doc);
    assert!(doc.has_class(a, NATIVE_LIGHTBOX_CLASS));
    assert!(!doc.has_attr(a, LIGHTBOX_ATTR));
}

#[test]
fn test_extension_match_ignores_case_query_and_fragment() {
    let config = test_parse_config("image_extensions = [\"jpg\"]");
    let engine = LinkEngine::new(&config).unwrap();
    let mut doc = page(r#"<a href="/a/photo.JPG?ver=2#x">photo</a>"#);

    let body = doc.body();
    let counts = engine.process(&mut doc, body, None);
    assert_eq!(counts.treated(), 1);
}

#[test]
fn test_non_image_and_non_navigable_skipped() {
    let mut doc = page(
        r##"<a href="mailto:x@y.com">mail</a>
            <a href="#section">jump</a>
            <a href="tel:123">call</a>
            <a>nothing</a>
            <a href="/about.html">about</a>
            <a href="/photo.jpg/edit">edit</a>"##,
    );
    let before = render(&doc);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));

    assert_eq!(counts.total(), 6);
    assert_eq!(counts.get(Outcome::SkippedNonImage), 6);
    assert_eq!(render(&doc), before);
}

#[test]
fn test_gallery_members_never_marked() {
    let mut doc = page(
        r#"<div class="et_pb_gallery"><div class="et_pb_gallery_item">
             <a href="/one.jpg"><img src="/one-thumb.jpg"></a>
           </div></div>
           <div class="et_pb_slider"><a href="/two.png">two</a></div>
           <a class="et_pb_gallery_image" href="/three.png">three</a>"#,
    );
    let before = render(&doc);
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));

    assert_eq!(counts.get(Outcome::SkippedGalleryMember), 3);
    assert_eq!(render(&doc), before);
}

#[test]
fn test_already_handled_skipped() {
    let mut doc = page(
        r#"<a class="et_pb_lightbox_image" href="/a.jpg">a</a>
           <a data-lightbox="set" href="/b.jpg">b</a>"#,
    );
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));
    assert_eq!(counts.get(Outcome::SkippedAlreadyHandled), 2);
}

#[test]
fn test_outside_selectors_untouched() {
    let mut doc = dom::parse(
        r#"<html><body><header><a href="/logo.png">logo</a></header>
           <div class="entry-content"><a href="/in.png">in</a></div></body></html>"#,
    );
    let body = doc.body();
    let counts = engine().process(&mut doc, body, None);

    assert_eq!(counts.total(), 1);
    let header_link = first_anchor(&doc);
    assert!(!doc.has_class(header_link, NATIVE_LIGHTBOX_CLASS));
}

#[test]
fn test_overlapping_selectors_visit_once() {
    let mut doc = dom::parse(
        r#"<html><body><div class="et_pb_module"><div class="et_pb_text_inner">
           <a href="/x.png">x</a></div></div></body></html>"#,
    );
    let overlay = CountingOverlay::default();
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&overlay));

    assert_eq!(counts.total(), 1);
    assert_eq!(overlay.binds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_root_does_nothing() {
    let mut doc = dom::parse("<html><body></body></html>");
    let body = doc.body();
    let counts = engine().process(&mut doc, body, Some(&MagnificOverlay));
    assert!(counts.is_empty());
    assert_eq!(doc.pending_records(), 0);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_second_pass_is_all_skips() {
    let mut doc = page(
        r#"<a href="/a.jpg"><img src="/a-thumb.jpg"></a>
           <a href="/b.png">b</a>
           <a href="/c.html">c</a>"#,
    );
    let overlay = CountingOverlay::default();
    let engine = engine();

    let body = doc.body();
    let first = engine.process(&mut doc, body, Some(&overlay));
    assert_eq!(first.treated(), 2);
    let after_first = render(&doc);
    doc.take_records();

    let second = engine.process(&mut doc, body, Some(&overlay));
    assert_eq!(second.treated(), 0);
    assert_eq!(second.get(Outcome::SkippedAlreadyHandled), 2);
    assert_eq!(render(&doc), after_first);
    assert_eq!(doc.pending_records(), 0);
    assert_eq!(overlay.binds.load(Ordering::SeqCst), 1);
}

#[test]
fn test_native_class_not_duplicated() {
    let mut doc = page(r#"<a class="x" href="/a.jpg"><img src="/t.jpg"></a>"#);
    let engine = engine();
    let body = doc.body();
    engine.process(&mut doc, body, None);
    engine.process(&mut doc, body, None);

    let a = first_anchor(&doc);
    assert_eq!(doc.get_attr(a, "class"), Some("x et_pb_lightbox_image"));
}

#[test]
fn test_later_gallery_wrapping_keeps_marker() {
    let mut doc = page(r#"<a href="/a.jpg">a</a>"#);
    let engine = engine();
    let body = doc.body();
    engine.process(&mut doc, body, None);

    let a = first_anchor(&doc);
    let content = doc.parent(a).unwrap();
    let gallery = doc.create_element("div", [("class", "et_pb_gallery")]);
    doc.append_child(content, gallery);
    doc.append_child(gallery, a);

    let counts = engine.process(&mut doc, body, None);
    assert_eq!(counts.get(Outcome::SkippedGalleryMember), 1);
    assert!(doc.has_class(a, NATIVE_LIGHTBOX_CLASS));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_custom_extension_list() {
    let config = test_parse_config("image_extensions = [\"avif\"]");
    let engine = LinkEngine::new(&config).unwrap();
    let mut doc = page(r#"<a href="/a.avif">a</a><a href="/b.tiff">b</a>"#);

    let body = doc.body();
    let reports = engine.process_links(&mut doc, body, None);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].outcome, Outcome::TreatedAsBuilderLightbox);
    assert_eq!(reports[1].outcome, Outcome::SkippedNonImage);
    assert_eq!(reports[1].href, "/b.tiff");
}

// =============================================================================
// Overlay initializer
// =============================================================================

#[test]
fn test_overlay_initializer_added_once_across_passes() {
    let mut doc = page(r#"<a href="/a.jpg">a</a>"#);
    let engine = engine();
    let body = doc.body();
    engine.process(&mut doc, body, Some(&MagnificOverlay));

    let content = doc.parent(first_anchor(&doc)).unwrap();
    let late = doc.create_element("a", [("href", "/late.png")]);
    doc.append_child(content, late);
    let counts = engine.process(&mut doc, body, Some(&MagnificOverlay));

    assert_eq!(counts.get(Outcome::TreatedAsStandalonePopup), 1);
    assert_eq!(render(&doc).matches("magnificPopup(").count(), 1);
}

#[test]
fn test_overlay_initializer_needs_a_binding() {
    let mut doc = page(r#"<a href="/a.jpg"><img src="/t.jpg"></a>"#);
    let body = doc.body();
    engine().process(&mut doc, body, Some(&MagnificOverlay));
    assert!(!render(&doc).contains("<script"));
}

#[test]
fn test_custom_selectors() {
    let config = test_parse_config("selectors = [\"article > a\"]");
    let mut doc = dom::parse(
        r#"<html><body><article><a href="/a.jpg">a</a><p><a href="/b.jpg">b</a></p></article></body></html>"#,
    );

    let root = doc.root();
    let counts = process(&mut doc, root, &config, None).unwrap();
    assert_eq!(counts.total(), 1);
}

#[test]
fn test_non_anchor_matches_ignored() {
    let config = test_parse_config("selectors = [\".entry-content\", \".entry-content a\"]");
    let mut doc = page(r#"<a href="/a.jpg">a</a>"#);

    let body = doc.body();
    let counts = process(&mut doc, body, &config, None).unwrap();
    assert_eq!(counts.total(), 1);
}
