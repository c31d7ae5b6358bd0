//! [`Document`] → HTML serialization through `scraper`'s html5ever serializer.

use scraper::ElementRef;

use super::{Document, NodeId};

/// Render the whole document.
pub fn render(doc: &Document) -> String {
    doc.html.html()
}

/// Outer HTML of an element. Other nodes render as an empty string.
pub fn render_node(doc: &Document, id: NodeId) -> String {
    element_ref(doc, id).map(|e| e.html()).unwrap_or_default()
}

/// Inner HTML of an element.
pub fn render_children(doc: &Document, id: NodeId) -> String {
    element_ref(doc, id).map(|e| e.inner_html()).unwrap_or_default()
}

fn element_ref(doc: &Document, id: NodeId) -> Option<ElementRef<'_>> {
    doc.node(id).and_then(ElementRef::wrap)
}
