//! Re-scan triggers and mutation filtering.

use std::fmt;

use crate::dom::{Document, MutationRecord, NodeId};

/// Why a processing pass was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// First pass after startup
    Startup,
    /// Nodes containing links were added to the body
    Mutation,
    /// Host finished an asynchronous content swap
    ContentLoaded,
    /// Builder preview re-rendered a module or section
    BuilderUpdate,
}

impl Trigger {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Mutation => "mutation",
            Self::ContentLoaded => "content-loaded",
            Self::BuilderUpdate => "builder-update",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Check whether any record added an `<a>` or an element containing one.
///
/// Attribute, text and removal-only records never qualify. Added nodes that
/// have since been detached again are ignored.
pub fn mutation_adds_anchor(doc: &Document, records: &[MutationRecord]) -> bool {
    records
        .iter()
        .flat_map(MutationRecord::added_nodes)
        .any(|&id| doc.is_connected(id) && contains_anchor(doc, id))
}

fn contains_anchor(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == Some("a")
        || doc
            .descendants(id)
            .into_iter()
            .any(|child| doc.tag(child) == Some("a"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_doc() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.create_element("body", Vec::<(String, String)>::new());
        let root = doc.root();
        doc.append_child(root, body);
        doc.take_records();
        (doc, body)
    }

    #[test]
    fn test_added_anchor_qualifies() {
        let (mut doc, body) = body_doc();
        let a = doc.create_element("a", [("href", "/x.jpg")]);
        doc.append_child(body, a);

        let records = doc.take_records();
        assert!(mutation_adds_anchor(&doc, &records));
    }

    #[test]
    fn test_added_wrapper_with_anchor_qualifies() {
        let (mut doc, body) = body_doc();
        let div = doc.create_element("div", Vec::<(String, String)>::new());
        let a = doc.create_element("a", [("href", "/x.jpg")]);
        doc.append_child(div, a);
        doc.take_records();

        doc.append_child(body, div);
        let records = doc.take_records();
        assert!(mutation_adds_anchor(&doc, &records));
    }

    #[test]
    fn test_other_mutations_ignored() {
        let (mut doc, body) = body_doc();
        let p = doc.create_element("p", Vec::<(String, String)>::new());
        let text = doc.create_text("hello");
        doc.append_child(p, text);
        doc.append_child(body, p);
        doc.set_attr(body, "class", "x");
        doc.set_text(text, "bye");
        doc.remove_child(body, p);

        let records = doc.take_records();
        assert!(!records.is_empty());
        assert!(!mutation_adds_anchor(&doc, &records));
    }

    #[test]
    fn test_detached_again_ignored() {
        let (mut doc, body) = body_doc();
        let a = doc.create_element("a", [("href", "/x.jpg")]);
        doc.append_child(body, a);
        doc.remove_child(body, a);

        let records = doc.take_records();
        assert!(!mutation_adds_anchor(&doc, &records));
    }
}
