//! Applying host edits to the live document.

use thiserror::Error;

use crate::actor::messages::DomEdit;
use crate::dom::{self, Document, Selector, SelectorError};

#[derive(Debug, Error)]
pub enum EditError {
    #[error("bad edit target: {0}")]
    Selector(#[from] SelectorError),

    #[error("no element matches `{0}`")]
    NoMatch(String),

    #[error("cannot remove the document root")]
    RootRemoval,
}

/// Apply one edit. Mutation records are left queued on the document.
pub(super) fn apply_edit(doc: &mut Document, edit: &DomEdit) -> Result<(), EditError> {
    let selector = Selector::parse(edit.target())?;
    let target = doc
        .select_first(&selector)
        .ok_or_else(|| EditError::NoMatch(edit.target().to_string()))?;

    match edit {
        DomEdit::Append { html, .. } => {
            let fragment = dom::parse_fragment(html);
            for node in doc.import(&fragment) {
                doc.append_child(target, node);
            }
        }
        DomEdit::Replace { html, .. } => {
            let fragment = dom::parse_fragment(html);
            let nodes = doc.import(&fragment);
            doc.replace_children(target, nodes);
        }
        DomEdit::SetAttribute { name, value, .. } => {
            doc.set_attr(target, name, value.as_str());
        }
        DomEdit::Remove { .. } => {
            let parent = doc.parent(target).ok_or(EditError::RootRemoval)?;
            doc.remove_child(parent, target);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MutationRecord, render_node};

    fn doc() -> Document {
        let mut doc = dom::parse(r#"<html><body><div id="main"><p>old</p></div></body></html>"#);
        doc.take_records();
        doc
    }

    #[test]
    fn test_append_records_child_list() {
        let mut doc = doc();
        let edit = DomEdit::Append {
            target: "#main".into(),
            html: r#"<a href="/a.jpg">a</a>"#.into(),
        };
        apply_edit(&mut doc, &edit).unwrap();

        let records = doc.take_records();
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0], MutationRecord::ChildList { .. }));
        let main = doc.select_first(&Selector::parse("#main").unwrap()).unwrap();
        assert_eq!(
            render_node(&doc, main),
            r#"<div id="main"><p>old</p><a href="/a.jpg">a</a></div>"#
        );
    }

    #[test]
    fn test_replace_swaps_children() {
        let mut doc = doc();
        let edit = DomEdit::Replace {
            target: "#main".into(),
            html: "<span>new</span>".into(),
        };
        apply_edit(&mut doc, &edit).unwrap();

        let main = doc.select_first(&Selector::parse("#main").unwrap()).unwrap();
        assert_eq!(render_node(&doc, main), r#"<div id="main"><span>new</span></div>"#);
    }

    #[test]
    fn test_set_attribute_and_remove() {
        let mut doc = doc();
        apply_edit(
            &mut doc,
            &DomEdit::SetAttribute {
                target: "#main".into(),
                name: "class".into(),
                value: "swapped".into(),
            },
        )
        .unwrap();
        assert!(doc.select_first(&Selector::parse(".swapped").unwrap()).is_some());

        apply_edit(&mut doc, &DomEdit::Remove { target: "p".into() }).unwrap();
        assert!(doc.select_first(&Selector::parse("p").unwrap()).is_none());
    }

    #[test]
    fn test_missing_target() {
        let mut doc = doc();
        let err = apply_edit(&mut doc, &DomEdit::Remove { target: "#nope".into() }).unwrap_err();
        assert!(matches!(err, EditError::NoMatch(_)));
    }
}
