//! Live HTML document model.
//!
//! A `scraper` document whose `ego_tree` nodes are addressed by [`NodeId`].
//! The document plays the role of the browser DOM for the link engine:
//! elements are never owned by the engine, only annotated with classes and
//! attributes.
//!
//! # Architecture
//!
//! ```text
//! HTML ──parse──▶ Document ──render──▶ HTML
//!                    │
//!                    ├── select(root, &Selector)     query
//!                    ├── add_class / set_attr        marker writes
//!                    ├── append_child / remove_child host content swaps
//!                    ├── take_records()              mutation signal
//!                    └── reclaim()                   drop detached subtrees
//! ```
//!
//! Every structural, attribute or text change made through the public API
//! is queued as a [`MutationRecord`]. Building a document with [`parse`]
//! or [`Document::import`] does not produce records: nodes only become
//! observable once attached through `append_child`.

mod mutation;
mod parse;
mod render;
mod selector;

pub use ego_tree::NodeId;
pub use mutation::MutationRecord;
pub use parse::{parse, parse_fragment};
pub use render::{render, render_children, render_node};
pub use selector::{Selector, SelectorError};

use ego_tree::{NodeMut, NodeRef, Tree};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Mutable HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
    records: Vec<MutationRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Construction
// =============================================================================

impl Document {
    /// Empty document with only the root node.
    pub fn new() -> Self {
        Self::from_html(Html::new_document())
    }

    fn from_html(html: Html) -> Self {
        Self {
            html,
            records: Vec::new(),
        }
    }

    /// The document root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    /// Create a detached element.
    pub fn create_element<K, V>(&mut self, tag: &str, attrs: impl IntoIterator<Item = (K, V)>) -> NodeId
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attrs = attrs
            .into_iter()
            .map(|(k, v)| Attribute {
                name: attr_name(k.as_ref()),
                value: StrTendril::from_slice(v.as_ref()),
            })
            .collect();
        let element = Element::new(element_name(tag), attrs);
        self.html.tree.orphan(Node::Element(element)).id()
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let text: String = text.into();
        let node = Node::Text(Text { text: text.into() });
        self.html.tree.orphan(node).id()
    }

    /// Attach without recording (parser and import use this).
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if self.node(child).is_none() {
            return;
        }
        if let Some(mut parent) = self.html.tree.get_mut(parent) {
            parent.append_id(child);
        }
    }

    /// Copy the top-level nodes of `other` into this document, detached.
    ///
    /// Returns the new ids in source order, ready for `append_child`.
    pub fn import(&mut self, other: &Document) -> Vec<NodeId> {
        other
            .html
            .tree
            .root()
            .children()
            .map(|child| self.copy_subtree(child))
            .collect()
    }

    /// Deep-copy a node of another tree as a detached subtree.
    fn copy_subtree(&mut self, source: NodeRef<'_, Node>) -> NodeId {
        let copy = self.html.tree.orphan(source.value().clone()).id();
        for child in source.children() {
            let child_copy = self.copy_subtree(child);
            self.attach(copy, child_copy);
        }
        copy
    }
}

fn element_name(tag: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(tag.to_ascii_lowercase()),
    )
}

fn attr_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name.to_ascii_lowercase()))
}

// =============================================================================
// Tree Access
// =============================================================================

impl Document {
    #[inline]
    fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    /// Element payload, `None` for non-element nodes.
    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id)?.value().as_element()
    }

    /// Tag name of an element.
    #[inline]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.value().as_text().map(|t| &**t)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent().map(|p| p.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.children())
            .map(|c| c.id())
            .collect()
    }

    /// Ancestors from nearest to the root, `id` excluded.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.ancestors())
            .map(|a| a.id())
    }

    /// All descendants of `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.descendants().skip(1))
            .map(|d| d.id())
            .collect()
    }

    /// True when `id` is attached below the root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let root = self.root();
        id == root || self.ancestors(id).any(|a| a == root)
    }

    /// The `<body>` element, or the root when the page has none.
    pub fn body(&self) -> NodeId {
        self.descendants(self.root())
            .into_iter()
            .find(|&id| self.tag(id) == Some("body"))
            .unwrap_or_else(|| self.root())
    }

    /// Elements below `root` matching `selector`, in document order.
    ///
    /// Each element appears once even when several selectors of the list
    /// match it.
    pub fn select(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.node(root)
            .into_iter()
            .flat_map(|n| n.descendants().skip(1))
            .filter_map(ElementRef::wrap)
            .filter(|e| selector.matches(e))
            .map(|e| e.id())
            .collect()
    }

    /// First element in the document matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| selector.matches(e))
            .map(|e| e.id())
    }
}

// =============================================================================
// Attributes & Classes
// =============================================================================

impl Document {
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    #[inline]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.get_attr(id, name).is_some()
    }

    /// Set an attribute. Returns `false` (and records nothing) when the
    /// value is unchanged or `id` is not an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(element) = self.element(id) else {
            return false;
        };
        if element.attr(name) == Some(value.as_str()) {
            return false;
        }

        let key = attr_name(name);
        let mut attrs: Vec<Attribute> = element
            .attrs
            .iter()
            .map(|(k, v)| Attribute {
                name: k.clone(),
                value: StrTendril::from_slice(v),
            })
            .collect();
        match attrs.iter_mut().find(|a| a.name == key) {
            Some(existing) => existing.value = StrTendril::from(value),
            None => attrs.push(Attribute {
                name: key,
                value: StrTendril::from(value),
            }),
        }

        // Rebuilt rather than edited in place: scraper caches id and classes.
        let rebuilt = Element::new(element.name.clone(), attrs);
        if let Some(mut node) = self.html.tree.get_mut(id) {
            *node.value() = Node::Element(rebuilt);
        }

        self.records.push(MutationRecord::Attribute {
            target: id,
            name: name.to_ascii_lowercase(),
        });
        true
    }

    /// Whitespace-separated classes of an element.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.get_attr(id, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    #[inline]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// Add a class unless already present. Returns `true` if added.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        if !self.is_element(id) || self.has_class(id, class) {
            return false;
        }

        let value = match self.get_attr(id, "class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", value)
    }
}

// =============================================================================
// Structural Mutation
// =============================================================================

impl Document {
    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // An element cannot move below itself.
        if self.ancestors(parent).any(|a| a == child) {
            return;
        }
        if let Some(old) = self.parent(child) {
            self.remove_child(old, child);
        }

        self.attach(parent, child);
        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Detach `child` from `parent`. Returns `false` if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);

        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: Vec::new(),
            removed: vec![child],
        });
        true
    }

    /// Replace all children of `parent` with `new_children` as one record.
    pub fn replace_children(&mut self, parent: NodeId, new_children: Vec<NodeId>) {
        let removed = self.children(parent);
        for &old in &removed {
            self.detach(old);
        }

        for &child in &new_children {
            if let Some(old_parent) = self.parent(child) {
                self.remove_child(old_parent, child);
            }
            self.attach(parent, child);
        }

        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: new_children,
            removed,
        });
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let text: String = text.into();
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        let Node::Text(existing) = node.value() else {
            return false;
        };
        existing.text = text.into();
        self.records.push(MutationRecord::CharacterData { target: id });
        true
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Drain queued mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    /// Number of queued mutation records.
    #[cfg(test)]
    pub fn pending_records(&self) -> usize {
        self.records.len()
    }
}

// =============================================================================
// Reclamation
// =============================================================================

impl Document {
    /// Drop detached subtrees once they outnumber the attached nodes.
    ///
    /// The tree never frees a detached node by itself, so every content
    /// swap leaves the old subtree behind. Compaction copies the attached
    /// tree into a fresh one: every [`NodeId`] obtained before a compaction
    /// is invalid afterwards, so it only runs with no queued records.
    /// Returns the number of nodes dropped.
    pub fn reclaim(&mut self) -> usize {
        if !self.records.is_empty() {
            return 0;
        }

        let total = self.html.tree.nodes().count();
        let root = self.html.tree.root();
        let live = root.descendants().count();
        if total - live <= live {
            return 0;
        }

        let mut tree = Tree::with_capacity(root.value().clone(), live);
        copy_children(root, tree.root_mut());
        self.html.tree = tree;
        total - live
    }

    /// Nodes held by the tree, attached or not.
    #[cfg(test)]
    pub fn arena_len(&self) -> usize {
        self.html.tree.nodes().count()
    }
}

fn copy_children(source: NodeRef<'_, Node>, mut target: NodeMut<'_, Node>) {
    for child in source.children() {
        let copy = target.append(child.value().clone());
        copy_children(child, copy);
    }
}
