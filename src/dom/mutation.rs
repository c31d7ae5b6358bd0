//! Mutation records queued by [`Document`](super::Document).

use super::NodeId;

/// One observed change, in the shape of a browser `MutationRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationRecord {
    /// Children added to and/or removed from `target`.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    /// Attribute `name` written on `target`.
    Attribute { target: NodeId, name: String },
    /// Text node content replaced.
    CharacterData { target: NodeId },
}

impl MutationRecord {
    /// Nodes added by this record (empty for non-structural records).
    pub fn added_nodes(&self) -> &[NodeId] {
        match self {
            Self::ChildList { added, .. } => added,
            _ => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ChildList { .. } => "childList",
            Self::Attribute { .. } => "attributes",
            Self::CharacterData { .. } => "characterData",
        }
    }
}
