//! Actor Message Definitions
//!
//! ```text
//! FsActor --Edit/Lifecycle--> PageActor --PassReport--> watch loop
//! ```

use tokio::sync::oneshot;

use super::page::Trigger;
use crate::engine::ProcessCounts;

// =============================================================================
// PageActor Messages
// =============================================================================

/// Messages to the Page Actor
#[derive(Debug)]
pub enum PageMsg {
    /// Host changed the document (async content swap, builder edit)
    Edit(DomEdit),
    /// The page finished loading
    LoadComplete,
    /// A custom lifecycle event fired by the host framework
    Lifecycle(String),
    /// Render the current document
    Snapshot(oneshot::Sender<String>),
    /// Shutdown
    Shutdown,
}

/// A content change applied by the host.
///
/// `target` is a CSS selector; the first match is edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEdit {
    /// Parse `html` and append it to the target
    Append { target: String, html: String },
    /// Parse `html` and replace the target's children with it
    Replace { target: String, html: String },
    /// Set one attribute on the target
    SetAttribute {
        target: String,
        name: String,
        value: String,
    },
    /// Detach the target from its parent
    Remove { target: String },
}

impl DomEdit {
    pub fn target(&self) -> &str {
        match self {
            Self::Append { target, .. }
            | Self::Replace { target, .. }
            | Self::SetAttribute { target, .. }
            | Self::Remove { target } => target,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Append { .. } => "append",
            Self::Replace { .. } => "replace",
            Self::SetAttribute { .. } => "set-attribute",
            Self::Remove { .. } => "remove",
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Published after every completed processing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based pass number
    pub pass: usize,
    /// First trigger that scheduled this pass
    pub trigger: Trigger,
    pub counts: ProcessCounts,
}
