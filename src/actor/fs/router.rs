use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::types::ChangeKind;
use crate::actor::messages::{DomEdit, PageMsg};
use crate::dom;
use crate::host::CONTENT_LOADED_EVENT;
use crate::log;

/// Convert debounced changes of the watched page into page messages.
///
/// A new version of the page is delivered the way the host framework swaps
/// content: the `<body>` children are replaced, then the content-loaded
/// event fires.
pub(super) fn changes_to_messages(
    changes: &FxHashMap<PathBuf, ChangeKind>,
    page: &Path,
) -> Vec<PageMsg> {
    for (path, kind) in changes {
        crate::debug!("watch"; "{}: {}", kind.label(), path.display());
    }

    let Some(&kind) = changes.get(page) else {
        return Vec::new();
    };
    if !kind.has_content() {
        log!("watch"; "{} was removed, keeping last version", page.display());
        return Vec::new();
    }

    let html = match fs::read_to_string(page) {
        Ok(content) => content,
        Err(e) => {
            log!("watch"; "failed to read {}: {}", page.display(), e);
            return Vec::new();
        }
    };

    vec![
        PageMsg::Edit(DomEdit::Replace {
            target: "body".to_string(),
            html: body_html(&html),
        }),
        PageMsg::Lifecycle(CONTENT_LOADED_EVENT.to_string()),
    ]
}

/// Inner HTML of the page's `<body>`.
pub(super) fn body_html(html: &str) -> String {
    let doc = dom::parse(html);
    dom::render_children(&doc, doc.body())
}
