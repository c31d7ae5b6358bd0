//! Host framework (Divi) contract.
//!
//! The complete coupling surface to the page builder: class names, the
//! marker attribute, lifecycle event names and the page-level flags read
//! once at startup.

use crate::dom::{Document, NodeId};

/// Class the framework runtime binds its own lightbox to.
pub const NATIVE_LIGHTBOX_CLASS: &str = "et_pb_lightbox_image";

/// Containers whose lightbox wiring belongs to the framework.
pub const GALLERY_CLASSES: &[&str] = &["et_pb_gallery", "et_pb_gallery_image", "et_pb_slider"];

/// Attribute marking a link as already handled by some lightbox.
pub const LIGHTBOX_ATTR: &str = "data-lightbox";

/// Value written to [`LIGHTBOX_ATTR`] when a standalone popup is bound.
pub const OVERLAY_MARKER: &str = "overlay";

/// Fired after the framework finishes an asynchronous content swap.
pub const CONTENT_LOADED_EVENT: &str = "et_pb_after_init_modules";

/// Fired by the visual builder when a module or section is re-rendered.
pub const BUILDER_UPDATE_EVENTS: &[&str] = &["et_fb_module_updated", "et_fb_section_updated"];

/// Body classes set once the framework runtime is on the page.
const RUNTIME_BODY_CLASSES: &[&str] = &["et_divi_theme", "et-db"];

/// Script element id of the framework's front-end bundle.
const RUNTIME_SCRIPT_ID: &str = "divi-custom-script-js";

/// Body class present while the visual builder preview is active.
const BUILDER_PREVIEW_CLASS: &str = "et-fb";

/// Substring identifying the overlay library's script tag.
const OVERLAY_SCRIPT_HINT: &str = "magnific";

/// Lifecycle signals the observer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// [`CONTENT_LOADED_EVENT`]
    ContentLoaded,
    /// One of [`BUILDER_UPDATE_EVENTS`]
    BuilderUpdate,
}

impl Lifecycle {
    /// Map a custom event name to a known lifecycle signal.
    pub fn from_event(name: &str) -> Option<Self> {
        if name == CONTENT_LOADED_EVENT {
            Some(Self::ContentLoaded)
        } else if BUILDER_UPDATE_EVENTS.contains(&name) {
            Some(Self::BuilderUpdate)
        } else {
            None
        }
    }
}

/// Page-level facts about the host, read once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostContext {
    /// Framework runtime already initialized when the script starts.
    pub runtime_ready: bool,
    /// Page is rendered inside the visual builder preview.
    pub builder_preview: bool,
    /// Overlay library present on the page.
    pub overlay_available: bool,
}

impl HostContext {
    /// Derive host flags from the page markup.
    pub fn detect(doc: &Document) -> Self {
        let body = doc.body();
        let body_has = |class: &str| doc.tag(body) == Some("body") && doc.has_class(body, class);

        let mut runtime_script = false;
        let mut overlay_script = false;
        for id in doc.descendants(doc.root()) {
            if doc.tag(id) != Some("script") {
                continue;
            }
            let script_id = doc.get_attr(id, "id").unwrap_or_default();
            let src = doc.get_attr(id, "src").unwrap_or_default();

            runtime_script |= script_id == RUNTIME_SCRIPT_ID;
            overlay_script |= [script_id, src]
                .iter()
                .any(|s| s.to_ascii_lowercase().contains(OVERLAY_SCRIPT_HINT));
        }

        Self {
            runtime_ready: runtime_script || RUNTIME_BODY_CLASSES.iter().any(|c| body_has(*c)),
            builder_preview: body_has(BUILDER_PREVIEW_CLASS),
            overlay_available: overlay_script,
        }
    }
}

/// Check whether a node is a framework gallery/slider container.
pub fn is_gallery_container(doc: &Document, id: NodeId) -> bool {
    doc.is_element(id) && GALLERY_CLASSES.iter().any(|class| doc.has_class(id, class))
}
