//! Standalone popup binding for plain text links to image files.
//!
//! The engine never renders an overlay itself. It hands the link to an
//! [`Overlay`] implementation when one is available and falls back to the
//! framework's native lightbox class when it is not.

use serde::Serialize;

use crate::dom::{Document, NodeId};

/// Popup content type. Only images are bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupType {
    Image,
}

/// Image-specific popup options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub vertical_fit: bool,
}

/// Options object handed to the overlay library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    #[serde(rename = "type")]
    pub kind: PopupType,
    pub close_on_content_click: bool,
    pub image: ImageOptions,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            kind: PopupType::Image,
            close_on_content_click: true,
            image: ImageOptions { vertical_fit: true },
        }
    }
}

impl PopupOptions {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// An overlay library able to bind a click-driven popup to one link.
pub trait Overlay: Send + Sync {
    /// Library name for diagnostics.
    fn name(&self) -> &str;

    /// Bind the popup to `anchor`, opening `url`.
    fn bind(&self, doc: &mut Document, anchor: NodeId, url: &str, options: &PopupOptions);

    /// Make the bindings of a pass live. Runs after every pass that bound at
    /// least one link, so it must be idempotent.
    fn install(&self, _doc: &mut Document) {}
}

// =============================================================================
// Magnific Popup
// =============================================================================

/// Declarative Magnific Popup binding for rendered pages.
///
/// Writes the popup source and the JSON options onto the link, and appends
/// one initializer `<script>` to `<body>` that calls
/// `$(el).magnificPopup(options)` for every `[data-mfp-src]` element.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagnificOverlay;

pub const MFP_SRC_ATTR: &str = "data-mfp-src";
pub const MFP_OPTIONS_ATTR: &str = "data-mfp-options";
pub const MFP_INIT_ID: &str = "autolightbox-magnific-init";

const MFP_INIT_SCRIPT: &str = "jQuery(function ($) {\n\
    $('[data-mfp-src]').each(function () {\n\
        $(this).magnificPopup(JSON.parse(this.getAttribute('data-mfp-options')));\n\
    });\n\
});";

impl Overlay for MagnificOverlay {
    fn name(&self) -> &str {
        "magnific-popup"
    }

    fn bind(&self, doc: &mut Document, anchor: NodeId, url: &str, options: &PopupOptions) {
        doc.set_attr(anchor, MFP_SRC_ATTR, url);
        doc.set_attr(anchor, MFP_OPTIONS_ATTR, options.to_json());
    }

    fn install(&self, doc: &mut Document) {
        let installed = doc
            .descendants(doc.root())
            .into_iter()
            .any(|id| doc.get_attr(id, "id") == Some(MFP_INIT_ID));
        if installed {
            return;
        }

        let script = doc.create_element("script", [("id", MFP_INIT_ID)]);
        let code = doc.create_text(MFP_INIT_SCRIPT);
        doc.append_child(script, code);
        let body = doc.body();
        doc.append_child(body, script);
    }
}
