//! `[observer]` and `[overlay]` sections.
//!
//! ```toml
//! [observer]
//! debounce_ms = 300   # delay before a triggered re-scan runs
//! settle_ms = 500     # wait after page load when the runtime is not ready yet
//!
//! [overlay]
//! mode = "auto"       # auto | always | never
//! close_on_content_click = true
//! vertical_fit = true
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::overlay::{ImageOptions, PopupOptions, PopupType};

/// Change observer timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Re-scan window after the first trigger, in milliseconds.
    pub debounce_ms: u64,
    /// Delay after the load signal before the first pass, in milliseconds.
    pub settle_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            settle_ms: 500,
        }
    }
}

impl ObserverConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// When to bind the standalone overlay to plain text links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayMode {
    /// Only when the page ships the overlay library.
    #[default]
    Auto,
    Always,
    /// Always fall back to the native lightbox class.
    Never,
}

impl OverlayMode {
    /// Resolve availability against what the page provides.
    pub fn is_available(self, page_has_library: bool) -> bool {
        match self {
            Self::Auto => page_has_library,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Standalone overlay settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub mode: OverlayMode,
    pub close_on_content_click: bool,
    pub vertical_fit: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            mode: OverlayMode::Auto,
            close_on_content_click: true,
            vertical_fit: true,
        }
    }
}

impl OverlayConfig {
    pub fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            kind: PopupType::Image,
            close_on_content_click: self.close_on_content_click,
            image: ImageOptions {
                vertical_fit: self.vertical_fit,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_mode_resolution() {
        assert!(OverlayMode::Auto.is_available(true));
        assert!(!OverlayMode::Auto.is_available(false));
        assert!(OverlayMode::Always.is_available(false));
        assert!(!OverlayMode::Never.is_available(true));
    }

    #[test]
    fn test_popup_options_from_config() {
        let config = OverlayConfig {
            vertical_fit: false,
            ..OverlayConfig::default()
        };
        let options = config.popup_options();
        assert!(options.close_on_content_click);
        assert!(!options.image.vertical_fit);
    }

    #[test]
    fn test_observer_durations() {
        let config = ObserverConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.settle(), Duration::from_millis(500));
    }
}
