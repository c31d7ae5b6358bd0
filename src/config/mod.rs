//! Lightbox configuration.
//!
//! Read once at startup and immutable for the lifetime of a page. Two
//! sources are accepted:
//!
//! | Source          | Shape                                                   |
//! |-----------------|---------------------------------------------------------|
//! | `lightbox.toml` | snake_case keys, `[observer]` and `[overlay]` sections  |
//! | `--data FILE`   | the page data object: `{selectors, imageExtensions, debug}` |
//!
//! ```toml
//! debug = false
//! selectors = [".entry-content a", ".et_pb_module a"]
//! image_extensions = ["jpg", "jpeg", "png", "webp"]
//! ```
//!
//! A missing source is not an error: [`LightboxConfig::load`] returns
//! `Ok(None)` and the caller skips processing entirely.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ObserverConfig, OverlayConfig, OverlayMode};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dom::{Selector, SelectorError};
use crate::log;
use crate::overlay::PopupOptions;
use crate::utils::fs::expand_tilde;
use util::find_config_file;

/// Default file name searched upward from the working directory.
pub const CONFIG_FILE: &str = "lightbox.toml";

/// Where candidate links are searched for by default.
pub const DEFAULT_SELECTORS: &[&str] = &[
    ".entry-content a",
    ".et_pb_post_content a",
    ".et_pb_text_inner a",
    ".et_pb_blurb_content a",
    ".et_pb_module a",
];

/// Recognized image file extensions by default.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png", "webp", "bmp", "svg"];

// ============================================================================
// LightboxConfig
// ============================================================================

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxConfig {
    /// CSS selectors locating candidate links, in priority order.
    pub selectors: Vec<String>,

    /// Image file extensions (without dot).
    #[serde(alias = "imageExtensions")]
    pub image_extensions: Vec<String>,

    /// Emit one diagnostic line per classified link.
    pub debug: bool,

    pub observer: ObserverConfig,

    pub overlay: OverlayConfig,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            selectors: DEFAULT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            debug: false,
            observer: ObserverConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

/// A located configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Toml(PathBuf),
    Json(PathBuf),
}

impl ConfigSource {
    /// Pick the source: an explicit data file wins over the TOML config,
    /// which is searched upward from the working directory.
    pub fn resolve(config: &Path, data: Option<&Path>) -> Option<Self> {
        if let Some(data) = data {
            return Some(Self::Json(expand_tilde(data)));
        }
        find_config_file(&expand_tilde(config)).map(Self::Toml)
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Toml(path) | Self::Json(path) => path,
        }
    }
}

impl LightboxConfig {
    /// Load and validate configuration.
    ///
    /// Returns `Ok(None)` when there is no source or the file does not exist.
    pub fn load(source: Option<&ConfigSource>) -> Result<Option<Self>, ConfigError> {
        let Some(source) = source else {
            return Ok(None);
        };

        let path = source.path();
        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = match source {
            ConfigSource::Toml(_) => Self::parse_toml(&content)?,
            ConfigSource::Json(_) => Self::parse_json(&content)?,
        };

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.validate().map(Some)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_toml(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Parse the JSON page data object, collecting any unknown fields.
    pub fn parse_json(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let mut deserializer = serde_json::Deserializer::from_str(content);
        let config = serde_ignored::deserialize(&mut deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        deserializer.end()?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Normalize extensions and check that selectors parse.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let mut extensions: Vec<String> = Vec::with_capacity(self.image_extensions.len());
        for raw in &self.image_extensions {
            let ext = raw.trim().trim_start_matches('.').to_ascii_lowercase();
            if ext.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "image_extensions: `{raw}` is not a file extension"
                )));
            }
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        self.image_extensions = extensions;

        if self.selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "selectors: at least one selector is required".to_string(),
            ));
        }
        self.selector()?;

        Ok(self)
    }

    /// All configured selectors compiled into one selector list.
    pub fn selector(&self) -> Result<Selector, SelectorError> {
        Selector::parse_all(&self.selectors)
    }

    pub fn popup_options(&self) -> PopupOptions {
        self.overlay.popup_options()
    }
}

/// Parse a TOML config for tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> LightboxConfig {
    let (parsed, ignored) = LightboxConfig::parse_toml(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.validate().unwrap()
}

// ============================================================================
// tests
// ============================================================================
