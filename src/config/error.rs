//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::dom::SelectorError;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("lightbox data parsing error")]
    Json(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("lightbox.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{io_err}");
        assert!(display.contains("IO error"));
        assert!(display.contains("lightbox.toml"));

        let err = ConfigError::Validation("empty extension".to_string());
        assert!(format!("{err}").contains("empty extension"));

        let err = ConfigError::from(SelectorError::Empty);
        assert_eq!(format!("{err}"), "invalid selector: empty selector");
    }
}
