//! Selector lists compiled with `scraper`.
//!
//! Anything `scraper` accepts is allowed: type, class, id and attribute
//! selectors, combinators and structural pseudo-classes. Dynamic
//! pseudo-classes such as `:hover` are rejected since a static document
//! never matches them.

use std::fmt;

use scraper::ElementRef;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("invalid selector `{input}`: {reason}")]
    Invalid { input: String, reason: String },
}

/// A parsed selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    inner: scraper::Selector,
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let source = input.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let inner = scraper::Selector::parse(source).map_err(|e| SelectorError::Invalid {
            input: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            inner,
        })
    }

    /// Parse several selectors into one list (`a, b, c`).
    ///
    /// Each entry is checked on its own first so an error names the entry
    /// at fault rather than the joined list.
    pub fn parse_all<S: AsRef<str>>(inputs: &[S]) -> Result<Self, SelectorError> {
        let parts: Vec<&str> = inputs
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();
        for part in &parts {
            Self::parse(part)?;
        }
        Self::parse(&parts.join(", "))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(super) fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.inner.matches(element)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
