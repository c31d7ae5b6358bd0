//! Syntactic classification of link targets.

/// Schemes that never navigate to a resource.
const NON_NAVIGABLE_SCHEMES: &[&str] = &["mailto", "tel", "sms", "skype"];

/// What an `href` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// Missing or blank `href`.
    Empty,
    /// Same-page fragment (`#section`).
    Fragment,
    /// `mailto:`, `tel:`, `sms:`, `skype:`. Value is the scheme as written.
    NonNavigable(&'a str),
    /// Navigable URL. Value has query string and fragment removed.
    Navigable(&'a str),
}

impl<'a> LinkTarget<'a> {
    /// Classify an `href` attribute value.
    pub fn parse(href: Option<&'a str>) -> Self {
        let Some(href) = href.map(str::trim).filter(|h| !h.is_empty()) else {
            return Self::Empty;
        };

        if href.starts_with('#') {
            return Self::Fragment;
        }

        if let Some(scheme) = scheme_of(href)
            && NON_NAVIGABLE_SCHEMES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme))
        {
            return Self::NonNavigable(scheme);
        }

        Self::Navigable(strip_query_and_fragment(href))
    }

    /// Normalized URL for navigable targets.
    pub fn path(self) -> Option<&'a str> {
        match self {
            Self::Navigable(path) => Some(path),
            _ => None,
        }
    }
}

/// URL scheme (`mailto` in `mailto:x@y`), if the link has one.
fn scheme_of(href: &str) -> Option<&str> {
    let (scheme, _) = href.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Cut everything from the first `?` or `#`.
fn strip_query_and_fragment(href: &str) -> &str {
    match href.find(['?', '#']) {
        Some(pos) => &href[..pos],
        None => href,
    }
}
