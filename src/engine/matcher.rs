//! Image extension matching.

use regex::Regex;

/// Extensions always recognized, whatever the configuration says.
pub const BUILTIN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png", "webp", "bmp", "svg"];

/// One compiled, case-insensitive `\.(ext|ext|...)$` test.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    regex: Regex,
    extensions: Vec<String>,
}

impl ExtensionMatcher {
    /// Build from configured extensions unioned with [`BUILTIN_EXTENSIONS`].
    pub fn new<S: AsRef<str>>(configured: &[S]) -> Result<Self, regex::Error> {
        let mut extensions: Vec<String> = Vec::new();
        let all = configured
            .iter()
            .map(|s| s.as_ref())
            .chain(BUILTIN_EXTENSIONS.iter().copied());

        for ext in all {
            let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }

        let alternation = extensions
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"(?i)\.(?:{alternation})$"))?;

        Ok(Self { regex, extensions })
    }

    /// Check whether a normalized URL ends in a recognized extension.
    #[inline]
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_union() {
        let matcher = ExtensionMatcher::new(&["avif"]).unwrap();
        assert!(matcher.is_match("/a.avif"));
        assert!(matcher.is_match("/a.svg"));
        assert_eq!(matcher.extensions()[0], "avif");
        assert_eq!(matcher.extensions().len(), 8);
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = ExtensionMatcher::new(&["jpg"]).unwrap();
        assert!(matcher.is_match("/a/photo.JPG"));
        assert!(matcher.is_match("/a/photo.JpEg"));
    }

    #[test]
    fn test_requires_dot_and_end() {
        let matcher = ExtensionMatcher::new::<&str>(&[]).unwrap();
        assert!(!matcher.is_match("/a/jpg"));
        assert!(!matcher.is_match("/a/photo.jpg/edit"));
        assert!(!matcher.is_match("/a/photo.jpgx"));
        assert!(!matcher.is_match("/a/page.html"));
    }

    #[test]
    fn test_extensions_are_escaped() {
        let matcher = ExtensionMatcher::new(&["j.g"]).unwrap();
        assert!(matcher.is_match("/x.j.g"));
        assert!(!matcher.is_match("/x.jpg.html"));
        assert!(!matcher.is_match("/x.jxg"));
    }
}
