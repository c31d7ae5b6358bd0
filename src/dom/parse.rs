//! HTML → [`Document`] conversion on top of `scraper`.
//!
//! Parsing follows the HTML5 tree-construction rules, so it never fails:
//! malformed markup is repaired the way a browser would repair it.

use scraper::Html;

use super::Document;

/// Parse a full page. Missing `<html>`, `<head>` and `<body>` are implied.
pub fn parse(html: &str) -> Document {
    Document::from_html(Html::parse_document(html))
}

/// Parse injected markup as `<body>` content, without the implied wrapper.
///
/// Whitespace-only top-level text is dropped so an injected block does not
/// carry the indentation of the file it came from.
pub fn parse_fragment(html: &str) -> Document {
    let fragment = Html::parse_fragment(html);
    let mut doc = Document::new();
    let root = doc.root();

    // The fragment parser nests its result in a synthetic <html> element.
    for child in fragment.root_element().children() {
        if child.value().as_text().is_some_and(|t| t.trim().is_empty()) {
            continue;
        }
        let copy = doc.copy_subtree(child);
        doc.attach(root, copy);
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let doc = parse(r#"<div class="entry-content"><a href="/a.jpg"><img src="/a.jpg"></a></div>"#);
        let tags: Vec<_> = doc
            .descendants(doc.body())
            .into_iter()
            .filter_map(|id| doc.tag(id))
            .collect();
        assert_eq!(tags, vec!["div", "a", "img"]);
        assert_eq!(doc.pending_records(), 0);
    }

    #[test]
    fn test_parse_decodes_attribute_entities() {
        let doc = parse(r#"<a href="/p.png?a=1&amp;b=2">x</a>"#);
        let a = doc.children(doc.body())[0];
        assert_eq!(doc.get_attr(a, "href"), Some("/p.png?a=1&b=2"));
    }

    #[test]
    fn test_parse_lowercases_tags() {
        let doc = parse(r#"<DIV><A HREF="/x.gif">x</A></DIV>"#);
        let tags: Vec<_> = doc
            .descendants(doc.body())
            .into_iter()
            .filter_map(|id| doc.tag(id).map(str::to_string))
            .collect();
        assert_eq!(tags, vec!["div", "a"]);
        let a = doc.descendants(doc.body())[1];
        assert_eq!(doc.get_attr(a, "href"), Some("/x.gif"));
    }

    #[test]
    fn test_parse_implies_body() {
        let doc = parse("<p>hello</p>");
        assert_eq!(doc.tag(doc.body()), Some("body"));
        assert_eq!(doc.children(doc.body()).len(), 1);
    }

    #[test]
    fn test_parse_fragment_drops_blank_top_level_text() {
        let doc = parse_fragment("\n  <p>one</p>\n  <p>two</p>\n");
        let top = doc.children(doc.root());
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|&id| doc.tag(id) == Some("p")));
        assert_eq!(doc.pending_records(), 0);
    }

    #[test]
    fn test_parse_fragment_keeps_text() {
        let doc = parse_fragment("see <a href=\"/a.png\">this</a>");
        let top = doc.children(doc.root());
        assert_eq!(doc.text(top[0]), Some("see "));
        assert_eq!(doc.tag(top[1]), Some("a"));
    }
}
