//! Best-effort HTML cleanup helpers.
//!
//! `scraper` exposes a read-only DOM, so element stripping is done by
//! re-serializing the tree while skipping unwanted subtrees. The output is
//! fed to a markdown converter, so fidelity only needs to be good enough
//! for text extraction.

use regex::Regex;
use scraper::{ElementRef, Node};
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Inline style that hides an element.
static HIDDEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)display:\s*none").expect("valid regex"));

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: [&str; 8] = ["area", "base", "br", "col", "hr", "img", "input", "meta"];

/// Serialize an element subtree, dropping the named elements.
///
/// With `drop_hidden` set, elements whose inline style contains
/// `display: none` are dropped as well.
pub fn filtered_fragment(root: ElementRef<'_>, drop: &[&str], drop_hidden: bool) -> String {
    let mut out = String::new();
    write_element(root, drop, drop_hidden, &mut out);
    out
}

fn write_element(el: ElementRef<'_>, drop: &[&str], drop_hidden: bool, out: &mut String) {
    let name = el.value().name();
    if drop.contains(&name) {
        return;
    }
    if drop_hidden
        && el
            .value()
            .attr("style")
            .is_some_and(|style| HIDDEN_RE.is_match(style))
    {
        return;
    }

    out.push('<');
    out.push_str(name);
    for (key, value) in el.value().attrs() {
        let _ = write!(out, " {}=\"{}\"", key, escape_attr(value));
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    write_element(child_el, drop, drop_hidden, out);
                }
            }
            _ => {}
        }
    }

    let _ = write!(out, "</{name}>");
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn body_of(html: &str) -> String {
        let doc = Html::parse_document(html);
        filtered_fragment(doc.root_element(), &["script", "style"], false)
    }

    #[test]
    fn test_drops_named_elements() {
        let out = body_of("<html><body><p>keep</p><script>drop()</script></body></html>");
        assert!(out.contains("<p>keep</p>"));
        assert!(!out.contains("script"));
        assert!(!out.contains("drop()"));
    }

    #[test]
    fn test_drops_hidden_elements() {
        let doc = Html::parse_document(
            r#"<html><body><div style="display: none">secret</div><div>shown</div></body></html>"#,
        );
        let out = filtered_fragment(doc.root_element(), &[], true);
        assert!(!out.contains("secret"));
        assert!(out.contains("shown"));
    }

    #[test]
    fn test_keeps_attributes() {
        let out = body_of(r#"<html><body><a href="/x">link</a></body></html>"#);
        assert!(out.contains(r#"<a href="/x">link</a>"#));
    }

    #[test]
    fn test_escapes_text() {
        let out = body_of("<html><body><p>a &lt; b</p></body></html>");
        assert!(out.contains("a &lt; b"));
    }

    #[test]
    fn test_void_elements_not_closed() {
        let out = body_of("<html><body><p>one<br>two</p></body></html>");
        assert!(out.contains("<br>"));
        assert!(!out.contains("</br>"));
    }
}
