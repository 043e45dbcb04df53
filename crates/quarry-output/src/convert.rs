//! HTML to Markdown conversion.
//!
//! Conversion itself is delegated to `html2md`; this module handles the
//! cleanup around it: stripping non-content elements before conversion and
//! collapsing the blank-line runs converters tend to leave behind.

use quarry_data::html::filtered_fragment;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Elements carrying no document text in a filing.
const FILING_DROP_TAGS: [&str; 5] = ["script", "style", "meta", "link", "noscript"];

/// Three or more consecutive newlines.
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Convert a full filing document to Markdown.
///
/// Strips scripts, styles, head metadata, and `display: none` elements
/// before conversion.
pub fn filing_markdown(html: &str) -> String {
    let doc = Html::parse_document(html);
    let cleaned = filtered_fragment(doc.root_element(), &FILING_DROP_TAGS, true);
    to_markdown(&cleaned)
}

/// Convert an HTML fragment to Markdown, normalizing whitespace.
pub fn to_markdown(html: &str) -> String {
    let markdown = html2md::parse_html(html);
    collapse_blank_lines(&markdown).trim().to_string()
}

/// Collapse runs of three or more newlines to exactly one blank line.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\nb"), "a\nb");
    }

    #[test]
    fn test_filing_markdown_strips_scripts_and_hidden() {
        let html = r#"
            <html><head>
              <script>evil()</script>
              <style>p { color: red }</style>
            </head><body>
              <h1>Annual Report</h1>
              <div style="display:none">hidden boilerplate</div>
              <p>Revenue grew.</p>
            </body></html>"#;
        let markdown = filing_markdown(html);
        assert!(markdown.contains("Annual Report"));
        assert!(markdown.contains("Revenue grew."));
        assert!(!markdown.contains("evil()"));
        assert!(!markdown.contains("color: red"));
        assert!(!markdown.contains("hidden boilerplate"));
    }

    #[test]
    fn test_to_markdown_renders_headings() {
        let markdown = to_markdown("<h1>Title</h1><p>Body text.</p>");
        assert!(markdown.contains("Title"));
        assert!(markdown.contains("Body text."));
    }

    #[test]
    fn test_to_markdown_empty_input() {
        assert!(to_markdown("").is_empty());
    }
}
