//! Degraded renderers.
//!
//! [`render_fallback`] guarantees a safe result with no formatting at all:
//! HTML-escape plus line breaks. [`render_basic`] is the last-resort
//! formatter when full markdown output is unavailable; it supports bold,
//! italic, inline code, and links through direct pattern substitution,
//! with the same URI-scheme restriction as the primary pipeline.

use std::sync::LazyLock;

use regex::Regex;

use super::{escape_text, is_safe_url};

/// HTML-escape the raw text and convert line breaks, nothing else.
///
/// Always produces a safe result regardless of input.
pub fn render_fallback(raw: &str) -> String {
    let escaped = escape_text(raw);
    escaped.replace('\n', "<br />\n")
}

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("code pattern is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)").expect("link pattern is valid"));

/// Minimal formatter: bold, italic, inline code, links.
///
/// The input is escaped first, so the substituted tags are the only markup
/// in the output. Links with a disallowed scheme are reduced to their
/// text.
pub fn render_basic(raw: &str) -> String {
    let escaped = escape_text(raw);

    let formatted = CODE.replace_all(&escaped, "<code>$1</code>");
    let formatted = BOLD.replace_all(&formatted, "<strong>$1</strong>");
    let formatted = ITALIC.replace_all(&formatted, "<em>$1</em>");
    let formatted = LINK.replace_all(&formatted, |caps: &regex::Captures<'_>| {
        let text = &caps[1];
        let url = &caps[2];
        if is_safe_url(url) {
            format!("<a href=\"{url}\">{text}</a>")
        } else {
            text.to_string()
        }
    });

    formatted.replace('\n', "<br />\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_escapes_markup() {
        let html = render_fallback("<script>alert(1)</script>");
        assert!(!html.contains("<script"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_fallback_converts_line_breaks() {
        let html = render_fallback("one\ntwo");
        assert!(html.contains("one<br />\ntwo"));
    }

    #[test]
    fn test_basic_bold_and_italic() {
        let html = render_basic("**strong** and *soft*");
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<em>soft</em>"));
    }

    #[test]
    fn test_basic_inline_code() {
        let html = render_basic("use `cargo build` here");
        assert!(html.contains("<code>cargo build</code>"));
    }

    #[test]
    fn test_basic_safe_link() {
        let html = render_basic("[docs](https://example.com)");
        assert!(html.contains("<a href=\"https://example.com\">docs</a>"));
    }

    #[test]
    fn test_basic_unsafe_link_reduced_to_text() {
        let html = render_basic("[click](javascript:alert(1))");
        assert!(!html.contains("javascript:"));
        assert!(html.contains("click"));
    }

    #[test]
    fn test_basic_escapes_before_substitution() {
        let html = render_basic("**<b>bold</b>**");
        assert!(!html.contains("<b>"));
        assert!(html.contains("<strong>&lt;b&gt;bold&lt;/b&gt;</strong>"));
    }
}
