//! Safe HTML rendering of untrusted answer text.
//!
//! Assistant answers arrive as markdown and must reach the view layer as
//! HTML that can never execute. The primary renderer
//! ([`markdown::render`]) parses with pulldown-cmark and emits only
//! renderer-generated markup: raw HTML embedded in the input is escaped to
//! text, and link/image destinations are restricted to the `http`,
//! `https`, and `mailto` schemes. Two degraded renderers
//! ([`fallback::render_fallback`], [`fallback::render_basic`]) guarantee a
//! safe result even without full markdown output.

pub mod fallback;
pub mod markdown;

pub use fallback::{render_basic, render_fallback};
pub use markdown::render;

use pulldown_cmark::{Event, html};

/// URI schemes a link or image may resolve through.
const ALLOWED_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

/// Whether a destination is safe to emit as an `href`/`src`.
///
/// Scheme-less (relative) references carry no resolvable scheme and pass;
/// anything with a scheme outside the allow-list is rejected, and the
/// owning tag is dropped rather than escaped.
pub(crate) fn is_safe_url(url: &str) -> bool {
    let trimmed = url.trim();
    let Some((scheme, _)) = trimmed.split_once(':') else {
        return true;
    };
    let looks_like_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !looks_like_scheme {
        // The ':' belongs to a path or query, not a scheme.
        return true;
    }
    ALLOWED_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
}

/// HTML-escape a text fragment using the markdown engine's own writer.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, std::iter::once(Event::Text(text.into())));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_https_allowed() {
        assert!(is_safe_url("http://example.com/a"));
        assert!(is_safe_url("https://example.com/a?b=c"));
    }

    #[test]
    fn test_mailto_allowed() {
        assert!(is_safe_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_relative_references_allowed() {
        assert!(is_safe_url("/docs/report.pdf"));
        assert!(is_safe_url("report.pdf"));
        assert!(is_safe_url("#section-2"));
        // ':' in a path segment is not a scheme.
        assert!(is_safe_url("/files/a:b"));
    }

    #[test]
    fn test_script_capable_schemes_rejected() {
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("JaVaScRiPt:alert(1)"));
        assert!(!is_safe_url(" javascript:alert(1)"));
        assert!(!is_safe_url("data:text/html;base64,PHNjcmlwdD4="));
        assert!(!is_safe_url("vbscript:msgbox"));
        assert!(!is_safe_url("file:///etc/passwd"));
    }

    #[test]
    fn test_escape_text_neutralizes_markup() {
        let escaped = escape_text("<script>alert(1)</script> & \"quotes\"");
        assert!(!escaped.contains("<script"));
        assert!(escaped.contains("&lt;script&gt;"));
        assert!(escaped.contains("&amp;"));
    }
}
