//! Primary markdown-to-HTML pipeline.
//!
//! Three stages: the `\boxed{...}` answer marker is rewritten into its
//! display container before parsing; the event stream is filtered so no
//! input-supplied markup or unsafe destination survives; the remaining
//! events are written out as HTML. Only markup generated by this pipeline
//! can appear in the output.

use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use super::{escape_text, is_safe_url};

/// Opening tag of the highlighted-answer container.
pub const ANSWER_BOX_OPEN: &str = "<div class=\"answer-box\">";
/// Closing tag of the highlighted-answer container.
pub const ANSWER_BOX_CLOSE: &str = "</div>";

static BOXED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\boxed\{([^{}]*)\}").expect("answer-box pattern is valid"));

/// Convert raw answer text into safe HTML.
///
/// GitHub-flavored tables and strikethrough are enabled, and single line
/// breaks render as `<br>`. Raw HTML in the input is escaped to visible
/// text (the answer-box container emitted by this module is the one
/// exception); links and images with a scheme outside `http`/`https`/
/// `mailto` are dropped -- the anchor is unwrapped to its text, the image
/// is removed entirely.
pub fn render(raw: &str) -> String {
    let source = rewrite_answer_boxes(raw);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(&source, options);

    let mut events: Vec<Event> = Vec::new();
    // Content of a dropped image (including nested images) is swallowed.
    let mut dropped_images = 0usize;
    // Unsafe links are unwrapped: start/end swallowed, inner text kept.
    let mut dropped_links = 0usize;

    for event in parser {
        if dropped_images > 0 {
            match event {
                Event::Start(Tag::Image { .. }) => dropped_images += 1,
                Event::End(TagEnd::Image) => dropped_images -= 1,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(Tag::Image { ref dest_url, .. }) if !is_safe_url(dest_url) => {
                dropped_images += 1;
            }
            Event::Start(Tag::Link { ref dest_url, .. }) if !is_safe_url(dest_url) => {
                dropped_links += 1;
            }
            Event::End(TagEnd::Link) if dropped_links > 0 => {
                dropped_links -= 1;
            }
            Event::Html(raw_html) => events.push(sanitize_raw_html(raw_html)),
            Event::InlineHtml(raw_html) => events.push(sanitize_raw_html(raw_html)),
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

/// Rewrite `\boxed{...}` markers into the answer-box container.
fn rewrite_answer_boxes(raw: &str) -> String {
    BOXED_MARKER
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            format!("{ANSWER_BOX_OPEN}{}{ANSWER_BOX_CLOSE}", &caps[1])
        })
        .into_owned()
}

/// Decide the fate of a raw HTML event.
///
/// Only the answer-box container synthesized by [`rewrite_answer_boxes`]
/// may pass through (with its inner text re-escaped); everything else is
/// downgraded to text, which the HTML writer escapes.
fn sanitize_raw_html(raw: CowStr<'_>) -> Event<'_> {
    match pass_answer_box(&raw) {
        Some(allowed) => Event::Html(allowed.into()),
        None => Event::Text(raw),
    }
}

fn pass_answer_box(raw_html: &str) -> Option<String> {
    let trimmed = raw_html.trim();
    if trimmed == ANSWER_BOX_OPEN || trimmed == ANSWER_BOX_CLOSE {
        return Some(trimmed.to_string());
    }
    // A marker on its own line parses as one HTML block: open + text + close.
    let inner = trimmed
        .strip_prefix(ANSWER_BOX_OPEN)?
        .strip_suffix(ANSWER_BOX_CLOSE)?;
    if inner.contains('<') {
        return None;
    }
    Some(format!(
        "{ANSWER_BOX_OPEN}{}{ANSWER_BOX_CLOSE}",
        escape_text(inner)
    ))
}
