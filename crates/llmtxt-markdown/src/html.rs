//! Inline HTML stripping.
//!
//! Documentation written for a component-based theme often carries HTML
//! (badges, custom containers, video embeds) that is noise in a plain-text
//! bundle. When `strip_html` is enabled the tags are removed and their
//! inner text kept. Fenced code blocks are left untouched — HTML inside a
//! code example is content, not markup.

use std::sync::LazyLock;

use regex::Regex;

/// An HTML tag (opening, closing, self-closing, or comment).
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9-]*(?:\s[^>]*)?>|<!--.*?-->").unwrap());

/// Opening code fence (``` or ~~~).
fn fence_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Remove HTML tags outside fenced code blocks, keeping inner text.
#[must_use]
pub fn strip_html(content: &str) -> String {
    let mut out = Vec::new();
    let mut open_fence: Option<&str> = None;

    for line in content.lines() {
        match (open_fence, fence_marker(line)) {
            (None, Some(marker)) => {
                open_fence = Some(marker);
                out.push(line.to_owned());
            }
            (Some(open), Some(marker)) if open == marker => {
                open_fence = None;
                out.push(line.to_owned());
            }
            (Some(_), _) => out.push(line.to_owned()),
            (None, None) => out.push(TAG_RE.replace_all(line, "").into_owned()),
        }
    }

    let mut result = out.join("\n");
    if content.ends_with('\n') {
        result.push('\n');
    }
    result
}
