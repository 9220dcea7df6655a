//! LLM directive filtering.
//!
//! Documentation authors can mark content for LLM consumption only
//! (`<llm-only>`) or hide content from the generated bundles entirely
//! (`<llm-exclude>`). This module resolves both directives:
//!
//! - `<llm-exclude>…</llm-exclude>` is removed along with its content
//! - `<llm-only>…</llm-only>` is unwrapped (tags dropped, content kept)
//!
//! Removal can leave empty paragraphs behind; the filter collapses the
//! resulting blank-line runs so downstream output has no stray gaps.
//! Unmatched or unterminated tags are left untouched.

use std::sync::LazyLock;

use regex::Regex;

/// `<llm-exclude>` span including its content. Non-greedy so an unterminated
/// tag never swallows the rest of the document.
static EXCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<llm-exclude>\s*(?:.*?)\s*</llm-exclude>").unwrap());

/// `<llm-only>` span with its content captured for unwrapping.
static ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<llm-only>\s*(.*?)\s*</llm-only>").unwrap());

/// Runs of three or more newlines left behind by span removal.
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Apply both LLM directives to raw markdown.
///
/// Deterministic and infallible: content without directives is returned
/// unchanged.
#[must_use]
pub fn filter_directives(content: &str) -> String {
    let had_exclude = EXCLUDE_RE.is_match(content);
    let had_only = ONLY_RE.is_match(content);
    if !had_exclude && !had_only {
        return content.to_owned();
    }

    let filtered = EXCLUDE_RE.replace_all(content, "");
    let filtered = ONLY_RE.replace_all(&filtered, "$1");

    // Span removal leaves empty paragraphs; collapse them.
    BLANK_RUN_RE.replace_all(&filtered, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exclude_removes_tags_and_content() {
        let input = "Before\n\n<llm-exclude>secret stuff</llm-exclude>\n\nAfter";
        let output = filter_directives(input);
        assert!(!output.contains("secret stuff"));
        assert!(!output.contains("llm-exclude"));
        assert!(output.contains("Before"));
        assert!(output.contains("After"));
    }

    #[test]
    fn test_only_unwraps_keeping_content() {
        let input = "Intro\n\n<llm-only>\nExtra context for models.\n</llm-only>\n\nOutro";
        let output = filter_directives(input);
        assert!(output.contains("Extra context for models."));
        assert!(!output.contains("llm-only"));
    }

    #[test]
    fn test_multiline_exclude_block() {
        let input = "A\n\n<llm-exclude>\nline one\nline two\n</llm-exclude>\n\nB";
        let output = filter_directives(input);
        assert!(!output.contains("line one"));
        assert!(!output.contains("line two"));
    }

    #[test]
    fn test_removal_leaves_no_blank_paragraph() {
        let input = "A\n\n<llm-exclude>gone</llm-exclude>\n\nB";
        let output = filter_directives(input);
        assert_eq!(output, "A\n\nB");
    }

    #[test]
    fn test_unterminated_tags_left_untouched() {
        let input = "A\n\n<llm-exclude>still here\n\nB";
        assert_eq!(filter_directives(input), input);

        let input = "A\n\n<llm-only>also here\n\nB";
        assert_eq!(filter_directives(input), input);
    }

    #[test]
    fn test_directive_free_content_unchanged() {
        let input = "# Title\n\nRegular paragraph.\n";
        assert_eq!(filter_directives(input), input);
    }

    #[test]
    fn test_multiple_spans_in_one_document() {
        let input = "<llm-only>keep1</llm-only> mid <llm-exclude>drop</llm-exclude> <llm-only>keep2</llm-only>";
        let output = filter_directives(input);
        assert!(output.contains("keep1"));
        assert!(output.contains("keep2"));
        assert!(!output.contains("drop"));
    }
}
