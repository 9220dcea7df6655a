//! Approximate token counting and size formatting.
//!
//! The emitted artifacts are meant for LLM context windows, so the build
//! log reports an approximate token count next to the byte size. The
//! estimator segments text with a regex and applies a per-script
//! chars-per-token table — CJK scripts tokenize close to one token per
//! character, alphabetic scripts average several characters per token.
//! This is a logging heuristic, not a tokenizer.

use std::sync::LazyLock;

use regex::Regex;

/// Per-script segmentation patterns and their average characters per token.
const SCRIPT_TABLE: [(&str, &str, f64); 4] = [
    ("cjk", r"[\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]", 1.0),
    ("alphabetic", r"[\p{Latin}\p{Cyrillic}\p{Greek}]+(?:'[\p{Latin}]+)*", 4.0),
    ("numeric", r"\p{N}+", 3.0),
    ("symbol", r"[^\s\p{L}\p{N}]", 2.0),
];

/// Combined segmentation regex built from [`SCRIPT_TABLE`].
static SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = SCRIPT_TABLE
        .iter()
        .map(|(name, pattern, _)| format!("(?P<{name}>{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
});

/// Estimate the LLM token count of `text`.
#[must_use]
pub fn approx_token_count(text: &str) -> usize {
    let mut tokens = 0.0;
    for caps in SEGMENT_RE.captures_iter(text) {
        for (name, _, chars_per_token) in &SCRIPT_TABLE {
            if let Some(segment) = caps.name(name) {
                let chars = segment.as_str().chars().count() as f64;
                tokens += (chars / chars_per_token).max(1.0);
                break;
            }
        }
    }
    tokens.round() as usize
}

/// Human-readable byte size (`B`, `kB`, `MB`).
#[must_use]
pub fn human_size(bytes: usize) -> String {
    const KB: f64 = 1000.0;
    let bytes_f = bytes as f64;
    if bytes_f >= KB * KB {
        format!("{:.1} MB", bytes_f / (KB * KB))
    } else if bytes_f >= KB {
        format!("{:.1} kB", bytes_f / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert_eq!(approx_token_count(""), 0);
        assert_eq!(approx_token_count("   \n\t"), 0);
    }

    #[test]
    fn test_short_words_count_one_each() {
        // Three words, each under four chars, is three tokens.
        assert_eq!(approx_token_count("a to be"), 3);
    }

    #[test]
    fn test_long_words_split_by_char_ratio() {
        // 12 latin chars at 4 chars/token.
        assert_eq!(approx_token_count("abcdefghijkl"), 3);
    }

    #[test]
    fn test_cjk_counts_per_character() {
        assert_eq!(approx_token_count("日本語"), 3);
    }

    #[test]
    fn test_punctuation_counts_fractionally() {
        let with = approx_token_count("end.");
        let without = approx_token_count("end");
        assert!(with > without);
    }

    #[test]
    fn test_mixed_text_is_additive() {
        let latin = approx_token_count("hello");
        let cjk = approx_token_count("日本");
        assert_eq!(approx_token_count("hello日本"), latin + cjk);
    }

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2_300), "2.3 kB");
        assert_eq!(human_size(1_500_000), "1.5 MB");
    }
}
