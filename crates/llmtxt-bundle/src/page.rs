//! Prepared page model.
//!
//! A [`PreparedFile`] is a source page after directive filtering, include
//! expansion, metadata extraction, and link rewriting — ready for TOC
//! resolution and aggregate emission. Prepared files are created once per
//! bundle pass and never mutated afterwards.

use llmtxt_markdown::PageMeta;

/// A source page prepared for emission.
#[derive(Debug, Clone)]
pub struct PreparedFile {
    /// Path relative to the work directory, content extension stripped
    /// (e.g. `guide/setup` for `guide/setup.md`).
    pub path: String,
    /// Resolved page title.
    pub title: String,
    /// Parsed front matter, transformed body, and excerpt.
    pub meta: PageMeta,
}

impl PreparedFile {
    /// Normalized path for sidebar matching: `index` collapses to its
    /// parent directory (`guide/index` → `guide`, `index` → ``).
    #[must_use]
    pub fn normalized_path(&self) -> &str {
        normalize_link(&self.path)
    }

    /// Emitted mirror path relative to the output directory.
    #[must_use]
    pub fn mirror_path(&self) -> String {
        format!("{}.md", self.path)
    }
}

/// Normalize a link target for matching: strip a content extension and
/// collapse a trailing `index` segment to its parent directory.
#[must_use]
pub fn normalize_link(link: &str) -> &str {
    let link = llmtxt_markdown::strip_content_ext(link.trim_matches('/'));
    if let Some(parent) = link.strip_suffix("index") {
        parent.trim_end_matches('/')
    } else {
        link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmtxt_markdown::FrontmatterCache;
    use pretty_assertions::assert_eq;

    fn prepared(path: &str) -> PreparedFile {
        PreparedFile {
            path: path.to_owned(),
            title: "T".to_owned(),
            meta: FrontmatterCache::new().parse("body").unwrap(),
        }
    }

    #[test]
    fn test_normalize_link_strips_extension() {
        assert_eq!(normalize_link("guide/setup.md"), "guide/setup");
        assert_eq!(normalize_link("guide/setup.html"), "guide/setup");
        assert_eq!(normalize_link("/guide/setup/"), "guide/setup");
    }

    #[test]
    fn test_normalize_link_collapses_index() {
        assert_eq!(normalize_link("guide/index.md"), "guide");
        assert_eq!(normalize_link("index.md"), "");
        assert_eq!(normalize_link("index"), "");
    }

    #[test]
    fn test_normalized_path_of_prepared_file() {
        assert_eq!(prepared("guide/index").normalized_path(), "guide");
        assert_eq!(prepared("guide/setup").normalized_path(), "guide/setup");
    }

    #[test]
    fn test_mirror_path_appends_md() {
        assert_eq!(prepared("guide/setup").mirror_path(), "guide/setup.md");
    }
}
