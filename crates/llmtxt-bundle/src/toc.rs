//! Sidebar-to-TOC resolution.
//!
//! Flattens the configured sidebar tree into an ordered markdown table of
//! contents. Sidebar links are matched against prepared files by normalized
//! path; nested sections become `###`-and-deeper headings. Files no sidebar
//! link claimed end up in a trailing "Other" section, so every prepared
//! file appears in the TOC exactly once. Without a sidebar the TOC is a
//! flat list.

use llmtxt_config::SidebarSection;
use tracing::warn;

use crate::page::{PreparedFile, normalize_link};

/// Link construction for TOC entries.
pub struct UrlBuilder {
    prefix: String,
    target_ext: String,
}

impl UrlBuilder {
    /// Create a builder. `prefix` is the domain/base prefix (may be empty),
    /// `target_ext` includes the leading dot.
    #[must_use]
    pub fn new(prefix: &str, target_ext: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_owned(),
            target_ext: target_ext.to_owned(),
        }
    }

    /// URL of a prepared file's emitted mirror.
    #[must_use]
    pub fn url_for(&self, file: &PreparedFile) -> String {
        format!("{}/{}{}", self.prefix, file.path, self.target_ext)
    }
}

/// Build the table of contents.
///
/// `files` must already be in the desired fallback order (the generator
/// pre-sorts by title). Sidebar order wins for matched files.
#[must_use]
pub fn build_toc(
    files: &[PreparedFile],
    sidebar: Option<&[SidebarSection]>,
    urls: &UrlBuilder,
) -> String {
    let mut matched = vec![false; files.len()];
    let mut out = String::new();

    let sidebar = sidebar.unwrap_or(&[]);
    for section in sidebar {
        let rendered = render_section(section, "", 3, files, &mut matched, urls);
        push_block(&mut out, &rendered);
    }

    let unmatched: Vec<&PreparedFile> = files
        .iter()
        .zip(&matched)
        .filter_map(|(file, taken)| (!taken).then_some(file))
        .collect();

    if !unmatched.is_empty() {
        if !sidebar.is_empty() {
            push_block(&mut out, "### Other\n\n");
        }
        for file in unmatched {
            out.push_str(&entry_line(file, None, urls));
        }
    }

    out
}

/// Render one sidebar section (and its descendants).
fn render_section(
    section: &SidebarSection,
    base: &str,
    level: usize,
    files: &[PreparedFile],
    matched: &mut [bool],
    urls: &UrlBuilder,
) -> String {
    let mut body = String::new();

    if let Some(link) = &section.link {
        let full = join_path(base, link);
        let normalized = normalize_link(&full).to_owned();
        let position = files
            .iter()
            .enumerate()
            .find_map(|(idx, file)| {
                (!matched[idx] && file.normalized_path() == normalized).then_some(idx)
            });
        match position {
            Some(idx) => {
                matched[idx] = true;
                body.push_str(&entry_line(&files[idx], section.text.as_deref(), urls));
            }
            None => {
                warn!(link = full.as_str(), "sidebar link has no matching page, omitting");
            }
        }
    }

    if let Some(items) = &section.items {
        let child_base = match &section.base {
            Some(section_base) => join_path(base, section_base),
            None => base.to_owned(),
        };
        let mut children = String::new();
        for item in items {
            let rendered = render_section(item, &child_base, level + 1, files, matched, urls);
            push_block(&mut children, &rendered);
        }
        if !children.is_empty() {
            if let Some(text) = &section.text {
                push_block(&mut body, &format!("{} {text}\n\n", "#".repeat(level)));
            }
            body.push_str(&children);
            if !children.ends_with("\n\n") {
                body.push('\n');
            }
        }
    }

    body
}

/// Append a block, inserting a blank line before a heading that would
/// otherwise butt against list entries.
fn push_block(out: &mut String, block: &str) {
    if block.starts_with('#') && !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
    out.push_str(block);
}

/// One `- [Title](url): description` line.
fn entry_line(file: &PreparedFile, text_override: Option<&str>, urls: &UrlBuilder) -> String {
    let title = text_override.unwrap_or(&file.title);
    let url = urls.url_for(file);
    match &file.meta.matter.description {
        Some(description) => format!("- [{title}]({url}): {description}\n"),
        None => format!("- [{title}]({url})\n"),
    }
}

/// Join sidebar base and link segments with a single slash.
fn join_path(base: &str, rel: &str) -> String {
    let base = base.trim_matches('/');
    let rel = rel.trim_start_matches('/');
    if base.is_empty() {
        rel.to_owned()
    } else if rel.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{rel}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmtxt_markdown::FrontmatterCache;
    use pretty_assertions::assert_eq;

    fn file(path: &str, title: &str, description: Option<&str>) -> PreparedFile {
        let content = match description {
            Some(desc) => format!("---\ndescription: {desc}\n---\nbody"),
            None => "body".to_owned(),
        };
        PreparedFile {
            path: path.to_owned(),
            title: title.to_owned(),
            meta: FrontmatterCache::new().parse(&content).unwrap(),
        }
    }

    fn urls() -> UrlBuilder {
        UrlBuilder::new("", ".md")
    }

    fn section(text: Option<&str>, link: Option<&str>) -> SidebarSection {
        SidebarSection {
            text: text.map(str::to_owned),
            link: link.map(str::to_owned),
            ..SidebarSection::default()
        }
    }

    #[test]
    fn test_no_sidebar_yields_flat_list() {
        let files = vec![
            file("api", "API", Some("The API reference")),
            file("guide", "Guide", None),
        ];

        let toc = build_toc(&files, None, &urls());

        assert_eq!(toc, "- [API](/api.md): The API reference\n- [Guide](/guide.md)\n");
    }

    #[test]
    fn test_sidebar_order_wins() {
        let files = vec![file("a", "A", None), file("z", "Z", None)];
        let sidebar = vec![section(Some("Zed"), Some("z")), section(Some("Ay"), Some("a"))];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert_eq!(toc, "- [Zed](/z.md)\n- [Ay](/a.md)\n");
    }

    #[test]
    fn test_nested_sections_get_headings() {
        let files = vec![
            file("guide/setup", "Setup", None),
            file("guide/advanced/tuning", "Tuning", None),
        ];
        let sidebar = vec![SidebarSection {
            text: Some("Guide".to_owned()),
            base: Some("guide".to_owned()),
            items: Some(vec![
                section(None, Some("setup")),
                SidebarSection {
                    text: Some("Advanced".to_owned()),
                    base: Some("advanced".to_owned()),
                    items: Some(vec![section(None, Some("tuning"))]),
                    ..SidebarSection::default()
                },
            ]),
            ..SidebarSection::default()
        }];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert!(toc.starts_with("### Guide\n\n- [Setup](/guide/setup.md)\n"));
        assert!(toc.contains("#### Advanced\n\n- [Tuning](/guide/advanced/tuning.md)\n"));
    }

    #[test]
    fn test_section_with_link_and_children_separates_heading() {
        let files = vec![
            file("guide", "Guide", None),
            file("guide/setup", "Setup", None),
        ];
        let sidebar = vec![SidebarSection {
            text: Some("Guide".to_owned()),
            link: Some("guide".to_owned()),
            base: Some("guide".to_owned()),
            items: Some(vec![section(None, Some("setup"))]),
        }];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert!(
            toc.contains("- [Guide](/guide.md)\n\n### Guide\n\n- [Setup](/guide/setup.md)\n"),
            "heading needs a blank line after the link entry: {toc}"
        );
    }

    #[test]
    fn test_empty_section_contributes_no_heading() {
        let files = vec![file("guide", "Guide", None)];
        let sidebar = vec![
            SidebarSection {
                text: Some("Empty Group".to_owned()),
                items: Some(vec![section(None, Some("missing-page"))]),
                ..SidebarSection::default()
            },
            section(None, Some("guide")),
        ];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert!(!toc.contains("Empty Group"));
        assert!(toc.contains("- [Guide](/guide.md)\n"));
    }

    #[test]
    fn test_unmatched_files_land_in_other_once() {
        let files = vec![file("guide", "Guide", None), file("stray", "Stray", None)];
        let sidebar = vec![section(None, Some("guide"))];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert!(toc.contains("### Other\n\n- [Stray](/stray.md)\n"));
        assert_eq!(toc.matches("/stray.md").count(), 1);
        assert_eq!(toc.matches("/guide.md").count(), 1);
    }

    #[test]
    fn test_index_link_matches_directory_page() {
        let files = vec![file("guide/index", "Guide Home", None)];
        let sidebar = vec![section(None, Some("guide/"))];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        assert_eq!(toc, "- [Guide Home](/guide/index.md)\n");
    }

    #[test]
    fn test_every_file_appears_exactly_once() {
        let files = vec![
            file("a", "A", None),
            file("b", "B", None),
            file("c/index", "C", None),
        ];
        let sidebar = vec![
            section(None, Some("b")),
            section(None, Some("b")), // duplicate link must not duplicate the entry
            section(None, Some("c")),
        ];

        let toc = build_toc(&files, Some(&sidebar), &urls());

        for path in ["/a.md", "/b.md", "/c/index.md"] {
            assert_eq!(toc.matches(path).count(), 1, "{path} should appear once");
        }
    }
}
