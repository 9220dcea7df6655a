//! Front matter parsing and page metadata resolution.
//!
//! Front matter is a YAML block delimited by `---` fences at the top of a
//! page. Parsing is memoized through an explicit [`FrontmatterCache`] owned
//! by the caller and cleared at the start of each bundle pass — there is no
//! module-level state, so re-reading changed content is the caller's choice.
//!
//! Title and description resolution follow the site conventions:
//!
//! - title: `title` field → `titleTemplate` field → first level-1 heading →
//!   site-wide default
//! - description: `hero.text` → site description → `description` field →
//!   `titleTemplate` field

use std::collections::HashMap;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Deserialize;

/// Front matter parse error. Malformed YAML is a hard failure for the page.
#[derive(Debug, thiserror::Error)]
#[error("invalid front matter: {0}")]
pub struct FrontmatterError(#[from] serde_yaml::Error);

/// Typed front matter fields the bundler cares about.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrontMatter {
    /// Explicit page title.
    pub title: Option<String>,
    /// Site title template, used as a title/description fallback.
    #[serde(rename = "titleTemplate")]
    pub title_template: Option<String>,
    /// Explicit page description.
    pub description: Option<String>,
    /// Landing-page hero block.
    pub hero: Option<Hero>,
}

/// Landing-page hero block (`hero.text` doubles as a description).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Hero {
    /// Hero tagline.
    pub text: Option<String>,
}

/// A page split into parsed front matter and body.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    /// Parsed front matter (default when the page has none).
    pub matter: FrontMatter,
    /// Page body with the front matter block removed.
    pub body: String,
    /// First paragraph of the body, if any.
    pub excerpt: Option<String>,
}

/// Memoizing front matter parser with caller-controlled lifetime.
///
/// Keyed by the raw content string. Callers clear it at the start of each
/// bundle pass so stale entries never outlive the pass that created them.
#[derive(Debug, Default)]
pub struct FrontmatterCache {
    entries: HashMap<String, PageMeta>,
}

impl FrontmatterCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `content`, reusing a previous result for identical content.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError`] when the YAML block is malformed.
    pub fn parse(&mut self, content: &str) -> Result<PageMeta, FrontmatterError> {
        if let Some(meta) = self.entries.get(content) {
            return Ok(meta.clone());
        }
        let meta = parse_page(content)?;
        self.entries.insert(content.to_owned(), meta.clone());
        Ok(meta)
    }

    /// Drop all memoized entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Split content into a raw YAML block and the body.
///
/// Returns `(None, content)` when the page has no front matter fence.
fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return (None, content);
    };
    // Closing fence: a line that is exactly `---`.
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse a page into front matter and body.
fn parse_page(content: &str) -> Result<PageMeta, FrontmatterError> {
    let (yaml, body) = split_front_matter(content);
    let matter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => FrontMatter::default(),
    };
    let body = body.trim_start_matches('\n').to_owned();
    let excerpt = first_paragraph(&body);
    Ok(PageMeta {
        matter,
        body,
        excerpt,
    })
}

/// Plain text of the first paragraph of a markdown body.
fn first_paragraph(body: &str) -> Option<String> {
    let mut in_paragraph = false;
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => {
                if !text.is_empty() {
                    return Some(text);
                }
                in_paragraph = false;
            }
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }
    None
}

/// Text of the first level-1 heading in a markdown body.
#[must_use]
pub fn first_h1(body: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut text = String::new();
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { level, .. }) if level == pulldown_cmark::HeadingLevel::H1 => {
                in_h1 = true;
            }
            Event::End(TagEnd::Heading(pulldown_cmark::HeadingLevel::H1)) => {
                return if text.is_empty() { None } else { Some(text) };
            }
            Event::Text(t) | Event::Code(t) if in_h1 => text.push_str(&t),
            _ => {}
        }
    }
    None
}

impl PageMeta {
    /// Resolve the page title.
    ///
    /// Order: `title` front matter → `titleTemplate` → first `#` heading →
    /// `site_default`.
    #[must_use]
    pub fn resolve_title(&self, site_default: Option<&str>) -> String {
        self.matter
            .title
            .clone()
            .or_else(|| self.matter.title_template.clone())
            .or_else(|| first_h1(&self.body))
            .or_else(|| site_default.map(str::to_owned))
            .unwrap_or_else(|| "Documentation".to_owned())
    }

    /// Resolve the page description.
    ///
    /// Order: `hero.text` → `site_description` → `description` front
    /// matter → `titleTemplate`.
    #[must_use]
    pub fn resolve_description(&self, site_description: Option<&str>) -> Option<String> {
        self.matter
            .hero
            .as_ref()
            .and_then(|hero| hero.text.clone())
            .or_else(|| site_description.map(str::to_owned))
            .or_else(|| self.matter.description.clone())
            .or_else(|| self.matter.title_template.clone())
    }
}
