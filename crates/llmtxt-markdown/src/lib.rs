//! Markdown page transforms for llmtxt.
//!
//! Each module is one stage of the per-page pipeline that turns a raw
//! documentation source into LLM-friendly plain markdown:
//!
//! - [`directives`]: strip `<llm-exclude>` spans, unwrap `<llm-only>` spans
//! - [`includes`]: expand `<!-- @include: … -->` and `<<< path` snippets
//! - [`frontmatter`]: YAML front matter parsing and title/description
//!   resolution
//! - [`links`]: internal link extension rewriting and hashed image mapping
//! - [`html`]: optional inline-HTML stripping
//!
//! The stages are independent pure transforms over strings; ordering is the
//! caller's concern (llmtxt-bundle runs them directive filter → include
//! expansion → front matter → link rewrite).

pub mod directives;
pub mod frontmatter;
pub mod html;
pub mod includes;
pub mod links;
mod regions;

pub use directives::filter_directives;
pub use frontmatter::{FrontMatter, FrontmatterCache, FrontmatterError, PageMeta};
pub use html::strip_html;
pub use includes::{IncludeError, IncludeExpander};
pub use links::{LinkRewriter, RewriteMap, strip_content_ext};
