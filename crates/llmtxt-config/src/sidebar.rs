//! Sidebar navigation tree types.
//!
//! The sidebar orders the generated table of contents. It usually comes
//! from `llmtxt.toml` as a recursive section tree, but programmatic callers
//! can supply a resolver instead via [`SidebarSource::Dynamic`].

use serde::Deserialize;

/// One node of the sidebar navigation tree.
///
/// A section either links to a page directly (`link`) or groups child
/// sections (`items`), optionally under a heading (`text`). A `base` path
/// is prepended to the links of all descendants.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SidebarSection {
    /// Display text for the section heading or link.
    pub text: Option<String>,
    /// Path prefix applied to all descendant links.
    pub base: Option<String>,
    /// Direct page link (extension optional).
    pub link: Option<String>,
    /// Nested child sections.
    pub items: Option<Vec<SidebarSection>>,
}

/// Where the sidebar tree comes from.
///
/// Static trees come from configuration; dynamic sources let embedding
/// callers compute the tree at bundle time (e.g. from the host site's own
/// navigation state). Dispatch is explicit — no runtime shape sniffing.
pub enum SidebarSource {
    /// A literal section tree.
    Static(Vec<SidebarSection>),
    /// A resolver invoked once per bundle pass.
    Dynamic(Box<dyn Fn() -> Vec<SidebarSection> + Send + Sync>),
}

impl SidebarSource {
    /// Resolve the sidebar tree for this pass.
    #[must_use]
    pub fn resolve(&self) -> Vec<SidebarSection> {
        match self {
            Self::Static(sections) => sections.clone(),
            Self::Dynamic(resolver) => resolver(),
        }
    }
}

impl std::fmt::Debug for SidebarSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(sections) => f.debug_tuple("Static").field(sections).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
