//! Internal link and image reference rewriting.
//!
//! Links to other local content pages are rewritten to point at the
//! generated plain-markdown mirrors: the source extension is stripped, the
//! configured target extension appended, and the domain/base prefix
//! prepended. Image references are mapped from their original basenames to
//! the bundler's hashed output filenames through a [`RewriteMap`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::warn;

/// Extensions of local content pages.
const CONTENT_EXTENSIONS: [&str; 2] = [".md", ".html"];

/// Markdown link (not image): captures label and URL.
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<bang>!?)\[(?P<label>[^\]]*)\]\((?P<url>[^)\s]+)\)").unwrap());

/// Hashed asset filename: `name.<hash>.ext` with an 8+ char hex-ish hash.
static HASHED_ASSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<stem>.+)\.(?P<hash>[0-9a-zA-Z_-]{6,16})\.(?P<ext>[a-zA-Z0-9]+)$").unwrap());

/// Strip a content-file extension (`.md`, `.html`) from a path.
///
/// Round-trips with re-appending the same extension; non-content
/// extensions are left alone.
#[must_use]
pub fn strip_content_ext(path: &str) -> &str {
    for ext in CONTENT_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}

/// Image basename to bundled filename mapping.
///
/// Either a literal map or a resolver supplied by the embedding caller;
/// dispatch is explicit rather than shape-sniffed at runtime.
pub enum RewriteMap {
    /// Literal basename → bundled filename map.
    Static(HashMap<String, String>),
    /// Resolver invoked per basename.
    Dynamic(Box<dyn Fn(&str) -> Option<String> + Send + Sync>),
}

impl RewriteMap {
    /// Empty map: no images are rewritten.
    #[must_use]
    pub fn empty() -> Self {
        Self::Static(HashMap::new())
    }

    /// Look up the bundled filename for an original basename.
    #[must_use]
    pub fn lookup(&self, basename: &str) -> Option<String> {
        match self {
            Self::Static(map) => map.get(basename).cloned(),
            Self::Dynamic(resolver) => resolver(basename),
        }
    }

    /// Build a map from a JSON manifest of `original → bundled` names.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the manifest is malformed.
    pub fn from_manifest(json: &str) -> Result<Self, serde_json::Error> {
        let map: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::Static(map))
    }

    /// Derive a map by scanning a directory of bundled assets.
    ///
    /// A file named `logo.a1b2c3.png` maps the basename `logo.png` to
    /// `logo.a1b2c3.png`. On duplicate basenames the first mapping wins and
    /// the collision is logged.
    #[must_use]
    pub fn scan_assets(dir: &Path) -> Self {
        let mut map = HashMap::new();
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Self::Static(map);
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        for name in names {
            let Some(caps) = HASHED_ASSET_RE.captures(&name) else {
                continue;
            };
            let basename = format!("{}.{}", &caps["stem"], &caps["ext"]);
            match map.entry(basename) {
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(name);
                }
                std::collections::hash_map::Entry::Occupied(existing) => {
                    warn!(
                        basename = existing.key().as_str(),
                        kept = existing.get().as_str(),
                        ignored = name.as_str(),
                        "duplicate image basename in asset set, keeping first mapping"
                    );
                }
            }
        }
        Self::Static(map)
    }
}

/// Rewrites page links and image references for emitted markdown.
pub struct LinkRewriter {
    /// Domain + base prefix, normalized without a trailing slash.
    prefix: String,
    /// Extension appended to content links (`.md` by default).
    target_ext: String,
    images: RewriteMap,
}

impl LinkRewriter {
    /// Create a rewriter.
    ///
    /// `domain` and `base` are joined into the link prefix; either may be
    /// empty. `target_ext` must include the leading dot.
    #[must_use]
    pub fn new(domain: Option<&str>, base: Option<&str>, target_ext: &str, images: RewriteMap) -> Self {
        let mut prefix = String::new();
        if let Some(domain) = domain {
            prefix.push_str(domain.trim_end_matches('/'));
        }
        if let Some(base) = base {
            let base = base.trim_matches('/');
            if !base.is_empty() {
                prefix.push('/');
                prefix.push_str(base);
            }
        }
        Self {
            prefix,
            target_ext: target_ext.to_owned(),
            images,
        }
    }

    /// The normalized domain/base link prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Rewrite all internal links and image references in `content`.
    #[must_use]
    pub fn rewrite(&self, content: &str) -> String {
        LINK_RE
            .replace_all(content, |caps: &Captures<'_>| {
                let label = &caps["label"];
                let url = &caps["url"];
                let is_image = !caps["bang"].is_empty();
                let rewritten = if is_image {
                    self.rewrite_image(url)
                } else {
                    self.rewrite_link(url)
                };
                match rewritten {
                    Some(target) => format!("{}[{label}]({target})", &caps["bang"]),
                    None => caps[0].to_owned(),
                }
            })
            .into_owned()
    }

    /// Rewrite one link URL, or `None` to leave it as-is.
    fn rewrite_link(&self, url: &str) -> Option<String> {
        if !is_internal(url) {
            return None;
        }
        // Preserve the fragment across the rewrite.
        let (path, fragment) = match url.split_once('#') {
            Some((path, frag)) => (path, Some(frag)),
            None => (url, None),
        };
        if path.is_empty() {
            return None;
        }

        let is_content = CONTENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
            || !last_segment_has_extension(path);
        if !is_content {
            return None;
        }

        // Parent-relative links cannot be resolved without the page path.
        if path.starts_with("../") {
            return None;
        }

        let mut target = strip_content_ext(path.trim_start_matches("./")).to_owned();
        if target.ends_with('/') {
            target.push_str("index");
        }
        target.push_str(&self.target_ext);

        let normalized = target.trim_start_matches('/');
        let mut result = format!("{}/{normalized}", self.prefix);
        if let Some(frag) = fragment {
            result.push('#');
            result.push_str(frag);
        }
        Some(result)
    }

    /// Rewrite one image URL through the rewrite map.
    fn rewrite_image(&self, url: &str) -> Option<String> {
        if !is_internal(url) {
            return None;
        }
        let basename = url.rsplit('/').next().unwrap_or(url);
        let bundled = self.images.lookup(basename)?;
        Some(format!("/{bundled}"))
    }
}

/// Is a URL a local reference (not absolute, mailto, or a bare fragment)?
fn is_internal(url: &str) -> bool {
    !url.contains("://") && !url.starts_with("mailto:") && !url.starts_with('#')
}

/// Does the last path segment carry a file extension?
fn last_segment_has_extension(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}
