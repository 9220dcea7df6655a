//! Include and snippet expansion.
//!
//! Two directive forms pull external file content into a page:
//!
//! - `<!-- @include: path -->` inserts the target file's markdown inline,
//!   expanding any includes the target itself contains
//! - `<<< path` inserts the target wrapped in a fenced code block, with the
//!   language inferred from the file extension
//!
//! Both accept an optional selector suffix: `#name` picks a marked region
//! (see the region-marker dialects in this crate) and `{start,end}` picks a
//! 1-based inclusive line range (either bound may be omitted). Paths
//! starting with `@` resolve from the work root; everything else resolves
//! from the including file's directory.
//!
//! A missing target logs a warning and leaves the directive text in place.
//! Circular includes are detected with an explicit visited set and fail
//! with [`IncludeError::Circular`] instead of recursing unboundedly.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::regions::{dedent, extract_region};

/// `<!-- @include: path -->` directive.
static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*@include:\s*(.+?)\s*-->").unwrap());

/// `<<< path` snippet line (whole line).
static SNIPPET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^<<<\s+(\S+)\s*$").unwrap());

/// Include expansion error.
#[derive(Debug, thiserror::Error)]
pub enum IncludeError {
    /// A file includes itself, directly or transitively.
    #[error("circular include: {}", .0.display())]
    Circular(PathBuf),
}

/// Target selector parsed from a directive path.
#[derive(Debug, PartialEq, Eq)]
enum Selector {
    /// Whole file.
    All,
    /// Named region between paired markers.
    Region(String),
    /// 1-based inclusive line range; `None` bounds are open.
    Lines(Option<usize>, Option<usize>),
}

/// A parsed include target: path plus selector.
#[derive(Debug, PartialEq, Eq)]
struct Target {
    path: String,
    selector: Selector,
}

/// Parse `path`, `path#region`, or `path{start,end}`.
fn parse_target(raw: &str) -> Target {
    if let Some((path, range)) = raw.split_once('{')
        && let Some(range) = range.strip_suffix('}')
        && let Some((start, end)) = range.split_once(',')
    {
        let parse = |s: &str| s.trim().parse::<usize>().ok();
        return Target {
            path: path.to_owned(),
            selector: Selector::Lines(parse(start), parse(end)),
        };
    }
    if let Some((path, region)) = raw.split_once('#')
        && !region.is_empty()
    {
        return Target {
            path: path.to_owned(),
            selector: Selector::Region(region.to_owned()),
        };
    }
    Target {
        path: raw.to_owned(),
        selector: Selector::All,
    }
}

/// Fenced-code-block language for a file extension.
fn language_for_ext(ext: &str) -> &str {
    match ext {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "js",
        "ts" | "mts" | "cts" => "ts",
        "md" => "md",
        "sh" | "bash" => "bash",
        "yml" | "yaml" => "yaml",
        other => other,
    }
}

/// Recursive include/snippet expander.
///
/// Holds the work root for `@`-prefixed paths. Expansion itself is a pure
/// function of the filesystem; the expander carries no per-pass state.
pub struct IncludeExpander {
    root: PathBuf,
}

impl IncludeExpander {
    /// Create an expander resolving `@` paths from `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Expand all include and snippet directives in `content`.
    ///
    /// `dir` is the directory of the file the content came from; relative
    /// targets resolve against it. Content without directives is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IncludeError::Circular`] when a file includes itself,
    /// directly or transitively.
    pub fn expand(&self, content: &str, dir: &Path) -> Result<String, IncludeError> {
        let mut visited = Vec::new();
        self.expand_inner(content, dir, &mut visited)
    }

    fn expand_inner(
        &self,
        content: &str,
        dir: &Path,
        visited: &mut Vec<PathBuf>,
    ) -> Result<String, IncludeError> {
        if !INCLUDE_RE.is_match(content) && !SNIPPET_RE.is_match(content) {
            return Ok(content.to_owned());
        }

        let content = self.replace_directives(content, dir, visited, &INCLUDE_RE, false)?;
        self.replace_directives(&content, dir, visited, &SNIPPET_RE, true)
    }

    /// Replace every match of `pattern` with the resolved target content.
    ///
    /// `regex::Regex::replace_all` cannot thread a `Result` through its
    /// callback, so matches are stitched manually.
    fn replace_directives(
        &self,
        content: &str,
        dir: &Path,
        visited: &mut Vec<PathBuf>,
        pattern: &Regex,
        snippet: bool,
    ) -> Result<String, IncludeError> {
        let mut out = String::with_capacity(content.len());
        let mut last = 0;

        for caps in pattern.captures_iter(content) {
            let whole = caps.get(0).unwrap();
            let raw_target = caps.get(1).unwrap().as_str();
            out.push_str(&content[last..whole.start()]);

            match self.resolve(raw_target, dir, visited, snippet)? {
                Some(expanded) => out.push_str(&expanded),
                // Missing target: keep the directive text (non-fatal).
                None => out.push_str(whole.as_str()),
            }
            last = whole.end();
        }
        out.push_str(&content[last..]);
        Ok(out)
    }

    /// Resolve one directive target to its expanded content.
    ///
    /// Returns `Ok(None)` when the target file cannot be read.
    fn resolve(
        &self,
        raw_target: &str,
        dir: &Path,
        visited: &mut Vec<PathBuf>,
        snippet: bool,
    ) -> Result<Option<String>, IncludeError> {
        let target = parse_target(raw_target);
        let path = self.resolve_path(&target.path, dir);

        let canonical = path.canonicalize().unwrap_or_else(|_| path.clone());
        if visited.contains(&canonical) {
            return Err(IncludeError::Circular(path));
        }

        let Ok(raw) = std::fs::read_to_string(&path) else {
            warn!(path = %path.display(), "include target not found, leaving directive in place");
            return Ok(None);
        };

        let selected = match &target.selector {
            Selector::All => raw.trim_end().to_owned(),
            Selector::Region(name) => match extract_region(&raw, name) {
                Some(region) => region,
                None => {
                    warn!(
                        path = %path.display(),
                        region = name.as_str(),
                        "region not found in include target, leaving directive in place"
                    );
                    return Ok(None);
                }
            },
            Selector::Lines(start, end) => select_lines(&raw, *start, *end),
        };

        if snippet {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            return Ok(Some(fence_wrap(&selected, language_for_ext(ext))));
        }

        // Markdown includes expand recursively, relative to the target's
        // own directory.
        visited.push(canonical);
        let parent = path.parent().unwrap_or(Path::new("."));
        let expanded = self.expand_inner(&selected, parent, visited);
        visited.pop();
        expanded.map(Some)
    }

    /// Resolve a directive path: `@`-prefixed from the work root, otherwise
    /// relative to the including file's directory.
    fn resolve_path(&self, raw: &str, dir: &Path) -> PathBuf {
        if let Some(rooted) = raw.strip_prefix('@') {
            self.root.join(rooted.trim_start_matches('/'))
        } else {
            dir.join(raw)
        }
    }
}

/// Select a 1-based inclusive line range.
fn select_lines(content: &str, start: Option<usize>, end: Option<usize>) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let from = start.map_or(0, |s| s.saturating_sub(1)).min(lines.len());
    let to = end.map_or(lines.len(), |e| e.min(lines.len()));
    if from >= to {
        return String::new();
    }
    dedent(&lines[from..to])
}

/// Wrap content in a fenced code block.
fn fence_wrap(content: &str, language: &str) -> String {
    // A fence must be longer than any fence run inside the content.
    let max_run = content
        .lines()
        .filter(|line| line.trim_start().starts_with("```"))
        .map(|line| line.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(max_run.max(2) + 1);
    format!("{fence}{language}\n{content}\n{fence}")
}
