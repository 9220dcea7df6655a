//! Source page discovery.
//!
//! Walks the work directory for `.md` sources, applying the configured
//! ignore globs and the built-in exclusion rules. Discovery only collects
//! relative paths — reading and transforming the files is the generator's
//! job, which keeps the two phases independently testable.

use std::fs;
use std::path::Path;

use glob::Pattern;
use tracing::warn;

/// Exclusion rules applied during discovery.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Glob patterns of relative paths to skip.
    pub ignore: Vec<Pattern>,
    /// Master switch for the rules below.
    pub exclude_unnecessary: bool,
    /// Skip the root `index.md`.
    pub exclude_index_page: bool,
    /// Skip pages under a top-level `blog/` directory.
    pub exclude_blog: bool,
    /// Skip pages under a top-level `team/` directory.
    pub exclude_team: bool,
}

impl ScanOptions {
    /// Compile ignore globs, dropping invalid patterns with a warning.
    #[must_use]
    pub fn with_ignore_globs(mut self, globs: &[String]) -> Self {
        self.ignore = globs
            .iter()
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    warn!(pattern = raw.as_str(), %err, "invalid ignore glob, skipping");
                    None
                }
            })
            .collect();
        self
    }

    /// Should a relative path be excluded?
    fn excludes(&self, rel_path: &str) -> bool {
        if self.ignore.iter().any(|pattern| pattern.matches(rel_path)) {
            return true;
        }
        if !self.exclude_unnecessary {
            return false;
        }
        if self.exclude_index_page && rel_path == "index.md" {
            return true;
        }
        let top = rel_path.split('/').next().unwrap_or(rel_path);
        (self.exclude_blog && top == "blog") || (self.exclude_team && top == "team")
    }
}

/// Scan `work_dir` for markdown sources.
///
/// Returns relative paths with `/` separators, sorted for deterministic
/// output. Hidden files and directories are skipped. A missing work
/// directory yields an empty set.
#[must_use]
pub fn scan(work_dir: &Path, options: &ScanOptions) -> Vec<String> {
    let mut paths = Vec::new();
    if work_dir.exists() {
        scan_directory(work_dir, "", options, &mut paths);
    }
    paths.sort();
    paths
}

fn scan_directory(dir: &Path, prefix: &str, options: &ScanOptions, paths: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let rel = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}/{name}")
        };
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            scan_directory(&entry.path(), &rel, options, paths);
        } else if name.ends_with(".md") && !options.excludes(&rel) {
            paths.push(rel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_scan_finds_markdown_recursively() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "index.md");
        touch(&dir, "guide/setup.md");
        touch(&dir, "guide/deep/advanced.md");
        touch(&dir, "style.css");

        let paths = scan(dir.path(), &ScanOptions::default());

        assert_eq!(paths, vec!["guide/deep/advanced.md", "guide/setup.md", "index.md"]);
    }

    #[test]
    fn test_scan_skips_hidden() {
        let dir = TempDir::new().unwrap();
        touch(&dir, ".vitepress/config.md");
        touch(&dir, "visible.md");

        let paths = scan(dir.path(), &ScanOptions::default());

        assert_eq!(paths, vec!["visible.md"]);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        assert!(scan(Path::new("/nonexistent-work-dir"), &ScanOptions::default()).is_empty());
    }

    #[test]
    fn test_ignore_globs_applied() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "internal/secret.md");
        touch(&dir, "public.md");

        let options = ScanOptions::default().with_ignore_globs(&["internal/**".to_owned()]);
        let paths = scan(dir.path(), &options);

        assert_eq!(paths, vec!["public.md"]);
    }

    #[test]
    fn test_unnecessary_file_exclusions() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "index.md");
        touch(&dir, "blog/post.md");
        touch(&dir, "team/people.md");
        touch(&dir, "guide.md");

        let options = ScanOptions {
            exclude_unnecessary: true,
            exclude_index_page: true,
            exclude_blog: true,
            exclude_team: true,
            ..ScanOptions::default()
        };
        let paths = scan(dir.path(), &options);

        assert_eq!(paths, vec!["guide.md"]);
    }

    #[test]
    fn test_master_switch_off_keeps_everything() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "blog/post.md");

        let options = ScanOptions {
            exclude_unnecessary: false,
            exclude_blog: true,
            ..ScanOptions::default()
        };
        let paths = scan(dir.path(), &options);

        assert_eq!(paths, vec!["blog/post.md"]);
    }

    #[test]
    fn test_nested_index_not_excluded_by_index_rule() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "index.md");
        touch(&dir, "guide/index.md");

        let options = ScanOptions {
            exclude_unnecessary: true,
            exclude_index_page: true,
            ..ScanOptions::default()
        };
        let paths = scan(dir.path(), &options);

        assert_eq!(paths, vec!["guide/index.md"]);
    }
}
