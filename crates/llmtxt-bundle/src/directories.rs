//! Directory-depth grouping.
//!
//! Decides which directories get their own `llms.txt`/`llms-full.txt`
//! pair. At depth 1 (the default) only the work root qualifies; at depth 2
//! every first-level subdirectory with pages qualifies as well, and so on.
//! Each descriptor's file set is the subset of pages under it.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A directory that receives its own aggregate output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryDescriptor {
    /// Absolute output directory.
    pub path: PathBuf,
    /// Depth below the root (root is 0).
    pub depth: usize,
    /// Path relative to the root (empty for the root itself).
    pub relative_path: String,
}

impl DirectoryDescriptor {
    /// Does a page at `rel_path` belong to this directory's subtree?
    #[must_use]
    pub fn contains(&self, rel_path: &str) -> bool {
        self.relative_path.is_empty()
            || rel_path.starts_with(&format!("{}/", self.relative_path))
    }
}

/// Compute the qualifying directories for a set of relative page paths.
///
/// The root is always included. Deduplicated and sorted so emission order
/// is deterministic.
#[must_use]
pub fn directories_at_depth(
    rel_paths: &[String],
    out_root: &Path,
    max_depth: usize,
) -> Vec<DirectoryDescriptor> {
    let mut relatives = BTreeSet::new();
    relatives.insert(String::new());

    for rel_path in rel_paths {
        let segments: Vec<&str> = rel_path.split('/').collect();
        // The last segment is the file itself.
        for depth in 1..max_depth.min(segments.len()) {
            relatives.insert(segments[..depth].join("/"));
        }
    }

    relatives
        .into_iter()
        .map(|relative_path| {
            let depth = if relative_path.is_empty() {
                0
            } else {
                relative_path.split('/').count()
            };
            let path = if relative_path.is_empty() {
                out_root.to_path_buf()
            } else {
                out_root.join(&relative_path)
            };
            DirectoryDescriptor {
                path,
                depth,
                relative_path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rels(dirs: &[DirectoryDescriptor]) -> Vec<&str> {
        dirs.iter().map(|d| d.relative_path.as_str()).collect()
    }

    #[test]
    fn test_depth_one_is_root_only() {
        let paths = vec!["a.md".to_owned(), "b/c.md".to_owned()];
        let dirs = directories_at_depth(&paths, Path::new("/out"), 1);
        assert_eq!(rels(&dirs), vec![""]);
        assert_eq!(dirs[0].path, PathBuf::from("/out"));
    }

    #[test]
    fn test_depth_two_adds_first_level_dirs() {
        let paths = vec!["a.md".to_owned(), "b/c.md".to_owned()];
        let dirs = directories_at_depth(&paths, Path::new("/out"), 2);
        assert_eq!(rels(&dirs), vec!["", "b"]);
        assert_eq!(dirs[1].path, PathBuf::from("/out/b"));
        assert_eq!(dirs[1].depth, 1);
    }

    #[test]
    fn test_depth_three_adds_nested_dirs() {
        let paths = vec!["x/y/z.md".to_owned(), "x/top.md".to_owned()];
        let dirs = directories_at_depth(&paths, Path::new("/out"), 3);
        assert_eq!(rels(&dirs), vec!["", "x", "x/y"]);
    }

    #[test]
    fn test_root_level_files_add_no_directories() {
        let paths = vec!["a.md".to_owned(), "b.md".to_owned()];
        let dirs = directories_at_depth(&paths, Path::new("/out"), 3);
        assert_eq!(rels(&dirs), vec![""]);
    }

    #[test]
    fn test_contains_filters_subtree() {
        let paths = vec!["a.md".to_owned(), "b/c.md".to_owned()];
        let dirs = directories_at_depth(&paths, Path::new("/out"), 2);

        let root = &dirs[0];
        let b = &dirs[1];
        assert!(root.contains("a.md"));
        assert!(root.contains("b/c.md"));
        assert!(b.contains("b/c.md"));
        assert!(!b.contains("a.md"));
        assert!(!b.contains("banana/split.md"));
    }
}
