//! Aggregate artifact assembly.
//!
//! Builds the three output forms: the templated `llms.txt` is assembled by
//! the generator from [`crate::template`] and [`crate::toc`]; this module
//! renders the concatenated `llms-full.txt`, the per-page mirrors, and
//! writes artifacts with token/size statistics. Content is always fully
//! assembled in memory before anything touches disk, so no partial file is
//! ever left behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::page::PreparedFile;
use crate::toc::UrlBuilder;
use crate::tokens::{approx_token_count, human_size};

/// Separator between pages in `llms-full.txt`.
const PAGE_SEPARATOR: &str = "\n---\n\n";

/// Hint appended to mirrors when `inject_llm_hint` is enabled.
const LLM_HINT: &str =
    "<!-- This page is an LLM-friendly markdown mirror. The complete bundle is at /llms-full.txt -->";

/// Front matter written to emitted pages.
#[derive(Serialize)]
struct MirrorMatter<'a> {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Size and token statistics for one written artifact.
#[derive(Debug, Clone)]
pub struct ArtifactStats {
    /// Written file path.
    pub path: PathBuf,
    /// Size in bytes.
    pub bytes: usize,
    /// Approximate token count.
    pub tokens: usize,
}

impl std::fmt::Display for ArtifactStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, ~{} tokens)",
            self.path.display(),
            human_size(self.bytes),
            self.tokens
        )
    }
}

/// Serialized `---`-fenced front matter carrying the page URL and
/// description.
#[must_use]
pub fn front_matter_block(url: String, description: Option<&str>) -> String {
    let matter = MirrorMatter { url, description };
    // Serialization of a two-string-field struct cannot fail.
    let yaml = serde_yaml::to_string(&matter).unwrap_or_default();
    format!("---\n{yaml}---\n\n")
}

/// Render one page as it appears in mirrors and `llms-full.txt`.
#[must_use]
pub fn render_page(file: &PreparedFile, urls: &UrlBuilder, inject_hint: bool) -> String {
    let mut out = front_matter_block(
        urls.url_for(file),
        file.meta.matter.description.as_deref(),
    );
    out.push_str(file.meta.body.trim_end());
    out.push('\n');
    if inject_hint {
        out.push('\n');
        out.push_str(LLM_HINT);
        out.push('\n');
    }
    out
}

/// Render the concatenated `llms-full.txt` for a set of pages.
#[must_use]
pub fn render_llms_full(files: &[PreparedFile], urls: &UrlBuilder) -> String {
    files
        .iter()
        .map(|file| render_page(file, urls, false))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Write an artifact, creating parent directories on demand.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn write_artifact(path: &Path, content: &str) -> std::io::Result<ArtifactStats> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(ArtifactStats {
        path: path.to_path_buf(),
        bytes: content.len(),
        tokens: approx_token_count(content),
    })
}
