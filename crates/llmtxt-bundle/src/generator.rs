//! Bundle generation pass.
//!
//! Orchestrates one full pass: scan the work directory, prepare every page
//! in parallel, group by directory depth, and emit the aggregate artifacts
//! and per-page mirrors. Per-file failures are logged with the offending
//! path and skipped — one broken page never aborts the rest of the pass.

use std::path::Path;
use std::sync::Mutex;

use rayon::prelude::*;
use tracing::{debug, error, info};

use llmtxt_config::{Config, SidebarSection, SidebarSource};
use llmtxt_markdown::{
    FrontmatterCache, FrontmatterError, IncludeError, IncludeExpander, LinkRewriter, RewriteMap,
    filter_directives, strip_html,
};

use crate::directories::{DirectoryDescriptor, directories_at_depth};
use crate::emit::{ArtifactStats, render_llms_full, render_page, write_artifact};
use crate::page::PreparedFile;
use crate::scanner::{ScanOptions, scan};
use crate::template::{DEFAULT_TEMPLATE, expand_template};
use crate::toc::{UrlBuilder, build_toc};

/// Bundle generation error. Per-file failures are handled inside the pass;
/// only whole-pass failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-page preparation failure.
#[derive(Debug, thiserror::Error)]
enum PrepareError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Frontmatter(#[from] FrontmatterError),
    #[error("{0}")]
    Include(#[from] IncludeError),
}

/// Result of a bundle pass.
#[derive(Debug, Default)]
pub struct BundleSummary {
    /// Artifacts written, with size/token statistics.
    pub artifacts: Vec<ArtifactStats>,
    /// Pages prepared successfully.
    pub pages: usize,
    /// Pages or artifacts skipped because of an error.
    pub failures: usize,
}

/// Bundle generator for one configuration.
///
/// Holds the parse cache across passes; the cache is cleared at the start
/// of every pass so content changes between passes are always observed.
pub struct BundleGenerator {
    config: Config,
    rewriter: LinkRewriter,
    sidebar_override: Option<SidebarSource>,
    cache: Mutex<FrontmatterCache>,
}

impl BundleGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(config: Config, images: RewriteMap) -> Self {
        let rewriter = LinkRewriter::new(
            config.domain.as_deref(),
            config.base.as_deref(),
            ".md",
            images,
        );
        Self {
            config,
            rewriter,
            sidebar_override: None,
            cache: Mutex::new(FrontmatterCache::new()),
        }
    }

    /// Supply a sidebar source overriding the configured tree. Dynamic
    /// sources are resolved once per pass.
    #[must_use]
    pub fn with_sidebar(mut self, source: SidebarSource) -> Self {
        self.sidebar_override = Some(source);
        self
    }

    /// Run one bundle pass.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] only for whole-pass failures; per-file
    /// errors are logged and counted in the summary.
    pub fn generate(&self) -> Result<BundleSummary, BundleError> {
        self.cache.lock().unwrap().clear();

        let config = &self.config;
        let options = ScanOptions {
            exclude_unnecessary: config.exclude_unnecessary_files,
            exclude_index_page: config.exclude_index_page,
            exclude_blog: config.exclude_blog,
            exclude_team: config.exclude_team,
            ..ScanOptions::default()
        }
        .with_ignore_globs(&config.ignore_files);

        let rel_paths = scan(&config.paths.work_dir, &options);
        debug!(pages = rel_paths.len(), "scanned work directory");

        let urls = UrlBuilder::new(self.rewriter.prefix(), ".md");

        // Per-file transforms are independent; ordering must not matter.
        let results: Vec<(String, Result<PreparedFile, PrepareError>)> = rel_paths
            .par_iter()
            .map(|rel_path| (rel_path.clone(), self.prepare_file(rel_path)))
            .collect();

        let mut summary = BundleSummary::default();
        let mut files = Vec::new();
        for (rel_path, result) in results {
            match result {
                Ok(file) => files.push(file),
                Err(err) => {
                    error!(path = rel_path.as_str(), %err, "failed to prepare page, skipping");
                    summary.failures += 1;
                }
            }
        }
        summary.pages = files.len();

        // Title-alphabetical fallback order for the TOC "Other" section and
        // the full-text concatenation.
        files.sort_by_key(|file| file.title.to_lowercase());

        let directories = directories_at_depth(
            &files.iter().map(PreparedFile::mirror_path).collect::<Vec<_>>(),
            &config.paths.out_dir,
            config.experimental.depth,
        );

        let sidebar: Option<Vec<SidebarSection>> = match &self.sidebar_override {
            Some(source) => Some(source.resolve()),
            None => config.sidebar.clone(),
        };

        for directory in &directories {
            self.emit_directory(directory, &files, sidebar.as_deref(), &urls, &mut summary);
        }

        if config.generate_page_mirrors {
            let mirror_results: Vec<Result<ArtifactStats, std::io::Error>> = files
                .par_iter()
                .map(|file| {
                    let content = render_page(file, &urls, config.inject_llm_hint);
                    write_artifact(&config.paths.out_dir.join(file.mirror_path()), &content)
                })
                .collect();
            for result in mirror_results {
                match result {
                    Ok(stats) => {
                        debug!(artifact = %stats, "wrote page mirror");
                        summary.artifacts.push(stats);
                    }
                    Err(err) => {
                        error!(%err, "failed to write page mirror, skipping");
                        summary.failures += 1;
                    }
                }
            }
        }

        Ok(summary)
    }

    /// Prepare one source page: directive filter → include expansion →
    /// front matter → HTML strip → link rewrite.
    fn prepare_file(&self, rel_path: &str) -> Result<PreparedFile, PrepareError> {
        let config = &self.config;
        let source_path = config.paths.work_dir.join(rel_path);
        let raw = std::fs::read_to_string(&source_path)?;

        let filtered = filter_directives(&raw);

        let expander = IncludeExpander::new(config.paths.work_dir.clone());
        let source_dir = source_path.parent().unwrap_or(Path::new("."));
        let expanded = expander.expand(&filtered, source_dir)?;

        let mut meta = self.cache.lock().unwrap().parse(&expanded)?;

        if config.strip_html {
            meta.body = strip_html(&meta.body);
        }
        meta.body = self.rewriter.rewrite(&meta.body);

        let title = meta.resolve_title(config.title.as_deref());
        Ok(PreparedFile {
            path: llmtxt_markdown::strip_content_ext(rel_path).to_owned(),
            title,
            meta,
        })
    }

    /// Emit the `llms.txt`/`llms-full.txt` pair for one directory.
    fn emit_directory(
        &self,
        directory: &DirectoryDescriptor,
        files: &[PreparedFile],
        sidebar: Option<&[SidebarSection]>,
        urls: &UrlBuilder,
        summary: &mut BundleSummary,
    ) {
        let config = &self.config;
        let subset: Vec<PreparedFile> = files
            .iter()
            .filter(|file| directory.contains(&file.mirror_path()))
            .cloned()
            .collect();
        if subset.is_empty() {
            return;
        }

        if config.generate_llms_txt {
            let content = self.render_llms_txt(directory, &subset, sidebar, urls);
            self.write_aggregate(&directory.path.join("llms.txt"), &content, summary);
        }

        if config.generate_llms_full_txt {
            let content = render_llms_full(&subset, urls);
            self.write_aggregate(&directory.path.join("llms-full.txt"), &content, summary);
        }
    }

    /// Render the templated `llms.txt` for one directory.
    fn render_llms_txt(
        &self,
        directory: &DirectoryDescriptor,
        subset: &[PreparedFile],
        sidebar: Option<&[SidebarSection]>,
        urls: &UrlBuilder,
    ) -> String {
        let config = &self.config;

        // Header variables come from the directory's index page.
        let index_meta = subset
            .iter()
            .find(|file| file.normalized_path() == directory.relative_path)
            .map(|file| &file.meta);

        let title = config.title.clone().or_else(|| {
            index_meta.map(|meta| meta.resolve_title(None))
        });
        let title = title.unwrap_or_else(|| "Documentation".to_owned());

        let description = config
            .description
            .clone()
            .or_else(|| index_meta.and_then(|meta| meta.resolve_description(None)))
            .unwrap_or_default();

        let details = config.details.clone().unwrap_or_default();

        let toc = config
            .toc
            .clone()
            .unwrap_or_else(|| build_toc(subset, sidebar, urls));

        let template = config
            .custom_llms_txt_template
            .as_deref()
            .unwrap_or(DEFAULT_TEMPLATE);
        expand_template(template, &[
            ("title", &title),
            ("description", &description),
            ("details", &details),
            ("toc", toc.trim_end()),
        ])
    }

    /// Write one aggregate artifact, logging per-artifact failures.
    fn write_aggregate(&self, path: &Path, content: &str, summary: &mut BundleSummary) {
        match write_artifact(path, content) {
            Ok(stats) => {
                info!(artifact = %stats, "wrote aggregate");
                summary.artifacts.push(stats);
            }
            Err(err) => {
                error!(path = %path.display(), %err, "failed to write aggregate, skipping");
                summary.failures += 1;
            }
        }
    }
}
