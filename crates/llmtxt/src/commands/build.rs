//! `llmtxt build` command implementation.

use std::path::PathBuf;

use clap::Args;
use llmtxt_bundle::BundleGenerator;
use llmtxt_config::{CliSettings, Config};
use llmtxt_markdown::RewriteMap;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover llmtxt.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    work_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Absolute link prefix, e.g. https://docs.example.com (overrides config).
    #[arg(long)]
    domain: Option<String>,

    /// Directory grouping depth (overrides config).
    #[arg(long)]
    depth: Option<usize>,

    /// Directory of bundled assets to map image references against.
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the bundle pass fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            work_dir: self.work_dir,
            out_dir: self.out_dir,
            domain: self.domain,
            depth: self.depth,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Source directory: {}",
            config.paths.work_dir.display()
        ));
        output.info(&format!(
            "Output directory: {}",
            config.paths.out_dir.display()
        ));

        let images = match &self.assets_dir {
            Some(dir) => RewriteMap::scan_assets(dir),
            None => RewriteMap::empty(),
        };

        let generator = BundleGenerator::new(config, images);
        let summary = generator.generate()?;

        for artifact in &summary.artifacts {
            output.info(&format!("  {artifact}"));
        }
        if summary.failures > 0 {
            output.error(&format!(
                "Bundled {} pages, {} skipped because of errors",
                summary.pages, summary.failures
            ));
        } else {
            output.success(&format!(
                "Bundled {} pages into {} artifacts",
                summary.pages,
                summary.artifacts.len()
            ));
        }

        Ok(())
    }
}
