//! Configuration management for llmtxt.
//!
//! Parses `llmtxt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! The configuration surface mirrors the bundler options: which artifacts
//! to generate (`llms.txt`, `llms-full.txt`, per-page mirrors), file
//! exclusion rules, link prefixes, template variable overrides, the sidebar
//! navigation tree, and the experimental per-directory grouping depth.

mod sidebar;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use sidebar::{SidebarSection, SidebarSource};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override the markdown source directory.
    pub work_dir: Option<PathBuf>,
    /// Override the output directory.
    pub out_dir: Option<PathBuf>,
    /// Override the link domain prefix.
    pub domain: Option<String>,
    /// Override the directory grouping depth.
    pub depth: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "llmtxt.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generate the root (and per-directory) `llms.txt`.
    pub generate_llms_txt: bool,
    /// Generate the root (and per-directory) `llms-full.txt`.
    pub generate_llms_full_txt: bool,
    /// Write a plain `.md` mirror for every source page.
    pub generate_page_mirrors: bool,

    /// Glob patterns of source files to skip entirely.
    pub ignore_files: Vec<String>,
    /// Master switch for the built-in exclusion rules below.
    pub exclude_unnecessary_files: bool,
    /// Exclude the root `index.md` from TOC and full-text output.
    pub exclude_index_page: bool,
    /// Exclude files under `blog/` directories.
    pub exclude_blog: bool,
    /// Exclude files under `team/` directories.
    pub exclude_team: bool,

    /// Append a hint comment to each page mirror pointing at `llms-full.txt`.
    pub inject_llm_hint: bool,
    /// Strip inline HTML tags from emitted markdown.
    pub strip_html: bool,

    /// Absolute URL prefix for generated links (e.g. `https://docs.example.com`).
    pub domain: Option<String>,
    /// Site base path prepended after the domain (e.g. `/docs`).
    pub base: Option<String>,

    /// Template variable override: `{title}`.
    pub title: Option<String>,
    /// Template variable override: `{description}`.
    pub description: Option<String>,
    /// Template variable override: `{details}`.
    pub details: Option<String>,
    /// Template variable override: `{toc}`.
    pub toc: Option<String>,
    /// Custom `llms.txt` template with `{title}`, `{description}`,
    /// `{details}` and `{toc}` placeholders.
    pub custom_llms_txt_template: Option<String>,

    /// Sidebar navigation tree used to order the table of contents.
    pub sidebar: Option<Vec<SidebarSection>>,

    /// Experimental options.
    pub experimental: ExperimentalConfig,
    /// Dev server configuration.
    pub server: ServerConfig,

    /// Markdown source directory (relative string as parsed from TOML).
    work_dir: Option<String>,
    /// Output directory (relative string as parsed from TOML).
    out_dir: Option<String>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: ResolvedPaths,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Resolved source and output directories with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct ResolvedPaths {
    /// Directory containing the markdown sources.
    pub work_dir: PathBuf,
    /// Directory the generated artifacts are written to.
    pub out_dir: PathBuf,
}

/// Experimental configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExperimentalConfig {
    /// Directory grouping depth: 1 emits a single root `llms.txt` pair,
    /// higher values add one pair per subdirectory up to that depth.
    pub depth: usize,
}

impl Default for ExperimentalConfig {
    fn default() -> Self {
        Self { depth: 1 }
    }
}

/// Dev server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `llmtxt.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(work_dir) = &settings.work_dir {
            self.paths.work_dir.clone_from(work_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
        if let Some(domain) = &settings.domain {
            self.domain = Some(domain.clone());
        }
        if let Some(depth) = settings.depth {
            self.experimental.depth = depth;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            generate_llms_txt: true,
            generate_llms_full_txt: true,
            generate_page_mirrors: true,
            ignore_files: Vec::new(),
            exclude_unnecessary_files: true,
            exclude_index_page: false,
            exclude_blog: true,
            exclude_team: true,
            inject_llm_hint: false,
            strip_html: false,
            domain: None,
            base: None,
            title: None,
            description: None,
            details: None,
            toc: None,
            custom_llms_txt_template: None,
            sidebar: None,
            experimental: ExperimentalConfig::default(),
            server: ServerConfig::default(),
            work_dir: None,
            out_dir: None,
            paths: ResolvedPaths {
                work_dir: base.join("docs"),
                out_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve `work_dir`/`out_dir` against the config file's directory.
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |raw: Option<&String>, default: &str| {
            let rel = raw.map_or(default, String::as_str);
            let path = Path::new(rel);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            }
        };
        self.paths = ResolvedPaths {
            work_dir: resolve(self.work_dir.as_ref(), "docs"),
            out_dir: resolve(self.out_dir.as_ref(), "dist"),
        };
    }

    /// Validate the loaded configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.experimental.depth < 1 {
            return Err(ConfigError::Validation(
                "experimental.depth must be >= 1".to_owned(),
            ));
        }
        if let Some(domain) = &self.domain
            && !domain.is_empty()
            && !domain.starts_with("http://")
            && !domain.starts_with("https://")
        {
            return Err(ConfigError::Validation(
                "domain must start with http:// or https://".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.generate_llms_txt);
        assert!(config.generate_llms_full_txt);
        assert!(config.generate_page_mirrors);
        assert!(config.exclude_unnecessary_files);
        assert!(!config.exclude_index_page);
        assert!(config.exclude_blog);
        assert!(config.exclude_team);
        assert!(!config.inject_llm_hint);
        assert!(!config.strip_html);
        assert_eq!(config.experimental.depth, 1);
        assert_eq!(config.server.port, 7980);
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/llmtxt.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_resolves_paths_relative_to_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "work_dir = \"pages\"\nout_dir = \"build/out\"\n",
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.paths.work_dir, dir.path().join("pages"));
        assert_eq!(config.paths.out_dir, dir.path().join("build/out"));
    }

    #[test]
    fn test_load_parses_flags_and_template() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r##"
generate_llms_full_txt = false
strip_html = true
ignore_files = ["internal/**"]
domain = "https://docs.example.com"
custom_llms_txt_template = "# {title}"
"##,
        );

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.generate_llms_txt);
        assert!(!config.generate_llms_full_txt);
        assert!(config.strip_html);
        assert_eq!(config.ignore_files, vec!["internal/**".to_owned()]);
        assert_eq!(config.domain.as_deref(), Some("https://docs.example.com"));
        assert_eq!(config.custom_llms_txt_template.as_deref(), Some("# {title}"));
    }

    #[test]
    fn test_load_parses_sidebar_tree() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[sidebar]]
text = "Guide"
base = "guide"

[[sidebar.items]]
text = "Getting Started"
link = "getting-started"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();

        let sidebar = config.sidebar.unwrap();
        assert_eq!(sidebar.len(), 1);
        assert_eq!(sidebar[0].text.as_deref(), Some("Guide"));
        assert_eq!(sidebar[0].items.as_ref().unwrap()[0].link.as_deref(), Some("getting-started"));
    }

    #[test]
    fn test_cli_settings_override_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "work_dir = \"pages\"\n");

        let settings = CliSettings {
            work_dir: Some(PathBuf::from("/elsewhere")),
            depth: Some(3),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.paths.work_dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.experimental.depth, 3);
    }

    #[test]
    fn test_depth_zero_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[experimental]\ndepth = 0\n");

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bare_domain_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "domain = \"docs.example.com\"\n");

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
