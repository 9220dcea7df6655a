//! Bundle assembly for llmtxt.
//!
//! Turns a directory of markdown documentation sources into LLM-friendly
//! text artifacts: a templated `llms.txt` summary with a table of
//! contents, a concatenated `llms-full.txt`, and a plain `.md` mirror per
//! page. Grouping by directory depth lets large sites emit one artifact
//! pair per section.
//!
//! [`BundleGenerator`] drives one full pass; the remaining modules are its
//! independently testable stages.

pub mod directories;
pub mod emit;
mod generator;
pub mod page;
pub mod scanner;
pub mod template;
pub mod toc;
pub mod tokens;

pub use directories::{DirectoryDescriptor, directories_at_depth};
pub use emit::ArtifactStats;
pub use generator::{BundleError, BundleGenerator, BundleSummary};
pub use page::PreparedFile;
pub use toc::{UrlBuilder, build_toc};
