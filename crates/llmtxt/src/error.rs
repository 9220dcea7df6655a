//! CLI error types.

use llmtxt_bundle::BundleError;
use llmtxt_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Bundle(#[from] BundleError),

    #[error("{0}")]
    Server(String),
}
