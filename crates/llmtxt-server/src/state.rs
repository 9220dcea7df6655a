//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Directory the generated artifacts were written to.
    pub(crate) out_dir: PathBuf,
}
