//! CLI error types.

use confdoc_config::ConfigError;
use confdoc_confluence::{ConfluenceError, ImportError};
use confdoc_renderer::DiagramError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Import(#[from] ImportError),

    #[error("{0}")]
    Diagram(#[from] DiagramError),
}
