//! Import error types.

use std::path::PathBuf;

use crate::error::ConfluenceError;

/// Error during an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Templates directory does not exist.
    #[error("Templates directory not found: {}", .0.display())]
    TemplatesNotFound(PathBuf),

    /// Template file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Confluence API call failed.
    #[error(transparent)]
    Remote(#[from] ConfluenceError),

    /// Root page could not be found or created; nothing can be attached.
    #[error("Failed to create root page \"{title}\": {source}")]
    RootPage {
        title: String,
        #[source]
        source: Box<ImportError>,
    },
}
