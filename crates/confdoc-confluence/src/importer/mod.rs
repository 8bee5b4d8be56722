//! Page hierarchy importer.
//!
//! Walks [`PAGE_HIERARCHY`](crate::hierarchy::PAGE_HIERARCHY) and mirrors it
//! into a space:
//!
//! 1. Find or create the project root page
//! 2. For each section, find or create the section page under the root
//! 3. For each template file, convert it and create or update the page under
//!    its section
//! 4. Upload the diagram images configured for that page as attachments
//!
//! Pages are identified by their project-prefixed title only, so re-running an
//! import updates the same pages instead of duplicating them.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use confdoc_confluence::{ConfluenceClient, ImportConfig, Importer};
//!
//! let client = ConfluenceClient::new(
//!     "https://acme.atlassian.net",
//!     "docs@acme.io",
//!     "api-token",
//!     "DOCS",
//! );
//! let config = ImportConfig {
//!     project_name: "Payments".to_owned(),
//!     templates_dir: "templates".into(),
//!     ..ImportConfig::default()
//! };
//!
//! let summary = Importer::new(&client, config).run(&mut ())?;
//! println!("{} created, {} updated", summary.created, summary.updated);
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
mod plan;
mod report;

use std::path::PathBuf;

use confdoc_renderer::Diagram;

pub use error::ImportError;
pub use executor::Importer;
pub use plan::{Action, Lookup, PageKind, PageRef, decide};
pub use report::{
    AttachmentEvent, AttachmentOutcome, ImportObserver, ImportSummary, PageEvent, PageOutcome,
};

/// A diagram image shown on one leaf page.
#[derive(Debug, Clone)]
pub struct PageDiagram {
    /// Leaf page title without the project prefix.
    pub page: String,
    pub diagram: Diagram,
}

/// Settings for one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// Project name, used as the title prefix of every page.
    pub project_name: String,
    /// Root of the `<section>/<page>.md` template tree.
    pub templates_dir: PathBuf,
    /// Only import sections whose folder name contains this substring.
    pub section_filter: Option<String>,
    /// Directory holding the diagram image files.
    pub diagrams_dir: PathBuf,
    /// Diagrams to place and upload, in matching priority order.
    pub diagrams: Vec<PageDiagram>,
}

impl ImportConfig {
    /// Title of the top-level project page.
    #[must_use]
    pub fn root_title(&self) -> String {
        format!("{} - Documentation", self.project_name)
    }

    /// Project-prefixed title for a section or leaf page.
    #[must_use]
    pub fn page_title(&self, title: &str) -> String {
        format!("{} - {}", self.project_name, title)
    }

    /// Path of the template backing a leaf page.
    #[must_use]
    pub fn template_path(&self, section_key: &str, file_stem: &str) -> PathBuf {
        self.templates_dir
            .join(section_key)
            .join(format!("{file_stem}.md"))
    }

    /// Diagrams shown on the leaf page labelled `page`.
    #[must_use]
    pub fn diagrams_for(&self, page: &str) -> Vec<Diagram> {
        self.diagrams
            .iter()
            .filter(|d| d.page == page)
            .map(|d| d.diagram.clone())
            .collect()
    }

    /// Path of a diagram image file.
    #[must_use]
    pub fn diagram_path(&self, diagram: &Diagram) -> PathBuf {
        self.diagrams_dir.join(diagram.file())
    }
}
