//! Import executor.

use std::fs;
use std::path::Path;

use confdoc_renderer::{
    Diagram, convert_markdown, place_diagrams, root_page_body, section_page_body,
};
use tracing::{info, warn};

use crate::hierarchy::{PAGE_HIERARCHY, Section};
use crate::store::PageStore;

use super::ImportConfig;
use super::error::ImportError;
use super::plan::{Action, Lookup, PageKind, decide};
use super::report::{
    AttachmentEvent, AttachmentOutcome, ImportObserver, ImportSummary, PageEvent, PageOutcome,
};

/// Where a leaf page's diagrams go once the page is synced.
enum DiagramTarget {
    Page(String),
    DryRun,
}

/// Mirrors the template tree into a space.
pub struct Importer<'a> {
    /// `None` in dry-run mode: nothing is looked up or written.
    store: Option<&'a dyn PageStore>,
    config: ImportConfig,
    hierarchy: &'a [Section],
}

impl<'a> Importer<'a> {
    /// Create an importer writing to `store`.
    #[must_use]
    pub fn new(store: &'a dyn PageStore, config: ImportConfig) -> Self {
        Self {
            store: Some(store),
            config,
            hierarchy: PAGE_HIERARCHY,
        }
    }

    /// Create an importer that renders every page but makes no API calls.
    #[must_use]
    pub fn dry_run(config: ImportConfig) -> Self {
        Self {
            store: None,
            config,
            hierarchy: PAGE_HIERARCHY,
        }
    }

    /// Replace the page tree to import.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: &'a [Section]) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Run the import, reporting each page to `observer`.
    ///
    /// Per-page failures are counted in the summary and the run continues. A
    /// failed section skips its pages. Diagram uploads follow their page and
    /// never change its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the templates directory does not exist
    /// - the root page cannot be found or created
    pub fn run(&self, observer: &mut dyn ImportObserver) -> Result<ImportSummary, ImportError> {
        let templates_dir = &self.config.templates_dir;
        if !templates_dir.is_dir() {
            return Err(ImportError::TemplatesNotFound(templates_dir.clone()));
        }

        let mut summary = ImportSummary::default();

        let root_title = self.config.root_title();
        observer.root_started(&root_title);
        let root_body = root_page_body(&self.config.project_name);
        let root_id = match self.sync(PageKind::Root, &root_title, &root_body, None) {
            Ok(outcome) => {
                let root_id = parent_id(&outcome);
                finish(PageKind::Root, &root_title, &root_title, outcome, observer, &mut summary);
                root_id
            }
            Err(err) => {
                let outcome = PageOutcome::Failed {
                    error: err.to_string(),
                };
                finish(PageKind::Root, &root_title, &root_title, outcome, observer, &mut summary);
                return Err(ImportError::RootPage {
                    title: root_title,
                    source: Box::new(err),
                });
            }
        };

        let filter = self.config.section_filter.as_deref();
        for section in self.hierarchy.iter().filter(|s| s.matches(filter)) {
            self.import_section(section, root_id.as_deref(), observer, &mut summary);
        }

        info!(
            "Import finished: {} created, {} updated, {} skipped, {} failed",
            summary.created, summary.updated, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    fn import_section(
        &self,
        section: &Section,
        root_id: Option<&str>,
        observer: &mut dyn ImportObserver,
        summary: &mut ImportSummary,
    ) {
        let title = self.config.page_title(section.title);
        observer.section_started(&title);

        let body = section_page_body(section.title);
        let outcome = into_outcome(self.sync(PageKind::Section, &title, &body, root_id));
        let failed = matches!(outcome, PageOutcome::Failed { .. });
        let section_id = parent_id(&outcome);
        finish(PageKind::Section, &title, section.title, outcome, observer, summary);

        if failed {
            warn!("Skipping pages of section \"{}\"", title);
            return;
        }

        for (file_stem, label) in section.pages {
            let title = self.config.page_title(label);
            let diagrams = self.config.diagrams_for(label);
            let result =
                self.import_leaf(section, file_stem, &title, &diagrams, section_id.as_deref());
            let outcome = into_outcome(result);
            let target = diagram_target(&outcome);
            finish(PageKind::Leaf, &title, label, outcome, observer, summary);

            if let Some(target) = target {
                for diagram in &diagrams {
                    let outcome = self.upload_diagram(diagram, &target);
                    finish_attachment(&title, diagram, outcome, observer, summary);
                }
            }
        }
    }

    fn import_leaf(
        &self,
        section: &Section,
        file_stem: &str,
        title: &str,
        diagrams: &[Diagram],
        section_id: Option<&str>,
    ) -> Result<PageOutcome, ImportError> {
        let path = self.config.template_path(section.key, file_stem);
        if !path.is_file() {
            info!("Template {} not found, skipping", path.display());
            return Ok(PageOutcome::Skipped { file: path });
        }

        let markdown = fs::read_to_string(&path).map_err(|source| ImportError::ReadTemplate {
            path: path.clone(),
            source,
        })?;
        let mut body = convert_markdown(&markdown);
        if !diagrams.is_empty() {
            let placement = place_diagrams(&body, diagrams);
            info!(
                "Placed {} diagram(s) inline and {} under the title of \"{}\"",
                placement.inline.len(),
                placement.inserted.len(),
                title
            );
            body = placement.body;
        }
        self.sync(PageKind::Leaf, title, &body, section_id)
    }

    /// Attach one diagram image to its page.
    fn upload_diagram(&self, diagram: &Diagram, target: &DiagramTarget) -> AttachmentOutcome {
        let path = self.config.diagram_path(diagram);
        if !path.is_file() {
            return AttachmentOutcome::Missing { path };
        }

        match (target, self.store) {
            (DiagramTarget::Page(page_id), Some(store)) => {
                let data = match fs::read(&path) {
                    Ok(data) => data,
                    Err(err) => {
                        return AttachmentOutcome::Failed {
                            error: format!("{}: {err}", path.display()),
                        };
                    }
                };
                match store.upload_attachment(page_id, diagram.file(), &data, content_type(&path))
                {
                    Ok(attachment) => AttachmentOutcome::Uploaded { id: attachment.id },
                    Err(err) => AttachmentOutcome::Failed {
                        error: err.to_string(),
                    },
                }
            }
            _ => AttachmentOutcome::Previewed {
                bytes: fs::metadata(&path).map_or(0, |m| m.len()),
            },
        }
    }

    /// Look `title` up, decide, and apply the decision.
    fn sync(
        &self,
        kind: PageKind,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<PageOutcome, ImportError> {
        let lookup = match self.store {
            Some(store) => store
                .find_page(title)?
                .map_or(Lookup::NotFound, |page| Lookup::Found(page.into())),
            None => Lookup::NotQueried,
        };
        self.apply(decide(kind, lookup), title, body, parent_id)
    }

    fn apply(
        &self,
        action: Action,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<PageOutcome, ImportError> {
        match (action, self.store) {
            (_, None) => Ok(PageOutcome::Previewed {
                chars: body.chars().count(),
            }),
            (Action::Create, Some(store)) => {
                let page = store.create_page(title, body, parent_id)?;
                Ok(PageOutcome::Created { id: page.id })
            }
            (Action::Update { id, version }, Some(store)) => {
                let page = store.update_page(&id, title, body, version)?;
                Ok(PageOutcome::Updated {
                    id,
                    version: page.version.number,
                })
            }
            (Action::Skip { id }, Some(_)) => {
                info!("Page \"{}\" already exists (id: {})", title, id);
                Ok(PageOutcome::Existing { id })
            }
        }
    }
}

/// Turn a page error into a `Failed` outcome.
fn into_outcome(result: Result<PageOutcome, ImportError>) -> PageOutcome {
    result.unwrap_or_else(|err| PageOutcome::Failed {
        error: err.to_string(),
    })
}

/// Log, count and report a page's terminal state.
fn finish(
    kind: PageKind,
    title: &str,
    label: &str,
    outcome: PageOutcome,
    observer: &mut dyn ImportObserver,
    summary: &mut ImportSummary,
) {
    if let PageOutcome::Failed { error } = &outcome {
        warn!("Failed to sync \"{}\": {}", title, error);
    }
    let event = PageEvent {
        kind,
        title: title.to_owned(),
        label: label.to_owned(),
        outcome,
    };
    summary.record(&event);
    observer.page_finished(&event);
}

/// Log, count and report a diagram upload.
fn finish_attachment(
    page: &str,
    diagram: &Diagram,
    outcome: AttachmentOutcome,
    observer: &mut dyn ImportObserver,
    summary: &mut ImportSummary,
) {
    match &outcome {
        AttachmentOutcome::Missing { path } => {
            warn!("Diagram {} for \"{}\" not found", path.display(), page);
        }
        AttachmentOutcome::Failed { error } => {
            warn!("Failed to attach {} to \"{}\": {}", diagram.file(), page, error);
        }
        AttachmentOutcome::Uploaded { .. } | AttachmentOutcome::Previewed { .. } => {}
    }
    let event = AttachmentEvent {
        page: page.to_owned(),
        file: diagram.file().to_owned(),
        outcome,
    };
    summary.record_attachment(&event);
    observer.attachment_finished(&event);
}

/// Whether a leaf's diagrams should be attached, and where.
fn diagram_target(outcome: &PageOutcome) -> Option<DiagramTarget> {
    match outcome {
        PageOutcome::Created { id } | PageOutcome::Updated { id, .. } => {
            Some(DiagramTarget::Page(id.clone()))
        }
        PageOutcome::Previewed { .. } => Some(DiagramTarget::DryRun),
        _ => None,
    }
}

/// MIME type for an image file, by extension.
fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Id to attach children to, if the page exists remotely.
fn parent_id(outcome: &PageOutcome) -> Option<String> {
    match outcome {
        PageOutcome::Created { id } | PageOutcome::Existing { id } => Some(id.clone()),
        _ => None,
    }
}
