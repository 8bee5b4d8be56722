//! Import progress events and run summary.

use std::path::PathBuf;

use super::plan::PageKind;

/// Terminal state of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// New page created.
    Created { id: String },
    /// Leaf page rewritten; `version` is the committed version.
    Updated { id: String, version: u32 },
    /// Structural page already present and left untouched.
    Existing { id: String },
    /// Template file missing; no API call made.
    Skipped { file: PathBuf },
    /// Lookup, create or update failed.
    Failed { error: String },
    /// Dry run: body rendered to `chars` characters, nothing sent.
    Previewed { chars: usize },
}

/// A page reached its terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvent {
    pub kind: PageKind,
    /// Full project-prefixed title.
    pub title: String,
    /// Title without the project prefix.
    pub label: String,
    pub outcome: PageOutcome,
}

/// Terminal state of one diagram upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Image attached to the page.
    Uploaded { id: String },
    /// Image file not found; nothing uploaded.
    Missing { path: PathBuf },
    /// Reading or uploading the image failed.
    Failed { error: String },
    /// Dry run: image found, nothing sent.
    Previewed { bytes: u64 },
}

/// A diagram upload for a leaf page finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentEvent {
    /// Full title of the page the image belongs to.
    pub page: String,
    /// Attachment file name.
    pub file: String,
    pub outcome: AttachmentOutcome,
}

/// Receives progress while an import runs.
pub trait ImportObserver {
    /// Root page is about to be synced.
    fn root_started(&mut self, _title: &str) {}

    /// Section page is about to be synced.
    fn section_started(&mut self, _title: &str) {}

    /// Any page (root, section or leaf) finished.
    fn page_finished(&mut self, _event: &PageEvent) {}

    /// A diagram upload finished, after its page.
    fn attachment_finished(&mut self, _event: &AttachmentEvent) {}
}

impl ImportObserver for () {}

/// Page and attachment counts for a finished run.
///
/// The root page is never counted. Existing section pages are not counted
/// either; in a dry run only leaf previews count, as created. Previewed images
/// count as uploaded, missing images as failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub attachments_uploaded: usize,
    pub attachments_failed: usize,
}

impl ImportSummary {
    pub(crate) fn record(&mut self, event: &PageEvent) {
        if event.kind == PageKind::Root {
            return;
        }
        match event.outcome {
            PageOutcome::Created { .. } => self.created += 1,
            PageOutcome::Previewed { .. } if event.kind == PageKind::Leaf => self.created += 1,
            PageOutcome::Updated { .. } => self.updated += 1,
            PageOutcome::Skipped { .. } => self.skipped += 1,
            PageOutcome::Failed { .. } => self.failed += 1,
            PageOutcome::Existing { .. } | PageOutcome::Previewed { .. } => {}
        }
    }

    pub(crate) fn record_attachment(&mut self, event: &AttachmentEvent) {
        match event.outcome {
            AttachmentOutcome::Uploaded { .. } | AttachmentOutcome::Previewed { .. } => {
                self.attachments_uploaded += 1;
            }
            AttachmentOutcome::Missing { .. } | AttachmentOutcome::Failed { .. } => {
                self.attachments_failed += 1;
            }
        }
    }
}
