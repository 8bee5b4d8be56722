//! Confluence Cloud integration for confdoc.
//!
//! This crate provides:
//! - [`ConfluenceClient`]: REST client with basic authentication and request pacing
//! - [`PageStore`]: title-addressed page and attachment operations the importer runs against
//! - [`PAGE_HIERARCHY`]: the documentation tree mirrored into the space
//! - [`Importer`]: find-or-create-or-update sync of that tree from markdown templates,
//!   with diagram images attached to their pages

mod client;
mod error;
mod hierarchy;
mod importer;
#[cfg(test)]
mod mock;
mod store;
mod types;

pub use client::ConfluenceClient;
pub use error::ConfluenceError;
pub use hierarchy::{PAGE_HIERARCHY, Section};
pub use importer::{
    Action, AttachmentEvent, AttachmentOutcome, ImportConfig, ImportError, ImportObserver,
    ImportSummary, Importer, Lookup, PageDiagram, PageEvent, PageKind, PageOutcome, PageRef,
    decide,
};
pub use store::PageStore;
pub use types::{Attachment, Page, Space, Version};
