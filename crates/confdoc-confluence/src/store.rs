//! Page store abstraction between the importer and the Confluence API.

use crate::client::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{Attachment, Page};

/// Title-addressed page and attachment operations within one space.
///
/// [`ConfluenceClient`] is the production implementation. Lookups are never
/// cached: each call reflects the remote state at that moment.
pub trait PageStore {
    /// Find a page by exact title.
    fn find_page(&self, title: &str) -> Result<Option<Page>, ConfluenceError>;

    /// Create a page, optionally under `parent_id`.
    fn create_page(
        &self,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError>;

    /// Replace a page body, expecting the page to still be at `current_version`.
    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError>;

    /// Attach `data` to a page as `filename`, replacing an attachment of the
    /// same name.
    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError>;
}

impl PageStore for ConfluenceClient {
    fn find_page(&self, title: &str) -> Result<Option<Page>, ConfluenceError> {
        ConfluenceClient::find_page(self, title)
    }

    fn create_page(
        &self,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        ConfluenceClient::create_page(self, title, body, parent_id)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        ConfluenceClient::update_page(self, page_id, title, body, current_version)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        ConfluenceClient::upload_attachment(self, page_id, filename, data, content_type)
    }
}
