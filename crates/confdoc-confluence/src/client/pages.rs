//! Page operations for Confluence API.

use serde_json::json;
use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{ContentResults, Page};

impl ConfluenceClient {
    /// Find a page in the space by exact title.
    ///
    /// Returns the first match, or `None` if no page has this title.
    pub fn find_page(&self, title: &str) -> Result<Option<Page>, ConfluenceError> {
        let url = format!("{}/content", self.api_url());

        info!("Looking up page \"{}\"", title);

        let response: ContentResults = self.get_json(
            &url,
            &[
                ("spaceKey", self.space_key.as_str()),
                ("title", title),
                ("type", "page"),
                ("expand", "version"),
            ],
        )?;
        Ok(response.results.into_iter().next())
    }

    /// Create a page, optionally as a child of `parent_id`.
    pub fn create_page(
        &self,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content", self.api_url());
        let payload = self.create_payload(title, body, parent_id);

        info!("Creating page \"{}\" (parent: {:?})", title, parent_id);

        let page: Page = self.post_json(&url, &payload)?;
        info!("Created page {} \"{}\"", page.id, page.title);
        Ok(page)
    }

    /// Replace the body of an existing page.
    ///
    /// `current_version` must be the version read just before this call; the
    /// request asks for `current_version + 1` and Confluence rejects it if the
    /// page moved on in the meantime.
    pub fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);
        let payload = Self::update_payload(title, body, current_version);

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            current_version,
            current_version + 1
        );

        let page: Page = self.put_json(&url, &payload)?;
        info!("Updated page {} to version {}", page_id, page.version.number);
        Ok(page)
    }

    fn create_payload(
        &self,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> serde_json::Value {
        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": self.space_key},
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            }
        });

        if let Some(parent_id) = parent_id {
            payload["ancestors"] = json!([{"id": parent_id}]);
        }

        payload
    }

    fn update_payload(title: &str, body: &str, current_version: u32) -> serde_json::Value {
        json!({
            "type": "page",
            "title": title,
            "body": {
                "storage": {
                    "value": body,
                    "representation": "storage"
                }
            },
            "version": {"number": current_version + 1}
        })
    }
}
