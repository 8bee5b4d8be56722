//! Space operations for Confluence API.

use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::Space;

impl ConfluenceClient {
    /// Fetch the configured space.
    ///
    /// Used as a fail-fast check of base URL, credentials and space key
    /// before any page is written.
    pub fn test_connection(&self) -> Result<Space, ConfluenceError> {
        let url = format!("{}/space/{}", self.api_url(), self.space_key);

        info!("Checking access to space {}", self.space_key);

        let space: Space = self.get_json(&url, &[])?;
        info!("Connected to space {}", space.display_name());
        Ok(space)
    }
}
