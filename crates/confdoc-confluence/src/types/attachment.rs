//! Confluence attachment types.

use serde::Deserialize;

/// Attachment on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment file name.
    pub title: String,
}

/// Attachment listing, also returned when a new attachment is created.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentsResponse {
    #[serde(default)]
    pub results: Vec<Attachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attachment_listing() {
        let json = r#"{
            "results": [{
                "id": "att123",
                "type": "attachment",
                "title": "system-context.png",
                "extensions": {"mediaType": "image/png", "fileSize": 2048}
            }],
            "size": 1
        }"#;
        let response: AttachmentsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, "att123");
        assert_eq!(response.results[0].title, "system-context.png");
    }
}
