//! Attachment operations for Confluence API.

use rand::RngExt;
use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// Upload or replace an attachment on a page (upsert by file name).
    pub fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        let existing = self.find_attachment(page_id, filename)?;

        let url = if let Some(att) = &existing {
            info!(
                "Replacing attachment \"{}\" (id={}) on page {}",
                filename, att.id, page_id
            );
            format!(
                "{}/content/{}/child/attachment/{}/data",
                self.api_url(),
                page_id,
                att.id
            )
        } else {
            info!("Uploading attachment \"{}\" to page {}", filename, page_id);
            format!("{}/content/{}/child/attachment", self.api_url(), page_id)
        };

        let boundary = format!(
            "----ConfdocFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let body = multipart_body(&boundary, filename, content_type, data);

        self.pace();
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .header("Accept", "application/json")
            .send(&body[..])?;

        // Replacing returns the attachment, creating returns a listing
        if existing.is_some() {
            return Self::read_json(response);
        }
        let created: AttachmentsResponse = Self::read_json(response)?;
        created
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ConfluenceError::HttpResponse {
                status: 200,
                body: "Empty attachment response".to_owned(),
            })
    }

    /// Find an attachment on a page by file name.
    fn find_attachment(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Option<Attachment>, ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.api_url(), page_id);
        let listing: AttachmentsResponse = self.get_json(&url, &[("filename", filename)])?;
        Ok(listing.results.into_iter().find(|a| a.title == filename))
    }
}

/// Build a `multipart/form-data` body with a single `file` part.
fn multipart_body(boundary: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let filename = filename.replace('"', "%22");
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_multipart_body_layout() {
        let body = multipart_body("XYZ", "context.png", "image/png", b"\x89PNG");
        let mut expected = b"--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"context.png\"\r\n\
            Content-Type: image/png\r\n\r\n"
            .to_vec();
        expected.extend_from_slice(b"\x89PNG\r\n--XYZ--\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_multipart_filename_quotes_encoded() {
        let body = multipart_body("B", "a\"b.png", "image/png", b"");
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("filename=\"a%22b.png\""));
    }
}
