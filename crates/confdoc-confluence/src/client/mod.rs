//! Confluence REST API client.
//!
//! Provides a blocking HTTP client for the Confluence Cloud REST API
//! (`/wiki/rest/api`) with basic authentication (account email + API token).
//!
//! Every request is preceded by a fixed delay to stay under the platform's
//! rate limit. Failed requests are reported, never retried.
//!
//! Operations:
//! - pages: lookup by title, create, update
//! - attachments: upsert by file name
//! - space: connection check

mod attachments;
mod pages;
mod space;

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use confdoc_config::Config;
use serde::de::DeserializeOwned;
use tracing::warn;
use ureq::Agent;
use ureq::http::Response;

use crate::error::ConfluenceError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default pause before each request.
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(300);

/// Maximum number of characters of an error body kept for reporting.
const ERROR_BODY_LIMIT: usize = 300;

/// Confluence REST API client scoped to a single space.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    space_key: String,
    auth_header: String,
    request_delay: Duration,
}

impl ConfluenceClient {
    /// Create a client for `space_key` authenticated as `email` with `api_token`.
    #[must_use]
    pub fn new(base_url: &str, email: &str, api_token: &str, space_key: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            space_key: space_key.to_owned(),
            auth_header: basic_auth_header(email, api_token),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Create client from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let confluence = &config.confluence;
        Self::new(
            &confluence.base_url,
            &confluence.email,
            &confluence.api_token,
            &config.space.key,
        )
        .with_request_delay(confluence.request_delay())
    }

    /// Set the pause applied before every request.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Web URL of the space, for pointing users at the imported pages.
    pub fn space_url(&self) -> String {
        format!("{}/wiki/spaces/{}", self.base_url, self.space_key)
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/wiki/rest/api", self.base_url)
    }

    /// Block for the configured request delay.
    fn pace(&self) {
        if !self.request_delay.is_zero() {
            std::thread::sleep(self.request_delay);
        }
    }

    /// Issue a paced GET request with query parameters and decode the JSON response.
    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ConfluenceError> {
        self.pace();

        let mut request = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json");
        for (key, value) in query {
            request = request.query(*key, *value);
        }

        let response = request.call()?;
        Self::read_json(response)
    }

    /// Issue a paced POST request with a JSON payload.
    fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ConfluenceError> {
        self.pace();

        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;
        Self::read_json(response)
    }

    /// Issue a paced PUT request with a JSON payload.
    fn put_json<T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &serde_json::Value,
    ) -> Result<T, ConfluenceError> {
        self.pace();

        let payload_bytes = serde_json::to_vec(payload)?;
        let response = self
            .agent
            .put(url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;
        Self::read_json(response)
    }

    /// Decode a success response, or turn an error status into [`ConfluenceError::HttpResponse`].
    fn read_json<T: DeserializeOwned>(
        response: Response<ureq::Body>,
    ) -> Result<T, ConfluenceError> {
        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            let body = truncate(&error_body, ERROR_BODY_LIMIT);
            warn!("Confluence request failed [{}]: {}", status, body);
            return Err(ConfluenceError::HttpResponse { status, body });
        }

        Ok(body_reader.read_json()?)
    }
}

/// Build the `Authorization` header value for basic authentication.
fn basic_auth_header(email: &str, api_token: &str) -> String {
    let credentials = BASE64_STANDARD.encode(format!("{email}:{api_token}"));
    format!("Basic {credentials}")
}

/// Keep at most `limit` characters of `text`.
fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ConfluenceClient {
        ConfluenceClient::new("https://acme.atlassian.net/", "docs@acme.io", "tok", "DOCS")
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = client();
        assert_eq!(client.base_url, "https://acme.atlassian.net");
        assert_eq!(client.api_url(), "https://acme.atlassian.net/wiki/rest/api");
    }

    #[test]
    fn test_space_url() {
        assert_eq!(
            client().space_url(),
            "https://acme.atlassian.net/wiki/spaces/DOCS"
        );
    }

    #[test]
    fn test_basic_auth_header() {
        // "docs@acme.io:tok"
        assert_eq!(
            basic_auth_header("docs@acme.io", "tok"),
            "Basic ZG9jc0BhY21lLmlvOnRvaw=="
        );
    }

    #[test]
    fn test_request_delay_defaults_and_overrides() {
        assert_eq!(client().request_delay, Duration::from_millis(300));
        let client = client().with_request_delay(Duration::ZERO);
        assert!(client.request_delay.is_zero());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("ünïcødé", 4), "ünïc");
        assert_eq!(truncate("short", 300), "short");
    }
}
