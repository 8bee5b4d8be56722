//! Confluence page types.

use serde::Deserialize;

/// Confluence page.
///
/// Only the fields the importer reads; serde ignores the rest of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
}

/// Page version.
#[derive(Debug, Clone, Deserialize)]
pub struct Version {
    /// Version number, incremented on every content update.
    pub number: u32,
}

/// Paged content search response.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentResults {
    /// Matching pages.
    #[serde(default)]
    pub results: Vec<Page>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "results": [{
                "id": "98305",
                "type": "page",
                "title": "Payments - Runbook",
                "version": {"number": 4, "when": "2026-01-02T10:00:00.000Z"},
                "_links": {"webui": "/spaces/DOCS/pages/98305"}
            }],
            "start": 0,
            "limit": 25,
            "size": 1
        }"#;
        let response: ContentResults = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        let page = &response.results[0];
        assert_eq!(page.id, "98305");
        assert_eq!(page.title, "Payments - Runbook");
        assert_eq!(page.version.number, 4);
    }

    #[test]
    fn test_parse_empty_search_response() {
        let response: ContentResults = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(response.results.is_empty());
    }
}
