//! Confluence space types.

use serde::Deserialize;

/// Confluence space descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    /// Space key.
    pub key: String,
    /// Human-readable space name.
    #[serde(default)]
    pub name: Option<String>,
}

impl Space {
    /// Name for display, falling back to the key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_key() {
        let space: Space = serde_json::from_str(r#"{"key": "DOCS"}"#).unwrap();
        assert_eq!(space.display_name(), "DOCS");

        let space: Space =
            serde_json::from_str(r#"{"key": "DOCS", "name": "Engineering Docs"}"#).unwrap();
        assert_eq!(space.display_name(), "Engineering Docs");
    }
}
