//! Configuration management for confdoc.
//!
//! Parses `confdoc.yaml` (or `.yml` / `.json`) configuration files with serde
//! and provides auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.email`
//! - `confluence.api_token`
//! - `space.key`
//! - `project.name`
//!
//! ## Diagrams
//!
//! The optional `diagrams` section maps pre-rendered images to the leaf pages
//! that show them:
//!
//! ```yaml
//! diagrams:
//!   dir: diagrams
//!   entries:
//!     - file: system-context.png
//!       page: Architecture Overview (HLD)
//!       title: System Context Diagram
//!       keywords: ["System Context", "C4 Level 1"]
//! ```

mod expand;
mod scalar;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override templates root directory.
    pub templates_dir: Option<PathBuf>,
    /// Override the directory holding diagram images.
    pub diagrams_dir: Option<PathBuf>,
}

/// Configuration filenames to search for, in priority order.
const CONFIG_FILENAMES: [&str; 3] = ["confdoc.yaml", "confdoc.yml", "confdoc.json"];

/// Marker left in the example config for values the user must fill in.
const PLACEHOLDER_MARKER: &str = "YOUR_";

const DEFAULT_REQUEST_DELAY_MS: u64 = 300;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection settings.
    pub confluence: ConfluenceConfig,
    /// Target space.
    pub space: SpaceConfig,
    /// Project settings.
    pub project: ProjectConfig,
    /// Diagram images attached to leaf pages.
    pub diagrams: DiagramsConfig,
    /// Templates directory as written in the file (relative to the config file).
    templates_dir: Option<String>,

    /// Resolved templates directory (set after loading).
    #[serde(skip)]
    pub templates_dir_resolved: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence Cloud site URL (e.g. `https://acme.atlassian.net`).
    #[serde(deserialize_with = "scalar::string")]
    pub base_url: String,
    /// Account email used for basic authentication.
    #[serde(deserialize_with = "scalar::string")]
    pub email: String,
    /// API token paired with `email`.
    #[serde(deserialize_with = "scalar::string")]
    pub api_token: String,
    /// Fixed delay before every API request, in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            request_delay_ms: DEFAULT_REQUEST_DELAY_MS,
        }
    }
}

impl ConfluenceConfig {
    /// Delay applied before every API request.
    #[must_use]
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Space configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Space key, e.g. `DOCS`.
    #[serde(deserialize_with = "scalar::string")]
    pub key: String,
}

/// Project configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name, used as the prefix of every page title.
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
}

/// Diagram images and the pages they belong to.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Image directory as written in the file (relative to the config file).
    dir: Option<String>,
    /// Resolved image directory (set after loading).
    #[serde(skip)]
    pub dir_resolved: PathBuf,
    /// One entry per image.
    pub entries: Vec<DiagramEntry>,
}

/// One diagram image shown on a leaf page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiagramEntry {
    /// Image file name inside the diagrams directory, also used as the
    /// attachment name.
    pub file: String,
    /// Leaf page title without the project prefix.
    pub page: String,
    /// Heading used when the image is inserted under the page title.
    pub title: Option<String>,
    /// Case-insensitive patterns matched against placeholder comments.
    pub keywords: Vec<String>,
}

impl DiagramEntry {
    /// Heading for the image, falling back to the file stem.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| {
            Path::new(&self.file)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(&self.file)
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Required fields missing or still holding placeholder values.
    #[error("Missing or placeholder values in config: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_TOKEN`} not set").
        message: String,
    },
}

/// Config file syntax, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `confdoc.yaml`, `confdoc.yml` or `confdoc.json`
    /// in the current directory and its parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if no config file is found, parsing fails, or required
    /// values are missing.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => Self::discover_config().ok_or_else(|| {
                let cwd = std::env::current_dir().unwrap_or_default();
                ConfigError::NotFound(cwd.join(CONFIG_FILENAMES[0]))
            })?,
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = Self::load_from_file(&path)?;

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(templates_dir) = &settings.templates_dir {
            self.templates_dir_resolved.clone_from(templates_dir);
        }
        if let Some(diagrams_dir) = &settings.diagrams_dir {
            self.diagrams.dir_resolved.clone_from(diagrams_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            for name in CONFIG_FILENAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, Format::from_path(path))?;

        // Expand environment variables before validation
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn parse(content: &str, format: Format) -> Result<Self, ConfigError> {
        let config = match format {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Required fields as (dotted name, value) pairs, in schema order.
    fn required_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("confluence.base_url", self.confluence.base_url.as_str()),
            ("confluence.email", self.confluence.email.as_str()),
            ("confluence.api_token", self.confluence.api_token.as_str()),
            ("space.key", self.space.key.as_str()),
            ("project.name", self.project.name.as_str()),
        ]
    }

    /// Names of required fields that are empty or still hold a placeholder.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<String> {
        self.required_fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty() || value.contains(PLACEHOLDER_MARKER))
            .map(|(name, _)| name.to_owned())
            .collect()
    }

    /// Validate configuration values.
    ///
    /// All missing fields are reported together so the user can fix the file
    /// in one pass.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFields` listing every offending field, or
    /// `ConfigError::Validation` for malformed values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const MAX_REQUEST_DELAY_MS: u64 = 10_000;

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        require_http_url(&self.confluence.base_url, "confluence.base_url")?;

        if self.confluence.request_delay_ms > MAX_REQUEST_DELAY_MS {
            return Err(ConfigError::Validation(format!(
                "confluence.request_delay_ms cannot exceed {MAX_REQUEST_DELAY_MS}"
            )));
        }

        for (index, entry) in self.diagrams.entries.iter().enumerate() {
            if entry.file.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "diagrams.entries[{index}].file must not be empty"
                )));
            }
            if entry.page.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "diagrams.entries[{index}].page must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
        confluence.email = expand::expand_env(&confluence.email, "confluence.email")?;
        confluence.api_token = expand::expand_env(&confluence.api_token, "confluence.api_token")?;
        self.space.key = expand::expand_env(&self.space.key, "space.key")?;
        self.project.name = expand::expand_env(&self.project.name, "project.name")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.templates_dir_resolved =
            config_dir.join(self.templates_dir.as_deref().unwrap_or("templates"));
        self.diagrams.dir_resolved =
            config_dir.join(self.diagrams.dir.as_deref().unwrap_or("diagrams"));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VALID_YAML: &str = r"
confluence:
  base_url: https://acme.atlassian.net
  email: docs@acme.io
  api_token: abc123
space:
  key: DOCS
project:
  name: Payments
";

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_yaml_config() {
        let config = Config::parse(VALID_YAML, Format::Yaml).unwrap();
        assert_eq!(config.confluence.base_url, "https://acme.atlassian.net");
        assert_eq!(config.confluence.email, "docs@acme.io");
        assert_eq!(config.confluence.api_token, "abc123");
        assert_eq!(config.confluence.request_delay_ms, 300);
        assert_eq!(config.space.key, "DOCS");
        assert_eq!(config.project.name, "Payments");
    }

    #[test]
    fn test_parse_json_config() {
        let json = r#"{
            "confluence": {
                "base_url": "https://acme.atlassian.net",
                "email": "docs@acme.io",
                "api_token": "abc123",
                "request_delay_ms": 50
            },
            "space": {"key": "DOCS"},
            "project": {"name": "Payments"}
        }"#;
        let config = Config::parse(json, Format::Json).unwrap();
        assert_eq!(config.space.key, "DOCS");
        assert_eq!(config.confluence.request_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a/confdoc.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("a/confdoc.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a/confdoc.yml")), Format::Yaml);
    }

    #[test]
    fn test_empty_config_lists_every_required_field() {
        let config = Config::parse("{}", Format::Yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing or placeholder values in config: confluence.base_url, confluence.email, \
             confluence.api_token, space.key, project.name"
        );
    }

    #[test]
    fn test_placeholder_values_are_missing() {
        let yaml = VALID_YAML
            .replace("abc123", "YOUR_API_TOKEN")
            .replace("DOCS", "YOUR_SPACE_KEY");
        let config = Config::parse(&yaml, Format::Yaml).unwrap();
        assert_eq!(
            config.missing_fields(),
            vec!["confluence.api_token".to_owned(), "space.key".to_owned()]
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingFields(_))
        ));
    }

    #[test]
    fn test_base_url_requires_http_scheme() {
        let yaml = VALID_YAML.replace("https://acme.atlassian.net", "acme.atlassian.net");
        let config = Config::parse(&yaml, Format::Yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("confluence.base_url"));
    }

    #[test]
    fn test_request_delay_upper_bound() {
        let yaml = VALID_YAML.replace(
            "  api_token: abc123\n",
            "  api_token: abc123\n  request_delay_ms: 60000\n",
        );
        let config = Config::parse(&yaml, Format::Yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("request_delay_ms"));
    }

    #[test]
    fn test_load_resolves_templates_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "confdoc.yaml", VALID_YAML);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.templates_dir_resolved, dir.path().join("templates"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_custom_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!("{VALID_YAML}templates_dir: docs/templates\n");
        let path = write_config(dir.path(), "confdoc.yml", &yaml);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.templates_dir_resolved,
            dir.path().join("docs/templates")
        );
    }

    #[test]
    fn test_cli_settings_override_templates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "confdoc.yaml", VALID_YAML);
        let settings = CliSettings {
            templates_dir: Some(PathBuf::from("/elsewhere/templates")),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(
            config.templates_dir_resolved,
            PathBuf::from("/elsewhere/templates")
        );
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{"confluence": {"base_url": "https://acme.atlassian.net",
            "email": "docs@acme.io", "api_token": "abc123"},
            "space": {"key": "DOCS"}, "project": {"name": "Payments"}}"#;
        let path = write_config(dir.path(), "confdoc.json", json);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.project.name, "Payments");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_rejects_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = VALID_YAML.replace("docs@acme.io", "YOUR_EMAIL");
        let path = write_config(dir.path(), "confdoc.yaml", &yaml);

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(err.to_string().contains("confluence.email"));
    }

    #[test]
    fn test_load_expands_token_from_env() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CONFDOC_LOAD_TEST_TOKEN", "from-env");
        }
        let dir = tempfile::tempdir().unwrap();
        let yaml = VALID_YAML.replace("abc123", "${CONFDOC_LOAD_TEST_TOKEN}");
        let path = write_config(dir.path(), "confdoc.yaml", &yaml);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.confluence.api_token, "from-env");
        unsafe {
            std::env::remove_var("CONFDOC_LOAD_TEST_TOKEN");
        }
    }

    #[test]
    fn test_json_null_required_field_is_missing() {
        let json = r#"{
            "confluence": {
                "base_url": "https://acme.atlassian.net",
                "email": null,
                "api_token": "abc123"
            },
            "space": {"key": "DOCS"},
            "project": {"name": null}
        }"#;
        let config = Config::parse(json, Format::Json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingFields(ref fields)
                if fields == &["confluence.email".to_owned(), "project.name".to_owned()]
        ));
    }

    #[test]
    fn test_numeric_space_key_is_accepted() {
        let json = r#"{"confluence": {"base_url": "https://acme.atlassian.net",
            "email": "docs@acme.io", "api_token": "abc123"},
            "space": {"key": 1234}, "project": {"name": "Payments"}}"#;
        let config = Config::parse(json, Format::Json).unwrap();
        assert_eq!(config.space.key, "1234");
        assert!(config.validate().is_ok());

        let yaml = VALID_YAML.replace("key: DOCS", "key: 1234");
        let config = Config::parse(&yaml, Format::Yaml).unwrap();
        assert_eq!(config.space.key, "1234");
    }

    #[test]
    fn test_diagrams_default_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "confdoc.yaml", VALID_YAML);

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.diagrams.entries.is_empty());
        assert_eq!(config.diagrams.dir_resolved, dir.path().join("diagrams"));
    }

    #[test]
    fn test_parse_diagrams_section() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = format!(
            "{VALID_YAML}diagrams:
  dir: docs/images
  entries:
    - file: system-context.png
      page: Architecture Overview
      title: System Context
      keywords: [\"System Context\", \"C4 Level 1\"]
    - file: ci-pipeline.png
      page: Build Pipeline
"
        );
        let path = write_config(dir.path(), "confdoc.yaml", &yaml);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.diagrams.dir_resolved, dir.path().join("docs/images"));
        let entries = &config.diagrams.entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].page, "Architecture Overview");
        assert_eq!(entries[0].display_title(), "System Context");
        assert_eq!(entries[0].keywords, vec!["System Context", "C4 Level 1"]);
        assert_eq!(entries[1].display_title(), "ci-pipeline");
        assert!(entries[1].keywords.is_empty());
    }

    #[test]
    fn test_diagram_entry_requires_page() {
        let yaml = format!("{VALID_YAML}diagrams:\n  entries:\n    - file: a.png\n");
        let config = Config::parse(&yaml, Format::Yaml).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: diagrams.entries[0].page must not be empty"
        );
    }

    #[test]
    fn test_cli_settings_override_diagrams_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "confdoc.yaml", VALID_YAML);
        let settings = CliSettings {
            diagrams_dir: Some(PathBuf::from("/rendered")),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.diagrams.dir_resolved, PathBuf::from("/rendered"));
        assert_eq!(config.templates_dir_resolved, dir.path().join("templates"));
    }
}
