//! Import command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use confdoc_config::{CliSettings, Config};
use confdoc_confluence::{
    AttachmentEvent, AttachmentOutcome, ConfluenceClient, ImportConfig, ImportError,
    ImportObserver, ImportSummary, Importer, PAGE_HIERARCHY, PageDiagram, PageEvent, PageKind,
    PageOutcome,
};
use confdoc_renderer::Diagram;
use tracing::{info, warn};

use crate::error::CliError;
use crate::output::{Output, Tone};

/// Arguments for importing the template tree.
#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Path to configuration file (default: auto-discover confdoc.yaml).
    #[arg(short, long, env = "CONFDOC_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Preview what would be created without making API calls.
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Only import sections whose folder name contains this text (e.g. "01-project-overview").
    #[arg(short, long)]
    pub(crate) section: Option<String>,

    /// Path to templates directory (overrides config).
    #[arg(long)]
    pub(crate) templates_dir: Option<PathBuf>,

    /// Path to rendered diagram images (overrides config).
    #[arg(long)]
    pub(crate) diagrams_dir: Option<PathBuf>,
}

impl ImportArgs {
    /// Execute the import.
    ///
    /// Per-page failures are reported and counted but do not fail the command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            templates_dir: self.templates_dir,
            diagrams_dir: self.diagrams_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            info!("Loaded configuration from {}", path.display());
        }

        let templates_dir = config.templates_dir_resolved.clone();
        if !templates_dir.is_dir() {
            return Err(ImportError::TemplatesNotFound(templates_dir).into());
        }

        let diagrams = page_diagrams(&config)?;
        if !diagrams.is_empty() && !config.diagrams.dir_resolved.is_dir() {
            warn!(
                "Diagrams directory {} not found, images will be reported missing",
                config.diagrams.dir_resolved.display()
            );
        }

        print_header(&output, &config, self.dry_run, self.section.as_deref());

        let import_config = ImportConfig {
            project_name: config.project.name.clone(),
            templates_dir,
            section_filter: self.section,
            diagrams_dir: config.diagrams.dir_resolved.clone(),
            diagrams,
        };
        let mut observer = ConsoleObserver::new(&output);

        if self.dry_run {
            let summary = Importer::dry_run(import_config).run(&mut observer)?;
            print_summary(&output, &summary, None);
            return Ok(());
        }

        let client = ConfluenceClient::from_config(&config);
        check_connection(&output, &client)?;

        let summary = Importer::new(&client, import_config).run(&mut observer)?;
        print_summary(&output, &summary, Some(&client.space_url()));
        Ok(())
    }
}

/// Compile the configured diagrams.
///
/// Entries naming a page outside the hierarchy are kept but logged, since
/// they can never be placed.
fn page_diagrams(config: &Config) -> Result<Vec<PageDiagram>, CliError> {
    let diagrams = config
        .diagrams
        .entries
        .iter()
        .map(|entry| -> Result<PageDiagram, CliError> {
            let known = PAGE_HIERARCHY
                .iter()
                .flat_map(|section| section.pages)
                .any(|(_, page)| *page == entry.page);
            if !known {
                warn!("Diagram {} targets unknown page \"{}\"", entry.file, entry.page);
            }
            Ok(PageDiagram {
                page: entry.page.clone(),
                diagram: Diagram::new(&entry.file, entry.display_title(), &entry.keywords)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!("{} diagram(s) configured", diagrams.len());
    Ok(diagrams)
}

fn print_header(output: &Output, config: &Config, dry_run: bool, section: Option<&str>) {
    output.banner("Confluence Documentation Importer");
    output.field("Space", &config.space.key);
    output.field("Project", &config.project.name);
    output.field("Mode", if dry_run { "DRY RUN" } else { "LIVE" });
    if let Some(section) = section {
        output.field("Filter", section);
    }
    if let Some(path) = &config.config_path {
        output.field("Config", &path.display().to_string());
    }
    output.separator();
}

fn check_connection(output: &Output, client: &ConfluenceClient) -> Result<(), CliError> {
    output.info("\nTesting connection...");
    match client.test_connection() {
        Ok(space) => {
            output.success(&format!("  Connected to space: {}", space.display_name()));
            Ok(())
        }
        Err(err) => {
            output.error("  Failed to connect. Check your base_url, credentials, and space key.");
            Err(err.into())
        }
    }
}

fn print_summary(output: &Output, summary: &ImportSummary, space_url: Option<&str>) {
    output.info("");
    output.banner("Import Complete");
    output.field("Created", &summary.created.to_string());
    output.field("Updated", &summary.updated.to_string());
    output.field("Skipped", &summary.skipped.to_string());
    output.field("Failed", &summary.failed.to_string());
    if summary.attachments_uploaded + summary.attachments_failed > 0 {
        output.field(
            "Images",
            &format!(
                "{} attached, {} failed",
                summary.attachments_uploaded, summary.attachments_failed
            ),
        );
    }

    if let Some(url) = space_url {
        output.info(&format!("\n  View your space: {url}"));
    }
    output.info("");
}

/// Prints a progress line per page.
struct ConsoleObserver<'a> {
    output: &'a Output,
}

impl<'a> ConsoleObserver<'a> {
    fn new(output: &'a Output) -> Self {
        Self { output }
    }
}

impl ImportObserver for ConsoleObserver<'_> {
    fn root_started(&mut self, title: &str) {
        self.output.line(Tone::Highlight, &format!("\n[ROOT] {title}"));
    }

    fn section_started(&mut self, title: &str) {
        self.output
            .line(Tone::Highlight, &format!("\n[SECTION] {title}"));
    }

    fn page_finished(&mut self, event: &PageEvent) {
        if let Some((tone, line)) = progress_line(event) {
            self.output.line(tone, &line);
        }
    }

    fn attachment_finished(&mut self, event: &AttachmentEvent) {
        let (tone, line) = attachment_line(event);
        self.output.line(tone, &line);
    }
}

/// Progress line for a finished page, if it has one.
fn progress_line(event: &PageEvent) -> Option<(Tone, String)> {
    let label = &event.label;
    let line = match (&event.outcome, event.kind) {
        (PageOutcome::Previewed { .. }, PageKind::Root | PageKind::Section) => return None,
        (PageOutcome::Previewed { chars }, PageKind::Leaf) => (
            Tone::Plain,
            format!("  [DRY RUN] {} ({chars} chars)", event.title),
        ),
        (PageOutcome::Existing { id }, _) => {
            (Tone::Plain, format!("  Found existing page (id: {id})"))
        }
        (PageOutcome::Created { id }, PageKind::Root | PageKind::Section) => {
            (Tone::Success, format!("  Created (id: {id})"))
        }
        (PageOutcome::Created { id }, PageKind::Leaf) => {
            (Tone::Success, format!("  [CREATED] {label} (id: {id})"))
        }
        (PageOutcome::Updated { version, .. }, _) => {
            (Tone::Success, format!("  [UPDATED] {label} (v{version})"))
        }
        (PageOutcome::Skipped { file }, _) => (
            Tone::Warning,
            format!("  [SKIP] {label} (file not found: {})", file_name(file)),
        ),
        (PageOutcome::Failed { error }, PageKind::Root) => {
            (Tone::Error, format!("  FAILED to create root page: {error}"))
        }
        (PageOutcome::Failed { error }, PageKind::Section) => (
            Tone::Error,
            format!("  FAILED to create section, skipping its pages: {error}"),
        ),
        (PageOutcome::Failed { error }, PageKind::Leaf) => {
            (Tone::Error, format!("  [FAILED]  {label}: {error}"))
        }
    };
    Some(line)
}

/// Progress line for a finished diagram upload.
fn attachment_line(event: &AttachmentEvent) -> (Tone, String) {
    let file = &event.file;
    match &event.outcome {
        AttachmentOutcome::Uploaded { .. } => (Tone::Success, format!("    [IMAGE] {file}")),
        AttachmentOutcome::Previewed { bytes } => {
            (Tone::Plain, format!("    [DRY RUN] image {file} ({bytes} bytes)"))
        }
        AttachmentOutcome::Missing { path } => (
            Tone::Warning,
            format!("    [MISSING] image {file} (not found: {})", path.display()),
        ),
        AttachmentOutcome::Failed { error } => {
            (Tone::Error, format!("    [FAILED]  image {file}: {error}"))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn event(kind: PageKind, outcome: PageOutcome) -> PageEvent {
        PageEvent {
            kind,
            title: "Payments - Runbook".to_owned(),
            label: "Runbook".to_owned(),
            outcome,
        }
    }

    fn line(kind: PageKind, outcome: PageOutcome) -> Option<String> {
        progress_line(&event(kind, outcome)).map(|(_, line)| line)
    }

    #[test]
    fn test_leaf_lines() {
        assert_eq!(
            line(PageKind::Leaf, PageOutcome::Created { id: "42".into() }).unwrap(),
            "  [CREATED] Runbook (id: 42)"
        );
        assert_eq!(
            line(
                PageKind::Leaf,
                PageOutcome::Updated {
                    id: "42".into(),
                    version: 3
                }
            )
            .unwrap(),
            "  [UPDATED] Runbook (v3)"
        );
        assert_eq!(
            line(
                PageKind::Leaf,
                PageOutcome::Skipped {
                    file: PathBuf::from("/t/08-operations/runbook.md")
                }
            )
            .unwrap(),
            "  [SKIP] Runbook (file not found: runbook.md)"
        );
        assert_eq!(
            line(PageKind::Leaf, PageOutcome::Previewed { chars: 120 }).unwrap(),
            "  [DRY RUN] Payments - Runbook (120 chars)"
        );
    }

    #[test]
    fn test_failure_lines_are_errors() {
        let failed = PageOutcome::Failed {
            error: "HTTP error: 500 - boom".into(),
        };
        let (tone, text) = progress_line(&event(PageKind::Leaf, failed.clone())).unwrap();
        assert_eq!(tone, Tone::Error);
        assert_eq!(text, "  [FAILED]  Runbook: HTTP error: 500 - boom");

        let (_, text) = progress_line(&event(PageKind::Section, failed)).unwrap();
        assert!(text.contains("skipping its pages"));
    }

    #[test]
    fn test_structural_lines() {
        assert_eq!(
            line(PageKind::Section, PageOutcome::Existing { id: "7".into() }).unwrap(),
            "  Found existing page (id: 7)"
        );
        assert_eq!(
            line(PageKind::Root, PageOutcome::Created { id: "1".into() }).unwrap(),
            "  Created (id: 1)"
        );
        assert_eq!(
            line(PageKind::Section, PageOutcome::Previewed { chars: 10 }),
            None
        );
    }

    fn attachment(outcome: AttachmentOutcome) -> (Tone, String) {
        attachment_line(&AttachmentEvent {
            page: "Payments - Build Pipeline".to_owned(),
            file: "ci.png".to_owned(),
            outcome,
        })
    }

    #[test]
    fn test_attachment_lines() {
        assert_eq!(
            attachment(AttachmentOutcome::Uploaded { id: "a1".into() }),
            (Tone::Success, "    [IMAGE] ci.png".to_owned())
        );
        assert_eq!(
            attachment(AttachmentOutcome::Previewed { bytes: 2048 }),
            (Tone::Plain, "    [DRY RUN] image ci.png (2048 bytes)".to_owned())
        );
        assert_eq!(
            attachment(AttachmentOutcome::Missing {
                path: PathBuf::from("diagrams/ci.png")
            }),
            (
                Tone::Warning,
                "    [MISSING] image ci.png (not found: diagrams/ci.png)".to_owned()
            )
        );
        let (tone, _) = attachment(AttachmentOutcome::Failed {
            error: "HTTP error: 413 - too large".into(),
        });
        assert_eq!(tone, Tone::Error);
    }

    #[test]
    fn test_invalid_diagram_keyword_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("confdoc.yaml");
        let yaml = r#"
confluence:
  base_url: https://acme.atlassian.net
  email: docs@acme.io
  api_token: tok
space:
  key: DOCS
project:
  name: Payments
diagrams:
  entries:
    - file: a.png
      page: Charter
      keywords: ["(broken"]
"#;
        std::fs::write(&path, yaml).unwrap();
        let config = Config::load(Some(&path), None).unwrap();

        let err = page_diagrams(&config).unwrap_err();

        assert!(matches!(err, CliError::Diagram(_)));
        assert!(err.to_string().contains("a.png"));
    }
}
