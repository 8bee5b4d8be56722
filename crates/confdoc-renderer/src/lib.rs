//! Markdown to Confluence storage format conversion.
//!
//! Conversion runs in two stages:
//!
//! 1. [`MarkdownRenderer`] turns pulldown-cmark events into plain HTML
//!    (tables, fenced code, heading anchors, line breaks as `<br />`).
//! 2. [`convert_markdown`] rewrites that HTML into storage format: every
//!    `<pre><code>` block becomes a `code` macro and every `<!-- comment -->`
//!    becomes an `info` macro.
//!
//! [`place_diagrams`] then swaps diagram placeholders for attached images.
//!
//! # Example
//!
//! ```
//! use confdoc_renderer::convert_markdown;
//!
//! let storage = convert_markdown("# Runbook\n\n```bash\nsystemctl restart api\n```\n");
//! assert!(storage.contains(r#"<ac:parameter ac:name="language">bash</ac:parameter>"#));
//! ```

mod diagrams;
mod renderer;
mod state;
mod storage;
mod util;

pub use diagrams::{Diagram, DiagramError, Placement, place_diagrams};
pub use renderer::MarkdownRenderer;
pub use state::{escape_html, slugify};
pub use storage::{convert_markdown, render_html, root_page_body, section_page_body};
