//! Diagram placement in storage-format page bodies.
//!
//! Templates mark where a diagram belongs with comments, which become `info`
//! macros:
//!
//! ```markdown
//! <!-- Insert diagram here -->
//! <!-- System context (C4 Level 1): users, the platform and its neighbours -->
//! ```
//!
//! [`place_diagrams`] replaces such a placeholder pair, or a single macro
//! whose text matches a diagram's keywords, with an attached image. Diagrams
//! that match no macro are inserted under the page's first `<h1>`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;
use crate::storage::TAG_RE;

/// A whole `info` macro, with or without extra attributes such as `ac:macro-id`.
static INFO_MACRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<ac:structured-macro[^>]*ac:name="info"[^>]*>.*?</ac:structured-macro>"#)
        .expect("invalid info macro regex")
});

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)insert\s+diagram\s+here").expect("invalid placeholder regex")
});

/// Rendered width of attached diagram images, in pixels.
const IMAGE_WIDTH: u32 = 900;

const H1_END: &str = "</h1>";

/// Diagram definition error.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// A keyword is not a valid regular expression.
    #[error("Invalid keyword pattern for diagram {file}: {source}")]
    Keyword {
        file: String,
        #[source]
        source: regex::Error,
    },
}

/// An image attachment shown on a page.
#[derive(Debug, Clone)]
pub struct Diagram {
    file: String,
    title: String,
    /// Keywords joined into one case-insensitive alternation.
    keywords: Option<Regex>,
}

impl Diagram {
    /// Create a diagram for attachment `file`.
    ///
    /// `keywords` are regular expressions matched case-insensitively against
    /// placeholder text. Without keywords the diagram is never placed inline.
    pub fn new(file: &str, title: &str, keywords: &[String]) -> Result<Self, DiagramError> {
        let keywords = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|keyword| format!("(?:{keyword})"))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("(?i){alternation}")).map_err(|source| {
                DiagramError::Keyword {
                    file: file.to_owned(),
                    source,
                }
            })?;
            Some(regex)
        };

        Ok(Self {
            file: file.to_owned(),
            title: title.to_owned(),
            keywords,
        })
    }

    /// Attachment file name.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Storage-format image referencing the attachment.
    #[must_use]
    pub fn image_macro(&self) -> String {
        format!(
            r#"<ac:image ac:width="{IMAGE_WIDTH}"><ri:attachment ri:filename="{}" /></ac:image>"#,
            escape_html(&self.file)
        )
    }

    fn describes(&self, text: &str) -> bool {
        self.keywords.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Titled block used when no placeholder takes the image.
    fn heading_block(&self) -> String {
        format!("<h2>{}</h2>{}", escape_html(&self.title), self.image_macro())
    }
}

/// Result of [`place_diagrams`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Page body with every diagram referenced.
    pub body: String,
    /// Files that replaced a placeholder, in page order.
    pub inline: Vec<String>,
    /// Files inserted under the page title.
    pub inserted: Vec<String>,
}

/// Reference every diagram in `body`.
///
/// Walks the `info` macros in order:
/// - an "Insert diagram here" macro directly followed by a macro matching a
///   diagram is replaced together with it (and anything between them)
/// - any other macro matching a diagram is replaced on its own
/// - unmatched macros stay
///
/// The first diagram in `diagrams` whose keywords match wins. A diagram may
/// replace several placeholders. Diagrams that replaced none are inserted as
/// `<h2>` blocks after the first `</h1>`, or at the top of a page without one.
#[must_use]
pub fn place_diagrams(body: &str, diagrams: &[Diagram]) -> Placement {
    let macros: Vec<(Range<usize>, String)> = INFO_MACRO_RE
        .find_iter(body)
        .map(|m| (m.range(), macro_text(m.as_str())))
        .collect();
    let matching = |text: &str| diagrams.iter().find(|d| d.describes(text));

    let mut result = String::with_capacity(body.len());
    let mut inline: Vec<String> = Vec::new();
    let mut cursor = 0;
    let mut index = 0;
    while let Some((range, text)) = macros.get(index) {
        let paired = macros
            .get(index + 1)
            .filter(|_| PLACEHOLDER_RE.is_match(text))
            .and_then(|(next, next_text)| {
                matching(next_text.as_str()).map(|d| (next.end, d))
            });

        let replacement = if let Some(pair) = paired {
            index += 2;
            Some(pair)
        } else {
            index += 1;
            matching(text.as_str()).map(|d| (range.end, d))
        };

        if let Some((end, diagram)) = replacement {
            result.push_str(&body[cursor..range.start]);
            result.push_str(&diagram.image_macro());
            cursor = end;
            if !inline.iter().any(|file| file == &diagram.file) {
                inline.push(diagram.file.clone());
            }
        }
    }
    result.push_str(&body[cursor..]);

    let unplaced: Vec<&Diagram> = diagrams
        .iter()
        .filter(|d| !inline.contains(&d.file))
        .collect();
    if !unplaced.is_empty() {
        let blocks: String = unplaced.iter().map(|d| d.heading_block()).collect();
        result = match result.find(H1_END) {
            Some(pos) => {
                let at = pos + H1_END.len();
                format!("{}{blocks}{}", &result[..at], &result[at..])
            }
            None => format!("{blocks}{result}"),
        };
    }

    Placement {
        body: result,
        inline,
        inserted: unplaced.iter().map(|d| d.file.clone()).collect(),
    }
}

/// Visible text of a macro, whitespace collapsed.
fn macro_text(markup: &str) -> String {
    TAG_RE
        .replace_all(markup, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
