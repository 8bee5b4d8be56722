//! Confluence storage format post-processing.
//!
//! Rewrites the renderer's HTML into Confluence storage format:
//! - `<pre><code>` blocks become `code` structured macros with a CDATA body
//! - `<!-- comments -->` become `info` structured macros
//!
//! Also builds the bodies of structural (root and section) pages.

use std::sync::LazyLock;

use pulldown_cmark::Parser;
use regex::{Captures, Regex};

use crate::renderer::MarkdownRenderer;
use crate::state::escape_html;

/// A whole `<pre><code ...>...</code></pre>` block, matched lazily across newlines.
static CODE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<pre><code[^>]*>.*?</code></pre>").expect("invalid code block regex")
});

/// Language tag inside a code element's class attribute.
static LANGUAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="[^"]*language-(\w+)"#).expect("invalid language regex")
});

pub(crate) static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("invalid tag regex"));

/// The entities produced by [`escape_html`].
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(lt|gt|amp|quot);").expect("invalid entity regex"));

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--\s*(.*?)\s*-->").expect("invalid comment regex"));

/// `]]>` split across two CDATA sections.
const CDATA_END_SPLIT: &str = "]]]]><![CDATA[>";

/// Language used when a code block has no tag.
const DEFAULT_LANGUAGE: &str = "text";

/// `children` macro listing every descendant page.
const CHILDREN_MACRO: &str = concat!(
    r#"<ac:structured-macro ac:name="children">"#,
    r#"<ac:parameter ac:name="all">true</ac:parameter>"#,
    "</ac:structured-macro>",
);

/// Render markdown to intermediate HTML.
#[must_use]
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, MarkdownRenderer::parser_options());
    MarkdownRenderer::new().render(parser)
}

/// Convert markdown to Confluence storage format.
///
/// Pure: the same input always yields the same output.
///
/// Comments are converted before code blocks. At that point code text is
/// still entity-escaped, so `<!-- -->` written inside a fenced block stays
/// code. Comment text is inserted verbatim without escaping.
#[must_use]
pub fn convert_markdown(markdown: &str) -> String {
    let html = render_html(markdown);
    let html = convert_comments(&html);
    convert_code_blocks(&html)
}

/// Replace every HTML comment with an `info` macro.
fn convert_comments(html: &str) -> String {
    COMMENT_RE
        .replace_all(html, |caps: &Captures| {
            format!(
                concat!(
                    r#"<ac:structured-macro ac:name="info">"#,
                    "<ac:rich-text-body><p>{}</p></ac:rich-text-body>",
                    "</ac:structured-macro>",
                ),
                &caps[1]
            )
        })
        .into_owned()
}

/// Replace every `<pre><code>` block with a `code` macro.
fn convert_code_blocks(html: &str) -> String {
    CODE_BLOCK_RE
        .replace_all(html, |caps: &Captures| {
            let block = &caps[0];
            let language = LANGUAGE_RE
                .captures(block)
                .and_then(|c| c.get(1))
                .map_or(DEFAULT_LANGUAGE, |m| m.as_str());
            let code = unescape_html(&TAG_RE.replace_all(block, ""));
            let code = code.replace("]]>", CDATA_END_SPLIT);
            format!(
                concat!(
                    r#"<ac:structured-macro ac:name="code">"#,
                    r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
                    "<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body>",
                    "</ac:structured-macro>",
                ),
                language, code
            )
        })
        .into_owned()
}

/// Reverse [`escape_html`] in a single pass.
fn unescape_html(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "lt" => "<",
            "gt" => ">",
            "amp" => "&",
            _ => "\"",
        })
        .into_owned()
}

/// Body of the top-level project page.
#[must_use]
pub fn root_page_body(project_name: &str) -> String {
    format!(
        "<h1>Project Documentation</h1>\
         <p>Documentation hub for <strong>{}</strong>.</p>\
         <p>Navigate to the child pages below for detailed documentation.</p>\
         {CHILDREN_MACRO}",
        escape_html(project_name)
    )
}

/// Body of a section page: its heading plus a listing of its children.
#[must_use]
pub fn section_page_body(section_title: &str) -> String {
    format!("<h1>{}</h1>{CHILDREN_MACRO}", escape_html(section_title))
}
