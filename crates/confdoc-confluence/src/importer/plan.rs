//! Per-page sync decisions.

use crate::types::Page;

/// Position of a page in the imported tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Top-level project page.
    Root,
    /// Section page grouping leaf pages.
    Section,
    /// Page rendered from a template file.
    Leaf,
}

/// Identity and version of an existing remote page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: String,
    pub version: u32,
}

impl From<Page> for PageRef {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            version: page.version.number,
        }
    }
}

/// Result of looking a title up in the space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(PageRef),
    NotFound,
    /// No lookup was made (dry run).
    NotQueried,
}

/// What to do with a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create,
    /// Replace the body of page `id`, currently at `version`.
    Update { id: String, version: u32 },
    /// Keep page `id` as is.
    Skip { id: String },
}

/// Decide how to sync a page given what the lookup found.
///
/// Structural pages (root and sections) are left alone once they exist; their
/// content is a `children` listing that Confluence keeps current. Leaf pages
/// are always rewritten from their template.
#[must_use]
pub fn decide(kind: PageKind, lookup: Lookup) -> Action {
    match (kind, lookup) {
        (PageKind::Root | PageKind::Section, Lookup::Found(page)) => Action::Skip { id: page.id },
        (PageKind::Leaf, Lookup::Found(page)) => Action::Update {
            id: page.id,
            version: page.version,
        },
        (_, Lookup::NotFound | Lookup::NotQueried) => Action::Create,
    }
}
