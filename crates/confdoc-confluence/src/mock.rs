//! In-memory page store for testing.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::error::ConfluenceError;
use crate::store::PageStore;
use crate::types::{Attachment, Page, Version};

/// A call made against [`MockStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Find(String),
    Create {
        title: String,
        parent_id: Option<String>,
    },
    Update {
        id: String,
        version: u32,
    },
    Upload {
        page_id: String,
        filename: String,
        content_type: String,
    },
}

/// Page store keeping pages by title in memory.
///
/// Records every call, rejects updates made against a stale version and
/// fails writes to titles or attachment names registered with
/// [`MockStore::with_failure`].
#[derive(Debug, Default)]
pub(crate) struct MockStore {
    pages: RwLock<HashMap<String, Page>>,
    bodies: RwLock<HashMap<String, String>>,
    calls: RwLock<Vec<Call>>,
    failing: RwLock<HashSet<String>>,
    /// Titles edited by someone else right after each lookup.
    concurrent_edits: RwLock<HashSet<String>>,
    /// `(page id, file name, size)` per stored attachment.
    attachments: RwLock<Vec<(String, String, usize)>>,
    next_id: RwLock<u64>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seed an existing page.
    pub(crate) fn with_page(self, id: &str, title: &str, version: u32) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(title.to_owned(), page(id, title, version));
        self
    }

    /// Make create and update calls for `title` fail with a server error.
    pub(crate) fn with_failure(self, title: &str) -> Self {
        self.failing.write().unwrap().insert(title.to_owned());
        self
    }

    /// Bump the version of `title` every time it is looked up, as if another
    /// editor saved the page between lookup and update.
    pub(crate) fn with_concurrent_edit(self, title: &str) -> Self {
        self.concurrent_edits
            .write()
            .unwrap()
            .insert(title.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.read().unwrap().clone()
    }

    /// Drop the recorded calls, keeping the pages.
    pub(crate) fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    pub(crate) fn page(&self, title: &str) -> Option<Page> {
        self.pages.read().unwrap().get(title).cloned()
    }

    /// Last body written to `title`.
    pub(crate) fn body(&self, title: &str) -> Option<String> {
        self.bodies.read().unwrap().get(title).cloned()
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// Attachment names on a page, with their sizes.
    pub(crate) fn attachments(&self, page_id: &str) -> Vec<(String, usize)> {
        self.attachments
            .read()
            .unwrap()
            .iter()
            .filter(|(id, _, _)| id == page_id)
            .map(|(_, name, size)| (name.clone(), *size))
            .collect()
    }

    fn check_failure(&self, title: &str) -> Result<(), ConfluenceError> {
        if self.failing.read().unwrap().contains(title) {
            return Err(ConfluenceError::HttpResponse {
                status: 500,
                body: "Internal server error".to_owned(),
            });
        }
        Ok(())
    }
}

impl PageStore for MockStore {
    fn find_page(&self, title: &str) -> Result<Option<Page>, ConfluenceError> {
        self.calls.write().unwrap().push(Call::Find(title.to_owned()));
        let found = self.page(title);
        if self.concurrent_edits.read().unwrap().contains(title)
            && let Some(page) = self.pages.write().unwrap().get_mut(title)
        {
            page.version.number += 1;
        }
        Ok(found)
    }

    fn create_page(
        &self,
        title: &str,
        body: &str,
        parent_id: Option<&str>,
    ) -> Result<Page, ConfluenceError> {
        self.calls.write().unwrap().push(Call::Create {
            title: title.to_owned(),
            parent_id: parent_id.map(str::to_owned),
        });
        self.check_failure(title)?;

        let mut pages = self.pages.write().unwrap();
        if pages.contains_key(title) {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: "A page with this title already exists".to_owned(),
            });
        }
        let id = {
            let mut next_id = self.next_id.write().unwrap();
            *next_id += 1;
            *next_id
        };
        let created = page(&format!("p{id}"), title, 1);
        pages.insert(title.to_owned(), created.clone());
        self.bodies
            .write()
            .unwrap()
            .insert(title.to_owned(), body.to_owned());
        Ok(created)
    }

    fn update_page(
        &self,
        page_id: &str,
        title: &str,
        body: &str,
        current_version: u32,
    ) -> Result<Page, ConfluenceError> {
        self.calls.write().unwrap().push(Call::Update {
            id: page_id.to_owned(),
            version: current_version,
        });
        self.check_failure(title)?;

        let mut pages = self.pages.write().unwrap();
        let Some(existing) = pages.get_mut(title).filter(|p| p.id == page_id) else {
            return Err(ConfluenceError::HttpResponse {
                status: 404,
                body: "No content found".to_owned(),
            });
        };
        if existing.version.number != current_version {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: "Version must be incremented on update".to_owned(),
            });
        }
        existing.version.number += 1;
        self.bodies
            .write()
            .unwrap()
            .insert(title.to_owned(), body.to_owned());
        Ok(existing.clone())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.calls.write().unwrap().push(Call::Upload {
            page_id: page_id.to_owned(),
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
        });
        self.check_failure(filename)?;

        let mut attachments = self.attachments.write().unwrap();
        attachments.retain(|(id, name, _)| !(id == page_id && name == filename));
        attachments.push((page_id.to_owned(), filename.to_owned(), data.len()));
        Ok(Attachment {
            id: format!("att-{page_id}-{}", attachments.len()),
            title: filename.to_owned(),
        })
    }
}

fn page(id: &str, title: &str, version: u32) -> Page {
    Page {
        id: id.to_owned(),
        title: title.to_owned(),
        version: Version { number: version },
    }
}
