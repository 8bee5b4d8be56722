//! Confluence API types.

mod attachment;
mod page;
mod space;

pub use attachment::{Attachment, AttachmentsResponse};
pub use page::{ContentResults, Page, Version};
pub use space::Space;
