pub mod page;

pub use page::{CreatePageRequest, Page, PageId, UpdatePageRequest};
