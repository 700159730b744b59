use wikinote_engine::{Page, PageId};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Read access to pages, as needed by route loading and state refresh.
///
/// [`ApiClient`] is the real implementation; tests substitute fixed data.
pub trait PageSource {
    fn list_pages(&self) -> ClientResult<Vec<Page>>;
    fn get_page(&self, id: PageId) -> ClientResult<Page>;
    fn get_page_by_name(&self, name: &str) -> ClientResult<Option<Page>>;
    fn get_backlinks(&self, id: PageId) -> ClientResult<Vec<Page>>;
}

impl PageSource for ApiClient {
    fn list_pages(&self) -> ClientResult<Vec<Page>> {
        ApiClient::list_pages(self)
    }

    fn get_page(&self, id: PageId) -> ClientResult<Page> {
        ApiClient::get_page(self, id)
    }

    fn get_page_by_name(&self, name: &str) -> ClientResult<Option<Page>> {
        ApiClient::get_page_by_name(self, name)
    }

    fn get_backlinks(&self, id: PageId) -> ClientResult<Vec<Page>> {
        ApiClient::get_backlinks(self, id)
    }
}
