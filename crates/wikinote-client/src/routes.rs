//! Route loaders and the state update points that follow a fetch.

use thiserror::Error;

use wikinote_engine::{AppState, Page, PageId};

use crate::error::{ClientError, ClientResult};
use crate::source::PageSource;

/// Name of the page the root route redirects to.
pub const HOME_PAGE_NAME: &str = "Home";

/// Outcome of loading the root route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeRoute {
    /// 302 to the home page.
    Redirect(PageId),
    /// No home page yet; render the index.
    Stay,
}

impl HomeRoute {
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Redirect(id) => Some(page_path(*id)),
            Self::Stay => None,
        }
    }
}

pub fn page_path(id: PageId) -> String {
    format!("/page/{id}")
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Page not found")]
    NotFound,

    #[error("Failed to load page")]
    Failed(#[source] ClientError),
}

impl RouteError {
    /// HTTP status the route answers with.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Failed(_) => 500,
        }
    }
}

impl From<ClientError> for RouteError {
    fn from(err: ClientError) -> Self {
        if err.is_not_found() {
            Self::NotFound
        } else {
            Self::Failed(err)
        }
    }
}

/// Root route: redirect to the `Home` page if it exists.
///
/// Any failure looking it up leaves the user on the root page.
pub fn load_home<S: PageSource + ?Sized>(source: &S) -> HomeRoute {
    match source.get_page_by_name(HOME_PAGE_NAME) {
        Ok(Some(page)) => HomeRoute::Redirect(page.id),
        Ok(None) => HomeRoute::Stay,
        Err(e) => {
            log::warn!("Failed to look up home page: {e}");
            HomeRoute::Stay
        }
    }
}

/// `/page/{id}` route.
pub fn load_page<S: PageSource + ?Sized>(source: &S, id: PageId) -> Result<Page, RouteError> {
    source.get_page(id).map_err(|e| {
        log::error!("Failed to load page {id}: {e}");
        RouteError::from(e)
    })
}

/// Re-fetches the full page list into `state`. Returns the page count.
pub fn refresh_pages<S: PageSource + ?Sized>(state: &mut AppState, source: &S) -> ClientResult<usize> {
    let pages = source.list_pages()?;
    let count = pages.len();
    state.set_pages(pages);
    Ok(count)
}

/// Loads page `id` as the current page, unless a newer navigation
/// overtook it in the meantime. Returns whether the state was updated.
pub fn open_page<S: PageSource + ?Sized>(
    state: &mut AppState,
    source: &S,
    id: PageId,
) -> Result<bool, RouteError> {
    let ticket = state.begin_navigation();
    let page = load_page(source, id)?;
    Ok(state.complete_navigation(ticket, Some(page)))
}
