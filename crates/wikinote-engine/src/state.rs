use crate::models::{Page, PageId};
use crate::wikilinks::{PageIndex, ResolvedWikiLink, parse_wikilinks};

/// Identifies one navigation so a late page load can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

/// Client-side application state: the known page list and the page being viewed.
///
/// Owned by the front end and passed by reference to whatever needs it.
/// Mutated only at fetch-completion points.
#[derive(Debug, Default)]
pub struct AppState {
    pages: Vec<Page>,
    current_page: Option<Page>,
    navigation: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_page.as_ref()
    }

    /// Replaces the page list after a full listing fetch.
    pub fn set_pages(&mut self, pages: Vec<Page>) {
        log::debug!("page list refreshed: {} pages", pages.len());
        self.pages = pages;
        let fresh = self
            .current_page
            .as_ref()
            .and_then(|current| self.pages.iter().find(|p| p.id == current.id))
            .cloned();
        if fresh.is_some() {
            self.current_page = fresh;
        }
    }

    pub fn set_current_page(&mut self, page: Option<Page>) {
        self.current_page = page;
    }

    /// Records a created or updated page in both the list and the current page.
    pub fn upsert_page(&mut self, page: Page) {
        match self.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page.clone(),
            None => self.pages.push(page.clone()),
        }
        if self.current_page.as_ref().is_some_and(|c| c.id == page.id) {
            self.current_page = Some(page);
        }
    }

    /// Forgets a deleted page. Returns whether it was known.
    pub fn remove_page(&mut self, id: PageId) -> bool {
        let before = self.pages.len();
        self.pages.retain(|p| p.id != id);
        if self.current_page.as_ref().is_some_and(|c| c.id == id) {
            self.current_page = None;
        }
        self.pages.len() != before
    }

    /// Starts a navigation; any load issued for an earlier ticket becomes stale.
    pub fn begin_navigation(&mut self) -> NavigationTicket {
        self.navigation += 1;
        NavigationTicket(self.navigation)
    }

    /// Applies a page load if its navigation is still the latest one.
    ///
    /// Returns `false` and drops the result when a newer navigation started.
    pub fn complete_navigation(&mut self, ticket: NavigationTicket, page: Option<Page>) -> bool {
        if ticket.0 != self.navigation {
            log::warn!(
                "discarding superseded page load (ticket {}, latest {})",
                ticket.0,
                self.navigation
            );
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn index(&self) -> PageIndex<'_> {
        PageIndex::build(&self.pages)
    }

    /// Resolves the current page's links against the known page list.
    pub fn resolve_current(&self) -> Vec<ResolvedWikiLink> {
        self.current_page
            .as_ref()
            .map(|page| parse_wikilinks(&page.content, &self.pages))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state_with_pages() -> AppState {
        let mut state = AppState::new();
        state.set_pages(vec![
            Page::new(1, "Home", "Go to [[Notes]] or [[Todo]]"),
            Page::new(2, "Notes", "Back [[Home]]"),
        ]);
        state
    }

    #[test]
    fn resolves_current_page_links() {
        let mut state = state_with_pages();
        state.set_current_page(Some(state.pages()[0].clone()));

        let links = state.resolve_current();

        let summary: Vec<_> = links.iter().map(|l| (l.page_name.as_str(), l.exists)).collect();
        assert_eq!(summary, vec![("Notes", true), ("Todo", false)]);
    }

    #[test]
    fn nothing_to_resolve_without_current_page() {
        assert!(state_with_pages().resolve_current().is_empty());
    }

    #[test]
    fn stale_navigation_is_discarded() {
        let mut state = state_with_pages();
        let first = state.begin_navigation();
        let second = state.begin_navigation();

        let notes = state.pages()[1].clone();
        assert!(state.complete_navigation(second, Some(notes)));
        let home = state.pages()[0].clone();
        assert!(!state.complete_navigation(first, Some(home)));

        assert_eq!(state.current_page().unwrap().name, "Notes");
    }

    #[test]
    fn upsert_updates_list_and_current_page() {
        let mut state = state_with_pages();
        state.set_current_page(Some(state.pages()[1].clone()));

        state.upsert_page(Page::new(2, "Notes", "Edited [[Todo]]"));
        state.upsert_page(Page::new(3, "Todo", ""));

        assert_eq!(state.pages().len(), 3);
        assert_eq!(state.current_page().unwrap().content, "Edited [[Todo]]");
        assert!(state.resolve_current()[0].exists);
    }

    #[test]
    fn remove_clears_current_page() {
        let mut state = state_with_pages();
        state.set_current_page(Some(state.pages()[0].clone()));

        assert!(state.remove_page(PageId(1)));
        assert!(!state.remove_page(PageId(1)));
        assert!(state.current_page().is_none());
        assert!(!state.index().contains("Home"));
    }

    #[test]
    fn refreshing_pages_refreshes_current_copy() {
        let mut state = state_with_pages();
        state.set_current_page(Some(state.pages()[1].clone()));

        state.set_pages(vec![Page::new(2, "Notes", "fresh content")]);

        assert_eq!(state.current_page().unwrap().content, "fresh content");
    }
}
