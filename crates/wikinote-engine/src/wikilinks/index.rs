use std::collections::BTreeMap;

use crate::models::{Page, PageId};

use super::scanner::scan;

/// Name -> page lookup over a fully materialized page set.
///
/// Built fresh for every resolution pass; there is no incremental update.
/// When several pages share a name the one with the lowest [`PageId`] wins,
/// whatever order the pages arrive in.
#[derive(Debug, Clone, Default)]
pub struct PageIndex<'a> {
    by_name: BTreeMap<&'a str, &'a Page>,
    all: Vec<&'a Page>,
}

impl<'a> PageIndex<'a> {
    pub fn build<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = &'a Page>,
    {
        let mut by_name: BTreeMap<&'a str, &'a Page> = BTreeMap::new();
        let mut all = Vec::new();
        for page in pages {
            all.push(page);
            by_name
                .entry(page.name.as_str())
                .and_modify(|existing| {
                    log::debug!(
                        "duplicate page name {:?}: ids {} and {}",
                        page.name,
                        existing.id,
                        page.id
                    );
                    if page.id < existing.id {
                        *existing = page;
                    }
                })
                .or_insert(page);
        }
        Self { by_name, all }
    }

    /// Exact, case-sensitive lookup. Empty names never match.
    pub fn get(&self, name: &str) -> Option<&'a Page> {
        if name.is_empty() {
            return None;
        }
        self.by_name.get(name).copied()
    }

    pub fn id_of(&self, name: &str) -> Option<PageId> {
        self.get(name).map(|page| page.id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Pages that won their name, in name order.
    pub fn pages(&self) -> impl Iterator<Item = &'a Page> + '_ {
        self.by_name.values().copied()
    }

    /// Every page the index was built from, in input order, duplicates included.
    pub fn all_pages(&self) -> impl Iterator<Item = &'a Page> + '_ {
        self.all.iter().copied()
    }

    /// Pages whose content links to `name`, in name order with ids breaking ties.
    ///
    /// Includes pages that lost their name to a lower id. A local preview of
    /// backlinks; the backend remains authoritative.
    pub fn referencing(&self, name: &str) -> Vec<&'a Page> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }
        let mut found: Vec<&'a Page> = self
            .all_pages()
            .filter(|page| page.name != name)
            .filter(|page| scan(&page.content).any(|t| t.name() == name))
            .collect();
        found.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
        found
    }
}
