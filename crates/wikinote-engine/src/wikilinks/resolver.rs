use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Page, PageId};

use super::{
    index::PageIndex,
    scanner::{WikiLinkToken, scan},
    span::Span,
};

/// A wikilink annotated with whether its target page exists.
///
/// `page_id` is `Some` exactly when `exists` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedWikiLink {
    /// Raw token as it appears in the source, brackets included.
    pub text: String,
    /// Trimmed target page name.
    pub page_name: String,
    pub exists: bool,
    pub page_id: Option<PageId>,
    /// Where `text` sits in the source.
    pub span: Span,
}

impl ResolvedWikiLink {
    fn from_token(token: &WikiLinkToken<'_>, index: &PageIndex<'_>) -> Self {
        let page_name = token.name();
        let page_id = index.id_of(page_name);
        Self {
            text: token.raw.to_string(),
            page_name: page_name.to_string(),
            exists: page_id.is_some(),
            page_id,
            span: token.span,
        }
    }
}

/// Resolves scanned tokens against `index`, preserving scan order.
///
/// Never fails: a name with no page becomes a link with `exists == false`.
pub fn resolve<'t, I>(tokens: I, index: &PageIndex<'_>) -> Vec<ResolvedWikiLink>
where
    I: IntoIterator<Item = WikiLinkToken<'t>>,
{
    tokens
        .into_iter()
        .map(|token| ResolvedWikiLink::from_token(&token, index))
        .collect()
}

/// Scans `text` and resolves every link against a freshly built index of `pages`.
pub fn parse_wikilinks(text: &str, pages: &[Page]) -> Vec<ResolvedWikiLink> {
    let index = PageIndex::build(pages);
    resolve(scan(text), &index)
}

/// Ids of the existing pages `text` links to, deduplicated in first-occurrence order.
pub fn outbound_page_ids(text: &str, index: &PageIndex<'_>) -> Vec<PageId> {
    let mut seen = HashSet::new();
    scan(text)
        .filter_map(|token| index.id_of(token.name()))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Non-empty link names in `text` with no matching page, deduplicated in
/// first-occurrence order.
pub fn missing_targets(text: &str, index: &PageIndex<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    scan(text)
        .map(|token| token.name())
        .filter(|name| !name.is_empty() && !index.contains(name))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(links: &[ResolvedWikiLink]) -> Vec<(&str, bool, Option<PageId>)> {
        links
            .iter()
            .map(|l| (l.page_name.as_str(), l.exists, l.page_id))
            .collect()
    }

    #[test]
    fn resolves_existing_and_missing_in_order() {
        let pages = vec![Page::new(1, "Alpha", "")];

        let links = parse_wikilinks("See [[Alpha]] and [[Beta]]", &pages);

        assert_eq!(
            summary(&links),
            vec![("Alpha", true, Some(PageId(1))), ("Beta", false, None)]
        );
        assert_eq!(links[0].text, "[[Alpha]]");
        assert_eq!(links[1].span, Span::new(18, 26));
    }

    #[test]
    fn empty_brackets_never_exist() {
        let pages = vec![Page::new(1, "Alpha", ""), Page::new(2, "Beta", "")];

        let links = parse_wikilinks("[[]]", &pages);

        assert_eq!(summary(&links), vec![("", false, None)]);
    }

    #[test]
    fn trimmed_name_resolves_but_raw_text_is_kept() {
        let pages = vec![Page::new(9, "Project X", "")];

        let links = parse_wikilinks("[[  Project X ]]", &pages);

        assert!(links[0].exists);
        assert_eq!(links[0].page_name, "Project X");
        assert_eq!(links[0].text, "[[  Project X ]]");
    }

    #[test]
    fn duplicate_names_resolve_deterministically() {
        let pages = vec![Page::new(8, "Dup", "first"), Page::new(4, "Dup", "second")];

        let first = parse_wikilinks("[[Dup]]", &pages);
        let second = parse_wikilinks("[[Dup]]", &pages);

        assert!(first[0].exists);
        assert_eq!(first[0].page_id, Some(PageId(4)));
        assert_eq!(first, second);
    }

    #[test]
    fn no_pages_means_everything_missing() {
        let links = parse_wikilinks("[[A]] [[B]]", &[]);
        assert!(links.iter().all(|l| !l.exists && l.page_id.is_none()));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn resolve_accepts_prefiltered_tokens() {
        let pages = vec![Page::new(1, "A", "")];
        let index = PageIndex::build(&pages);

        let links = resolve(scan("[[A]] [[B]] [[A]]").skip(1), &index);

        assert_eq!(
            summary(&links),
            vec![("B", false, None), ("A", true, Some(PageId(1)))]
        );
    }

    #[test]
    fn outbound_ids_are_distinct_and_ordered() {
        let pages = vec![Page::new(1, "A", ""), Page::new(2, "B", "")];
        let index = PageIndex::build(&pages);

        let ids = outbound_page_ids("[[B]] [[Missing]] [[A]] [[ B ]]", &index);

        assert_eq!(ids, vec![PageId(2), PageId(1)]);
    }

    #[test]
    fn missing_targets_skip_empty_and_existing() {
        let pages = vec![Page::new(1, "A", "")];
        let index = PageIndex::build(&pages);

        let missing = missing_targets("[[X]] [[A]] [[]] [[Y]] [[X]]", &index);

        assert_eq!(missing, vec!["X", "Y"]);
    }
}
