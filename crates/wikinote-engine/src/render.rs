use serde::Serialize;

use crate::mark::{WikiLinkAttrs, WikiLinkOptions, render_span};
use crate::models::Page;
use crate::wikilinks::{ResolvedWikiLink, parse_wikilinks};

/// A piece of page content ready for inline rendering.
///
/// Text between links is borrowed from the source; links are the resolved
/// descriptors they replace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Segment<'a> {
    Text(&'a str),
    Link(&'a ResolvedWikiLink),
}

/// Splits `text` into plain runs and links, using each link's span for
/// positional replacement.
///
/// `links` must come from resolving this same `text`. A link whose span does
/// not cover its raw token in `text`, or that overlaps an earlier one, is left
/// as plain text.
pub fn segments<'a>(text: &'a str, links: &'a [ResolvedWikiLink]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut pos = 0;

    for link in links {
        if link.span.start < pos || link.span.slice(text) != Some(link.text.as_str()) {
            log::debug!("skipping link {:?} that doesn't match source", link.text);
            continue;
        }
        if link.span.start > pos {
            out.push(Segment::Text(&text[pos..link.span.start]));
        }
        out.push(Segment::Link(link));
        pos = link.span.end;
    }

    if pos < text.len() {
        out.push(Segment::Text(&text[pos..]));
    }
    out
}

/// Renders `text` as HTML, replacing each resolved link's raw token with a
/// wikilink span labelled with the page name.
pub fn render_resolved(
    text: &str,
    links: &[ResolvedWikiLink],
    options: &WikiLinkOptions,
) -> String {
    let mut html = String::with_capacity(text.len());
    for segment in segments(text, links) {
        match segment {
            Segment::Text(run) => html.push_str(&html_escape::encode_text(run)),
            Segment::Link(link) => {
                html.push_str(&render_span(
                    &WikiLinkAttrs::from(link),
                    &link.page_name,
                    options,
                ));
            }
        }
    }
    html
}

/// Resolves the links in `text` against `pages` and renders the result.
pub fn render_html(text: &str, pages: &[Page]) -> String {
    let links = parse_wikilinks(text, pages);
    render_resolved(text, &links, &WikiLinkOptions::default())
}
