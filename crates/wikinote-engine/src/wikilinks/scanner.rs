use std::collections::HashSet;

use serde::Serialize;

use super::{cursor::Cursor, span::Span};

/// WikiLink delimiters.
pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const CLOSE_BYTE: u8 = b']';
}

/// One `[[...]]` occurrence in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WikiLinkToken<'a> {
    /// Full matched text including brackets, e.g. `[[ Project X ]]`.
    pub raw: &'a str,
    /// Payload between the brackets before trimming, e.g. ` Project X `.
    pub inner: &'a str,
    /// Byte span of `raw` in the source.
    pub span: Span,
}

impl<'a> WikiLinkToken<'a> {
    /// Target page name: the payload with surrounding whitespace trimmed.
    pub fn name(&self) -> &'a str {
        self.inner.trim()
    }
}

/// Lazy left-to-right iterator over the wikilinks in a text.
///
/// A clone resumes from the current position; call [`scan`] again to start over.
#[derive(Debug, Clone)]
pub struct WikiLinkScanner<'a> {
    cur: Cursor<'a>,
}

/// Scans `text` for `[[...]]` tokens.
///
/// Matches are non-overlapping. The first `]` after the opener ends the
/// payload and must be followed by a second `]`; otherwise the opener is
/// treated as plain text.
///
/// Runs in linear time: a failed opener skips every later opener that would
/// fail on the same `]` (or on its absence).
pub fn scan(text: &str) -> WikiLinkScanner<'_> {
    WikiLinkScanner {
        cur: Cursor::new(text),
    }
}

impl<'a> WikiLinkScanner<'a> {
    /// Reads a token at an opener. On failure returns the offset where the
    /// next opener could possibly match.
    fn try_token(&mut self) -> Result<WikiLinkToken<'a>, usize> {
        let text = self.cur.text();
        let start = self.cur.pos();
        let inner_start = start + WikiLink::OPEN.len();
        let Some(inner_end) = self.cur.find_from(inner_start, WikiLink::CLOSE_BYTE) else {
            return Err(text.len());
        };

        if !text.as_bytes()[inner_end..].starts_with(WikiLink::CLOSE) {
            return Err(inner_end);
        }
        let end = inner_end + WikiLink::CLOSE.len();
        self.cur.jump_to(end);

        Ok(WikiLinkToken {
            raw: &text[start..end],
            inner: &text[inner_start..inner_end],
            span: Span::new(start, end),
        })
    }
}

impl<'a> Iterator for WikiLinkScanner<'a> {
    type Item = WikiLinkToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cur.eof() {
            if !self.cur.starts_with(WikiLink::OPEN) {
                self.cur.bump();
                continue;
            }
            match self.try_token() {
                Ok(token) => return Some(token),
                Err(resume) => self.cur.jump_to(resume),
            }
        }
        None
    }
}

impl std::iter::FusedIterator for WikiLinkScanner<'_> {}

/// All trimmed link names in `text`, in scan order, duplicates retained.
pub fn extract_wikilink_names(text: &str) -> Vec<String> {
    scan(text).map(|t| t.name().to_string()).collect()
}

/// Distinct non-empty link names in first-occurrence order.
///
/// This is the set a page records as its outbound references; empty names
/// are dropped since they can never match a page.
pub fn unique_wikilink_names(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scan(text)
        .map(|t| t.name())
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}
