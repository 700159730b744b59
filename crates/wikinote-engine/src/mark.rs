//! # WikiLink mark
//!
//! Data contract of the inline `wikilink` mark a rich-text editor uses to
//! show links with existence-aware styling.
//!
//! A mark carries two attributes, the target page name and whether it
//! exists. They are written out as `data-page-name` / `data-exists` on a
//! `<span data-type="wikilink">`, and read back with missing or malformed
//! values falling back to the defaults (empty name, exists) so a damaged
//! attribute never breaks rendering.
//!
//! Editors are reached through [`EditorCommands`], a two-method capability
//! the host editor implements.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::wikilinks::ResolvedWikiLink;

/// Mark type name registered with the host editor.
pub const WIKILINK_MARK: &str = "wikilink";

pub const DATA_TYPE: &str = "data-type";
pub const DATA_PAGE_NAME: &str = "data-page-name";
pub const DATA_EXISTS: &str = "data-exists";
pub const CLASS: &str = "class";

pub const CLASS_EXISTS: &str = "wiki-link-exists";
pub const CLASS_MISSING: &str = "wiki-link-missing";

/// Rendered HTML attributes, in a stable order.
pub type Attributes = BTreeMap<String, String>;

/// Attributes of a `wikilink` mark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WikiLinkAttrs {
    pub page_name: String,
    pub exists: bool,
}

impl Default for WikiLinkAttrs {
    fn default() -> Self {
        Self {
            page_name: String::new(),
            exists: true,
        }
    }
}

impl WikiLinkAttrs {
    pub fn new(page_name: impl Into<String>, exists: bool) -> Self {
        Self {
            page_name: page_name.into(),
            exists,
        }
    }

    /// Style class derived from the existence flag.
    pub fn class(&self) -> &'static str {
        if self.exists {
            CLASS_EXISTS
        } else {
            CLASS_MISSING
        }
    }

    /// The mark's own data attributes.
    pub fn to_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(DATA_PAGE_NAME.to_string(), self.page_name.clone());
        attrs.insert(DATA_EXISTS.to_string(), self.exists.to_string());
        attrs
    }

    /// Reads attributes back through an element accessor.
    pub fn from_attributes<'v>(get: impl Fn(&str) -> Option<&'v str>) -> Self {
        let defaults = Self::default();
        Self {
            page_name: get(DATA_PAGE_NAME)
                .map(str::to_string)
                .unwrap_or(defaults.page_name),
            exists: match get(DATA_EXISTS) {
                Some("true") => true,
                Some("false") => false,
                _ => defaults.exists,
            },
        }
    }
}

impl From<&ResolvedWikiLink> for WikiLinkAttrs {
    fn from(link: &ResolvedWikiLink) -> Self {
        Self::new(link.page_name.clone(), link.exists)
    }
}

/// Extra HTML attributes merged into every rendered wikilink span.
#[derive(Debug, Clone, Default)]
pub struct WikiLinkOptions {
    pub html_attributes: Attributes,
}

/// Full attribute set of a rendered wikilink span.
///
/// Later sources win in the order: base (`data-type`, `class`), options,
/// mark attributes. `class` values are concatenated instead of replaced.
pub fn render_attributes(attrs: &WikiLinkAttrs, options: &WikiLinkOptions) -> Attributes {
    let mut out = Attributes::new();
    out.insert(DATA_TYPE.to_string(), WIKILINK_MARK.to_string());
    out.insert(CLASS.to_string(), attrs.class().to_string());
    merge_attributes(&mut out, &options.html_attributes);
    merge_attributes(&mut out, &attrs.to_attributes());
    out
}

fn merge_attributes(into: &mut Attributes, from: &Attributes) {
    for (key, value) in from {
        if key == CLASS
            && let Some(existing) = into.get_mut(key)
        {
            if !value.is_empty() {
                existing.push(' ');
                existing.push_str(value);
            }
            continue;
        }
        into.insert(key.clone(), value.clone());
    }
}

/// Writes `<span ...>text</span>` with escaped attributes and content.
pub fn render_span(attrs: &WikiLinkAttrs, text: &str, options: &WikiLinkOptions) -> String {
    let mut html = String::from("<span");
    for (key, value) in render_attributes(attrs, options) {
        html.push(' ');
        html.push_str(&key);
        html.push_str("=\"");
        html.push_str(&html_escape::encode_safe(&value));
        html.push('"');
    }
    html.push('>');
    html.push_str(&html_escape::encode_text(text));
    html.push_str("</span>");
    html
}

/// Reads a `<span data-type="wikilink" ...>text</span>` back into its
/// attributes and decoded text. Returns `None` for anything else.
pub fn parse_span(html: &str) -> Option<(WikiLinkAttrs, String)> {
    static SPAN_REGEX: OnceLock<Regex> = OnceLock::new();
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let span_regex = SPAN_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\s*<span\b([^>]*)>(.*?)</span>\s*$").expect("Invalid span regex")
    });
    let attr_regex = ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#)
            .expect("Invalid attribute regex")
    });

    let caps = span_regex.captures(html)?;
    let attributes: Attributes = attr_regex
        .captures_iter(&caps[1])
        .map(|attr| {
            (
                attr[1].to_ascii_lowercase(),
                html_escape::decode_html_entities(&attr[2]).into_owned(),
            )
        })
        .collect();

    if attributes.get(DATA_TYPE).map(String::as_str) != Some(WIKILINK_MARK) {
        return None;
    }

    let attrs = WikiLinkAttrs::from_attributes(|key| attributes.get(key).map(String::as_str));
    let text = html_escape::decode_html_entities(&caps[2]).into_owned();
    Some((attrs, text))
}

/// Mark commands offered by a host rich-text editor.
///
/// Both calls follow the host's own success convention: `true` when the
/// command applied, `false` otherwise, including when the mark type `name`
/// is not registered (in which case nothing changes).
pub trait EditorCommands {
    fn set_mark(&mut self, name: &str, attrs: &Attributes) -> bool;
    fn unset_mark(&mut self, name: &str) -> bool;
}

/// Marks the editor's selection as a wikilink.
pub fn set_wikilink<E: EditorCommands + ?Sized>(editor: &mut E, attrs: &WikiLinkAttrs) -> bool {
    editor.set_mark(WIKILINK_MARK, &attrs.to_attributes())
}

/// Removes the wikilink mark from the editor's selection.
pub fn unset_wikilink<E: EditorCommands + ?Sized>(editor: &mut E) -> bool {
    editor.unset_mark(WIKILINK_MARK)
}
