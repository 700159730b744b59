//! # WikiLinks
//!
//! Scanning and resolution of `[[Page Name]]` references.
//!
//! ## Pipeline
//!
//! ```text
//! text ──scan──> WikiLinkToken* ──resolve(PageIndex)──> ResolvedWikiLink*
//! ```
//!
//! - **`cursor`**: byte cursor used by the scanner
//! - **`scanner`**: lazy, restartable iterator over `[[...]]` occurrences
//! - **`index`**: name -> page lookup built fresh from the full page set
//! - **`resolver`**: joins tokens against the index, preserving scan order
//!
//! ## Syntax
//!
//! A token is `[[`, any run of bytes other than `]`, then `]]`. The first `]`
//! ends the payload, so nesting is not supported and there is no escaping.
//! Only leading/trailing whitespace is trimmed for name lookup; the raw token
//! is kept verbatim for positional replacement when rendering.

pub mod cursor;
pub mod index;
pub mod resolver;
pub mod scanner;
pub mod span;

pub use index::PageIndex;
pub use resolver::{ResolvedWikiLink, missing_targets, outbound_page_ids, parse_wikilinks, resolve};
pub use scanner::{
    WikiLink, WikiLinkScanner, WikiLinkToken, extract_wikilink_names, scan, unique_wikilink_names,
};
pub use span::Span;
