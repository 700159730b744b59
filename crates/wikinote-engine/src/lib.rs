pub mod mark;
pub mod models;
pub mod render;
pub mod state;
pub mod wikilinks;

// Re-export key types for easier usage
pub use mark::{Attributes, EditorCommands, WikiLinkAttrs, WikiLinkOptions};
pub use models::{CreatePageRequest, Page, PageId, UpdatePageRequest};
pub use render::{Segment, render_html, render_resolved, segments};
pub use state::{AppState, NavigationTicket};
pub use wikilinks::{
    PageIndex, ResolvedWikiLink, Span, WikiLinkToken, extract_wikilink_names, missing_targets,
    outbound_page_ids, parse_wikilinks, resolve, scan, unique_wikilink_names,
};
