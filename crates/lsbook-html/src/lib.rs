//! HTML output for lsbook: the per-page sidebar, page assembly through the
//! embedded template, and the search index.
pub mod page;
pub mod search;
pub mod sidebar;
pub mod template;

pub use page::{BookContext, RenderedPage, render_page};
pub use search::{SEARCH_INDEX_FILE, SearchEntry, SearchIndex};
pub use sidebar::{PageLink, SummaryRenderResult, page_href, render_for};
pub use template::{PageRenderer, PageView};
