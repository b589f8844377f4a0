//! Book outline (`SUMMARY.md`) parsing for lsbook.
//!
//! ```rust
//! use lsbook_summary::Summary;
//!
//! let summary = Summary::parse(
//!   "# Intro\n* [Welcome](README.md)\n* [Setup](setup.md)\n",
//!   "Summary",
//! )
//! .unwrap();
//!
//! assert_eq!(summary.navigation[1].level.to_string(), "1.2");
//! ```
pub mod error;
pub mod parser;
pub mod types;

pub use error::SummaryError;
pub use parser::{ENTRY_DOCUMENT, filter_outline, find_summary_file};
pub use types::{ChapterNode, Level, NavigationEntry, Summary, is_markdown_reference};
