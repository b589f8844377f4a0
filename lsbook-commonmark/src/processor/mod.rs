//! Markdown processing module.
//!
//! - [`core`]: the processor and its render pipeline
//! - [`extensions`]: line-level syntax rewritten before parsing
//! - [`process`]: file-level helpers that combine imports and rendering
//! - [`types`]: options and per-render state
pub mod core;
pub mod extensions;
pub mod process;
pub mod types;

pub use extensions::process_spoilers;
pub use process::{process_markdown_file, process_markdown_string};
pub use types::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor};
