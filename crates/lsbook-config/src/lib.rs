//! Book configuration (`book.json`) and interface translations for lsbook.
pub mod config;
pub mod error;
pub mod i18n;

pub use config::{CONFIG_FILE, Config, DEFAULT_LANGUAGE};
pub use error::ConfigError;
pub use i18n::I18n;
