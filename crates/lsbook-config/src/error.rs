use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for lsbook-config operations
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Missing configuration file {}", path.display())]
  NotFound { path: PathBuf },

  #[error("Failed to read config file {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Invalid JSON in {}: {source}", path.display())]
  Parse {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid ignore pattern {pattern:?}: {source}")]
  Glob {
    pattern: String,
    #[source]
    source:  globset::Error,
  },

  #[error("Translation bundle {language} is not valid JSON: {source}")]
  Bundle {
    language: String,
    #[source]
    source:   serde_json::Error,
  },
}
