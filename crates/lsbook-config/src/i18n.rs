//! Interface strings. The English bundle is the base; the configured
//! language overlays it.
use std::collections::BTreeMap;

use log::warn;

use crate::{config::DEFAULT_LANGUAGE, error::ConfigError};

/// Resolved interface strings for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct I18n {
  language: String,
  strings:  BTreeMap<String, String>,
}

impl I18n {
  /// Build the string table for `language`, falling back to
  /// [`DEFAULT_LANGUAGE`] with a warning if no bundle exists for it.
  ///
  /// # Errors
  ///
  /// Fails only if an embedded bundle is not valid JSON.
  pub fn load(language: &str) -> Result<Self, ConfigError> {
    let requested = language.trim().to_ascii_lowercase();
    let (language, overlay) = match lsbook_templates::i18n_bundle(&requested) {
      Some(bundle) => (requested, bundle),
      None => {
        warn!(
          "Unsupported language {language:?}, falling back to \
           {DEFAULT_LANGUAGE}"
        );
        (
          DEFAULT_LANGUAGE.to_owned(),
          lsbook_templates::i18n_bundle(DEFAULT_LANGUAGE).unwrap_or_default(),
        )
      },
    };

    let base = lsbook_templates::i18n_bundle("en").unwrap_or_default();
    let mut strings = parse_bundle("en", base)?;
    strings.extend(parse_bundle(&language, overlay)?);

    Ok(Self { language, strings })
  }

  /// Language whose bundle was actually used.
  #[must_use]
  pub fn language(&self) -> &str {
    &self.language
  }

  /// Look up a string, returning the key itself when it is missing.
  #[must_use]
  pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
    self.strings.get(key).map_or(key, String::as_str)
  }

  #[must_use]
  pub const fn strings(&self) -> &BTreeMap<String, String> {
    &self.strings
  }
}

fn parse_bundle(
  language: &str,
  bundle: &str,
) -> Result<BTreeMap<String, String>, ConfigError> {
  if bundle.is_empty() {
    return Ok(BTreeMap::new());
  }
  serde_json::from_str(bundle).map_err(|source| ConfigError::Bundle {
    language: language.to_owned(),
    source,
  })
}
