use std::collections::HashMap;

pub const PAGE_TEMPLATE: &str = include_str!("../templates/page.html");

pub const LSBOOK_CSS: &str = include_str!("../templates/lsbook.css");
pub const LSBOOK_JS: &str = include_str!("../templates/lsbook.js");

pub const I18N_EN: &str = include_str!("../i18n/en.json");
pub const I18N_ZH_CN: &str = include_str!("../i18n/zh-cn.json");

/// Directory, relative to the output root, that receives [`assets`].
pub const ASSETS_DIR: &str = "lsbook";

/// Static files written under [`ASSETS_DIR`], keyed by file name.
#[must_use]
pub fn assets() -> HashMap<&'static str, &'static str> {
  let mut assets = HashMap::new();
  assets.insert("lsbook.css", LSBOOK_CSS);
  assets.insert("lsbook.js", LSBOOK_JS);
  assets
}

/// Translation bundle (a flat JSON object) for a lowercase language tag.
#[must_use]
pub fn i18n_bundle(language: &str) -> Option<&'static str> {
  match language {
    "en" => Some(I18N_EN),
    "zh-cn" => Some(I18N_ZH_CN),
    _ => None,
  }
}
