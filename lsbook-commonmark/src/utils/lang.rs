//! Language tables for the client-side highlighter.

/// File extension to highlighter language, used when a file is imported as a
/// code block without an explicit language.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
  ("md", "markdown"),
  ("markdown", "markdown"),
  ("rs", "rust"),
  ("py", "python"),
  ("pyw", "python"),
  ("js", "javascript"),
  ("mjs", "javascript"),
  ("cjs", "javascript"),
  ("ts", "typescript"),
  ("jsx", "jsx"),
  ("tsx", "tsx"),
  ("java", "java"),
  ("kt", "kotlin"),
  ("kts", "kotlin"),
  ("scala", "scala"),
  ("groovy", "groovy"),
  ("gradle", "groovy"),
  ("c", "c"),
  ("h", "c"),
  ("cpp", "cpp"),
  ("cc", "cpp"),
  ("cxx", "cpp"),
  ("hpp", "cpp"),
  ("hh", "cpp"),
  ("cs", "csharp"),
  ("go", "go"),
  ("rb", "ruby"),
  ("php", "php"),
  ("pl", "perl"),
  ("lua", "lua"),
  ("r", "r"),
  ("swift", "swift"),
  ("dart", "dart"),
  ("sh", "bash"),
  ("bash", "bash"),
  ("zsh", "bash"),
  ("ps1", "powershell"),
  ("bat", "batch"),
  ("cmd", "batch"),
  ("sql", "sql"),
  ("html", "markup"),
  ("htm", "markup"),
  ("xml", "markup"),
  ("svg", "markup"),
  ("vue", "markup"),
  ("css", "css"),
  ("scss", "scss"),
  ("less", "less"),
  ("json", "json"),
  ("yml", "yaml"),
  ("yaml", "yaml"),
  ("toml", "toml"),
  ("ini", "ini"),
  ("cfg", "ini"),
  ("dockerfile", "docker"),
  ("txt", "none"),
];

/// Fence info strings that are not file extensions but name a language.
const ALIASES: &[(&str, &str)] = &[
  ("shell", "bash"),
  ("console", "bash"),
  ("c++", "cpp"),
  ("c#", "csharp"),
  ("golang", "go"),
  ("ps", "powershell"),
  ("text", "none"),
  ("plain", "none"),
  ("plaintext", "none"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
  table
    .iter()
    .find(|(k, _)| k.eq_ignore_ascii_case(key))
    .map(|(_, v)| *v)
}

/// Highlighter language for a file extension, if known.
#[must_use]
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
  lookup(EXTENSION_LANGUAGES, ext)
}

/// Canonical highlighter name for a fence info tag. Unknown tags pass through
/// lowercased.
#[must_use]
pub fn highlighter_alias(tag: &str) -> String {
  lookup(ALIASES, tag)
    .or_else(|| language_for_extension(tag))
    .map_or_else(|| tag.to_ascii_lowercase(), str::to_owned)
}

#[must_use]
pub fn is_markdown_extension(ext: &str) -> bool {
  ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown")
}
