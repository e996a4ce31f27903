//! Language abstraction: the closed four-language mapping of SPEC_FULL.md §4.1.

/// Supported source languages. `.mjs` maps onto `JavaScript` the same way
/// code2flow's own `LANGUAGES` table aliases it, rather than getting its own
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Python,
    JavaScript,
    Ruby,
    Php,
}

impl LanguageId {
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Python => "py",
            LanguageId::JavaScript => "js",
            LanguageId::Ruby => "rb",
            LanguageId::Php => "php",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            LanguageId::Python => &["py"],
            LanguageId::JavaScript => &["js", "mjs"],
            LanguageId::Ruby => &["rb"],
            LanguageId::Php => &["php"],
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(LanguageId::Python),
            "js" | "mjs" => Some(LanguageId::JavaScript),
            "rb" => Some(LanguageId::Ruby),
            "php" => Some(LanguageId::Php),
            _ => None,
        }
    }

    pub fn from_file_path(path: &str) -> Option<Self> {
        path.rsplit('.').next().and_then(Self::from_extension)
    }

    /// Parses the explicit `--language` CLI value. Unlike `from_extension`, this
    /// never accepts `mjs` — code2flow's argparse `choices` only lists the four
    /// canonical suffixes; `mjs` is reachable solely through auto-detection.
    pub fn from_cli_value(value: &str) -> Option<Self> {
        match value {
            "py" => Some(LanguageId::Python),
            "js" => Some(LanguageId::JavaScript),
            "rb" => Some(LanguageId::Ruby),
            "php" => Some(LanguageId::Php),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_extension_covers_all_four_languages() {
        assert_eq!(LanguageId::from_extension("py"), Some(LanguageId::Python));
        assert_eq!(
            LanguageId::from_extension("js"),
            Some(LanguageId::JavaScript)
        );
        assert_eq!(LanguageId::from_extension("rb"), Some(LanguageId::Ruby));
        assert_eq!(LanguageId::from_extension("php"), Some(LanguageId::Php));
        assert_eq!(LanguageId::from_extension("xyz"), None);
    }

    #[test]
    fn mjs_aliases_to_javascript() {
        assert_eq!(
            LanguageId::from_extension("mjs"),
            Some(LanguageId::JavaScript)
        );
    }

    #[test]
    fn cli_value_rejects_mjs() {
        assert_eq!(LanguageId::from_cli_value("mjs"), None);
        assert_eq!(LanguageId::from_cli_value("js"), Some(LanguageId::JavaScript));
    }

    #[test]
    fn from_file_path_uses_suffix() {
        assert_eq!(
            LanguageId::from_file_path("src/main.py"),
            Some(LanguageId::Python)
        );
        assert_eq!(
            LanguageId::from_file_path("app.mjs"),
            Some(LanguageId::JavaScript)
        );
    }
}
