//! LanguageAdapter: the per-language façade over tree-sitter (SPEC_FULL.md §4.1).

mod adapter;
mod plugins;

pub use adapter::{LanguageAdapter, LanguageParams, Namespaces, ParsedFile, SourceType};

use crate::shared::ports::LanguageId;

/// Returns the adapter for a language. The closed four-language set is a
/// compile-time match, not a runtime plugin registry — adding a fifth language
/// is a deliberate code change (§4.1).
pub fn adapter_for(language: LanguageId) -> Box<dyn LanguageAdapter> {
    match language {
        LanguageId::Python => Box::new(plugins::python::PythonAdapter),
        LanguageId::JavaScript => Box::new(plugins::javascript::JavaScriptAdapter),
        LanguageId::Ruby => Box::new(plugins::ruby::RubyAdapter),
        LanguageId::Php => Box::new(plugins::php::PhpAdapter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_for_every_language_matches_its_id() {
        for lang in [
            LanguageId::Python,
            LanguageId::JavaScript,
            LanguageId::Ruby,
            LanguageId::Php,
        ] {
            assert_eq!(adapter_for(lang).language_id(), lang);
        }
    }
}
