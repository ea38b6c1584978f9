//! Compilers post-process raw translations into the form the parser reads.

use crate::value::{TranslationValue, Translations};

/// Turns raw values into compiled ones
///
/// A compiler may return [`Deferred`](crate::Deferred) leaves; the service evaluates
/// them with the interpolation parameters before interpolating the result.
pub trait TranslateCompiler: Send + Sync {
    /// Compile a single value added through `set`
    fn compile(&self, value: &str, lang: &str) -> TranslationValue;

    /// Compile a whole table, as loaded or passed to `set_translation`
    fn compile_translations(&self, translations: Translations, lang: &str) -> Translations;
}

/// Identity compiler
#[derive(Debug, Clone, Default)]
pub struct TranslateFakeCompiler;

impl TranslateCompiler for TranslateFakeCompiler {
    fn compile(&self, value: &str, _lang: &str) -> TranslationValue {
        TranslationValue::Text(value.to_string())
    }

    fn compile_translations(&self, translations: Translations, _lang: &str) -> Translations {
        translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_compiler_is_identity() {
        let compiler = TranslateFakeCompiler;
        assert_eq!(compiler.compile("Hello {{name}}", "en"), "Hello {{name}}");

        let mut table = Translations::new();
        table.insert("A".to_string(), "a".into());
        table.insert(
            "B".to_string(),
            TranslationValue::List(vec!["b1".into(), "b2".into()]),
        );
        assert_eq!(compiler.compile_translations(table.clone(), "en"), table);
    }
}
