use serde::Deserialize;

/// Policy flags for a [`TranslateService`](crate::TranslateService)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Consult the default language when the current one lacks a key
    pub use_default_lang: bool,
    /// Merge freshly loaded tables into existing ones instead of replacing them
    pub extend: bool,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        TranslateConfig {
            use_default_lang: true,
            extend: false,
        }
    }
}

impl TranslateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_use_default_lang(mut self, use_default_lang: bool) -> Self {
        self.use_default_lang = use_default_lang;
        self
    }

    pub fn with_extend(mut self, extend: bool) -> Self {
        self.extend = extend;
        self
    }

    /// Read `BANANA_TRANSLATE_USE_DEFAULT_LANG` and `BANANA_TRANSLATE_EXTEND`.
    /// Missing or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| {
            var(name)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };
        TranslateConfig {
            use_default_lang: flag("BANANA_TRANSLATE_USE_DEFAULT_LANG", defaults.use_default_lang),
            extend: flag("BANANA_TRANSLATE_EXTEND", defaults.extend),
        }
    }

    /// Parse a JSON config; absent fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TranslateConfig::new();
        assert!(config.use_default_lang);
        assert!(!config.extend);
    }

    #[test]
    fn test_builder() {
        let config = TranslateConfig::new()
            .with_use_default_lang(false)
            .with_extend(true);
        assert!(!config.use_default_lang);
        assert!(config.extend);
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("BANANA_TRANSLATE_USE_DEFAULT_LANG", "no"),
            ("BANANA_TRANSLATE_EXTEND", " TRUE "),
        ]
        .into_iter()
        .collect();
        let config = TranslateConfig::from_vars(|name| vars.get(name).map(|v| v.to_string()));
        assert!(!config.use_default_lang);
        assert!(config.extend);
    }

    #[test]
    fn test_from_vars_ignores_garbage() {
        let config = TranslateConfig::from_vars(|_| Some("maybe".to_string()));
        assert_eq!(config, TranslateConfig::default());
    }

    #[test]
    fn test_from_json_partial() {
        let config = TranslateConfig::from_json(r#"{ "extend": true }"#).unwrap();
        assert!(config.use_default_lang);
        assert!(config.extend);
        assert!(TranslateConfig::from_json("[]").is_err());
    }
}
