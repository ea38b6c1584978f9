//! Translation loaders
//!
//! A loader turns a language code into a raw translation table. The service compiles
//! whatever comes back and never validates its shape beyond "it is a table".

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LoaderError, LoaderResult};
use crate::value::{TranslationValue, Translations};

/// Root key ignored by the JSON loaders
const METADATA_KEY: &str = "@metadata";

/// Source of raw translation tables
///
/// Implementations may do I/O; the service guarantees that at most one call per
/// language is in flight at any time.
#[async_trait]
pub trait TranslateLoader: Send + Sync {
    /// Produce the raw table for `lang`
    async fn get_translation(&self, lang: &str) -> LoaderResult<Translations>;
}

/// Loader that knows no translations: every language gets an empty table
#[derive(Debug, Clone, Default)]
pub struct TranslateFakeLoader;

#[async_trait]
impl TranslateLoader for TranslateFakeLoader {
    async fn get_translation(&self, _lang: &str) -> LoaderResult<Translations> {
        Ok(Translations::new())
    }
}

/// In-memory loader serving fixed tables
///
/// Useful for tests and demos. An optional delay simulates a slow backend.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    tables: HashMap<String, Translations>,
    /// Simulated latency per load (in milliseconds)
    delay_ms: u64,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_translations(mut self, lang: &str, translations: Translations) -> Self {
        self.tables.insert(lang.to_string(), translations);
        self
    }

    /// Same as [`with_translations`](Self::with_translations), from a JSON object
    pub fn with_json(self, lang: &str, json: Value) -> LoaderResult<Self> {
        let translations = parse_translations(Path::new(lang), json)?;
        Ok(self.with_translations(lang, translations))
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

#[async_trait]
impl TranslateLoader for StaticLoader {
    async fn get_translation(&self, lang: &str) -> LoaderResult<Translations> {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.tables
            .get(lang)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(lang.to_string()))
    }
}

/// Loader reading one JSON file per language from a directory
///
/// The file for `lang` is `{dir}/{prefix}{lang}{suffix}`, by default `{dir}/{lang}.json`.
/// The JSON file should have the following structure:
/// ```json
/// {
///     "@metadata": { ... },  // Ignored
///     "HELLO": "Hello {{name}}",
///     "menu": { "open": "Open", "close": "Close" }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileTranslateLoader {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl FileTranslateLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileTranslateLoader {
            dir: dir.into(),
            prefix: String::new(),
            suffix: ".json".to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    /// Path of the file holding `lang`'s translations
    pub fn path_for(&self, lang: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", self.prefix, lang, self.suffix))
    }
}

#[async_trait]
impl TranslateLoader for FileTranslateLoader {
    async fn get_translation(&self, lang: &str) -> LoaderResult<Translations> {
        load_translations_from_file(&self.path_for(lang)).await
    }
}

/// Load a translation table from a single JSON file
///
/// # Errors
/// - File not found or unreadable
/// - Invalid JSON
/// - Root is not an object
pub async fn load_translations_from_file(path: &Path) -> LoaderResult<Translations> {
    debug!(path = %path.display(), "reading translations");
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let json: Value = serde_json::from_str(&content).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    parse_translations(path, json)
}

fn parse_translations(path: &Path, json: Value) -> LoaderResult<Translations> {
    let Value::Object(mut obj) = json else {
        return Err(LoaderError::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    obj.remove(METADATA_KEY);

    let mut translations = Translations::new();
    for (key, value) in obj {
        match TranslationValue::from_json(value) {
            Some(value) => {
                translations.insert(key, value);
            }
            None => warn!(key = %key, path = %path.display(), "null translation, skipping"),
        }
    }
    Ok(translations)
}
