//! The translation service: resolves keys against per-language tables
//!
//! The service owns no translations itself. It drives a [`TranslateStore`] through
//! four pluggable strategies:
//!
//! 1. **Loader** - fetches a raw table for a language, asynchronously
//! 2. **Compiler** - turns raw tables and values into compiled ones
//! 3. **Parser** - finds keys in compiled tables and interpolates parameters
//! 4. **Missing handler** - recovers keys found in neither the current nor the
//!    default language
//!
//! Loads are de-duplicated per language: every caller asking for a language while
//! its load is in flight awaits that same load and sees the same outcome.
//!
//! # Example
//!
//! ```ignore
//! use banana_translate::{StaticLoader, TranslateService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = StaticLoader::new().with_json("en", json!({ "HELLO": "Hello {{name}}" }))?;
//!     let translate = TranslateService::builder().with_loader(loader).build();
//!
//!     translate.use_lang("en").await?;
//!     let hello = translate.get("HELLO", Some(&json!({ "name": "Bob" }))).await?;
//!     assert_eq!(hello, "Hello Bob");
//!     Ok(())
//! }
//! ```

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream, StreamExt};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::compiler::{TranslateCompiler, TranslateFakeCompiler};
use crate::config::TranslateConfig;
use crate::error::{LoaderError, TranslateError, TranslateResult};
use crate::loader::{TranslateFakeLoader, TranslateLoader};
use crate::missing::{
    FakeMissingTranslationHandler, MissingTranslation, MissingTranslationHandler,
    MissingTranslationHandlerParams,
};
use crate::parser::{TranslateDefaultParser, TranslateParser};
use crate::pending::{LoadOutcome, PendingLoads};
use crate::store::{
    DefaultLangChangeEvent, LangChangeEvent, TranslateStore, TranslationChangeEvent,
};
use crate::value::{TranslationValue, Translations, insert_path};

/// The key(s) passed to [`TranslateService::get`] and [`TranslateService::instant`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationKeys {
    One(String),
    Many(Vec<String>),
}

impl TranslationKeys {
    fn is_empty(&self) -> bool {
        match self {
            TranslationKeys::One(key) => key.is_empty(),
            TranslationKeys::Many(keys) => keys.is_empty() || keys.iter().any(String::is_empty),
        }
    }

    /// Drop repeated keys, keeping the first occurrence of each
    fn deduplicated(self) -> Self {
        match self {
            TranslationKeys::Many(keys) => {
                let mut seen = HashSet::new();
                TranslationKeys::Many(
                    keys.into_iter()
                        .filter(|key| seen.insert(key.clone()))
                        .collect(),
                )
            }
            one => one,
        }
    }

    /// Every key standing for itself
    fn untranslated(self) -> Translated {
        match self {
            TranslationKeys::One(key) => Translated::Single(key.into()),
            TranslationKeys::Many(keys) => Translated::Multiple(
                keys.into_iter()
                    .map(|key| {
                        let value = TranslationValue::from(key.as_str());
                        (key, value)
                    })
                    .collect(),
            ),
        }
    }
}

impl From<&str> for TranslationKeys {
    fn from(key: &str) -> Self {
        TranslationKeys::One(key.to_string())
    }
}

impl From<String> for TranslationKeys {
    fn from(key: String) -> Self {
        TranslationKeys::One(key)
    }
}

impl From<&String> for TranslationKeys {
    fn from(key: &String) -> Self {
        TranslationKeys::One(key.clone())
    }
}

impl From<Vec<String>> for TranslationKeys {
    fn from(keys: Vec<String>) -> Self {
        TranslationKeys::Many(keys)
    }
}

impl From<Vec<&str>> for TranslationKeys {
    fn from(keys: Vec<&str>) -> Self {
        TranslationKeys::Many(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for TranslationKeys {
    fn from(keys: &[&str]) -> Self {
        TranslationKeys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TranslationKeys {
    fn from(keys: [&str; N]) -> Self {
        TranslationKeys::Many(keys.iter().map(|k| k.to_string()).collect())
    }
}

/// Result of a lookup: one value for one key, or one value per key in request order
#[derive(Debug, Clone, PartialEq)]
pub enum Translated {
    Single(TranslationValue),
    Multiple(Vec<(String, TranslationValue)>),
}

impl Translated {
    /// The value of a single-key lookup
    pub fn as_value(&self) -> Option<&TranslationValue> {
        match self {
            Translated::Single(value) => Some(value),
            Translated::Multiple(_) => None,
        }
    }

    /// The value for `key` in a multi-key lookup
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        match self {
            Translated::Single(_) => None,
            Translated::Multiple(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
        }
    }
}

impl PartialEq<&str> for Translated {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Translated::Single(value) if value == other)
    }
}

impl Serialize for Translated {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Translated::Single(value) => value.serialize(serializer),
            Translated::Multiple(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// `use_lang` calls in flight. Among the calls that succeed, the one issued last
/// decides the current language, whatever order their loads finish in.
#[derive(Default)]
struct UseRequests {
    next_id: u64,
    committed_id: Option<u64>,
    outstanding: BTreeMap<u64, String>,
}

impl UseRequests {
    fn begin(&mut self, lang: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.outstanding.insert(id, lang.to_string());
        id
    }
}

/// Removes its request from the outstanding set when the `use_lang` call ends or is dropped
struct UseTicket<'a> {
    requests: &'a Mutex<UseRequests>,
    id: u64,
}

impl Drop for UseTicket<'_> {
    fn drop(&mut self) {
        lock(self.requests).outstanding.remove(&self.id);
    }
}

/// Tables a lookup runs against, captured once per call
struct Lookup {
    table: Option<Arc<Translations>>,
    fallback: Option<Arc<Translations>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TranslateService {
    store: Arc<Mutex<TranslateStore>>,
    loader: Arc<dyn TranslateLoader>,
    compiler: Arc<dyn TranslateCompiler>,
    parser: Arc<dyn TranslateParser>,
    missing_handler: Arc<dyn MissingTranslationHandler>,
    config: TranslateConfig,
    pending: Arc<Mutex<PendingLoads>>,
    use_requests: Mutex<UseRequests>,
}

impl TranslateService {
    pub fn new(
        store: Arc<Mutex<TranslateStore>>,
        loader: Arc<dyn TranslateLoader>,
        compiler: Arc<dyn TranslateCompiler>,
        parser: Arc<dyn TranslateParser>,
        missing_handler: Arc<dyn MissingTranslationHandler>,
        use_default_lang: bool,
    ) -> Self {
        TranslateService {
            store,
            loader,
            compiler,
            parser,
            missing_handler,
            config: TranslateConfig::default().with_use_default_lang(use_default_lang),
            pending: Arc::new(Mutex::new(PendingLoads::default())),
            use_requests: Mutex::new(UseRequests::default()),
        }
    }

    pub fn builder() -> TranslateServiceBuilder {
        TranslateServiceBuilder::default()
    }

    pub fn store(&self) -> &Arc<Mutex<TranslateStore>> {
        &self.store
    }

    pub fn loader(&self) -> &dyn TranslateLoader {
        self.loader.as_ref()
    }

    pub fn compiler(&self) -> &dyn TranslateCompiler {
        self.compiler.as_ref()
    }

    pub fn parser(&self) -> &dyn TranslateParser {
        self.parser.as_ref()
    }

    pub fn missing_handler(&self) -> &dyn MissingTranslationHandler {
        self.missing_handler.as_ref()
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    pub fn use_default_lang(&self) -> bool {
        self.config.use_default_lang
    }

    pub fn current_lang(&self) -> Option<String> {
        lock(&self.store).current_lang.clone()
    }

    pub fn default_lang(&self) -> Option<String> {
        lock(&self.store).default_lang.clone()
    }

    pub fn langs(&self) -> Vec<String> {
        lock(&self.store).langs.clone()
    }

    pub fn add_langs<S: AsRef<str>>(&self, langs: &[S]) {
        lock(&self.store).add_langs(langs);
    }

    pub fn on_translation_change(&self) -> watch::Receiver<Option<TranslationChangeEvent>> {
        lock(&self.store).on_translation_change.subscribe()
    }

    pub fn on_lang_change(&self) -> watch::Receiver<Option<LangChangeEvent>> {
        lock(&self.store).on_lang_change.subscribe()
    }

    pub fn on_default_lang_change(&self) -> watch::Receiver<Option<DefaultLangChangeEvent>> {
        lock(&self.store).on_default_lang_change.subscribe()
    }

    /// Switch to `lang`, loading its translations first if needed.
    ///
    /// On failure nothing changes and the load error is returned. When a call issued
    /// later has already switched language, the table is still cached but `lang` does
    /// not become current. A later call that fails does not hold this one back.
    pub async fn use_lang(&self, lang: &str) -> TranslateResult<()> {
        let ticket = UseTicket {
            requests: &self.use_requests,
            id: lock(&self.use_requests).begin(lang),
        };
        let id = ticket.id;
        let loaded = self.retrieve_translations(lang).await;
        drop(ticket);
        let translations = loaded?;

        let mut requests = lock(&self.use_requests);
        if requests.committed_id.is_some_and(|committed| committed > id) {
            debug!(lang, "language switch superseded by a later request");
            return Ok(());
        }
        requests.committed_id = Some(id);
        self.change_lang(lang, translations);
        Ok(())
    }

    /// Make `lang` the fallback language, loading its translations first if needed
    pub async fn set_default_lang(&self, lang: &str) -> TranslateResult<()> {
        if self.default_lang().as_deref() == Some(lang) {
            return Ok(());
        }
        let translations = self.retrieve_translations(lang).await?;

        let mut store = lock(&self.store);
        store.default_lang = Some(lang.to_string());
        info!(lang, "default language changed");
        store.emit_default_lang_change(lang, translations);
        Ok(())
    }

    /// The compiled table for `lang`, loading it if it is not cached yet
    pub async fn get_translation(&self, lang: &str) -> TranslateResult<Arc<Translations>> {
        self.retrieve_translations(lang).await
    }

    /// Drop the cached table for `lang` and forget any load in flight for it
    pub fn reset_lang(&self, lang: &str) {
        let mut pending = lock(&self.pending);
        if pending.evict(lang) {
            debug!(lang, "evicted pending load");
        }
        lock(&self.store).translations.remove(lang);
    }

    /// Reset `lang` and load it again
    pub async fn reload_lang(&self, lang: &str) -> TranslateResult<Arc<Translations>> {
        self.reset_lang(lang);
        self.retrieve_translations(lang).await
    }

    /// Resolve one key or a list of keys in the current language.
    ///
    /// Waits for a pending load of the language being switched to. A list is
    /// resolved against a single snapshot of the tables and yields once every key
    /// is resolved, missing-handler results included.
    pub async fn get(
        &self,
        keys: impl Into<TranslationKeys>,
        params: Option<&Value>,
    ) -> TranslateResult<Translated> {
        let keys = keys.into().deduplicated();
        if keys.is_empty() {
            return Err(TranslateError::EmptyKey);
        }

        let lang = self.active_lang();
        let table = match lang.as_deref() {
            Some(lang) => Some(self.retrieve_translations(lang).await?),
            None => None,
        };
        let lookup = Lookup {
            table,
            fallback: self.fallback_table(lang.as_deref()),
        };

        match keys {
            TranslationKeys::One(key) => Ok(Translated::Single(
                self.resolve(&lookup, &key, params).await?,
            )),
            TranslationKeys::Many(keys) => {
                let values =
                    future::try_join_all(keys.iter().map(|key| self.resolve(&lookup, key, params)))
                        .await?;
                Ok(Translated::Multiple(keys.into_iter().zip(values).collect()))
            }
        }
    }

    /// Synchronous counterpart of [`get`](Self::get).
    ///
    /// Never waits: without a cached table for the current language every key comes
    /// back unchanged, and an asynchronous missing-handler result is dropped in favour
    /// of the key.
    pub fn instant(
        &self,
        keys: impl Into<TranslationKeys>,
        params: Option<&Value>,
    ) -> TranslateResult<Translated> {
        let keys = keys.into().deduplicated();
        if keys.is_empty() {
            return Err(TranslateError::EmptyKey);
        }

        let lang = self.current_lang();
        let table = lang
            .as_deref()
            .and_then(|lang| lock(&self.store).translations.get(lang).cloned());
        let Some(table) = table else {
            return Ok(keys.untranslated());
        };
        let lookup = Lookup {
            table: Some(table),
            fallback: self.fallback_table(lang.as_deref()),
        };

        match keys {
            TranslationKeys::One(key) => Ok(Translated::Single(
                self.resolve_instant(&lookup, &key, params)?,
            )),
            TranslationKeys::Many(keys) => {
                let mut pairs = Vec::with_capacity(keys.len());
                for key in keys {
                    let value = self.resolve_instant(&lookup, &key, params)?;
                    pairs.push((key, value));
                }
                Ok(Translated::Multiple(pairs))
            }
        }
    }

    /// [`get`](Self::get) now, then again after every language change
    pub fn stream<'a>(
        &'a self,
        keys: impl Into<TranslationKeys>,
        params: Option<&'a Value>,
    ) -> BoxStream<'a, TranslateResult<Translated>> {
        let keys = keys.into();
        let changes = self.on_lang_change();
        stream::unfold((changes, true), move |(mut changes, first)| {
            let keys = keys.clone();
            async move {
                if !first && changes.changed().await.is_err() {
                    return None;
                }
                let translated = self.get(keys, params).await;
                Some((translated, (changes, false)))
            }
        })
        .boxed()
    }

    /// Compile `value` and store it at `key` in `lang` (the current language when
    /// `None`). Emits a translation change when `lang` is current.
    pub fn set(&self, key: &str, value: &str, lang: Option<&str>) -> TranslateResult<()> {
        let lang = match lang {
            Some(lang) => lang.to_string(),
            None => self.current_lang().ok_or(TranslateError::NoLanguage)?,
        };
        let compiled = self.compiler.compile(value, &lang);

        let mut store = lock(&self.store);
        let table = store.translations.entry(lang.clone()).or_default();
        insert_path(Arc::make_mut(table), key, compiled);
        let table = Arc::clone(table);
        store.update_langs();
        if store.current_lang.as_deref() == Some(lang.as_str()) {
            store.emit_translation_change(&lang, table);
        }
        Ok(())
    }

    /// Compile a whole table for `lang` and replace, or deep-merge into, the cached one.
    /// Emits a translation change when `lang` is current.
    pub fn set_translation(&self, lang: &str, translations: Translations, should_merge: bool) {
        let compiled = self.compiler.compile_translations(translations, lang);

        let mut store = lock(&self.store);
        let table = store.put_translations(lang, compiled, should_merge);
        if store.current_lang.as_deref() == Some(lang) {
            store.emit_translation_change(lang, table);
        }
    }

    fn change_lang(&self, lang: &str, translations: Arc<Translations>) {
        let mut store = lock(&self.store);
        store.current_lang = Some(lang.to_string());
        info!(lang, "language changed");
        store.emit_lang_change(lang, translations);
    }

    /// The language of the latest `use_lang` call whose load is in flight, the current
    /// one otherwise
    fn active_lang(&self) -> Option<String> {
        let requested = {
            let requests = lock(&self.use_requests);
            let pending = lock(&self.pending);
            requests
                .outstanding
                .values()
                .rev()
                .find(|lang| pending.contains(lang))
                .cloned()
        };
        requested.or_else(|| self.current_lang())
    }

    fn fallback_table(&self, lang: Option<&str>) -> Option<Arc<Translations>> {
        if !self.config.use_default_lang {
            return None;
        }
        let store = lock(&self.store);
        let default_lang = store.default_lang.as_deref()?;
        if Some(default_lang) == lang {
            return None;
        }
        store.translations.get(default_lang).cloned()
    }

    /// Pending load, cached table, or a fresh load, in that order of preference
    /// (a pending load wins over the cache so that a reload is awaited)
    async fn retrieve_translations(&self, lang: &str) -> LoadOutcome {
        let load = {
            let mut pending = lock(&self.pending);
            if let Some(load) = pending.get(lang) {
                debug!(lang, "joining pending load");
                load
            } else if let Some(table) = lock(&self.store).translations.get(lang).cloned() {
                return Ok(table);
            } else {
                pending.start(lang, |id| self.spawn_load(lang, id))
            }
        };
        load.await
    }

    /// Run the load on the runtime so it completes and commits even when every
    /// caller awaiting it goes away
    fn spawn_load(&self, lang: &str, id: u64) -> BoxFuture<'static, LoadOutcome> {
        let task = tokio::spawn(self.load_and_compile(lang, id));
        let pending = Arc::clone(&self.pending);
        let lang = lang.to_string();

        task.map(move |joined| {
            joined.unwrap_or_else(|err| {
                lock(&pending).finish(&lang, id);
                warn!(lang = %lang, error = %err, "translation load task failed");
                Err(TranslateError::load(
                    &lang,
                    LoaderError::Other(format!("load task failed: {}", err)),
                ))
            })
        })
        .boxed()
    }

    fn load_and_compile(&self, lang: &str, id: u64) -> BoxFuture<'static, LoadOutcome> {
        let loader = Arc::clone(&self.loader);
        let compiler = Arc::clone(&self.compiler);
        let store = Arc::clone(&self.store);
        let pending = Arc::clone(&self.pending);
        let extend = self.config.extend;
        let lang = lang.to_string();

        async move {
            debug!(lang = %lang, "loading translations");
            let loaded = loader.get_translation(&lang).await;
            let compiled = loaded.map(|raw| compiler.compile_translations(raw, &lang));

            let mut pending = lock(&pending);
            let current = pending.finish(&lang, id);
            match compiled {
                Ok(compiled) if current => {
                    let mut store = lock(&store);
                    Ok(store.put_translations(&lang, compiled, extend))
                }
                Ok(compiled) => {
                    debug!(lang = %lang, "load finished after eviction, not caching");
                    Ok(Arc::new(compiled))
                }
                Err(source) => {
                    warn!(lang = %lang, error = %source, "failed to load translations");
                    Err(TranslateError::load(&lang, source))
                }
            }
        }
        .boxed()
    }

    async fn resolve(
        &self,
        lookup: &Lookup,
        key: &str,
        params: Option<&Value>,
    ) -> TranslateResult<TranslationValue> {
        if let Some(value) = self.parse_lookup(lookup, key, params) {
            return Ok(value);
        }
        match self.handle_missing(key, params)? {
            MissingTranslation::Value(value) => Ok(value.into()),
            MissingTranslation::Pending(substitute) => substitute
                .await
                .map(TranslationValue::from)
                .map_err(|source| TranslateError::handler(key, source)),
            MissingTranslation::Absent => Ok(key.into()),
        }
    }

    fn resolve_instant(
        &self,
        lookup: &Lookup,
        key: &str,
        params: Option<&Value>,
    ) -> TranslateResult<TranslationValue> {
        if let Some(value) = self.parse_lookup(lookup, key, params) {
            return Ok(value);
        }
        match self.handle_missing(key, params)? {
            MissingTranslation::Value(value) => Ok(value.into()),
            MissingTranslation::Pending(_) => {
                debug!(key, "asynchronous substitute ignored by instant lookup");
                Ok(key.into())
            }
            MissingTranslation::Absent => Ok(key.into()),
        }
    }

    /// Current table first, then the default language's
    fn parse_lookup(
        &self,
        lookup: &Lookup,
        key: &str,
        params: Option<&Value>,
    ) -> Option<TranslationValue> {
        if let Some(value) = lookup
            .table
            .as_deref()
            .and_then(|table| self.parser.get_value(table, key))
        {
            return Some(self.parser.interpolate_value(value, params));
        }
        let value = lookup
            .fallback
            .as_deref()
            .and_then(|table| self.parser.get_value(table, key))?;
        debug!(key, "using default language translation");
        Some(self.parser.interpolate_value(value, params))
    }

    fn handle_missing<'a>(
        &'a self,
        key: &'a str,
        params: Option<&'a Value>,
    ) -> TranslateResult<MissingTranslation<'a>> {
        debug!(key, "missing translation");
        self.missing_handler
            .handle(MissingTranslationHandlerParams {
                key,
                translate_service: self,
                interpolate_params: params,
            })
            .map_err(|source| TranslateError::handler(key, source))
    }
}

/// Builder for [`TranslateService`]; unset strategies fall back to the fake loader,
/// fake compiler, default parser and fake missing handler
pub struct TranslateServiceBuilder {
    store: Option<Arc<Mutex<TranslateStore>>>,
    loader: Arc<dyn TranslateLoader>,
    compiler: Arc<dyn TranslateCompiler>,
    parser: Arc<dyn TranslateParser>,
    missing_handler: Arc<dyn MissingTranslationHandler>,
    config: TranslateConfig,
}

impl Default for TranslateServiceBuilder {
    fn default() -> Self {
        TranslateServiceBuilder {
            store: None,
            loader: Arc::new(TranslateFakeLoader),
            compiler: Arc::new(TranslateFakeCompiler),
            parser: Arc::new(TranslateDefaultParser),
            missing_handler: Arc::new(FakeMissingTranslationHandler),
            config: TranslateConfig::default(),
        }
    }
}

impl TranslateServiceBuilder {
    /// Share an existing store instead of creating a fresh one
    pub fn with_store(mut self, store: Arc<Mutex<TranslateStore>>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_loader(mut self, loader: impl TranslateLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    pub fn with_compiler(mut self, compiler: impl TranslateCompiler + 'static) -> Self {
        self.compiler = Arc::new(compiler);
        self
    }

    pub fn with_parser(mut self, parser: impl TranslateParser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    pub fn with_missing_handler(
        mut self,
        missing_handler: impl MissingTranslationHandler + 'static,
    ) -> Self {
        self.missing_handler = Arc::new(missing_handler);
        self
    }

    pub fn with_config(mut self, config: TranslateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_use_default_lang(mut self, use_default_lang: bool) -> Self {
        self.config.use_default_lang = use_default_lang;
        self
    }

    pub fn build(self) -> TranslateService {
        TranslateService {
            store: self.store.unwrap_or_else(TranslateStore::shared),
            loader: self.loader,
            compiler: self.compiler,
            parser: self.parser,
            missing_handler: self.missing_handler,
            config: self.config,
            pending: Arc::new(Mutex::new(PendingLoads::default())),
            use_requests: Mutex::new(UseRequests::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_conversions() {
        assert_eq!(TranslationKeys::from("A"), TranslationKeys::One("A".to_string()));
        assert_eq!(
            TranslationKeys::from(["A", "B"]),
            TranslationKeys::Many(vec!["A".to_string(), "B".to_string()])
        );
        assert!(TranslationKeys::from("").is_empty());
        assert!(TranslationKeys::from(vec!["A", ""]).is_empty());
        assert!(TranslationKeys::from(Vec::<String>::new()).is_empty());
        assert!(!TranslationKeys::from(vec!["A"]).is_empty());
    }

    #[test]
    fn test_untranslated_keeps_order() {
        let translated = TranslationKeys::from(["B", "A"]).untranslated();
        assert_eq!(
            translated,
            Translated::Multiple(vec![
                ("B".to_string(), "B".into()),
                ("A".to_string(), "A".into()),
            ])
        );
    }

    #[test]
    fn test_translated_serializes_as_value_or_map() {
        let single = Translated::Single("Hello".into());
        assert_eq!(serde_json::to_value(&single).unwrap(), json!("Hello"));

        let multiple = Translated::Multiple(vec![
            ("A".to_string(), "a".into()),
            ("B".to_string(), "b".into()),
        ]);
        assert_eq!(serde_json::to_value(&multiple).unwrap(), json!({ "A": "a", "B": "b" }));
        assert_eq!(multiple.get("B").unwrap(), "b");
        assert!(multiple.as_value().is_none());
    }

    #[tokio::test]
    async fn test_set_default_lang_twice_is_noop() {
        let translate = TranslateService::builder().build();
        let changes = translate.on_default_lang_change();
        translate.set_default_lang("en").await.unwrap();
        translate.set_default_lang("en").await.unwrap();
        assert_eq!(changes.borrow().as_ref().unwrap().lang, "en");
        assert_eq!(translate.default_lang().as_deref(), Some("en"));
    }

    #[test]
    fn test_add_langs() {
        let translate = TranslateService::builder().build();
        translate.add_langs(&["en", "fr"]);
        translate.add_langs(&["fr"]);
        assert_eq!(translate.langs(), vec!["en", "fr"]);
    }
}
