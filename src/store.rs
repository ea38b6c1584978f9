use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::value::{Translations, merge_deep};

/// Payload of every change notification: the language and its compiled table
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub lang: String,
    pub translations: Arc<Translations>,
}

pub type TranslationChangeEvent = ChangeEvent;
pub type LangChangeEvent = ChangeEvent;
pub type DefaultLangChangeEvent = ChangeEvent;

/// Shared state behind one or more [`TranslateService`](crate::TranslateService)s.
///
/// Plain bookkeeping: the store never locks or emits on its own. Whoever mutates a
/// field is responsible for emitting on the matching channel.
///
/// Each channel keeps its most recent event, so a subscriber attaching late still
/// sees the current state through [`watch::Receiver::borrow`].
pub struct TranslateStore {
    /// Language consulted when the current one lacks a key
    pub default_lang: Option<String>,
    /// Language currently used for lookups
    pub current_lang: Option<String>,
    /// Compiled tables, keyed by language
    pub translations: HashMap<String, Arc<Translations>>,
    /// Registered languages, in registration order
    pub langs: Vec<String>,
    pub on_translation_change: watch::Sender<Option<TranslationChangeEvent>>,
    pub on_lang_change: watch::Sender<Option<LangChangeEvent>>,
    pub on_default_lang_change: watch::Sender<Option<DefaultLangChangeEvent>>,
}

impl TranslateStore {
    pub fn new() -> Self {
        TranslateStore {
            default_lang: None,
            current_lang: None,
            translations: HashMap::new(),
            langs: Vec::new(),
            on_translation_change: watch::channel(None).0,
            on_lang_change: watch::channel(None).0,
            on_default_lang_change: watch::channel(None).0,
        }
    }

    /// A new store ready to be handed to several services
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Append languages that are not registered yet, keeping order
    pub fn add_langs<S: AsRef<str>>(&mut self, langs: &[S]) {
        for lang in langs {
            let lang = lang.as_ref();
            if !self.langs.iter().any(|l| l == lang) {
                self.langs.push(lang.to_string());
            }
        }
    }

    /// Register every language that has a table
    pub fn update_langs(&mut self) {
        let mut loaded: Vec<String> = self
            .translations
            .keys()
            .filter(|lang| !self.langs.contains(*lang))
            .cloned()
            .collect();
        loaded.sort();
        self.langs.extend(loaded);
    }

    /// Store `translations` for `lang`, replacing the cached table or, with `merge`,
    /// deep-merging into it. Registers the language and returns the resulting table.
    pub fn put_translations(
        &mut self,
        lang: &str,
        translations: Translations,
        merge: bool,
    ) -> Arc<Translations> {
        let table = match self.translations.entry(lang.to_string()) {
            Entry::Occupied(mut entry) if merge => {
                merge_deep(Arc::make_mut(entry.get_mut()), translations);
                Arc::clone(entry.get())
            }
            Entry::Occupied(mut entry) => {
                entry.insert(Arc::new(translations));
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::new(translations))),
        };
        self.update_langs();
        table
    }

    pub fn emit_translation_change(&self, lang: &str, translations: Arc<Translations>) {
        self.on_translation_change.send_replace(Some(ChangeEvent {
            lang: lang.to_string(),
            translations,
        }));
    }

    pub fn emit_lang_change(&self, lang: &str, translations: Arc<Translations>) {
        self.on_lang_change.send_replace(Some(ChangeEvent {
            lang: lang.to_string(),
            translations,
        }));
    }

    pub fn emit_default_lang_change(&self, lang: &str, translations: Arc<Translations>) {
        self.on_default_lang_change.send_replace(Some(ChangeEvent {
            lang: lang.to_string(),
            translations,
        }));
    }
}

impl Default for TranslateStore {
    fn default() -> Self {
        Self::new()
    }
}
