//! Registry of in-flight translation loads, one per language

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TranslateResult;
use crate::value::Translations;

pub(crate) type LoadOutcome = TranslateResult<Arc<Translations>>;

/// A load every interested caller can await; all of them observe the same outcome
pub(crate) type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

struct PendingLoad {
    id: u64,
    load: SharedLoad,
}

/// Each entry carries a generation id so that a load finishing after its entry was
/// evicted (and possibly replaced) cannot clear the newer entry.
#[derive(Default)]
pub(crate) struct PendingLoads {
    loads: HashMap<String, PendingLoad>,
    next_id: u64,
}

impl PendingLoads {
    pub(crate) fn get(&self, lang: &str) -> Option<SharedLoad> {
        self.loads.get(lang).map(|pending| pending.load.clone())
    }

    pub(crate) fn contains(&self, lang: &str) -> bool {
        self.loads.contains_key(lang)
    }

    /// Register a new load for `lang`. `start` receives the generation id the load
    /// must later pass to [`finish`](Self::finish).
    pub(crate) fn start<F>(&mut self, lang: &str, start: F) -> SharedLoad
    where
        F: FnOnce(u64) -> BoxFuture<'static, LoadOutcome>,
    {
        let id = self.next_id;
        self.next_id += 1;
        let load = start(id).shared();
        self.loads.insert(
            lang.to_string(),
            PendingLoad {
                id,
                load: load.clone(),
            },
        );
        load
    }

    /// Remove the entry for `lang` if it still belongs to load `id`.
    /// Returns false when the entry was evicted in the meantime.
    pub(crate) fn finish(&mut self, lang: &str, id: u64) -> bool {
        match self.loads.get(lang) {
            Some(pending) if pending.id == id => {
                self.loads.remove(lang);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn evict(&mut self, lang: &str) -> bool {
        self.loads.remove(lang).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;

    fn ready_load() -> BoxFuture<'static, LoadOutcome> {
        future::ready(Ok(Arc::new(Translations::new()))).boxed()
    }

    #[test]
    fn test_start_and_finish() {
        let mut pending = PendingLoads::default();
        let mut seen = None;
        pending.start("en", |id| {
            seen = Some(id);
            ready_load()
        });
        assert!(pending.contains("en"));
        assert!(pending.get("en").is_some());
        assert!(pending.finish("en", seen.unwrap()));
        assert!(!pending.contains("en"));
    }

    #[test]
    fn test_stale_finish_keeps_newer_entry() {
        let mut pending = PendingLoads::default();
        let mut first = 0;
        pending.start("en", |id| {
            first = id;
            ready_load()
        });
        assert!(pending.evict("en"));
        pending.start("en", |_| ready_load());

        assert!(!pending.finish("en", first));
        assert!(pending.contains("en"));
    }

    #[tokio::test]
    async fn test_shared_load_outcome_is_shared() {
        let mut pending = PendingLoads::default();
        let load = pending.start("en", |_| ready_load());
        let again = pending.get("en").unwrap();
        let (a, b) = (load.await.unwrap(), again.await.unwrap());
        assert!(Arc::ptr_eq(&a, &b));
    }
}
