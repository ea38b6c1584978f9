//! Translation tables and the values stored in them
//!
//! A table is a tree keyed by path segments. Leaves are text or lists, intermediate
//! nodes are maps. A compiler may also store [`Deferred`] leaves, which produce their
//! value from the interpolation parameters when looked up.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Separator between segments of a translation key
pub const KEY_SEPARATOR: char = '.';

/// One language's table: top-level key -> value
pub type Translations = BTreeMap<String, TranslationValue>;

/// A value in a translation table
#[derive(Clone)]
pub enum TranslationValue {
    Text(String),
    List(Vec<TranslationValue>),
    Map(Translations),
    Deferred(Deferred),
}

/// A compiled leaf that is evaluated against the interpolation parameters on lookup
#[derive(Clone)]
pub struct Deferred(Arc<dyn Fn(Option<&Value>) -> TranslationValue + Send + Sync>);

impl Deferred {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> TranslationValue + Send + Sync + 'static,
    {
        Deferred(Arc::new(f))
    }

    pub fn resolve(&self, params: Option<&Value>) -> TranslationValue {
        (self.0)(params)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

impl TranslationValue {
    /// Convert a raw JSON value. `null` has no translation counterpart and yields `None`;
    /// numbers and booleans become their textual form.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(TranslationValue::Text(s)),
            Value::Bool(b) => Some(TranslationValue::Text(b.to_string())),
            Value::Number(n) => Some(TranslationValue::Text(n.to_string())),
            Value::Array(items) => Some(TranslationValue::List(
                items.into_iter().filter_map(Self::from_json).collect(),
            )),
            Value::Object(map) => Some(TranslationValue::Map(
                map.into_iter()
                    .filter_map(|(k, v)| Self::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TranslationValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Translations> {
        match self {
            TranslationValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, TranslationValue::Deferred(_))
    }
}

/// Build a table from a JSON object. Returns `None` when `value` is not an object.
pub fn translations_from_json(value: Value) -> Option<Translations> {
    match TranslationValue::from_json(value) {
        Some(TranslationValue::Map(map)) => Some(map),
        _ => None,
    }
}

/// Merge `source` into `target`. Maps present on both sides are merged recursively,
/// every other value from `source` replaces the one in `target`.
pub fn merge_deep(target: &mut Translations, source: Translations) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(TranslationValue::Map(existing)), TranslationValue::Map(incoming)) => {
                merge_deep(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Write `value` at the dotted `key` path, creating intermediate maps as needed.
/// A non-map node sitting on the path is replaced by a map.
pub fn insert_path(table: &mut Translations, key: &str, value: TranslationValue) {
    let mut segments: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    let last = segments.pop().unwrap_or(key);

    let mut node = table;
    for segment in segments {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| TranslationValue::Map(Translations::new()));
        if !matches!(entry, TranslationValue::Map(_)) {
            *entry = TranslationValue::Map(Translations::new());
        }
        node = match entry {
            TranslationValue::Map(map) => map,
            _ => unreachable!("entry was just made a map"),
        };
    }
    node.insert(last.to_string(), value);
}

impl fmt::Debug for TranslationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationValue::Text(s) => write!(f, "{:?}", s),
            TranslationValue::List(items) => f.debug_list().entries(items).finish(),
            TranslationValue::Map(map) => f.debug_map().entries(map).finish(),
            TranslationValue::Deferred(d) => fmt::Debug::fmt(d, f),
        }
    }
}

impl fmt::Display for TranslationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationValue::Text(s) => f.write_str(s),
            TranslationValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            TranslationValue::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
            TranslationValue::Deferred(d) => write!(f, "{}", d.resolve(None)),
        }
    }
}

impl PartialEq for TranslationValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TranslationValue::Text(a), TranslationValue::Text(b)) => a == b,
            (TranslationValue::List(a), TranslationValue::List(b)) => a == b,
            (TranslationValue::Map(a), TranslationValue::Map(b)) => a == b,
            (TranslationValue::Deferred(a), TranslationValue::Deferred(b)) => {
                Arc::ptr_eq(&a.0, &b.0)
            }
            _ => false,
        }
    }
}

impl PartialEq<str> for TranslationValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for TranslationValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl From<&str> for TranslationValue {
    fn from(value: &str) -> Self {
        TranslationValue::Text(value.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(value: String) -> Self {
        TranslationValue::Text(value)
    }
}

impl From<Translations> for TranslationValue {
    fn from(value: Translations) -> Self {
        TranslationValue::Map(value)
    }
}

impl Serialize for TranslationValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TranslationValue::Text(s) => serializer.serialize_str(s),
            TranslationValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TranslationValue::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            TranslationValue::Deferred(d) => d.resolve(None).serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let table = translations_from_json(json!({
            "HELLO": "Hello",
            "COUNT": 3,
            "NESTED": { "A": "a", "SKIP": null },
            "LIST": ["one", "two"]
        }))
        .unwrap();

        assert_eq!(table["HELLO"], "Hello");
        assert_eq!(table["COUNT"], "3");
        let nested = table["NESTED"].as_map().unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested["A"], "a");
        assert_eq!(
            table["LIST"],
            TranslationValue::List(vec!["one".into(), "two".into()])
        );
    }

    #[test]
    fn test_from_json_rejects_non_object_root() {
        assert!(translations_from_json(json!(["a"])).is_none());
        assert!(translations_from_json(json!("text")).is_none());
    }

    #[test]
    fn test_merge_deep_keeps_siblings() {
        let mut target = translations_from_json(json!({
            "A": { "X": "x", "Y": "y" },
            "B": "b"
        }))
        .unwrap();
        let source = translations_from_json(json!({
            "A": { "Y": "new y", "Z": "z" },
            "C": "c"
        }))
        .unwrap();

        merge_deep(&mut target, source);

        let a = target["A"].as_map().unwrap();
        assert_eq!(a["X"], "x");
        assert_eq!(a["Y"], "new y");
        assert_eq!(a["Z"], "z");
        assert_eq!(target["B"], "b");
        assert_eq!(target["C"], "c");
    }

    #[test]
    fn test_merge_deep_leaf_replaces_map() {
        let mut target = translations_from_json(json!({ "A": { "X": "x" } })).unwrap();
        merge_deep(&mut target, translations_from_json(json!({ "A": "flat" })).unwrap());
        assert_eq!(target["A"], "flat");
    }

    #[test]
    fn test_insert_path_creates_maps() {
        let mut table = Translations::new();
        insert_path(&mut table, "menu.file.open", "Open".into());
        insert_path(&mut table, "menu.file.close", "Close".into());
        insert_path(&mut table, "TOP", "top".into());

        let file = table["menu"].as_map().unwrap()["file"].as_map().unwrap();
        assert_eq!(file["open"], "Open");
        assert_eq!(file["close"], "Close");
        assert_eq!(table["TOP"], "top");
    }

    #[test]
    fn test_insert_path_replaces_leaf_on_path() {
        let mut table = Translations::new();
        insert_path(&mut table, "a", "leaf".into());
        insert_path(&mut table, "a.b", "deeper".into());
        assert_eq!(table["a"].as_map().unwrap()["b"], "deeper");
    }

    #[test]
    fn test_deferred_resolves_with_params() {
        let value = TranslationValue::Deferred(Deferred::new(|params| {
            let name = params
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str)
                .unwrap_or("nobody");
            TranslationValue::Text(format!("Hi {}", name))
        }));
        match &value {
            TranslationValue::Deferred(d) => {
                assert_eq!(d.resolve(Some(&json!({ "name": "Ann" }))), "Hi Ann");
                assert_eq!(d.resolve(None), "Hi nobody");
            }
            _ => panic!("Expected deferred value"),
        }
        assert!(value.is_deferred());
    }

    #[test]
    fn test_display_and_serialize() {
        let list = TranslationValue::List(vec!["a".into(), "b".into()]);
        assert_eq!(list.to_string(), "a,b");

        let map: TranslationValue = translations_from_json(json!({ "k": "v" })).unwrap().into();
        assert_eq!(map.to_string(), r#"{"k":"v"}"#);
        assert_eq!(serde_json::to_value(&map).unwrap(), json!({ "k": "v" }));
    }
}
