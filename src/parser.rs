use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::value::{KEY_SEPARATOR, TranslationValue, Translations};

/// `{{name}}`, `{{ name }}`, `{{user.name}}`
static TEMPLATE_MATCHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s?([^{}\s]*)\s?\}\}").expect("valid placeholder regex"));

/// A node of a tree that can be walked with a dotted key
pub trait PathNode {
    type Node: ?Sized;

    fn child(&self, key: &str) -> Option<&Self::Node>;

    /// Whether the walk may continue below this node
    fn is_branch(&self) -> bool;
}

impl PathNode for Translations {
    type Node = TranslationValue;

    fn child(&self, key: &str) -> Option<&TranslationValue> {
        self.get(key)
    }

    fn is_branch(&self) -> bool {
        true
    }
}

impl PathNode for TranslationValue {
    type Node = TranslationValue;

    fn child(&self, key: &str) -> Option<&TranslationValue> {
        match self {
            TranslationValue::Map(map) => map.get(key),
            TranslationValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn is_branch(&self) -> bool {
        matches!(self, TranslationValue::Map(_) | TranslationValue::List(_))
    }
}

impl PathNode for Value {
    type Node = Value;

    fn child(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn is_branch(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_))
    }
}

/// Walk `root` along the dotted `key`.
///
/// Segments are joined greedily: when a segment does not lead to a branch, it is kept
/// and retried together with the next one, so a literal key such as `"a.b"` stored in a
/// single map is still found. Returns `None` when the path runs out of tree.
pub fn get_path<'a, T>(root: &'a T, key: &str) -> Option<&'a T::Node>
where
    T: PathNode + ?Sized,
    T::Node: PathNode<Node = T::Node>,
{
    let mut segments = key.split(KEY_SEPARATOR).peekable();
    let mut pending = String::new();
    let mut found: Option<&'a T::Node> = None;

    while let Some(segment) = segments.next() {
        pending.push_str(segment);
        let last = segments.peek().is_none();
        let child = match found {
            None => root.child(&pending),
            Some(node) => node.child(&pending),
        };
        match child {
            Some(next) if last || next.is_branch() => {
                found = Some(next);
                pending.clear();
            }
            _ if last => return None,
            _ => pending.push(KEY_SEPARATOR),
        }
    }
    found
}

/// Looks keys up in compiled tables and interpolates parameters into templates
pub trait TranslateParser: Send + Sync {
    /// Interpolate `params` into a string template
    fn interpolate(&self, expr: &str, params: Option<&Value>) -> String;

    /// Find the value stored at the dotted `key`
    fn get_value<'a>(&self, target: &'a Translations, key: &str) -> Option<&'a TranslationValue>;

    /// Interpolate any compiled value: text is interpolated, lists element-wise,
    /// deferred leaves are evaluated first. Maps are returned unchanged.
    fn interpolate_value(&self, value: &TranslationValue, params: Option<&Value>) -> TranslationValue {
        match value {
            TranslationValue::Text(text) => TranslationValue::Text(self.interpolate(text, params)),
            TranslationValue::List(items) => TranslationValue::List(
                items
                    .iter()
                    .map(|item| self.interpolate_value(item, params))
                    .collect(),
            ),
            TranslationValue::Deferred(deferred) => {
                self.interpolate_value(&deferred.resolve(params), params)
            }
            TranslationValue::Map(_) => value.clone(),
        }
    }
}

/// Parser for `{{ param }}` placeholders
#[derive(Debug, Clone, Default)]
pub struct TranslateDefaultParser;

impl TranslateParser for TranslateDefaultParser {
    fn interpolate(&self, expr: &str, params: Option<&Value>) -> String {
        let Some(params) = params else {
            return expr.to_string();
        };
        TEMPLATE_MATCHER
            .replace_all(expr, |caps: &Captures| {
                match get_path(params, &caps[1]) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    // Compact JSON text
                    Some(nested @ (Value::Object(_) | Value::Array(_))) => nested.to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    fn get_value<'a>(&self, target: &'a Translations, key: &str) -> Option<&'a TranslationValue> {
        get_path(target, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Deferred, translations_from_json};
    use serde_json::json;

    fn table() -> Translations {
        translations_from_json(json!({
            "TEST": "This is a test",
            "nested": { "deep": { "key": "found" } },
            "dotted.key": "literal",
            "leaf": "just a leaf",
            "list": ["first", "second {{n}}"]
        }))
        .unwrap()
    }

    #[test]
    fn test_get_value_top_level() {
        let parser = TranslateDefaultParser;
        let table = table();
        assert_eq!(parser.get_value(&table, "TEST").unwrap(), "This is a test");
        assert!(parser.get_value(&table, "MISSING").is_none());
    }

    #[test]
    fn test_get_value_nested_path() {
        let parser = TranslateDefaultParser;
        let table = table();
        assert_eq!(parser.get_value(&table, "nested.deep.key").unwrap(), "found");
        assert!(parser.get_value(&table, "nested.deep").unwrap().as_map().is_some());
        assert!(parser.get_value(&table, "nested.nope").is_none());
    }

    #[test]
    fn test_get_value_literal_dotted_key() {
        let parser = TranslateDefaultParser;
        let table = table();
        assert_eq!(parser.get_value(&table, "dotted.key").unwrap(), "literal");
    }

    #[test]
    fn test_get_value_through_leaf_is_not_found() {
        let parser = TranslateDefaultParser;
        let table = table();
        assert!(parser.get_value(&table, "leaf.more").is_none());
        assert!(parser.get_value(&table, "TEST.x.y").is_none());
        assert!(parser.get_value(&table, "").is_none());
    }

    #[test]
    fn test_get_value_list_index() {
        let parser = TranslateDefaultParser;
        let table = table();
        assert_eq!(parser.get_value(&table, "list.0").unwrap(), "first");
        assert!(parser.get_value(&table, "list.9").is_none());
    }

    #[test]
    fn test_interpolate_simple() {
        let parser = TranslateDefaultParser;
        assert_eq!(
            parser.interpolate("Hello {{name}}", Some(&json!({ "name": "Bob" }))),
            "Hello Bob"
        );
        assert_eq!(
            parser.interpolate("Hello {{ name }}!", Some(&json!({ "name": "Bob" }))),
            "Hello Bob!"
        );
    }

    #[test]
    fn test_interpolate_nested_param_path() {
        let parser = TranslateDefaultParser;
        let params = json!({ "user": { "name": "Ann", "tags": ["x", "y"] } });
        assert_eq!(
            parser.interpolate("{{user.name}} has {{user.tags.1}}", Some(&params)),
            "Ann has y"
        );
    }

    #[test]
    fn test_interpolate_scalars_and_unmatched() {
        let parser = TranslateDefaultParser;
        let params = json!({ "count": 3, "ok": true, "none": null });
        assert_eq!(
            parser.interpolate("{{count}} {{ok}} {{none}} {{missing}}", Some(&params)),
            "3 true {{none}} {{missing}}"
        );
    }

    #[test]
    fn test_interpolate_nested_values_as_json() {
        let parser = TranslateDefaultParser;
        let params = json!({ "obj": { "a": 1, "b": "x" }, "list": [1, "two"] });
        assert_eq!(
            parser.interpolate("obj={{obj}} list={{ list }}", Some(&params)),
            r#"obj={"a":1,"b":"x"} list=[1,"two"]"#
        );
    }

    #[test]
    fn test_interpolate_without_params_is_identity() {
        let parser = TranslateDefaultParser;
        assert_eq!(parser.interpolate("Hello {{name}}", None), "Hello {{name}}");
    }

    #[test]
    fn test_interpolate_value_list_elementwise() {
        let parser = TranslateDefaultParser;
        let table = table();
        let value = parser.get_value(&table, "list").unwrap();
        assert_eq!(
            parser.interpolate_value(value, Some(&json!({ "n": 2 }))),
            TranslationValue::List(vec!["first".into(), "second 2".into()])
        );
    }

    #[test]
    fn test_interpolate_value_resolves_deferred_first() {
        let parser = TranslateDefaultParser;
        let value = TranslationValue::Deferred(Deferred::new(|_| "Hi {{name}}".into()));
        assert_eq!(
            parser.interpolate_value(&value, Some(&json!({ "name": "Eve" }))),
            "Hi Eve"
        );
    }
}
