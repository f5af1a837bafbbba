//! Input side of the decoder: the flat key/value mapping and the tagged
//! payload a request layer hands over.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::key;
use crate::value::{Map, Value};

/// Ordered flat mapping from bracket-notation keys to scalar or repeated values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: IndexMap<String, Value>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builds a form from a multi-valued mapping. A key with exactly one value
    /// collapses to that value; keys without values are dropped; a repeated
    /// key keeps its first occurrence.
    pub fn from_multi<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        let mut entries = IndexMap::new();
        for (key, mut values) in fields {
            let value = match values.len() {
                0 => continue,
                1 => values.swap_remove(0),
                _ => Value::Array(values),
            };
            entries.entry(key.into()).or_insert(value);
        }
        Self { entries }
    }

    /// Builds a form from raw pairs as they appear on the wire, gathering
    /// repeated keys at the position of their first occurrence.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut fields: IndexMap<String, Vec<Value>> = IndexMap::new();
        for (key, value) in pairs {
            match fields.entry(key.into()) {
                Entry::Occupied(mut entry) => entry.get_mut().push(value.into()),
                Entry::Vacant(entry) => {
                    entry.insert(vec![value.into()]);
                }
            }
        }
        Self::from_multi(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn has_nested_keys(&self) -> bool {
        self.keys().any(key::is_nested)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.entries.into_iter().collect())
    }
}

/// A repeated key keeps its first value, like `from_pairs` and `from_multi`.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = IndexMap::new();
        for (key, value) in iter {
            entries.entry(key.into()).or_insert_with(|| value.into());
        }
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// What a request layer hands to the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Flat(FormData),
    /// Every key carries all of its submitted values, as multipart and
    /// urlencoded parsers produce them.
    MultiValue(Vec<(String, Vec<Value>)>),
    /// Anything that is not a mapping; never decoded.
    Other(Value),
}

impl Payload {
    /// Collapses a multi-valued payload into a flat one.
    pub fn resolve(self) -> Payload {
        match self {
            Payload::MultiValue(fields) => Payload::Flat(FormData::from_multi(fields)),
            other => other,
        }
    }

    pub fn as_form(&self) -> Option<&FormData> {
        match self {
            Payload::Flat(form) => Some(form),
            _ => None,
        }
    }

    /// The payload as the request layer originally saw it.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Flat(form) => form.into_value(),
            Payload::MultiValue(fields) => {
                let mut map = Map::new();
                for (key, values) in fields {
                    map.entry(key).or_insert(Value::Array(values));
                }
                Value::Object(map)
            }
            Payload::Other(value) => value,
        }
    }
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Payload::Flat(form)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Payload::Flat(map.into_iter().collect()),
            other => Payload::Other(other),
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::from(Value::from(value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::FileRef;

    #[rstest::rstest]
    fn test_from_pairs_collapses_single_values() {
        let form = FormData::from_pairs([
            ("[variant][]", "color"),
            ("[verbose][0]", "bazz"),
            ("[variant][]", "size"),
        ]);
        assert_eq!(form.len(), 2);
        assert_eq!(
            form.get("[variant][]"),
            Some(&Value::Array(vec![Value::from("color"), Value::from("size")]))
        );
        assert_eq!(form.get("[verbose][0]"), Some(&Value::from("bazz")));
        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["[variant][]", "[verbose][0]"]);
    }

    #[rstest::rstest]
    fn test_from_multi_drops_empty_and_keeps_first() {
        let form = FormData::from_multi(vec![
            ("a[0]", vec![]),
            ("a[1]", vec![Value::from("x")]),
            ("a[1]", vec![Value::from("y")]),
            ("logo", vec![Value::from(FileRef::new("hp.jpeg"))]),
        ]);
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("a[1]"), Some(&Value::from("x")));
        assert!(matches!(form.get("logo"), Some(Value::File(_))));
    }

    #[rstest::rstest]
    fn test_collect_keeps_first_value() {
        let form: FormData = [("a[0]", "first"), ("b", "x"), ("a[0]", "second")]
            .into_iter()
            .collect();
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("a[0]"), Some(&Value::from("first")));
        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["a[0]", "b"]);
    }

    #[rstest::rstest]
    fn test_payload_from_json() {
        let payload = Payload::from(json!({"a[0]": "1"}));
        assert!(payload.as_form().is_some_and(FormData::has_nested_keys));

        let payload = Payload::from(json!([{"field": 1}]));
        assert!(matches!(payload, Payload::Other(_)));
    }

    #[rstest::rstest]
    fn test_payload_resolve_and_into_value() {
        let payload = Payload::MultiValue(vec![
            ("tags[]".to_string(), vec![Value::from("a"), Value::from("b")]),
            ("name".to_string(), vec![Value::from("n")]),
        ]);
        let original = payload.clone().into_value();
        assert_eq!(
            original.to_json(),
            json!({"tags[]": ["a", "b"], "name": ["n"]})
        );

        let resolved = payload.resolve();
        let form = resolved.as_form().unwrap();
        assert_eq!(form.get("name"), Some(&Value::from("n")));
        assert_eq!(
            resolved.into_value().to_json(),
            json!({"tags[]": ["a", "b"], "name": "n"})
        );
    }
}
