//! # Introspection Documents
//!
//! Every field describes itself as a JSON object with a `type`
//! discriminator. Unset optional attributes are left out instead of being
//! emitted as `null`: the output is minimal, not merely complete.
//!
//! [`Introspection`] is the builder every field uses. It prunes on the way
//! in, so a document built through it can never hold an absent value at
//! the top level. [`strip_none`] is the same rule as a free function for
//! callers assembling maps by hand.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// A pruned structural description of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Introspection {
    doc: Map<String, JsonValue>,
}

impl Introspection {
    /// Start a document with the given `type` discriminator.
    pub fn new(type_name: &str) -> Self {
        let mut doc = Map::new();
        doc.insert("type".to_string(), JsonValue::String(type_name.to_string()));
        Self { doc }
    }

    /// Set `key`, unless the value is absent.
    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        let value = value.into();
        if !is_absent(&value) {
            self.doc.insert(key.to_string(), value);
        }
        self
    }

    /// Set `key` when `value` is `Some` and not absent.
    pub fn with_opt<V: Into<JsonValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// The `type` discriminator.
    pub fn type_name(&self) -> &str {
        self.doc.get("type").and_then(JsonValue::as_str).unwrap_or_default()
    }

    /// Look up an attribute.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.doc.get(key)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.doc
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.doc)
    }
}

impl From<Introspection> for JsonValue {
    fn from(doc: Introspection) -> Self {
        doc.into_value()
    }
}

/// Drop every entry whose value is absent (`null` or an empty string).
pub fn strip_none(map: Map<String, JsonValue>) -> Map<String, JsonValue> {
    map.into_iter().filter(|(_, v)| !is_absent(v)).collect()
}

fn is_absent(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.is_empty(),
        _ => false,
    }
}
