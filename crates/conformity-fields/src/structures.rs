//! # Structure Fields
//!
//! [`DictionaryField`] and [`ListField`] recurse into the value and
//! re-point child errors, so a failure deep in a document reports a path
//! such as `lines.3.amount`.

use std::collections::BTreeSet;

use conformity_core::{
    nest_errors, BoxedField, ConfigError, ErrorCode, Field, Introspection, ValidationError, Value,
};
use serde_json::{Map, Value as JsonValue};

/// A map with a fixed set of known keys.
///
/// Keys are checked in declaration order; the extra-keys error, if any,
/// comes last.
#[derive(Debug)]
pub struct DictionaryField {
    contents: Vec<(String, BoxedField)>,
    optional_keys: BTreeSet<String>,
    allow_extra_keys: bool,
    description: Option<String>,
}

impl DictionaryField {
    /// Start declaring keys.
    pub fn builder() -> DictionaryFieldBuilder {
        DictionaryFieldBuilder::default()
    }

    /// The field declared for `key`.
    pub fn field(&self, key: &str) -> Option<&dyn Field> {
        self.contents
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, f)| f.as_ref())
    }
}

impl Field for DictionaryField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let Some(map) = value.as_map() else {
            return vec![ValidationError::new("Not a dict")];
        };

        let mut errors = Vec::new();
        for (key, field) in &self.contents {
            match map.get(key) {
                Some(child) => errors.extend(nest_errors(field.validate(child), key)),
                None if self.optional_keys.contains(key) => {}
                None => errors.push(
                    ValidationError::new(format!("Missing key: {key}"))
                        .with_code(ErrorCode::Missing)
                        .with_pointer(key.as_str()),
                ),
            }
        }

        if !self.allow_extra_keys {
            // BTreeMap iteration is sorted, so the listing is too.
            let extra: Vec<&str> = map
                .keys()
                .filter(|k| !self.contents.iter().any(|(known, _)| known == *k))
                .map(String::as_str)
                .collect();
            if !extra.is_empty() {
                errors.push(
                    ValidationError::new(format!("Extra keys present: {}", extra.join(", ")))
                        .with_code(ErrorCode::Unknown),
                );
            }
        }
        errors
    }

    fn introspect(&self) -> Introspection {
        let contents: Map<String, JsonValue> = self
            .contents
            .iter()
            .map(|(k, f)| (k.clone(), f.introspect().into_value()))
            .collect();
        Introspection::new("dictionary")
            .with_opt("description", self.description.clone())
            .with("contents", contents)
            .with("optional_keys", self.optional_keys.iter().cloned().collect::<Vec<_>>())
            .with("allow_extra_keys", self.allow_extra_keys)
    }
}

/// Collects the keys and options of a [`DictionaryField`].
#[derive(Debug, Default)]
pub struct DictionaryFieldBuilder {
    contents: Vec<(String, BoxedField)>,
    optional_keys: BTreeSet<String>,
    allow_extra_keys: bool,
    description: Option<String>,
}

impl DictionaryFieldBuilder {
    /// Declare a required key. Redeclaring a key replaces its field.
    pub fn key(mut self, key: impl Into<String>, field: impl Field + 'static) -> Self {
        self.insert(key.into(), Box::new(field));
        self
    }

    /// Declare an optional key.
    pub fn optional_key(mut self, key: impl Into<String>, field: impl Field + 'static) -> Self {
        let key = key.into();
        self.optional_keys.insert(key.clone());
        self.insert(key, Box::new(field));
        self
    }

    /// Declare a key with an already boxed field.
    pub fn boxed_key(mut self, key: impl Into<String>, field: BoxedField) -> Self {
        self.insert(key.into(), field);
        self
    }

    /// Mark already declared keys as optional.
    pub fn optional_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.optional_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Whether keys outside the declared contents are accepted. Defaults to `false`.
    pub fn allow_extra_keys(mut self, allow: bool) -> Self {
        self.allow_extra_keys = allow;
        self
    }

    /// Human-readable description, reported by introspection.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    ///
    /// [`ConfigError::UnknownOptionalKey`] if an optional key has no field.
    pub fn build(self) -> Result<DictionaryField, ConfigError> {
        if let Some(unknown) = self
            .optional_keys
            .iter()
            .find(|k| !self.contents.iter().any(|(known, _)| known == *k))
        {
            return Err(ConfigError::UnknownOptionalKey(unknown.clone()));
        }
        Ok(DictionaryField {
            contents: self.contents,
            optional_keys: self.optional_keys,
            allow_extra_keys: self.allow_extra_keys,
            description: self.description,
        })
    }

    fn insert(&mut self, key: String, field: BoxedField) {
        match self.contents.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = field,
            None => self.contents.push((key, field)),
        }
    }
}

/// A list whose items all satisfy one field.
#[derive(Debug)]
pub struct ListField {
    contents: BoxedField,
    min_length: Option<usize>,
    max_length: Option<usize>,
    description: Option<String>,
}

impl ListField {
    /// Any length.
    pub fn new(contents: impl Field + 'static) -> Self {
        Self {
            contents: Box::new(contents),
            min_length: None,
            max_length: None,
            description: None,
        }
    }

    /// Start configuring a list whose items must satisfy `contents`.
    pub fn builder(contents: impl Field + 'static) -> ListFieldBuilder {
        ListFieldBuilder {
            field: Self::new(contents),
        }
    }

    /// As [`ListField::builder`], with an already boxed item field.
    pub fn boxed_builder(contents: BoxedField) -> ListFieldBuilder {
        ListFieldBuilder {
            field: Self {
                contents,
                min_length: None,
                max_length: None,
                description: None,
            },
        }
    }
}

impl Field for ListField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let Some(items) = value.as_list() else {
            return vec![ValidationError::new("Not a list")];
        };

        let mut errors = Vec::new();
        if let Some(min) = self.min_length {
            if items.len() < min {
                errors.push(ValidationError::new(format!("List is shorter than {min}")));
            }
        }
        if let Some(max) = self.max_length {
            if items.len() > max {
                errors.push(ValidationError::new(format!("List is longer than {max}")));
            }
        }
        for (index, item) in items.iter().enumerate() {
            let head = index.to_string();
            errors.extend(nest_errors(self.contents.validate(item), &head));
        }
        errors
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("list")
            .with_opt("description", self.description.clone())
            .with("contents", self.contents.introspect())
            .with_opt("min_length", self.min_length)
            .with_opt("max_length", self.max_length)
    }
}

/// Collects the options of a [`ListField`].
#[derive(Debug)]
pub struct ListFieldBuilder {
    field: ListField,
}

impl ListFieldBuilder {
    /// Minimum number of items.
    pub fn min_length(mut self, min: usize) -> Self {
        self.field.min_length = Some(min);
        self
    }

    /// Maximum number of items.
    pub fn max_length(mut self, max: usize) -> Self {
        self.field.max_length = Some(max);
        self
    }

    /// Human-readable description, reported by introspection.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.field.description = Some(description.into());
        self
    }

    /// # Errors
    ///
    /// [`ConfigError::LengthBounds`] if `min_length > max_length`.
    pub fn build(self) -> Result<ListField, ConfigError> {
        if let (Some(min), Some(max)) = (self.field.min_length, self.field.max_length) {
            if min > max {
                return Err(ConfigError::LengthBounds { min, max });
            }
        }
        Ok(self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::{IntegerField, UnicodeStringField};
    use serde_json::json;

    fn person() -> DictionaryField {
        DictionaryField::builder()
            .key("name", UnicodeStringField::new())
            .key("age", IntegerField::builder().gte(0).build().unwrap())
            .optional_key("nickname", UnicodeStringField::new())
            .build()
            .unwrap()
    }

    fn map(entries: &[(&str, Value)]) -> Value {
        entries.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_valid_dictionary() {
        let value = map(&[("name", "Ada".into()), ("age", 36.into())]);
        assert!(person().validate(&value).is_empty());
    }

    #[test]
    fn test_not_a_dict() {
        let errors = person().validate(&Value::from("Ada"));
        assert_eq!(errors, [ValidationError::new("Not a dict")]);
    }

    #[test]
    fn test_missing_key_and_child_errors_in_declaration_order() {
        let value = map(&[("age", (-1).into()), ("nickname", 3.into())]);
        let errors = person().validate(&value);
        assert_eq!(
            errors,
            [
                ValidationError::new("Missing key: name")
                    .with_code(ErrorCode::Missing)
                    .with_pointer("name"),
                ValidationError::new("Value not >= 0").with_pointer("age"),
                ValidationError::new("Not a unicode string").with_pointer("nickname"),
            ]
        );
    }

    #[test]
    fn test_extra_keys_sorted_and_last() {
        let value = map(&[
            ("name", "Ada".into()),
            ("age", 36.into()),
            ("zeta", Value::Null),
            ("alpha", Value::Null),
        ]);
        let errors = person().validate(&value);
        assert_eq!(
            errors,
            [ValidationError::new("Extra keys present: alpha, zeta").with_code(ErrorCode::Unknown)]
        );
    }

    #[test]
    fn test_allow_extra_keys() {
        let field = DictionaryField::builder()
            .key("a", IntegerField::new())
            .allow_extra_keys(true)
            .build()
            .unwrap();
        assert!(field.validate(&map(&[("a", 1.into()), ("b", 2.into())])).is_empty());
    }

    #[test]
    fn test_unknown_optional_key_is_config_error() {
        let err = DictionaryField::builder()
            .key("a", IntegerField::new())
            .optional_keys(["b"])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownOptionalKey("b".into()));
    }

    #[test]
    fn test_redeclared_key_replaces_field() {
        let field = DictionaryField::builder()
            .key("a", IntegerField::new())
            .key("a", UnicodeStringField::new())
            .build()
            .unwrap();
        assert!(field.validate(&map(&[("a", "x".into())])).is_empty());
        assert_eq!(field.field("a").map(|f| f.introspect().type_name().to_string()), Some("unicode".into()));
    }

    #[test]
    fn test_dictionary_introspect() {
        assert_eq!(
            person().introspect().into_value(),
            json!({
                "type": "dictionary",
                "contents": {
                    "name": {"type": "unicode"},
                    "age": {"type": "integer", "gte": 0},
                    "nickname": {"type": "unicode"},
                },
                "optional_keys": ["nickname"],
                "allow_extra_keys": false,
            })
        );
    }

    #[test]
    fn test_list_items_are_pointed_by_index() {
        let field = ListField::builder(person()).max_length(2).build().unwrap();
        let value = Value::List(vec![
            map(&[("name", "Ada".into()), ("age", 36.into())]),
            map(&[("name", 1.into()), ("age", 1.into())]),
            map(&[("name", "Bob".into()), ("age", 2.into())]),
        ]);
        let errors = field.validate(&value);
        assert_eq!(
            errors,
            [
                ValidationError::new("List is longer than 2"),
                ValidationError::new("Not a unicode string").with_pointer("1.name"),
            ]
        );
    }

    #[test]
    fn test_list_min_length_and_type() {
        let field = ListField::builder(IntegerField::new()).min_length(1).build().unwrap();
        assert_eq!(
            field.validate(&Value::List(Vec::new())),
            [ValidationError::new("List is shorter than 1")]
        );
        assert_eq!(field.validate(&Value::from(1)), [ValidationError::new("Not a list")]);
    }

    #[test]
    fn test_list_length_bounds_config_error() {
        let err = ListField::builder(IntegerField::new())
            .min_length(3)
            .max_length(2)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::LengthBounds { min: 3, max: 2 });
    }

    #[test]
    fn test_list_introspect() {
        let field = ListField::builder(IntegerField::new()).min_length(0).build().unwrap();
        assert_eq!(
            field.introspect().into_value(),
            json!({"type": "list", "contents": {"type": "integer"}, "min_length": 0})
        );
    }
}
