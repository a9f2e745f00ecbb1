//! # Constant Fields
//!
//! [`ConstantField`] restricts a value to a fixed set materialized at
//! construction. The set may be narrowed from a larger reference set with
//! a predicate; the predicate runs once and is not kept, so introspection
//! reports the resulting values only.
//!
//! All allowed values share one [`ValueKind`]. A value of another kind
//! gets a type error; a value of the right kind outside the set gets a
//! membership error pointing at `value`.

use conformity_core::{ConfigError, Field, Introspection, ValidationError, Value, ValueKind};
use serde_json::Value as JsonValue;

/// Accepts only members of a fixed set of values.
#[derive(Debug, Clone)]
pub struct ConstantField {
    values: Vec<Value>,
    kind: ValueKind,
    description: Option<String>,
}

impl ConstantField {
    /// Build from the allowed values. Duplicates are dropped; first
    /// occurrence order is kept.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyConstant`] for an empty set,
    /// [`ConfigError::MixedConstant`] when values differ in kind.
    pub fn new<I, V>(values: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut unique: Vec<Value> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        let kind = unique.first().map(Value::kind).ok_or(ConfigError::EmptyConstant)?;
        if let Some(odd) = unique.iter().find(|v| v.kind() != kind) {
            return Err(ConfigError::MixedConstant {
                expected: kind.noun(),
                found: odd.kind().noun(),
            });
        }

        Ok(Self {
            values: unique,
            kind,
            description: None,
        })
    }

    /// Build from the members of `reference` that satisfy `keep`.
    pub fn filtered<I, V, P>(reference: I, keep: P) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
        P: Fn(&Value) -> bool,
    {
        Self::new(reference.into_iter().map(Into::into).filter(|v| keep(v)))
    }

    /// Attach a human-readable description, reported by introspection.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The materialized allowed values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The kind every allowed value has.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// True if `value` is one of the allowed values.
    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    /// The allowed values rendered for an introspection document.
    pub fn values_json(&self) -> JsonValue {
        JsonValue::Array(self.values.iter().map(Value::to_json).collect())
    }
}

impl Field for ConstantField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        if value.kind() != self.kind {
            return vec![ValidationError::new(format!("Not {}", self.kind.noun()))];
        }
        if !self.contains(value) {
            let allowed = self
                .values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return vec![
                ValidationError::new(format!("Value is not one of: {allowed}")).with_pointer("value"),
            ];
        }
        Vec::new()
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("constant")
            .with_opt("description", self.description.clone())
            .with("values", self.values_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conformity_core::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_membership() {
        let field = ConstantField::new(["US", "CA"]).unwrap();
        assert!(field.validate(&Value::from("US")).is_empty());

        let errors = field.validate(&Value::from("FR"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Value is not one of: \"US\", \"CA\"");
        assert_eq!(errors[0].pointer(), Some("value"));
        assert_eq!(errors[0].code(), Some(ErrorCode::Invalid));
    }

    #[test]
    fn test_wrong_type_is_not_a_membership_error() {
        let field = ConstantField::new(["US", "CA"]).unwrap();
        let errors = field.validate(&Value::from(42));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Not a unicode string");
        assert_eq!(errors[0].pointer(), None);
    }

    #[test]
    fn test_integer_constants() {
        let field = ConstantField::new([1, 2, 3]).unwrap();
        assert!(field.validate(&Value::from(2)).is_empty());
        assert_eq!(field.validate(&Value::from("2"))[0].message(), "Not an integer");
    }

    #[test]
    fn test_empty_set_is_config_error() {
        let err = ConstantField::new(Vec::<Value>::new()).unwrap_err();
        assert_eq!(err, ConfigError::EmptyConstant);
    }

    #[test]
    fn test_mixed_kinds_are_config_error() {
        let err = ConstantField::new([Value::from("a"), Value::from(1)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MixedConstant {
                expected: "a unicode string",
                found: "an integer"
            }
        );
    }

    #[test]
    fn test_filtered_materializes_once() {
        let field = ConstantField::filtered(["AA", "AB", "BA", "AA"], |v| {
            v.as_str().is_some_and(|s| s.starts_with('A'))
        })
        .unwrap();
        assert_eq!(field.values(), [Value::from("AA"), Value::from("AB")]);
        assert_eq!(
            field.introspect().into_value(),
            json!({"type": "constant", "values": ["AA", "AB"]})
        );
    }

    #[test]
    fn test_filter_rejecting_everything_is_config_error() {
        let err = ConstantField::filtered(["x"], |_| false).unwrap_err();
        assert_eq!(err, ConfigError::EmptyConstant);
    }
}
