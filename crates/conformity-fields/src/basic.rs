//! # Basic Fields
//!
//! Scalar leaves: booleans, null, strings, and the numeric range fields.

use std::str::FromStr;

use conformity_core::{ConfigError, Field, Introspection, ValidationError, Value};
use serde_json::Value as JsonValue;

use crate::range::{RangeField, RangeKind};

/// Range kind of [`IntegerField`]. Booleans are not integers.
#[derive(Debug, Clone, Copy)]
pub struct IntegerKind;

impl RangeKind for IntegerKind {
    type Bound = i64;
    const TYPE: &'static str = "integer";
    const NOUN: &'static str = "an integer";

    fn extract(value: &Value) -> Option<i64> {
        match value {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    fn render(bound: &i64) -> String {
        bound.to_string()
    }

    fn parse(text: &str) -> Option<i64> {
        i64::from_str(text).ok()
    }

    fn introspect_bound(bound: &i64) -> JsonValue {
        JsonValue::from(*bound)
    }
}

/// Floats also accept integers, and integer bounds.
#[derive(Debug, Clone, Copy)]
pub struct FloatKind;

impl RangeKind for FloatKind {
    type Bound = f64;
    const TYPE: &'static str = "float";
    const NOUN: &'static str = "a float";

    fn extract(value: &Value) -> Option<f64> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn render(bound: &f64) -> String {
        bound.to_string()
    }

    fn parse(text: &str) -> Option<f64> {
        f64::from_str(text).ok()
    }

    fn introspect_bound(bound: &f64) -> JsonValue {
        serde_json::Number::from_f64(*bound)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(bound.to_string()))
    }
}

/// Accepts an integer, with optional bounds.
pub type IntegerField = RangeField<IntegerKind>;
/// Accepts a float or an integer, with optional bounds.
pub type FloatField = RangeField<FloatKind>;

/// Accepts `true` and `false`.
#[derive(Debug, Clone, Default)]
pub struct BooleanField {
    description: Option<String>,
}

impl BooleanField {
    /// A boolean field without a description.
    pub fn new() -> Self {
        Self::default()
    }

    /// A boolean field with a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

impl Field for BooleanField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        match value {
            Value::Bool(_) => Vec::new(),
            _ => vec![ValidationError::new("Not a boolean")],
        }
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("boolean").with_opt("description", self.description.clone())
    }
}

/// Accepts only null. Mostly useful as an [`crate::AnyField`] option.
#[derive(Debug, Clone, Default)]
pub struct NullField {
    description: Option<String>,
}

impl NullField {
    /// A null field without a description.
    pub fn new() -> Self {
        Self::default()
    }

    /// A null field with a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

impl Field for NullField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        match value {
            Value::Null => Vec::new(),
            _ => vec![ValidationError::new("Value is not null")],
        }
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("null").with_opt("description", self.description.clone())
    }
}

/// A text string with optional length limits.
///
/// Lengths count Unicode scalar values, not bytes.
#[derive(Debug, Clone)]
pub struct UnicodeStringField {
    min_length: Option<usize>,
    max_length: Option<usize>,
    allow_blank: bool,
    description: Option<String>,
}

impl Default for UnicodeStringField {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            allow_blank: true,
            description: None,
        }
    }
}

impl UnicodeStringField {
    /// Any string, blank included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start configuring length and blank checks.
    pub fn builder() -> UnicodeStringFieldBuilder {
        UnicodeStringFieldBuilder {
            field: Self::default(),
        }
    }
}

impl Field for UnicodeStringField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let Some(s) = value.as_str() else {
            return vec![ValidationError::new("Not a unicode string")];
        };

        let mut errors = Vec::new();
        let len = s.chars().count();
        if let Some(min) = self.min_length {
            if len < min {
                errors.push(ValidationError::new(format!(
                    "String must have a length of at least {min}"
                )));
            }
        }
        if let Some(max) = self.max_length {
            if len > max {
                errors.push(ValidationError::new(format!(
                    "String must have a length of no more than {max}"
                )));
            }
        }
        if !self.allow_blank && s.trim().is_empty() {
            errors.push(ValidationError::new("String cannot be blank"));
        }
        errors
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("unicode")
            .with_opt("description", self.description.clone())
            .with_opt("min_length", self.min_length)
            .with_opt("max_length", self.max_length)
            .with_opt("allow_blank", (!self.allow_blank).then_some(false))
    }
}

/// Collects the options of a [`UnicodeStringField`].
#[derive(Debug, Clone)]
pub struct UnicodeStringFieldBuilder {
    field: UnicodeStringField,
}

impl UnicodeStringFieldBuilder {
    /// Minimum length in characters.
    pub fn min_length(mut self, min: usize) -> Self {
        self.field.min_length = Some(min);
        self
    }

    /// Maximum length in characters.
    pub fn max_length(mut self, max: usize) -> Self {
        self.field.max_length = Some(max);
        self
    }

    /// Whether an all-whitespace string is accepted. Defaults to `true`.
    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.field.allow_blank = allow;
        self
    }

    /// Human-readable description, reported by introspection.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.field.description = Some(description.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::LengthBounds`] if `min_length > max_length`.
    pub fn build(self) -> Result<UnicodeStringField, ConfigError> {
        if let (Some(min), Some(max)) = (self.field.min_length, self.field.max_length) {
            if min > max {
                return Err(ConfigError::LengthBounds { min, max });
            }
        }
        Ok(self.field)
    }
}
