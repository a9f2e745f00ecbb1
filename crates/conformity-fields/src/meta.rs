//! # Composite Fields
//!
//! - [`AnyField`]: logical OR over an ordered list of options.
//! - [`PolymorphField`]: picks one child from a discriminator inside the value.
//!   Branches are keyed by [`Discriminator`], the hashable scalars a switch
//!   field can hold.
//! - [`ObjectInstanceField`]: runtime type membership for host objects.

use std::collections::BTreeMap;
use std::fmt;

use conformity_core::{
    BoxedField, ConfigError, ErrorCode, Field, Introspection, LookupError, LookupPath, TypeTag,
    ValidationError, Value,
};
use serde_json::{Map, Value as JsonValue};

/// Reserved `contents_map` key of the fallback branch of a [`PolymorphField`].
pub const DEFAULT_KEY: &str = "__default__";

/// A `contents_map` key of a [`PolymorphField`].
///
/// Only scalars with exact equality can select a branch. Floats, null and
/// collections never match a key and always fall back to [`DEFAULT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Discriminator {
    /// A boolean switch value.
    Bool(bool),
    /// An integer switch value.
    Integer(i64),
    /// A string switch value.
    Text(String),
}

impl Discriminator {
    /// The discriminator a switch value selects with, if it is keyable.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Integer(i) => Some(Self::Integer(*i)),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Read a document map key. `true` and `false` become [`Self::Bool`],
    /// decimal integers become [`Self::Integer`], anything else is text.
    pub fn from_key(key: &str) -> Self {
        match key {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => key
                .parse::<i64>()
                .map_or_else(|_| Self::Text(key.to_owned()), Self::Integer),
        }
    }
}

/// The introspection key. Text renders bare, so `Text("1")` and
/// `Integer(1)` share a key.
impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Discriminator {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Discriminator {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Discriminator {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Discriminator {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<bool> for Discriminator {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Accepts a value that satisfies at least one option.
///
/// Options are tried in order and the first clean option wins. When every
/// option fails, the result is every option's errors concatenated in
/// option order.
#[derive(Debug)]
pub struct AnyField {
    options: Vec<BoxedField>,
    description: Option<String>,
}

impl AnyField {
    /// # Errors
    ///
    /// [`ConfigError::NoOptions`] if `options` is empty.
    pub fn new(options: Vec<BoxedField>) -> Result<Self, ConfigError> {
        if options.is_empty() {
            return Err(ConfigError::NoOptions);
        }
        Ok(Self {
            options,
            description: None,
        })
    }

    /// Attach a human-readable description, reported by introspection.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The options, in the order they are tried.
    pub fn options(&self) -> &[BoxedField] {
        &self.options
    }
}

impl Field for AnyField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for (index, option) in self.options.iter().enumerate() {
            let option_errors = option.validate(value);
            if option_errors.is_empty() {
                tracing::trace!(option = index, "any: option accepted value");
                return Vec::new();
            }
            errors.extend(option_errors);
        }
        tracing::trace!(options = self.options.len(), "any: no option accepted value");
        errors
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("any")
            .with_opt("description", self.description.clone())
            .with(
                "options",
                self.options
                    .iter()
                    .map(|o| o.introspect().into_value())
                    .collect::<Vec<_>>(),
            )
    }
}

/// Tagged dispatch on a discriminator found inside the value.
///
/// The discriminator is located by a dotted [`LookupPath`]. A string,
/// integer or boolean discriminator equal to a key of `contents_map`
/// selects that branch; anything else falls back to [`DEFAULT_KEY`] when
/// present. Matching is by type as well as value: `1` does not select a
/// `"1"` branch. The selected
/// branch validates the whole value, not just the discriminator.
#[derive(Debug)]
pub struct PolymorphField {
    switch_field: LookupPath,
    contents_map: BTreeMap<Discriminator, BoxedField>,
    description: Option<String>,
}

impl PolymorphField {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `switch_field` is not a valid lookup path.
    pub fn new(
        switch_field: &str,
        contents_map: BTreeMap<Discriminator, BoxedField>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            switch_field: LookupPath::parse(switch_field)?,
            contents_map,
            description: None,
        })
    }

    /// Start configuring a field that switches on `switch_field`.
    pub fn builder(switch_field: impl Into<String>) -> PolymorphFieldBuilder {
        PolymorphFieldBuilder {
            switch_field: switch_field.into(),
            contents_map: BTreeMap::new(),
            description: None,
        }
    }

    /// Attach a human-readable description, reported by introspection.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Where the discriminator is read from.
    pub fn switch_field(&self) -> &LookupPath {
        &self.switch_field
    }

    fn branch_for(&self, discriminator: &Value) -> Option<&BoxedField> {
        Discriminator::of(discriminator)
            .and_then(|key| self.contents_map.get(&key))
            .or_else(|| self.contents_map.get(&Discriminator::from(DEFAULT_KEY)))
    }

    fn lookup_error(&self, err: LookupError) -> ValidationError {
        let code = match err {
            LookupError::Missing { .. } => ErrorCode::Missing,
            LookupError::NotTraversable { .. } => ErrorCode::Invalid,
        };
        ValidationError::new(format!("Cannot read switch field {}: {err}", self.switch_field))
            .with_code(code)
            .with_pointer(err.at())
    }
}

impl Field for PolymorphField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let discriminator = match self.switch_field.resolve(value) {
            Ok(d) => d,
            Err(err) => {
                tracing::debug!(switch_field = %self.switch_field, error = %err, "polymorph: switch lookup failed");
                return vec![self.lookup_error(err)];
            }
        };

        match self.branch_for(&discriminator) {
            Some(branch) => {
                tracing::trace!(switch_field = %self.switch_field, discriminator = %discriminator, "polymorph: dispatching");
                branch.validate(value)
            }
            None => vec![ValidationError::new(format!("Invalid switch value {discriminator}"))
                .with_pointer(self.switch_field.to_string())],
        }
    }

    fn introspect(&self) -> Introspection {
        let contents_map: Map<String, JsonValue> = self
            .contents_map
            .iter()
            .map(|(k, f)| (k.to_string(), f.introspect().into_value()))
            .collect();
        Introspection::new("polymorph")
            .with_opt("description", self.description.clone())
            .with("switch_field", self.switch_field.to_string())
            .with("contents_map", contents_map)
    }
}

/// Collects the branches of a [`PolymorphField`].
#[derive(Debug)]
pub struct PolymorphFieldBuilder {
    switch_field: String,
    contents_map: BTreeMap<Discriminator, BoxedField>,
    description: Option<String>,
}

impl PolymorphFieldBuilder {
    /// Branch for one discriminator value.
    pub fn case(
        mut self,
        discriminator: impl Into<Discriminator>,
        field: impl Field + 'static,
    ) -> Self {
        self.contents_map.insert(discriminator.into(), Box::new(field));
        self
    }

    /// Branch for one discriminator value, already boxed.
    pub fn boxed_case(mut self, discriminator: impl Into<Discriminator>, field: BoxedField) -> Self {
        self.contents_map.insert(discriminator.into(), field);
        self
    }

    /// Fallback branch, stored under [`DEFAULT_KEY`].
    pub fn default_case(self, field: impl Field + 'static) -> Self {
        self.case(DEFAULT_KEY, field)
    }

    /// Human-readable description, reported by introspection.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the switch field is not a valid lookup path.
    pub fn build(self) -> Result<PolymorphField, ConfigError> {
        Ok(PolymorphField {
            switch_field: LookupPath::parse(&self.switch_field)?,
            contents_map: self.contents_map,
            description: self.description,
        })
    }
}

/// Accepts [`Value::Object`] instances of a type or any of its subtypes.
///
/// The introspected `valid_type` is the tag's repr. It is informational
/// only: it names the type for a reader but cannot be resolved back to a
/// [`TypeTag`], in this process or any other.
#[derive(Debug, Clone)]
pub struct ObjectInstanceField {
    valid_type: &'static TypeTag,
    description: Option<String>,
}

impl ObjectInstanceField {
    /// Accepts instances of `valid_type` and its subtypes.
    pub fn new(valid_type: &'static TypeTag) -> Self {
        Self {
            valid_type,
            description: None,
        }
    }

    /// Attach a human-readable description, reported by introspection.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The accepted type.
    pub fn valid_type(&self) -> &'static TypeTag {
        self.valid_type
    }
}

impl Field for ObjectInstanceField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        match value {
            Value::Object(obj) if obj.is_instance_of(self.valid_type) => Vec::new(),
            _ => vec![ValidationError::new(format!(
                "Not an instance of {}",
                self.valid_type.name()
            ))],
        }
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("object_instance")
            .with_opt("description", self.description.clone())
            .with("valid_type", self.valid_type.repr())
    }
}
