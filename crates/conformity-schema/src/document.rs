//! # Schema Documents
//!
//! [`FieldSpec`] is the deserializable form of a field tree. Its shape is
//! the shape of introspection output. A document that was itself loaded
//! and introspected loads back into an equivalent field. Trees built in
//! code can hold values a document cannot express, see the crate docs.
//!
//! Unknown keys are rejected during deserialization. Every other
//! configuration problem is reported by the field's own builder and
//! wrapped with the dotted path of the node that caused it.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use conformity_core::{BoxedField, ConfigError, Field, Value};
use conformity_country::CountryCodeField;
use conformity_fields::basic::{FloatKind, IntegerKind};
use conformity_fields::temporal::{DateKind, DateTimeKind, TimeDeltaKind, TimeKind};
use conformity_fields::{
    AnyField, BooleanField, ConstantField, DictionaryField, Discriminator, ListField, NullField,
    PolymorphField, RangeField, RangeKind, TzInfoField, UnicodeStringField,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::SchemaError;

/// One node of a schema document, discriminated by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum FieldSpec {
    #[serde(rename = "boolean")]
    Boolean(DescribedSpec),
    #[serde(rename = "null")]
    Null(DescribedSpec),
    #[serde(rename = "unicode")]
    Unicode(UnicodeSpec),
    #[serde(rename = "integer")]
    Integer(RangeSpec),
    #[serde(rename = "float")]
    Float(RangeSpec),
    #[serde(rename = "date")]
    Date(RangeSpec),
    #[serde(rename = "time")]
    Time(RangeSpec),
    #[serde(rename = "datetime")]
    DateTime(RangeSpec),
    #[serde(rename = "timedelta")]
    TimeDelta(RangeSpec),
    #[serde(rename = "tzinfo")]
    TzInfo(DescribedSpec),
    #[serde(rename = "constant")]
    Constant(ConstantSpec),
    #[serde(rename = "country_code_field")]
    CountryCode(CountryCodeSpec),
    #[serde(rename = "dictionary")]
    Dictionary(DictionarySpec),
    #[serde(rename = "list")]
    List(ListSpec),
    #[serde(rename = "any")]
    Any(AnySpec),
    #[serde(rename = "polymorph")]
    Polymorph(PolymorphSpec),
    #[serde(rename = "object_instance")]
    ObjectInstance(ObjectInstanceSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescribedSpec {
    pub description: Option<String>,
}

/// Bounds are strings for temporal types, numbers for numeric types.
/// Timedelta bounds may also be plain numbers of seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSpec {
    pub description: Option<String>,
    pub gt: Option<JsonValue>,
    pub gte: Option<JsonValue>,
    pub lt: Option<JsonValue>,
    pub lte: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnicodeSpec {
    pub description: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    #[serde(default = "default_true")]
    pub allow_blank: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantSpec {
    pub description: Option<String>,
    pub values: Vec<JsonValue>,
}

/// Omitting `valid_country_codes` allows every assigned code.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountryCodeSpec {
    pub description: Option<String>,
    pub valid_country_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionarySpec {
    pub description: Option<String>,
    pub contents: BTreeMap<String, FieldSpec>,
    #[serde(default)]
    pub optional_keys: Vec<String>,
    #[serde(default)]
    pub allow_extra_keys: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSpec {
    pub description: Option<String>,
    pub contents: Box<FieldSpec>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnySpec {
    pub description: Option<String>,
    pub options: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolymorphSpec {
    pub description: Option<String>,
    pub switch_field: String,
    /// Keys are read with [`Discriminator::from_key`]: `"1"` dispatches on
    /// the integer 1 and `"true"` on the boolean.
    pub contents_map: BTreeMap<String, FieldSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectInstanceSpec {
    pub description: Option<String>,
    pub valid_type: String,
}

fn default_true() -> bool {
    true
}

impl FieldSpec {
    /// The node's `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Null(_) => "null",
            Self::Unicode(_) => "unicode",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::TimeDelta(_) => "timedelta",
            Self::TzInfo(_) => "tzinfo",
            Self::Constant(_) => "constant",
            Self::CountryCode(_) => "country_code_field",
            Self::Dictionary(_) => "dictionary",
            Self::List(_) => "list",
            Self::Any(_) => "any",
            Self::Polymorph(_) => "polymorph",
            Self::ObjectInstance(_) => "object_instance",
        }
    }

    /// Build the field tree this document describes.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Config`] when a builder rejects a node, and
    /// [`SchemaError::NotReconstructable`] for `object_instance` nodes.
    pub fn build(&self) -> Result<BoxedField, SchemaError> {
        self.build_at(&Pointer::root())
    }

    fn build_at(&self, at: &Pointer) -> Result<BoxedField, SchemaError> {
        tracing::trace!(pointer = %at, type_name = self.type_name(), "building field");
        let config = |source: ConfigError| SchemaError::Config {
            pointer: at.to_string(),
            source,
        };

        let field: BoxedField = match self {
            Self::Boolean(s) => described(BooleanField::new, BooleanField::with_description, s),
            Self::Null(s) => described(NullField::new, NullField::with_description, s),
            Self::TzInfo(s) => described(TzInfoField::new, TzInfoField::with_description, s),
            Self::Unicode(s) => {
                let mut builder = UnicodeStringField::builder().allow_blank(s.allow_blank);
                if let Some(min) = s.min_length {
                    builder = builder.min_length(min);
                }
                if let Some(max) = s.max_length {
                    builder = builder.max_length(max);
                }
                if let Some(d) = &s.description {
                    builder = builder.description(d.clone());
                }
                builder.build().map_err(config)?.boxed()
            }
            Self::Integer(s) => range::<IntegerKind>(s, Value::from).map_err(config)?,
            Self::Float(s) => range::<FloatKind>(s, Value::from).map_err(config)?,
            Self::Date(s) => range::<DateKind>(s, temporal_bound::<DateKind>).map_err(config)?,
            Self::Time(s) => range::<TimeKind>(s, temporal_bound::<TimeKind>).map_err(config)?,
            Self::DateTime(s) => {
                range::<DateTimeKind>(s, temporal_bound::<DateTimeKind>).map_err(config)?
            }
            Self::TimeDelta(s) => range::<TimeDeltaKind>(s, time_delta_bound).map_err(config)?,
            Self::Constant(s) => {
                let field = ConstantField::new(s.values.iter().cloned().map(Value::from))
                    .map_err(config)?;
                match &s.description {
                    Some(d) => field.with_description(d.clone()).boxed(),
                    None => field.boxed(),
                }
            }
            Self::CountryCode(s) => {
                let field = match &s.valid_country_codes {
                    Some(codes) => CountryCodeField::with_filter(|c| codes.iter().any(|k| k == c)),
                    None => CountryCodeField::new(),
                }
                .map_err(config)?;
                match &s.description {
                    Some(d) => field.with_description(d.clone()).boxed(),
                    None => field.boxed(),
                }
            }
            Self::Dictionary(s) => {
                let mut builder = DictionaryField::builder()
                    .allow_extra_keys(s.allow_extra_keys)
                    .optional_keys(s.optional_keys.iter().cloned());
                for (key, child) in &s.contents {
                    let child = child.build_at(&at.join("contents").join(key))?;
                    builder = builder.boxed_key(key.clone(), child);
                }
                if let Some(d) = &s.description {
                    builder = builder.description(d.clone());
                }
                builder.build().map_err(config)?.boxed()
            }
            Self::List(s) => {
                let contents = s.contents.build_at(&at.join("contents"))?;
                let mut builder = ListField::boxed_builder(contents);
                if let Some(min) = s.min_length {
                    builder = builder.min_length(min);
                }
                if let Some(max) = s.max_length {
                    builder = builder.max_length(max);
                }
                if let Some(d) = &s.description {
                    builder = builder.description(d.clone());
                }
                builder.build().map_err(config)?.boxed()
            }
            Self::Any(s) => {
                let options_at = at.join("options");
                let options = s
                    .options
                    .iter()
                    .enumerate()
                    .map(|(i, o)| o.build_at(&options_at.join(&i.to_string())))
                    .collect::<Result<Vec<_>, _>>()?;
                let field = AnyField::new(options).map_err(config)?;
                match &s.description {
                    Some(d) => field.with_description(d.clone()).boxed(),
                    None => field.boxed(),
                }
            }
            Self::Polymorph(s) => {
                let mut builder = PolymorphField::builder(s.switch_field.clone());
                for (key, child) in &s.contents_map {
                    builder = builder.boxed_case(
                        Discriminator::from_key(key),
                        child.build_at(&at.join("contents_map").join(key))?,
                    );
                }
                if let Some(d) = &s.description {
                    builder = builder.description(d.clone());
                }
                builder.build().map_err(config)?.boxed()
            }
            Self::ObjectInstance(_) => {
                return Err(SchemaError::NotReconstructable {
                    pointer: at.to_string(),
                    type_name: "object_instance",
                })
            }
        };
        Ok(field)
    }
}

fn described<F: Field + 'static>(
    plain: impl FnOnce() -> F,
    with: impl FnOnce(String) -> F,
    spec: &DescribedSpec,
) -> BoxedField {
    match &spec.description {
        Some(d) => with(d.clone()).boxed(),
        None => plain().boxed(),
    }
}

fn range<K: RangeKind>(
    spec: &RangeSpec,
    bound: fn(JsonValue) -> Value,
) -> Result<BoxedField, ConfigError> {
    let mut builder = RangeField::<K>::builder();
    if let Some(b) = &spec.gt {
        builder = builder.gt(bound(b.clone()));
    }
    if let Some(b) = &spec.gte {
        builder = builder.gte(bound(b.clone()));
    }
    if let Some(b) = &spec.lt {
        builder = builder.lt(bound(b.clone()));
    }
    if let Some(b) = &spec.lte {
        builder = builder.lte(bound(b.clone()));
    }
    if let Some(d) = &spec.description {
        builder = builder.description(d.clone());
    }
    Ok(builder.build()?.boxed())
}

/// Parse a string bound in the kind's textual form. Anything that does not
/// parse is passed through unchanged so the builder reports it.
fn temporal_bound<K>(json: JsonValue) -> Value
where
    K: RangeKind,
    K::Bound: Into<Value>,
{
    match json.as_str().and_then(K::parse) {
        Some(parsed) => parsed.into(),
        None => Value::from(json),
    }
}

fn time_delta_bound(json: JsonValue) -> Value {
    if let Some(secs) = json.as_i64() {
        if let Some(td) = TimeDelta::try_seconds(secs) {
            return Value::from(td);
        }
    }
    temporal_bound::<TimeDeltaKind>(json)
}

/// Dotted path of a node within a document, `(root)` at the top.
#[derive(Debug, Clone)]
struct Pointer(Vec<String>);

impl Pointer {
    fn root() -> Self {
        Self(Vec::new())
    }

    fn join(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self(segments)
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("(root)")
        } else {
            f.write_str(&self.0.join("."))
        }
    }
}
