//! # Range Fields
//!
//! [`RangeField`] is the shared implementation behind every ordered leaf
//! (dates, times, datetimes, timedeltas, integers, floats). A
//! [`RangeKind`] marker supplies the valid type, how to pull it out of a
//! [`Value`], and how to render bounds.
//!
//! ## Boundaries
//!
//! Four optional bounds: `gt`, `gte`, `lt`, `lte`. A value fails a bound
//! unless it satisfies it, so unordered values (float NaN) fail every
//! configured bound. Each is checked independently and produces its own error, in the order gt, gte, then
//! lt-or-lte. When both `lt` and `lte` are configured, `lt` wins and `lte`
//! is never evaluated.
//!
//! Bounds are supplied as [`Value`]s and checked against the kind when
//! [`RangeFieldBuilder::build`] runs. A bound of the wrong type is a
//! [`ConfigError::BoundaryType`].

use std::cmp::Ordering::{Equal, Greater, Less};
use std::fmt;
use std::marker::PhantomData;

use conformity_core::{ConfigError, Field, Introspection, ValidationError, Value};
use serde_json::Value as JsonValue;

/// The valid type of a [`RangeField`].
pub trait RangeKind: fmt::Debug + Send + Sync + 'static {
    /// The comparable Rust type.
    type Bound: PartialOrd + Clone + fmt::Debug + Send + Sync;

    /// Introspection `type` discriminator.
    const TYPE: &'static str;

    /// Noun phrase for type-mismatch messages.
    const NOUN: &'static str;

    /// Pull a comparable out of `value`, or `None` if it has the wrong type.
    fn extract(value: &Value) -> Option<Self::Bound>;

    /// Textual form used in messages.
    fn render(bound: &Self::Bound) -> String;

    /// Parse the textual form back. Used by document loaders.
    fn parse(text: &str) -> Option<Self::Bound>;

    /// Form used in introspection documents. Strings by default.
    fn introspect_bound(bound: &Self::Bound) -> JsonValue {
        JsonValue::String(Self::render(bound))
    }
}

/// An ordered leaf with optional open and closed bounds.
#[derive(Debug, Clone)]
pub struct RangeField<K: RangeKind> {
    gt: Option<K::Bound>,
    gte: Option<K::Bound>,
    lt: Option<K::Bound>,
    lte: Option<K::Bound>,
    description: Option<String>,
    kind: PhantomData<K>,
}

impl<K: RangeKind> RangeField<K> {
    /// An unbounded field that only checks the value's type.
    pub fn new() -> Self {
        Self {
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            description: None,
            kind: PhantomData,
        }
    }

    /// Start configuring bounds.
    pub fn builder() -> RangeFieldBuilder<K> {
        RangeFieldBuilder::default()
    }

    /// Exclusive lower bound.
    pub fn gt_bound(&self) -> Option<&K::Bound> {
        self.gt.as_ref()
    }

    /// Inclusive lower bound.
    pub fn gte_bound(&self) -> Option<&K::Bound> {
        self.gte.as_ref()
    }

    /// Exclusive upper bound.
    pub fn lt_bound(&self) -> Option<&K::Bound> {
        self.lt.as_ref()
    }

    /// Inclusive upper bound. Ignored during validation when `lt` is set.
    pub fn lte_bound(&self) -> Option<&K::Bound> {
        self.lte.as_ref()
    }
}

impl<K: RangeKind> Default for RangeField<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RangeKind> Field for RangeField<K> {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        let Some(v) = K::extract(value) else {
            return vec![ValidationError::new(format!("Not {}", K::NOUN))];
        };

        let mut errors = Vec::new();
        if let Some(gt) = &self.gt {
            if !matches!(v.partial_cmp(gt), Some(Greater)) {
                errors.push(ValidationError::new(format!("Value not > {}", K::render(gt))));
            }
        }
        if let Some(gte) = &self.gte {
            if !matches!(v.partial_cmp(gte), Some(Greater | Equal)) {
                errors.push(ValidationError::new(format!("Value not >= {}", K::render(gte))));
            }
        }
        if let Some(lt) = &self.lt {
            if !matches!(v.partial_cmp(lt), Some(Less)) {
                errors.push(ValidationError::new(format!("Value not < {}", K::render(lt))));
            }
        } else if let Some(lte) = &self.lte {
            if !matches!(v.partial_cmp(lte), Some(Less | Equal)) {
                errors.push(ValidationError::new(format!("Value not <= {}", K::render(lte))));
            }
        }
        errors
    }

    fn introspect(&self) -> Introspection {
        Introspection::new(K::TYPE)
            .with_opt("description", self.description.clone())
            .with_opt("gt", self.gt.as_ref().map(K::introspect_bound))
            .with_opt("gte", self.gte.as_ref().map(K::introspect_bound))
            .with_opt("lt", self.lt.as_ref().map(K::introspect_bound))
            .with_opt("lte", self.lte.as_ref().map(K::introspect_bound))
    }
}

/// Collects bounds for a [`RangeField`]; type checks happen in [`build`].
///
/// [`build`]: RangeFieldBuilder::build
#[derive(Debug, Clone)]
pub struct RangeFieldBuilder<K: RangeKind> {
    gt: Option<Value>,
    gte: Option<Value>,
    lt: Option<Value>,
    lte: Option<Value>,
    description: Option<String>,
    kind: PhantomData<K>,
}

impl<K: RangeKind> Default for RangeFieldBuilder<K> {
    fn default() -> Self {
        Self {
            gt: None,
            gte: None,
            lt: None,
            lte: None,
            description: None,
            kind: PhantomData,
        }
    }
}

impl<K: RangeKind> RangeFieldBuilder<K> {
    /// Exclusive lower bound.
    pub fn gt(mut self, bound: impl Into<Value>) -> Self {
        self.gt = Some(bound.into());
        self
    }

    /// Inclusive lower bound.
    pub fn gte(mut self, bound: impl Into<Value>) -> Self {
        self.gte = Some(bound.into());
        self
    }

    /// Exclusive upper bound. Takes precedence over [`lte`](Self::lte).
    pub fn lt(mut self, bound: impl Into<Value>) -> Self {
        self.lt = Some(bound.into());
        self
    }

    /// Inclusive upper bound. Not checked when `lt` is set.
    pub fn lte(mut self, bound: impl Into<Value>) -> Self {
        self.lte = Some(bound.into());
        self
    }

    /// Human-readable description, reported by introspection.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check every bound against the kind and build the field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BoundaryType`] for the first bound (in the
    /// order gt, gte, lt, lte) that is not of the field's valid type.
    pub fn build(self) -> Result<RangeField<K>, ConfigError> {
        Ok(RangeField {
            gt: check_bound::<K>("gt", self.gt)?,
            gte: check_bound::<K>("gte", self.gte)?,
            lt: check_bound::<K>("lt", self.lt)?,
            lte: check_bound::<K>("lte", self.lte)?,
            description: self.description,
            kind: PhantomData,
        })
    }
}

fn check_bound<K: RangeKind>(
    name: &'static str,
    bound: Option<Value>,
) -> Result<Option<K::Bound>, ConfigError> {
    match bound {
        None => Ok(None),
        Some(value) => K::extract(&value)
            .map(Some)
            .ok_or_else(|| ConfigError::BoundaryType {
                name,
                value: value.to_string(),
                expected: K::NOUN,
            }),
    }
}
