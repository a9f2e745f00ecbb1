//! # The Field Contract
//!
//! Every field type implements [`Field`]. Composite fields hold their
//! children as [`BoxedField`] and call through the trait, so a tree can
//! mix any variants, including ones defined outside this workspace.

use std::fmt;

use crate::error::ValidationError;
use crate::introspect::Introspection;
use crate::value::Value;

/// A composable validation node.
///
/// Both methods are pure reads of the field's configuration. Neither
/// mutates the field nor the value, and `introspect` never depends on
/// anything `validate` has seen.
pub trait Field: fmt::Debug + Send + Sync {
    /// Every constraint violation of `value`, in a deterministic order.
    /// An empty vector means the value is valid.
    fn validate(&self, value: &Value) -> Vec<ValidationError>;

    /// A structural description of this field's constraints.
    fn introspect(&self) -> Introspection;

    /// Move this field into a [`BoxedField`].
    fn boxed(self) -> BoxedField
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// An owned child field.
pub type BoxedField = Box<dyn Field>;

impl<F: Field + ?Sized> Field for Box<F> {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        (**self).validate(value)
    }

    fn introspect(&self) -> Introspection {
        (**self).introspect()
    }
}

/// Validate `value` against `field`.
pub fn validate(field: &dyn Field, value: &Value) -> Vec<ValidationError> {
    field.validate(value)
}

/// Describe `field`.
pub fn introspect(field: &dyn Field) -> Introspection {
    field.introspect()
}

/// Re-root child errors under `head` (a key or list index).
pub fn nest_errors(errors: Vec<ValidationError>, head: &str) -> impl Iterator<Item = ValidationError> + '_ {
    errors.into_iter().map(move |e| e.nested_under(head))
}
