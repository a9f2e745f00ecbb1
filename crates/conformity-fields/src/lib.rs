//! # conformity-fields — Field Types
//!
//! Every field type shipped with conformity, built on the contract in
//! `conformity-core`.
//!
//! ## Leaves
//!
//! - [`range`]: the shared gt/gte/lt/lte machinery ([`RangeField`]).
//! - [`temporal`]: date, time, datetime, timedelta, and tzinfo fields.
//! - [`basic`]: booleans, null, unicode strings, integers, floats.
//! - [`constant`]: fixed allowed-value sets.
//!
//! ## Composites
//!
//! - [`structures`]: dictionaries and lists, with pointer propagation.
//! - [`meta`]: `Any`, `Polymorph`, and `ObjectInstance`.
//!
//! ## Example
//!
//! ```
//! use conformity_core::{Field, Value};
//! use conformity_fields::{AnyField, IntegerField, NullField};
//!
//! let maybe_count = AnyField::new(vec![
//!     NullField::new().boxed(),
//!     IntegerField::builder().gte(0).build()?.boxed(),
//! ])?;
//!
//! assert!(maybe_count.validate(&Value::Null).is_empty());
//! assert!(maybe_count.validate(&Value::from(3)).is_empty());
//! assert_eq!(maybe_count.validate(&Value::from(-1)).len(), 2);
//! # Ok::<(), conformity_core::ConfigError>(())
//! ```

pub mod basic;
pub mod constant;
pub mod meta;
pub mod range;
pub mod structures;
pub mod temporal;

pub use basic::{BooleanField, FloatField, IntegerField, NullField, UnicodeStringField};
pub use constant::ConstantField;
pub use meta::{AnyField, Discriminator, ObjectInstanceField, PolymorphField, DEFAULT_KEY};
pub use range::{RangeField, RangeFieldBuilder, RangeKind};
pub use structures::{DictionaryField, ListField};
pub use temporal::{DateField, DateTimeField, TimeDeltaField, TimeField, TzInfoField};
