//! # conformity-core — Field Contract and Error Model
//!
//! This crate is the bedrock of conformity. It defines the pieces every
//! field type is built from, and it is the stable extension surface for
//! field types that live outside this workspace.
//!
//! ## Key Design Principles
//!
//! 1. **Validation failures are data.** [`Field::validate`] returns a
//!    `Vec<ValidationError>`; an empty vector is the only success signal.
//!    Nothing in the validation path returns `Err` or panics on bad input.
//!
//! 2. **Configuration failures are errors.** Field builders return
//!    `Result<_, ConfigError>`. A field that exists is a field whose
//!    configuration was accepted.
//!
//! 3. **Fields are immutable trees.** Composite fields own their children
//!    as `Box<dyn Field>`. No sharing, no cycles, no interior mutability,
//!    so every field is `Send + Sync` and validation needs no locking.
//!
//! 4. **Introspection output is minimal.** Every document passes through
//!    [`Introspection`], which drops absent attributes instead of emitting
//!    nulls.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `conformity-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

#![deny(missing_docs)]

pub mod error;
pub mod field;
pub mod introspect;
pub mod lookup;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{ConfigError, ErrorCode, ValidationError};
pub use field::{introspect, nest_errors, validate, BoxedField, Field};
pub use introspect::{strip_none, Introspection};
pub use lookup::{LookupError, LookupPath, MAX_LOOKUP_SEGMENTS};
pub use value::{Instance, Object, TypeTag, Value, ValueKind};
