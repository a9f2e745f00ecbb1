//! # conformity-cli — Command-Line Interface
//!
//! Subcommand handlers for the `conformity` binary. Argument structs and
//! handlers live here so they can be tested without spawning a process;
//! `main.rs` only parses, installs logging, and maps outcomes to exit codes.
//!
//! ## Subcommands
//!
//! - `validate` — validate a data document against a schema document
//! - `introspect` — print a schema's normalized introspection
//!
//! ## Crate Policy
//!
//! - Handlers delegate to `conformity-schema`; no field logic here.
//! - Handlers write to a caller-supplied writer and return an exit code.
//!   Failures to load or build a schema are `Err`, validation failures
//!   are not.

pub mod introspect;
pub mod validate;

/// Every document was valid.
pub const EXIT_VALID: u8 = 0;
/// The document had validation errors.
pub const EXIT_INVALID: u8 = 1;
/// A schema or document could not be loaded.
pub const EXIT_FAILURE: u8 = 2;
