//! # conformity-schema — Declarative Schema Documents
//!
//! Builds field trees from JSON or YAML documents whose shape is the
//! introspection format: every node is a map with a `type` key plus that
//! type's attributes. A tree loaded from a document introspects into a
//! document that loads back into an equivalent tree.
//!
//! Trees built in code do not always survive that trip. Introspection
//! renders constants of dates, times, durations and bytes as strings, and
//! a document cannot say otherwise, so such a constant reloads as a
//! string constant that rejects the original values.
//!
//! ## Crate Policy
//!
//! - Documents are parsed strictly. Unknown `type` values and unknown
//!   attribute keys are rejected, not ignored.
//! - Every configuration error names the document path of the node that
//!   caused it (`contents.age`, `options.1`, `(root)`).
//! - `object_instance` nodes are rejected: a type's repr cannot be
//!   resolved back to a type.
//! - Input documents (the values to validate) are plain JSON or YAML data.
//!   Strings stay strings; no date or duration coercion is attempted.

pub mod document;
pub mod error;

use std::path::Path;

use conformity_core::{BoxedField, Value};
use serde_json::Value as JsonValue;

pub use document::FieldSpec;
pub use error::SchemaError;

/// Build a field tree from a JSON schema document.
///
/// # Errors
///
/// See [`SchemaError`].
pub fn from_json_str(text: &str) -> Result<BoxedField, SchemaError> {
    let spec: FieldSpec = serde_json::from_str(text)?;
    tracing::debug!(type_name = spec.type_name(), "loaded JSON schema document");
    spec.build()
}

/// Build a field tree from a YAML schema document.
///
/// # Errors
///
/// See [`SchemaError`].
pub fn from_yaml_str(text: &str) -> Result<BoxedField, SchemaError> {
    let spec: FieldSpec = serde_yaml::from_str(text)?;
    tracing::debug!(type_name = spec.type_name(), "loaded YAML schema document");
    spec.build()
}

/// Build a field tree from a schema file. `.yaml` and `.yml` files are
/// read as YAML, everything else as JSON.
///
/// # Errors
///
/// See [`SchemaError`].
pub fn from_path(path: &Path) -> Result<BoxedField, SchemaError> {
    let text = read(path)?;
    if is_yaml(path) {
        from_yaml_str(&text)
    } else {
        from_json_str(&text)
    }
}

/// Read a data document to validate, choosing the format by extension as
/// [`from_path`] does.
///
/// # Errors
///
/// [`SchemaError::Io`] if the file cannot be read, or a parse error.
pub fn load_document(path: &Path) -> Result<Value, SchemaError> {
    let text = read(path)?;
    let json: JsonValue = if is_yaml(path) {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    Ok(Value::from(json))
}

fn read(path: &Path) -> Result<String, SchemaError> {
    std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}
