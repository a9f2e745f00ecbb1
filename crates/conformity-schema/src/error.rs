//! Schema loading error types.

use conformity_core::ConfigError;
use thiserror::Error;

/// Errors from loading a schema document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document is not valid JSON or does not match the document shape.
    #[error("invalid JSON schema document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML or does not match the document shape.
    #[error("invalid YAML schema document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A node was rejected by its field's builder.
    #[error("configuration error at {pointer}: {source}")]
    Config {
        /// Dotted path of the offending node within the document.
        pointer: String,
        /// The builder's error.
        #[source]
        source: ConfigError,
    },

    /// A node names a field that documents cannot describe.
    #[error("{type_name} at {pointer} cannot be reconstructed from a document")]
    NotReconstructable {
        /// Dotted path of the offending node within the document.
        pointer: String,
        /// The node's `type`.
        type_name: &'static str,
    },

    /// The file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    /// Dotted document path of the failing node, for node-level errors.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            Self::Config { pointer, .. } | Self::NotReconstructable { pointer, .. } => Some(pointer),
            _ => None,
        }
    }
}
