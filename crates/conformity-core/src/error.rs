//! # Error Types — Validation Records and Configuration Failures
//!
//! Two disjoint error classes:
//!
//! - [`ValidationError`] is a value object describing why a value does not
//!   satisfy a field. It is returned from `validate`, never raised.
//! - [`ConfigError`] is raised by field builders when the supplied
//!   configuration is structurally invalid. It uses `thiserror` like every
//!   other library error in the workspace.
//!
//! A composite field never converts one class into the other.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Machine-readable failure category attached to a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The value is present but does not satisfy the field.
    Invalid,
    /// A required key or path segment is absent.
    Missing,
    /// The value carries keys the field does not know about.
    Unknown,
}

impl ErrorCode {
    /// The wire name of this code (`INVALID`, `MISSING`, `UNKNOWN`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Missing => "MISSING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
///
/// Immutable once built: the `with_*` methods consume and return a new
/// record. The pointer uses dot notation (`contents.3.name`) relative to
/// the value handed to the outermost `validate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pointer: Option<String>,
}

impl ValidationError {
    /// Create an error with the default `INVALID` code and no pointer.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(ErrorCode::Invalid),
            pointer: None,
        }
    }

    /// Replace the error code.
    pub fn with_code(self, code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            ..self
        }
    }

    /// Drop the error code entirely.
    pub fn without_code(self) -> Self {
        Self { code: None, ..self }
    }

    /// Replace the pointer.
    pub fn with_pointer(self, pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            ..self
        }
    }

    /// Re-root this error under `head`.
    ///
    /// `head` + `p` becomes `head.p`; an error with no pointer becomes `head`.
    pub fn nested_under(self, head: &str) -> Self {
        let pointer = match self.pointer {
            Some(p) => format!("{head}.{p}"),
            None => head.to_string(),
        };
        Self {
            pointer: Some(pointer),
            ..self
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Machine-readable category, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Path to the offending sub-value, if any.
    pub fn pointer(&self) -> Option<&str> {
        self.pointer.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pointer {
            Some(p) => write!(f, "{p}: {}", self.message)?,
            None => write!(f, "(root): {}", self.message)?,
        }
        if let Some(code) = self.code {
            write!(f, " [{code}]")?;
        }
        Ok(())
    }
}

/// Construction-time failure of a field.
///
/// These are programmer errors. They are never produced by `validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A boundary parameter is not an instance of the field's valid type.
    #[error("'{name}' value {value} cannot be used for comparisons in this type (expected {expected})")]
    BoundaryType {
        /// Boundary parameter name (`gt`, `gte`, `lt`, `lte`).
        name: &'static str,
        /// Repr of the rejected value.
        value: String,
        /// Noun of the type the field validates.
        expected: &'static str,
    },

    /// An `Any` field was configured with zero options.
    #[error("Any requires at least one option")]
    NoOptions,

    /// A constant field was configured with no allowed values.
    #[error("constant field requires at least one allowed value")]
    EmptyConstant,

    /// The allowed values of a constant field are not all the same kind.
    #[error("constant values must share one type: expected {expected}, found {found}")]
    MixedConstant {
        /// Noun of the first value's kind.
        expected: &'static str,
        /// Noun of the offending value's kind.
        found: &'static str,
    },

    /// A lookup path was empty or contained an empty segment.
    #[error("invalid lookup path {path:?}: segments must be non-empty")]
    EmptyPathSegment {
        /// The path as supplied.
        path: String,
    },

    /// A lookup path exceeded the segment bound.
    #[error("lookup path {path:?} has {segments} segments, the limit is {max}")]
    PathTooDeep {
        /// The path as supplied.
        path: String,
        /// Number of segments in the path.
        segments: usize,
        /// The configured limit.
        max: usize,
    },

    /// A minimum length exceeds the matching maximum.
    #[error("min_length {min} is greater than max_length {max}")]
    LengthBounds {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },

    /// An optional key was declared that is not part of the contents.
    #[error("optional key {0:?} is not present in contents")]
    UnknownOptionalKey(String),
}
