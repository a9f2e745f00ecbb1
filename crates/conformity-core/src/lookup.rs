//! # Lookup Paths — Dotted-Path Traversal
//!
//! A [`LookupPath`] is a parsed `a.b.c` string: an ordered list of plain
//! segments, resolved one at a time against a [`Value`]. Maps are walked
//! by key, objects by attribute. There is no indexing and no computed
//! access, so the path stays meaningful as a static string in
//! introspection output.
//!
//! Resolution never panics. A missing segment or a value that cannot be
//! traversed comes back as a typed [`LookupError`] that callers turn into
//! validation errors.

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::error::ConfigError;
use crate::value::{Value, ValueKind};

/// Upper bound on the number of segments in a lookup path.
pub const MAX_LOOKUP_SEGMENTS: usize = 32;

/// A parsed dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupPath {
    segments: Vec<String>,
}

/// Failure to resolve a [`LookupPath`] against a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The key or attribute does not exist.
    #[error("missing {segment:?} at {at}")]
    Missing {
        /// Segment that could not be found.
        segment: String,
        /// Path prefix up to and including the missing segment.
        at: String,
    },

    /// The value reached so far is not a map or object.
    #[error("cannot look up {segment:?} in {} at {at}", kind.noun())]
    NotTraversable {
        /// Segment that was being looked up.
        segment: String,
        /// Kind of the value that could not be traversed.
        kind: ValueKind,
        /// Path prefix up to and including the failed segment.
        at: String,
    },
}

impl LookupError {
    /// Path prefix at which resolution stopped.
    pub fn at(&self) -> &str {
        match self {
            Self::Missing { at, .. } | Self::NotTraversable { at, .. } => at,
        }
    }
}

impl LookupPath {
    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPathSegment`] for an empty path or a path
    /// with an empty segment (`a..b`, `.a`), and [`ConfigError::PathTooDeep`]
    /// for more than [`MAX_LOOKUP_SEGMENTS`] segments.
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyPathSegment {
                path: path.to_string(),
            });
        }
        if segments.len() > MAX_LOOKUP_SEGMENTS {
            return Err(ConfigError::PathTooDeep {
                path: path.to_string(),
                segments: segments.len(),
                max: MAX_LOOKUP_SEGMENTS,
            });
        }
        Ok(Self { segments })
    }

    /// The segments in traversal order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path through `value`.
    ///
    /// Map lookups borrow from `value`; attribute lookups produce owned
    /// values, hence the `Cow`.
    pub fn resolve<'a>(&self, value: &'a Value) -> Result<Cow<'a, Value>, LookupError> {
        let mut current: Cow<'a, Value> = Cow::Borrowed(value);
        for (depth, segment) in self.segments.iter().enumerate() {
            let next = match current {
                Cow::Borrowed(Value::Map(map)) => map.get(segment).map(Cow::Borrowed),
                Cow::Owned(Value::Map(ref map)) => map.get(segment).cloned().map(Cow::Owned),
                Cow::Borrowed(Value::Object(obj)) => obj.attribute(segment).map(Cow::Owned),
                Cow::Owned(Value::Object(ref obj)) => obj.attribute(segment).map(Cow::Owned),
                ref other => {
                    return Err(LookupError::NotTraversable {
                        segment: segment.clone(),
                        kind: other.kind(),
                        at: self.prefix(depth),
                    })
                }
            };
            current = next.ok_or_else(|| LookupError::Missing {
                segment: segment.clone(),
                at: self.prefix(depth),
            })?;
        }
        Ok(current)
    }

    fn prefix(&self, depth: usize) -> String {
        self.segments[..=depth].join(".")
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
