//! # Temporal Fields
//!
//! Range fields over `chrono` types, plus a type-only time zone leaf.
//!
//! | Field | Valid type | Introspected bound form |
//! |-------|------------|-------------------------|
//! | [`DateField`] | `NaiveDate` | `2026-01-15` |
//! | [`TimeField`] | `NaiveTime` | `12:30:00` |
//! | [`DateTimeField`] | `DateTime<FixedOffset>` | RFC 3339 |
//! | [`TimeDeltaField`] | `TimeDelta` | `[N day[s], ]H:MM:SS[.ffffff]` |
//! | [`TzInfoField`] | `FixedOffset` | (no bounds) |

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta};
use conformity_core::value::{format_time_delta, parse_time_delta};
use conformity_core::{Field, Introspection, ValidationError, Value};

use crate::range::{RangeField, RangeKind};

/// Range kind of [`DateField`].
#[derive(Debug, Clone, Copy)]
pub struct DateKind;

impl RangeKind for DateKind {
    type Bound = NaiveDate;
    const TYPE: &'static str = "date";
    const NOUN: &'static str = "a date";

    fn extract(value: &Value) -> Option<NaiveDate> {
        match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    fn render(bound: &NaiveDate) -> String {
        bound.to_string()
    }

    fn parse(text: &str) -> Option<NaiveDate> {
        NaiveDate::from_str(text).ok()
    }
}

/// Range kind of [`TimeField`].
#[derive(Debug, Clone, Copy)]
pub struct TimeKind;

impl RangeKind for TimeKind {
    type Bound = NaiveTime;
    const TYPE: &'static str = "time";
    const NOUN: &'static str = "a time";

    fn extract(value: &Value) -> Option<NaiveTime> {
        match value {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    fn render(bound: &NaiveTime) -> String {
        bound.to_string()
    }

    fn parse(text: &str) -> Option<NaiveTime> {
        NaiveTime::from_str(text).ok()
    }
}

/// Datetimes compare as instants, whatever their offsets.
#[derive(Debug, Clone, Copy)]
pub struct DateTimeKind;

impl RangeKind for DateTimeKind {
    type Bound = DateTime<FixedOffset>;
    const TYPE: &'static str = "datetime";
    const NOUN: &'static str = "a datetime";

    fn extract(value: &Value) -> Option<DateTime<FixedOffset>> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn render(bound: &DateTime<FixedOffset>) -> String {
        bound.to_rfc3339()
    }

    fn parse(text: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(text).ok()
    }
}

/// Range kind of [`TimeDeltaField`], rendered as `H:MM:SS`.
#[derive(Debug, Clone, Copy)]
pub struct TimeDeltaKind;

impl RangeKind for TimeDeltaKind {
    type Bound = TimeDelta;
    const TYPE: &'static str = "timedelta";
    const NOUN: &'static str = "a timedelta";

    fn extract(value: &Value) -> Option<TimeDelta> {
        match value {
            Value::TimeDelta(td) => Some(*td),
            _ => None,
        }
    }

    fn render(bound: &TimeDelta) -> String {
        format_time_delta(bound)
    }

    fn parse(text: &str) -> Option<TimeDelta> {
        parse_time_delta(text)
    }
}

/// Accepts a `NaiveDate`, with optional bounds.
pub type DateField = RangeField<DateKind>;
/// Accepts a `NaiveTime`, with optional bounds.
pub type TimeField = RangeField<TimeKind>;
/// Accepts a `DateTime<FixedOffset>`, with optional bounds.
pub type DateTimeField = RangeField<DateTimeKind>;
/// Accepts a `TimeDelta`, with optional bounds.
pub type TimeDeltaField = RangeField<TimeDeltaKind>;

/// Accepts any fixed-offset time zone.
#[derive(Debug, Clone, Default)]
pub struct TzInfoField {
    description: Option<String>,
}

impl TzInfoField {
    /// A tzinfo field without a description.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tzinfo field with a description.
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

impl Field for TzInfoField {
    fn validate(&self, value: &Value) -> Vec<ValidationError> {
        match value {
            Value::TzInfo(_) => Vec::new(),
            _ => vec![ValidationError::new("Not a tzinfo")],
        }
    }

    fn introspect(&self) -> Introspection {
        Introspection::new("tzinfo").with_opt("description", self.description.clone())
    }
}
