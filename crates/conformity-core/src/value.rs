//! # Value Model — What Fields Validate
//!
//! [`Value`] is the closed set of runtime shapes a field can be handed.
//! Temporal variants carry `chrono` types so that range fields compare
//! real dates and times rather than strings.
//!
//! ## Object instances
//!
//! Domain types that already exist in the host program enter the value
//! tree as [`Value::Object`]. Each object reports a [`TypeTag`], a
//! runtime type descriptor with an optional parent, so that membership
//! tests include subtypes. Tags are compared by identity: declare them as
//! `static` items, never `const`.
//!
//! ```
//! use conformity_core::TypeTag;
//!
//! static SHAPE: TypeTag = TypeTag::new("Shape").in_module("geometry");
//! static CIRCLE: TypeTag = TypeTag::new("Circle").in_module("geometry").extends(&SHAPE);
//!
//! assert!(CIRCLE.is_subtype_of(&SHAPE));
//! assert!(!SHAPE.is_subtype_of(&CIRCLE));
//! assert_eq!(CIRCLE.repr(), "<class 'geometry.Circle'>");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde_json::Value as JsonValue;

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SECOND;

/// Runtime type descriptor for [`Value::Object`] instances.
///
/// The string forms ([`TypeTag::repr`], [`TypeTag::qualified_name`]) are
/// informational only. They are not an identity and cannot be turned back
/// into a tag.
#[derive(Debug)]
pub struct TypeTag {
    name: &'static str,
    module: Option<&'static str>,
    parent: Option<&'static TypeTag>,
}

impl TypeTag {
    /// A root type with no module and no parent.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            module: None,
            parent: None,
        }
    }

    /// Attach the module the type is declared in.
    pub const fn in_module(self, module: &'static str) -> Self {
        Self {
            module: Some(module),
            ..self
        }
    }

    /// Declare this type a subtype of `parent`.
    pub const fn extends(self, parent: &'static TypeTag) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// Bare type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declaring module, if any.
    pub fn module(&self) -> Option<&'static str> {
        self.module
    }

    /// Direct parent type, if any.
    pub fn parent(&self) -> Option<&'static TypeTag> {
        self.parent
    }

    /// True if `self` is `other` or descends from it.
    pub fn is_subtype_of(&self, other: &TypeTag) -> bool {
        let mut current: Option<&TypeTag> = Some(self);
        while let Some(tag) = current {
            if std::ptr::eq(tag, other) {
                return true;
            }
            current = tag.parent;
        }
        false
    }

    /// `module.Name`, or `Name` when no module is set.
    pub fn qualified_name(&self) -> String {
        match self.module {
            Some(module) => format!("{module}.{}", self.name),
            None => self.name.to_string(),
        }
    }

    /// Best-effort human-readable form, e.g. `<class 'geometry.Circle'>`.
    pub fn repr(&self) -> String {
        format!("<class '{}'>", self.qualified_name())
    }
}

/// A host-program value embedded in the value tree.
pub trait Object: fmt::Debug + Send + Sync {
    /// The runtime type of this object.
    fn type_tag(&self) -> &'static TypeTag;

    /// Named attribute lookup, used by dotted-path traversal.
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// Shared handle to an [`Object`].
///
/// Equality is identity: two handles are equal only if they point at the
/// same object.
#[derive(Debug, Clone)]
pub struct Instance(Arc<dyn Object>);

impl Instance {
    /// Wrap an object.
    pub fn new(object: impl Object + 'static) -> Self {
        Self(Arc::new(object))
    }

    /// The object's runtime type.
    pub fn type_tag(&self) -> &'static TypeTag {
        self.0.type_tag()
    }

    /// Look up a named attribute.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.0.attribute(name)
    }

    /// True if the object is an instance of `tag` or one of its subtypes.
    pub fn is_instance_of(&self, tag: &TypeTag) -> bool {
        self.type_tag().is_subtype_of(tag)
    }
}

impl From<Arc<dyn Object>> for Instance {
    fn from(object: Arc<dyn Object>) -> Self {
        Self(object)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0) as *const () == Arc::as_ptr(&other.0) as *const ()
    }
}

/// Discriminant of a [`Value`], used in type-mismatch messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`].
    Null,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Integer`].
    Integer,
    /// [`Value::Float`].
    Float,
    /// [`Value::String`].
    String,
    /// [`Value::Bytes`].
    Bytes,
    /// [`Value::Date`].
    Date,
    /// [`Value::Time`].
    Time,
    /// [`Value::DateTime`].
    DateTime,
    /// [`Value::TimeDelta`].
    TimeDelta,
    /// [`Value::TzInfo`].
    TzInfo,
    /// [`Value::List`].
    List,
    /// [`Value::Map`].
    Map,
    /// [`Value::Object`].
    Object,
}

impl ValueKind {
    /// Noun phrase for messages (`"a unicode string"`, `"a date"`).
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Integer => "an integer",
            Self::Float => "a float",
            Self::String => "a unicode string",
            Self::Bytes => "a byte string",
            Self::Date => "a date",
            Self::Time => "a time",
            Self::DateTime => "a datetime",
            Self::TimeDelta => "a timedelta",
            Self::TzInfo => "a tzinfo",
            Self::List => "a list",
            Self::Map => "a dict",
            Self::Object => "an object",
        }
    }
}

/// A runtime value handed to [`crate::Field::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value.
    Null,
    /// A boolean. Never accepted where an integer is expected.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A float. May be NaN, which fails every range bound.
    Float(f64),
    /// A unicode string.
    String(String),
    /// A byte string.
    Bytes(Vec<u8>),
    /// A calendar date.
    Date(NaiveDate),
    /// A wall-clock time without zone.
    Time(NaiveTime),
    /// An instant with a fixed UTC offset.
    DateTime(DateTime<FixedOffset>),
    /// A signed duration.
    TimeDelta(TimeDelta),
    /// A fixed UTC offset standing in for a time zone.
    TzInfo(FixedOffset),
    /// An ordered sequence.
    List(Vec<Value>),
    /// A string-keyed mapping, iterated in key order.
    Map(BTreeMap<String, Value>),
    /// A host-program object.
    Object(Instance),
}

impl Value {
    /// The discriminant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Date(_) => ValueKind::Date,
            Self::Time(_) => ValueKind::Time,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::TimeDelta(_) => ValueKind::TimeDelta,
            Self::TzInfo(_) => ValueKind::TzInfo,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
            Self::Object(_) => ValueKind::Object,
        }
    }

    /// Get as `&str` if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a map if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get as a slice if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Key lookup on a `Map`. Returns `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Render for an introspection document.
    ///
    /// Temporal values become strings in the same textual forms range
    /// fields use for their bounds; objects become their type's repr.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or_else(|| JsonValue::String(f.to_string())),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Bytes(b) => JsonValue::String(b.escape_ascii().to_string()),
            Self::Date(d) => JsonValue::String(d.to_string()),
            Self::Time(t) => JsonValue::String(t.to_string()),
            Self::DateTime(dt) => JsonValue::String(dt.to_rfc3339()),
            Self::TimeDelta(td) => JsonValue::String(format_time_delta(td)),
            Self::TzInfo(tz) => JsonValue::String(tz.to_string()),
            Self::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Self::Map(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Object(obj) => JsonValue::String(obj.type_tag().repr()),
        }
    }
}

/// Repr used in error messages: strings are quoted, collections are
/// rendered recursively.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            Self::TimeDelta(td) => f.write_str(&format_time_delta(td)),
            Self::TzInfo(tz) => write!(f, "{tz}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Object(obj) => write!(f, "<{} object>", obj.type_tag().qualified_name()),
        }
    }
}

/// Format a duration as `[N day[s], ]H:MM:SS[.ffffff]`.
///
/// Days carry the sign; the clock part is always non-negative, so five
/// seconds before zero renders as `-1 day, 23:59:55`.
pub fn format_time_delta(delta: &TimeDelta) -> String {
    let total = i128::from(delta.num_seconds()) * MICROS_PER_SECOND
        + i128::from(delta.subsec_nanos() / 1_000);
    let days = total.div_euclid(MICROS_PER_DAY);
    let rem = total.rem_euclid(MICROS_PER_DAY);
    let hours = rem / (3_600 * MICROS_PER_SECOND);
    let minutes = rem / (60 * MICROS_PER_SECOND) % 60;
    let seconds = rem / MICROS_PER_SECOND % 60;
    let micros = rem % MICROS_PER_SECOND;

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

/// Parse the output of [`format_time_delta`].
pub fn parse_time_delta(text: &str) -> Option<TimeDelta> {
    let text = text.trim();
    let (days, clock) = match text.split_once(", ") {
        Some((prefix, rest)) => {
            let n = prefix
                .strip_suffix(" days")
                .or_else(|| prefix.strip_suffix(" day"))?;
            (n.trim().parse::<i64>().ok()?, rest)
        }
        None => (0, text),
    };

    let mut parts = clock.split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds_part = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let (seconds, micros) = match seconds_part.split_once('.') {
        Some((s, frac)) if frac.len() == 6 => (s.parse::<i64>().ok()?, frac.parse::<i64>().ok()?),
        Some(_) => return None,
        None => (seconds_part.parse::<i64>().ok()?, 0),
    };
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }

    TimeDelta::try_days(days)?
        .checked_add(&TimeDelta::try_hours(hours)?)?
        .checked_add(&TimeDelta::try_minutes(minutes)?)?
        .checked_add(&TimeDelta::try_seconds(seconds)?)?
        .checked_add(&TimeDelta::microseconds(micros))
}

// ============================================================================
// From implementations
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Self::Time(t)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt.fixed_offset())
    }
}

impl From<TimeDelta> for Value {
    fn from(td: TimeDelta) -> Self {
        Self::TimeDelta(td)
    }
}

impl From<FixedOffset> for Value {
    fn from(tz: FixedOffset) -> Self {
        Self::TzInfo(tz)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<Instance> for Value {
    fn from(obj: Instance) -> Self {
        Self::Object(obj)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// JSON documents carry no temporal types: strings stay strings.
impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static ANIMAL: TypeTag = TypeTag::new("Animal").in_module("zoo");
    static DOG: TypeTag = TypeTag::new("Dog").in_module("zoo").extends(&ANIMAL);
    static PUPPY: TypeTag = TypeTag::new("Puppy").extends(&DOG);
    static ROCK: TypeTag = TypeTag::new("Rock");

    #[derive(Debug)]
    struct Dog {
        name: String,
    }

    impl Object for Dog {
        fn type_tag(&self) -> &'static TypeTag {
            &DOG
        }

        fn attribute(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.as_str())),
                _ => None,
            }
        }
    }

    #[test]
    fn test_subtype_chain() {
        assert!(PUPPY.is_subtype_of(&ANIMAL));
        assert!(PUPPY.is_subtype_of(&PUPPY));
        assert!(!ANIMAL.is_subtype_of(&DOG));
        assert!(!ROCK.is_subtype_of(&ANIMAL));
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(DOG.qualified_name(), "zoo.Dog");
        assert_eq!(PUPPY.qualified_name(), "Puppy");
        assert_eq!(ROCK.repr(), "<class 'Rock'>");
        assert_eq!(DOG.parent().map(TypeTag::name), Some("Animal"));
    }

    #[test]
    fn test_instance_identity() {
        let a = Instance::new(Dog { name: "rex".into() });
        let b = Instance::new(Dog { name: "rex".into() });
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.is_instance_of(&ANIMAL));
        assert_eq!(a.attribute("name"), Some(Value::from("rex")));
        assert_eq!(a.attribute("age"), None);
    }

    #[test]
    fn test_kind_nouns() {
        assert_eq!(Value::from("x").kind().noun(), "a unicode string");
        assert_eq!(Value::from(3).kind(), ValueKind::Integer);
        assert_eq!(Value::Map(BTreeMap::new()).kind().noun(), "a dict");
    }

    #[test]
    fn test_display_repr() {
        assert_eq!(Value::from("z").to_string(), "\"z\"");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        let map: Value = [("kind", Value::from("a")), ("n", Value::from(1))]
            .into_iter()
            .collect();
        assert_eq!(map.to_string(), "{\"kind\": \"a\", \"n\": 1}");
        let obj = Value::from(Instance::new(Dog { name: "rex".into() }));
        assert_eq!(obj.to_string(), "<zoo.Dog object>");
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"a": [1, 2.5, "x", null, true]}));
        let expected: Value = [(
            "a",
            Value::List(vec![
                Value::Integer(1),
                Value::Float(2.5),
                Value::from("x"),
                Value::Null,
                Value::Bool(true),
            ]),
        )]
        .into_iter()
        .collect();
        assert_eq!(value, expected);
    }

    #[test]
    fn test_to_json_temporal() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(Value::from(date).to_json(), json!("2026-01-15"));
        let dt = DateTime::parse_from_rfc3339("2026-01-15T12:00:00+05:00").unwrap();
        assert_eq!(Value::from(dt).to_json(), json!("2026-01-15T12:00:00+05:00"));
        assert_eq!(
            Value::from(TimeDelta::try_seconds(90).unwrap()).to_json(),
            json!("0:01:30")
        );
    }

    #[test]
    fn test_format_time_delta() {
        let td = |s: i64| TimeDelta::try_seconds(s).unwrap();
        assert_eq!(format_time_delta(&td(5)), "0:00:05");
        assert_eq!(format_time_delta(&td(86_400)), "1 day, 0:00:00");
        assert_eq!(format_time_delta(&td(3 * 86_400 + 3_661)), "3 days, 1:01:01");
        assert_eq!(format_time_delta(&td(-5)), "-1 day, 23:59:55");
        assert_eq!(
            format_time_delta(&TimeDelta::microseconds(1_500_000)),
            "0:00:01.500000"
        );
    }

    #[test]
    fn test_parse_time_delta() {
        let td = |s: i64| TimeDelta::try_seconds(s).unwrap();
        assert_eq!(parse_time_delta("0:00:05"), Some(td(5)));
        assert_eq!(parse_time_delta("-1 day, 23:59:55"), Some(td(-5)));
        assert_eq!(parse_time_delta("2 days, 0:00:00"), Some(td(2 * 86_400)));
        assert_eq!(
            parse_time_delta("0:00:01.500000"),
            Some(TimeDelta::microseconds(1_500_000))
        );
        assert_eq!(parse_time_delta("soon"), None);
        assert_eq!(parse_time_delta("0:61:00"), None);
        assert_eq!(parse_time_delta("0:00:01.5"), None);
    }
}
