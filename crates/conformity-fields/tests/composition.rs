//! Integration test: heterogeneous fields composed into one validation tree.
//!
//! Exercises the behaviors callers rely on across field boundaries: the
//! error order of `Any`, `Polymorph` branch selection and fallback,
//! pointer propagation through dictionaries and lists, and the
//! determinism and pruning guarantees of every field.

use chrono::{NaiveDate, TimeDelta};
use conformity_core::{BoxedField, ConfigError, ErrorCode, Field, Instance, Object, TypeTag, Value};
use conformity_fields::{
    AnyField, BooleanField, ConstantField, DateField, DictionaryField, IntegerField, ListField,
    NullField, ObjectInstanceField, PolymorphField, TimeDeltaField, UnicodeStringField,
};
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};

static ATTACHMENT: TypeTag = TypeTag::new("Attachment").in_module("mail");
static IMAGE: TypeTag = TypeTag::new("Image").in_module("mail").extends(&ATTACHMENT);

#[derive(Debug)]
struct Image;

impl Object for Image {
    fn type_tag(&self) -> &'static TypeTag {
        &IMAGE
    }
}

fn map(entries: Vec<(&str, Value)>) -> Value {
    entries.into_iter().collect()
}

fn date(y: i32, m: u32, d: u32) -> Value {
    Value::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// An event document: a tagged union of meetings and reminders.
fn event_schema() -> PolymorphField {
    let meeting = DictionaryField::builder()
        .key("kind", ConstantField::new(["meeting"]).unwrap())
        .key("on", DateField::builder().gte(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).build().unwrap())
        .key("length", TimeDeltaField::builder().gt(TimeDelta::zero()).build().unwrap())
        .key(
            "attendees",
            ListField::builder(UnicodeStringField::builder().allow_blank(false).build().unwrap())
                .min_length(1)
                .build()
                .unwrap(),
        )
        .optional_key("attachment", ObjectInstanceField::new(&ATTACHMENT))
        .build()
        .unwrap();

    let fallback = DictionaryField::builder()
        .key("kind", UnicodeStringField::new())
        .key(
            "priority",
            AnyField::new(vec![
                NullField::new().boxed(),
                IntegerField::builder().gte(1).lte(5).build().unwrap().boxed(),
            ])
            .unwrap(),
        )
        .build()
        .unwrap();

    PolymorphField::builder("kind")
        .case("meeting", meeting)
        .default_case(fallback)
        .description("Calendar event")
        .build()
        .unwrap()
}

#[test]
fn test_valid_meeting() {
    let value = map(vec![
        ("kind", "meeting".into()),
        ("on", date(2026, 3, 2)),
        ("length", TimeDelta::try_minutes(30).unwrap().into()),
        ("attendees", Value::List(vec!["ada".into(), "bob".into()])),
        ("attachment", Instance::new(Image).into()),
    ]);
    assert!(event_schema().validate(&value).is_empty());
}

#[test]
fn test_meeting_errors_carry_paths() {
    let value = map(vec![
        ("kind", "meeting".into()),
        ("on", date(2025, 12, 31)),
        ("length", TimeDelta::zero().into()),
        ("attendees", Value::List(vec!["ada".into(), " ".into()])),
        ("attachment", "photo.png".into()),
    ]);
    let errors = event_schema().validate(&value);
    let rendered: Vec<(Option<&str>, &str)> =
        errors.iter().map(|e| (e.pointer(), e.message())).collect();
    assert_eq!(
        rendered,
        [
            (Some("on"), "Value not >= 2026-01-01"),
            (Some("length"), "Value not > 0:00:00"),
            (Some("attendees.1"), "String cannot be blank"),
            (Some("attachment"), "Not an instance of Attachment"),
        ]
    );
}

#[test]
fn test_unknown_kind_falls_back_to_default() {
    let value = map(vec![("kind", "reminder".into()), ("priority", Value::Null)]);
    assert!(event_schema().validate(&value).is_empty());

    let value = map(vec![("kind", "reminder".into()), ("priority", 9.into())]);
    let errors = event_schema().validate(&value);
    let rendered: Vec<(Option<&str>, &str)> =
        errors.iter().map(|e| (e.pointer(), e.message())).collect();
    assert_eq!(
        rendered,
        [
            (Some("priority"), "Value is not null"),
            (Some("priority"), "Value not <= 5"),
        ]
    );
}

#[test]
fn test_switch_lookup_failure_is_data_error() {
    let errors = event_schema().validate(&Value::List(Vec::new()));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), Some(ErrorCode::Invalid));
    assert_eq!(errors[0].pointer(), Some("kind"));
}

#[test]
fn test_constant_inside_dictionary_points_at_value() {
    let field = DictionaryField::builder()
        .key("country", ConstantField::new(["US", "CA"]).unwrap())
        .build()
        .unwrap();
    let errors = field.validate(&map(vec![("country", "FR".into())]));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].pointer(), Some("country.value"));
}

#[test]
fn test_any_error_concatenation_matches_children() {
    let first = IntegerField::builder().gt(5).lt(10).build().unwrap();
    let second = ConstantField::new(["US", "CA"]).unwrap();
    let value = Value::from("FR");

    let mut expected = first.validate(&value);
    expected.extend(second.validate(&value));

    let any = AnyField::new(vec![first.boxed(), second.boxed()]).unwrap();
    assert_eq!(any.validate(&value), expected);
    assert!(any.validate(&Value::from(7)).is_empty());
}

#[test]
fn test_configuration_errors_surface_at_build() {
    assert_eq!(AnyField::new(Vec::new()).unwrap_err(), ConfigError::NoOptions);
    assert!(matches!(
        DateField::builder().lt(3).build(),
        Err(ConfigError::BoundaryType { name: "lt", .. })
    ));
    assert!(PolymorphField::builder("").build().is_err());
}

#[test]
fn test_introspection_of_whole_tree() {
    let doc = event_schema().introspect().into_value();
    assert_eq!(doc["type"], "polymorph");
    assert_eq!(doc["description"], "Calendar event");
    assert_eq!(doc["switch_field"], "kind");
    assert_eq!(
        doc["contents_map"]["meeting"]["contents"]["attachment"],
        json!({"type": "object_instance", "valid_type": "<class 'mail.Attachment'>"})
    );
    assert_eq!(
        doc["contents_map"]["__default__"]["contents"]["priority"]["options"],
        json!([{"type": "null"}, {"type": "integer", "gte": 1, "lte": 5}])
    );
}

fn assert_no_absent_values(doc: &JsonValue) {
    match doc {
        JsonValue::Object(map) => {
            for (key, value) in map {
                assert!(!value.is_null(), "null attribute {key}");
                assert_ne!(value, &json!(""), "empty attribute {key}");
                assert_no_absent_values(value);
            }
        }
        JsonValue::Array(items) => items.iter().for_each(assert_no_absent_values),
        _ => {}
    }
}

#[test]
fn test_introspection_is_pruned_at_every_level() {
    assert_no_absent_values(&event_schema().introspect().into_value());
}

fn sample_fields() -> Vec<BoxedField> {
    vec![
        Box::new(event_schema()),
        Box::new(BooleanField::new()),
        Box::new(IntegerField::builder().gt(5).lt(10).lte(10).build().unwrap()),
        Box::new(ConstantField::new(["US", "CA"]).unwrap()),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        prop_oneof![Just("meeting"), Just("US"), Just("FR"), Just("")].prop_map(Value::from),
        (0i64..100_000).prop_map(|s| Value::from(TimeDelta::try_seconds(s).unwrap())),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            proptest::collection::btree_map(
                prop_oneof![Just("kind".to_string()), Just("priority".to_string()), "[a-z]{1,4}"],
                inner,
                0..4,
            )
            .prop_map(Value::Map),
        ]
    })
}

proptest! {
    #[test]
    fn prop_validation_is_deterministic(value in arb_value()) {
        for field in sample_fields() {
            prop_assert_eq!(field.validate(&value), field.validate(&value));
        }
    }

    #[test]
    fn prop_introspection_ignores_validation_history(value in arb_value()) {
        for field in sample_fields() {
            let before = field.introspect();
            let _ = field.validate(&value);
            prop_assert_eq!(before, field.introspect());
        }
    }
}
