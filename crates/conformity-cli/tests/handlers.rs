//! Integration test: subcommand handlers against files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use conformity_cli::introspect::{run_introspect, IntrospectArgs};
use conformity_cli::validate::{run_validate, OutputFormat, ValidateArgs};
use conformity_cli::{EXIT_INVALID, EXIT_VALID};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

const SCHEMA: &str = r#"
type: dictionary
contents:
  name:
    type: unicode
    allow_blank: false
  age:
    type: integer
    gte: 0
optional_keys: [age]
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn validate(args: &ValidateArgs) -> (u8, String) {
    let mut out: Vec<u8> = Vec::new();
    let code = run_validate(args, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_valid_document_exits_zero() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        schema: write(dir.path(), "person.yaml", SCHEMA),
        documents: vec![write(dir.path(), "ada.json", r#"{"name": "Ada", "age": 36}"#)],
        format: OutputFormat::Text,
    };
    let (code, out) = validate(&args);
    assert_eq!(code, EXIT_VALID);
    assert!(out.ends_with("ada.json: valid\n"));
}

#[test]
fn test_invalid_document_exits_one_with_text_report() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        schema: write(dir.path(), "person.yaml", SCHEMA),
        documents: vec![write(dir.path(), "bad.yaml", "name: ' '\nage: -1\nx: 1\n")],
        format: OutputFormat::Text,
    };
    let (code, out) = validate(&args);
    assert_eq!(code, EXIT_INVALID);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].ends_with("bad.yaml: 3 error(s)"));
    assert_eq!(
        &lines[1..],
        [
            "  age: Value not >= 0 [INVALID]",
            "  name: String cannot be blank [INVALID]",
            "  (root): Extra keys present: x [UNKNOWN]",
        ]
    );
}

#[test]
fn test_json_report_per_document() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        schema: write(dir.path(), "person.yaml", SCHEMA),
        documents: vec![
            write(dir.path(), "ok.json", r#"{"name": "Ada"}"#),
            write(dir.path(), "missing.json", "{}"),
        ],
        format: OutputFormat::Json,
    };
    let (code, out) = validate(&args);
    assert_eq!(code, EXIT_INVALID);

    let reports: Vec<JsonValue> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["valid"], json!(true));
    assert_eq!(reports[0]["errors"], json!([]));
    assert_eq!(reports[1]["valid"], json!(false));
    assert_eq!(
        reports[1]["errors"],
        json!([{"message": "Missing key: name", "code": "MISSING", "pointer": "name"}])
    );
}

#[test]
fn test_bad_schema_is_an_error() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        schema: write(dir.path(), "s.json", r#"{"type": "any", "options": []}"#),
        documents: vec![write(dir.path(), "d.json", "null")],
        format: OutputFormat::Text,
    };
    let err = run_validate(&args, &mut std::io::sink()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.starts_with("loading schema"));
    assert!(message.contains("configuration error at (root)"));
}

#[test]
fn test_unreadable_document_is_an_error() {
    let dir = TempDir::new().unwrap();
    let args = ValidateArgs {
        schema: write(dir.path(), "person.yaml", SCHEMA),
        documents: vec![dir.path().join("absent.json")],
        format: OutputFormat::Text,
    };
    let err = run_validate(&args, &mut std::io::sink()).unwrap_err();
    assert!(format!("{err:#}").starts_with("loading document"));
}

#[test]
fn test_introspect_prints_normalized_schema() {
    let dir = TempDir::new().unwrap();
    let args = IntrospectArgs {
        schema: write(dir.path(), "person.yaml", SCHEMA),
    };
    let mut out: Vec<u8> = Vec::new();
    assert_eq!(run_introspect(&args, &mut out).unwrap(), EXIT_VALID);
    let doc: JsonValue = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        doc,
        json!({
            "type": "dictionary",
            "contents": {
                "age": {"type": "integer", "gte": 0},
                "name": {"type": "unicode", "allow_blank": false},
            },
            "optional_keys": ["age"],
            "allow_extra_keys": false,
        })
    );
}
