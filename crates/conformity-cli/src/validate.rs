//! # Validate Subcommand
//!
//! `conformity validate <schema> <document>...` loads one schema and
//! validates each document against it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, ValueEnum};
use conformity_core::{Field, ValidationError};
use serde::Serialize;

use crate::{EXIT_INVALID, EXIT_VALID};

/// Report format for validation results.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per error.
    #[default]
    Text,
    /// One JSON object per document.
    Json,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON, or YAML by `.yaml`/`.yml` extension).
    pub schema: PathBuf,

    /// Data documents to validate.
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct Report<'a> {
    document: String,
    valid: bool,
    errors: &'a [ValidationError],
}

/// Validate every document and write a report for each.
///
/// # Errors
///
/// Fails if the schema or any document cannot be loaded, or the report
/// cannot be written.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> anyhow::Result<u8> {
    let schema = conformity_schema::from_path(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    tracing::info!(schema = %args.schema.display(), documents = args.documents.len(), "validating");

    let mut code = EXIT_VALID;
    for path in &args.documents {
        let value = conformity_schema::load_document(path)
            .with_context(|| format!("loading document {}", path.display()))?;
        let errors = schema.validate(&value);
        tracing::debug!(document = %path.display(), errors = errors.len(), "validated");
        if !errors.is_empty() {
            code = EXIT_INVALID;
        }
        write_report(out, args.format, path, &errors)?;
    }
    Ok(code)
}

fn write_report(
    out: &mut dyn Write,
    format: OutputFormat,
    path: &Path,
    errors: &[ValidationError],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text if errors.is_empty() => {
            writeln!(out, "{}: valid", path.display())?;
        }
        OutputFormat::Text => {
            writeln!(out, "{}: {} error(s)", path.display(), errors.len())?;
            for error in errors {
                writeln!(out, "  {error}")?;
            }
        }
        OutputFormat::Json => {
            let report = Report {
                document: path.display().to_string(),
                valid: errors.is_empty(),
                errors,
            };
            writeln!(out, "{}", serde_json::to_string(&report)?)?;
        }
    }
    Ok(())
}
