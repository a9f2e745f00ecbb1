//! # Introspect Subcommand
//!
//! `conformity introspect <schema>` builds the schema and prints its
//! introspection as pretty JSON. Building first means the output is
//! normalized: defaults filled in, absent attributes pruned, and any
//! configuration error reported instead of echoed back.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use conformity_core::Field;

use crate::EXIT_VALID;

/// Arguments for the introspect subcommand.
#[derive(Args, Debug)]
pub struct IntrospectArgs {
    /// Schema document (JSON, or YAML by `.yaml`/`.yml` extension).
    pub schema: PathBuf,
}

/// Print the schema's introspection.
///
/// # Errors
///
/// Fails if the schema cannot be loaded or the output cannot be written.
pub fn run_introspect(args: &IntrospectArgs, out: &mut dyn Write) -> anyhow::Result<u8> {
    let schema = conformity_schema::from_path(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let doc = schema.introspect().into_value();
    writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    Ok(EXIT_VALID)
}
