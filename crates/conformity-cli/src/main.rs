//! # conformity CLI Entry Point
//!
//! Parses arguments, installs logging, and dispatches to the handlers in
//! the library half of this crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use conformity_cli::introspect::{run_introspect, IntrospectArgs};
use conformity_cli::validate::{run_validate, ValidateArgs};
use conformity_cli::EXIT_FAILURE;

/// Validate data documents against declarative field schemas.
#[derive(Parser, Debug)]
#[command(name = "conformity", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a schema.
    Validate(ValidateArgs),

    /// Print a schema's normalized introspection.
    Introspect(IntrospectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Reports go to stdout; logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &mut stdout),
        Commands::Introspect(args) => run_introspect(args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conformity_cli::validate::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn test_parse_validate_defaults_to_text() {
        let cli = Cli::try_parse_from(["conformity", "validate", "schema.yaml", "a.json"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("schema.yaml"));
        assert_eq!(args.documents, [PathBuf::from("a.json")]);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn test_parse_validate_json_format_and_many_documents() {
        let cli = Cli::try_parse_from([
            "conformity", "validate", "--format", "json", "s.json", "a.json", "b.yaml",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.documents.len(), 2);
    }

    #[test]
    fn test_parse_validate_requires_document() {
        assert!(Cli::try_parse_from(["conformity", "validate", "schema.yaml"]).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        assert!(
            Cli::try_parse_from(["conformity", "validate", "--format", "xml", "s", "d"]).is_err()
        );
    }

    #[test]
    fn test_parse_verbosity_is_global() {
        let cli = Cli::try_parse_from(["conformity", "introspect", "-vv", "s.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Introspect(_)));
    }
}
