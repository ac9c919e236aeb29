//! Mirdoc: structured music annotation documents.
//!
//! Mirdoc packages heterogeneous music annotations (beats, chords,
//! segments, tags, ...) into one file-level document alongside file and
//! annotation metadata, and validates each annotation against the schema
//! of its declared namespace before downstream tools trust it.
//!
//! # Modules
//!
//! - [`doc`]: The document object graph (Document, Annotation,
//!   Observation, ...) and its JSON / lab codecs
//! - [`ns`]: Namespace schemas, the constraint grammar, and the registry
//! - [`validation`]: The validation engine and its structured reports
//! - [`util`]: Corpus discovery helpers
//! - [`error`]: Error types for mirdoc operations

pub mod doc;
pub mod error;
pub mod ns;
pub mod util;
pub mod validation;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::MirdocError;

/// The mirdoc CLI application.
#[derive(Parser)]
#[command(name = "mirdoc")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a document against its namespaces.
    Validate(ValidateArgs),

    /// Summarize a document's namespaces and observation counts.
    Inspect(InspectArgs),
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Document file to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Document file to inspect.
    input: PathBuf,
}

/// Run the mirdoc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), MirdocError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            // No subcommand: just print a help hint and exit successfully
            println!("mirdoc {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Structured music annotation documents.");
            println!();
            println!("Run 'mirdoc --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), MirdocError> {
    let document = doc::io_json::read_json(&args.input)?;
    let registry = ns::NamespaceRegistry::with_builtins();

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_document(&document, &registry, &opts);

    // Output results
    match args.output.as_str() {
        "json" => {
            let rendered = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            match serde_json::to_string_pretty(&rendered) {
                Ok(text) => println!("{}", text),
                Err(source) => {
                    return Err(MirdocError::JsonWrite {
                        path: PathBuf::from("<stdout>"),
                        source,
                    })
                }
            }
        }
        "text" => {
            print!("{}", report);
        }
        other => {
            return Err(MirdocError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    // Determine exit status
    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(MirdocError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), MirdocError> {
    let document = doc::io_json::read_json(&args.input)?;
    let meta = &document.file_metadata;

    let mut heading = String::new();
    if !meta.title.is_empty() {
        heading.push_str(&meta.title);
    }
    if !meta.artist.is_empty() {
        if !heading.is_empty() {
            heading.push_str(" - ");
        }
        heading.push_str(&meta.artist);
    }
    if heading.is_empty() {
        heading.push_str("(untitled)");
    }
    match meta.duration {
        Some(duration) => println!("{} ({}s)", heading, duration),
        None => println!("{}", heading),
    }

    // (annotation count, observation count) per namespace
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for annotation in document.annotations.iter() {
        let entry = counts.entry(&annotation.namespace).or_default();
        entry.0 += 1;
        entry.1 += annotation.len();
    }

    if counts.is_empty() {
        println!("no annotations");
    } else {
        println!("annotations:");
        for (namespace, (annotations, observations)) in counts {
            println!(
                "  {}: {} annotation(s), {} observation(s)",
                namespace, annotations, observations
            );
        }
    }

    Ok(())
}
