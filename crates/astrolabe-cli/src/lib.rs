//! CLI logic for the Astrolabe diagram validator.
//!
//! [`run`] validates every input named on the command line and writes the
//! results to the given writer, either as rendered reports or as one JSON
//! document per input.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{
    fs,
    io::{self, Read, Write},
};

use log::{info, warn};
use miette::GraphicalReportHandler;
use serde::Serialize;

use astrolabe::{AstrolabeError, ValidationResult, Validator};

use error_adapter::{Reportable, diagnostics_to_reportables, error_to_reportable};

/// Name of the input that reads standard input.
const STDIN_INPUT: &str = "-";

/// Tally of one CLI run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    checked: usize,
    failed: usize,
}

impl Outcome {
    /// Number of inputs processed, readable or not.
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Number of inputs that were invalid or could not be read.
    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// JSON document written for each input.
#[derive(Serialize)]
struct InputReport<'a> {
    input: &'a str,
    #[serde(flatten)]
    result: Option<&'a ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the Astrolabe CLI application
///
/// Every input is validated even when an earlier one fails. Inputs that
/// cannot be read count as failed.
///
/// # Errors
///
/// Returns `AstrolabeError` for:
/// - Configuration loading errors
/// - Failures writing to `out`
pub fn run(args: &Args, out: &mut impl Write) -> Result<Outcome, AstrolabeError> {
    info!(inputs = args.inputs.len(); "Validating diagrams");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(version) = &args.target_version {
        app_config = app_config.with_target_version(version.as_str());
    }
    let validator = Validator::new(app_config);

    let mut outcome = Outcome::default();
    for input in &args.inputs {
        outcome.checked += 1;

        let bytes = match read_input(input) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(input = input.as_str(), err:% = err; "Input could not be read");
                outcome.failed += 1;
                write_read_error(args.format, input, &err, out)?;
                continue;
            }
        };

        let result = validator.validate_bytes(Some(bytes.as_slice()));
        info!(
            input = input.as_str(),
            kind = result.diagram_type().as_str(),
            valid = result.is_valid();
            "Validated input"
        );
        if !result.is_valid() {
            outcome.failed += 1;
        }

        match args.format {
            OutputFormat::Text => {
                let source = String::from_utf8_lossy(&bytes);
                write_text(input, &result, &source, out)?;
            }
            OutputFormat::Json => write_json(
                &InputReport {
                    input,
                    result: Some(&result),
                    error: None,
                },
                out,
            )?,
        }
    }

    if args.format == OutputFormat::Text {
        writeln!(
            out,
            "{} checked, {} failed",
            outcome.checked, outcome.failed
        )?;
    }

    Ok(outcome)
}

fn read_input(input: &str) -> Result<Vec<u8>, AstrolabeError> {
    let mut bytes = Vec::new();
    if input == STDIN_INPUT {
        io::stdin().lock().read_to_end(&mut bytes)?;
    } else {
        bytes = fs::read(input).map_err(|err| AstrolabeError::read_file(input, err))?;
    }
    Ok(bytes)
}

fn write_text(
    input: &str,
    result: &ValidationResult,
    source: &str,
    out: &mut impl Write,
) -> io::Result<()> {
    if result.is_valid() {
        return writeln!(out, "{input}: ok ({})", result.diagram_type());
    }

    writeln!(
        out,
        "{input}: {} problem(s) in {} diagram",
        result.diagnostics().len(),
        result.diagram_type()
    )?;
    for reportable in diagnostics_to_reportables(result, source) {
        write_report(&reportable, out)?;
    }
    Ok(())
}

fn write_read_error(
    format: OutputFormat,
    input: &str,
    err: &AstrolabeError,
    out: &mut impl Write,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_report(&error_to_reportable(err), out),
        OutputFormat::Json => write_json(
            &InputReport {
                input,
                result: None,
                error: Some(err.to_string()),
            },
            out,
        ),
    }
}

fn write_report(reportable: &Reportable<'_>, out: &mut impl Write) -> io::Result<()> {
    let reporter = GraphicalReportHandler::new();
    let mut rendered = String::new();
    reporter
        .render_report(&mut rendered, reportable)
        .map_err(io::Error::other)?;
    write!(out, "{rendered}")
}

fn write_json(report: &InputReport<'_>, out: &mut impl Write) -> io::Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)
}
