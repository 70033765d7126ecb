//! Command-line argument definitions for the Astrolabe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the inputs, the output format, the
//! configuration file and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the Astrolabe diagram validator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Diagram files to validate; `-` reads standard input
    #[arg(required = true, help = "Paths to the input files, or - for stdin")]
    pub inputs: Vec<String>,

    /// How to print the results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Renderer version the diagrams must be compatible with
    #[arg(long)]
    pub target_version: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Output format of the validation results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Rendered diagnostics with source snippets
    Text,
    /// One JSON document per input
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["astrolabe", "diagram.mmd"]).unwrap();
        assert_eq!(args.inputs, vec!["diagram.mmd"]);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.log_level, "warn");
        assert!(args.config.is_none());
        assert!(args.target_version.is_none());
    }

    #[test]
    fn test_all_options() {
        let args = Args::try_parse_from([
            "astrolabe",
            "--format",
            "json",
            "--config",
            "astrolabe.toml",
            "--target-version",
            "11.4.1",
            "a.mmd",
            "-",
        ])
        .unwrap();
        assert_eq!(args.inputs, vec!["a.mmd", "-"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.config.as_deref(), Some("astrolabe.toml"));
        assert_eq!(args.target_version.as_deref(), Some("11.4.1"));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["astrolabe"]).is_err());
    }
}
