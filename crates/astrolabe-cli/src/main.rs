//! Astrolabe CLI entry point.

use std::{io, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use astrolabe_cli::{Args, error_adapter::error_to_reportable};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Astrolabe");
    debug!(args:?; "Parsed arguments");

    let stdout = io::stdout();
    match astrolabe_cli::run(&args, &mut stdout.lock()) {
        Ok(outcome) if outcome.is_success() => {
            info!(checked = outcome.checked(); "All inputs are valid");
        }
        Ok(outcome) => {
            info!(checked = outcome.checked(), failed = outcome.failed(); "Some inputs are invalid");
            process::exit(1);
        }
        Err(err) => {
            let reporter = miette::GraphicalReportHandler::new();
            let mut writer = String::new();
            if reporter
                .render_report(&mut writer, &error_to_reportable(&err))
                .is_err()
            {
                writer = err.to_string();
            }
            error!("{writer}");
            process::exit(1);
        }
    }
}
