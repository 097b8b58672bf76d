//! Command-line driver.
//!
//! Runs the checks in order and stops at the first failure:
//!
//! 1. path exists and ends in `.csv`
//! 2. leading bytes look like UTF-8
//! 3. every row has as many fields as the header
//! 4. statistical profile
//! 5. report printed to stdout, then saved as
//!    `<stem>_validation_report_<YYYYMMDD_HHMMSS>.txt`
//!
//! Any failure prints one line to stderr and exits with status 1. A report
//! that cannot be saved only produces a warning, since stdout already has it.
//!
//! # Usage
//!
//! ```bash
//! $ csv_validator path/to/data.csv
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, warn};

use crate::analyzer::analyze_csv;
use crate::config::ValidatorConfig;
use crate::encoding_checker::check_encoding;
use crate::error::{ValidatorError, ValidatorResult};
use crate::format_checker::check_csv_format;
use crate::logging::init_logging;
use crate::path_validator::{validate_file_path, ValidatedPath};
use crate::report::{format_report, write_report};

#[derive(Parser, Debug)]
#[command(
    name = "csv_validator",
    version,
    about = "CSV Validator - Analyzes and validates CSV files"
)]
pub struct Cli {
    /// Path to the CSV file to analyze
    pub file_path: PathBuf,
}

/// Report text together with the input it describes.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub input: ValidatedPath,
    pub report: String,
}

/// Runs every check up to and including report formatting.
///
/// Nothing is printed or written here; a non-UTF-8 sample and an invalid
/// format are turned into errors so the caller can stop.
pub fn run_pipeline(file_path: &Path, config: &ValidatorConfig) -> ValidatorResult<PipelineOutput> {
    // Check the path before touching the file contents
    let input = validate_file_path(file_path)?;
    debug!("Validated input path {}", input.as_path().display());

    // Sniff the leading bytes; anything but UTF-8 stops the run
    let encoding = check_encoding(&input, config.encoding_sample_bytes)?;
    if !encoding.is_utf8 {
        return Err(ValidatorError::NotUtf8 {
            path: file_path.display().to_string(),
            detected: encoding.encoding,
        });
    }

    // Every row must have as many fields as the header
    let format_check = check_csv_format(&input, config.delimiter)?;
    if !format_check.is_valid {
        return Err(ValidatorError::InvalidFormat {
            message: format_check.message,
        });
    }

    // Profile the file and render the report text
    let analysis = analyze_csv(&input, config.delimiter)?;
    let report = format_report(&format_check, Some(&analysis));

    Ok(PipelineOutput { input, report })
}

/// Saves the report, downgrading any failure to a warning on stderr.
///
/// # Returns
///
/// * `Option<PathBuf>` - Where the report landed, `None` if it could not be written
pub fn persist_report(output: &PipelineOutput, config: &ValidatorConfig) -> Option<PathBuf> {
    match write_report(&config.report_dir, &output.input.stem(), &output.report) {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("Report file not written: {:#}", err);
            eprintln!("Warning: could not write report file: {:#}", err);
            None
        }
    }
}

/// Runs the pipeline, shielding the caller from panics so every failure
/// still ends in a single diagnostic line and status 1.
pub fn validate(file_path: &Path, config: &ValidatorConfig) -> ValidatorResult<PipelineOutput> {
    catch_panics(|| run_pipeline(file_path, config))
}

/// Turns a panic inside `step` into [`ValidatorError::Unexpected`].
///
/// The panic hook is silenced for the duration of the call so the default
/// hook's message does not reach stderr ahead of the diagnostic line.
fn catch_panics<T>(step: impl FnOnce() -> ValidatorResult<T>) -> ValidatorResult<T> {
    // Swap in a silent hook, run the step, then put the old hook back
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("Caught panic: {}", info)));
    let outcome = panic::catch_unwind(AssertUnwindSafe(step));
    panic::set_hook(previous_hook);

    outcome.unwrap_or_else(|payload| Err(anyhow::anyhow!(panic_message(payload.as_ref())).into()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "internal error".to_string()
    }
}

/// Main entry point for the CSV validator binary.
pub fn csv_validator_main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let config = ValidatorConfig::default();

    info!("Validating {}", cli.file_path.display());

    match validate(&cli.file_path, &config) {
        Ok(output) => {
            // Print first so the report is visible even if saving fails
            println!("{}", output.report);
            persist_report(&output, &config);
            ExitCode::SUCCESS
        }
        Err(err) => {
            debug!("Validation stopped: {:?}", err);
            eprintln!("{}", err.user_message());
            err.exit_code()
        }
    }
}
