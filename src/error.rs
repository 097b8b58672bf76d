//! Error taxonomy for the CSV validation pipeline.
//!
//! Each pipeline step returns its own variants; the CLI driver turns any of
//! them into a single stderr line and exit status 1. An inconsistent column
//! count is not an error at the check level, it only becomes
//! [`ValidatorError::InvalidFormat`] once the driver decides to stop.

use std::process::ExitCode;
use thiserror::Error;

/// All failures a validation run can end with.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("The file {path} does not exist")]
    NotFound { path: String },

    #[error("The file {path} is not a CSV file")]
    InvalidExtension { path: String },

    #[error("Could not check encoding of {path}: {source}")]
    Encoding {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The file {path} is not UTF-8 encoded (detected: {detected})")]
    NotUtf8 { path: String, detected: String },

    #[error("{message}")]
    InvalidFormat { message: String },

    #[error("CSV format error: {message}")]
    CsvParse { message: String },

    #[error("Error reading CSV: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("Analysis failed: {message}")]
    Analysis { message: String },

    #[error("{0}")]
    Unexpected(#[from] anyhow::Error),
}

impl ValidatorError {
    /// Wraps a `csv` crate error, separating I/O faults from parser faults.
    pub fn from_csv(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::Read { source },
            _ => Self::CsvParse { message },
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Single-line text printed to stderr before exiting.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unexpected(err) => format!("Unexpected error: {}", one_line(&err.to_string())),
            other => format!("Error: {}", one_line(&other.to_string())),
        }
    }

    /// Every handled failure maps to status 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}

/// Collapses a multi-line message so diagnostics stay on one line.
fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ValidatorResult<T> = Result<T, ValidatorError>;
