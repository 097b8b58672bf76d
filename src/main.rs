//! CSV Validator - Main Application
//!
//! Entry point for the CSV validator binary. All of the work happens in
//! [`csv_validator_rust::cli`].
//!
//! # Usage
//!
//! ```bash
//! # Validate a file; the report is printed and saved to the current directory
//! $ cargo run --release -- path/to/data.csv
//! ```

use std::process::ExitCode;

use csv_validator_rust::cli::csv_validator_main;

/// call from module
fn main() -> ExitCode {
    csv_validator_main()
}
