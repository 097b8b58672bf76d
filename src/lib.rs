//! # CSV Validator
//!
//! Validates and profiles a single CSV file. The checks run as a straight
//! pipeline and the first failure stops the run:
//!
//! - [`path_validator`] - the path exists and carries a `.csv` extension
//! - [`encoding_checker`] - the first 10,000 bytes look like UTF-8
//! - [`format_checker`] - every row has as many fields as the header
//! - [`analyzer`] - row/column counts, nulls, duplicate rows, per-column
//!   cardinality and inferred type, computed over a [`dataframe::DataFrame`]
//! - [`report`] - fixed-section text report with grid tables, saved as
//!   `<stem>_validation_report_<YYYYMMDD_HHMMSS>.txt`
//! - [`cli`] - the command-line driver tying the steps together
//!
//! ## Example
//!
//! ```
//! use csv_validator_rust::format_checker::check_csv_format_from_reader;
//!
//! let result = check_csv_format_from_reader("a,b\n1,2\n3\n".as_bytes(), b',').unwrap();
//! assert!(!result.is_valid);
//! assert_eq!(result.message, "Row 3: Expected 2 columns, found 1");
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod dataframe;
pub mod encoding_checker;
pub mod error;
pub mod format_checker;
pub mod logging;
pub mod path_validator;
pub mod report;
