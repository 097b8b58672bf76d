//! Structural check: every data row must have as many fields as the header.
//!
//! Records are read through the `csv` crate in flexible mode, so quoted
//! delimiters and quoted newlines are handled and rows of any length come
//! back as records instead of errors. A length mismatch is a reported
//! outcome, never an error.
//!
//! A blank line is a row with zero fields. The parser skips those silently,
//! so the raw bytes between consecutive records are inspected to put them
//! back in place. A blank first line makes the header empty and the whole
//! file is treated as empty.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{ValidatorError, ValidatorResult};
use crate::path_validator::ValidatedPath;

pub const EMPTY_FILE_MESSAGE: &str = "Empty CSV file";
pub const VALID_FORMAT_MESSAGE: &str = "CSV format is valid";

/// A data row whose field count differs from the header's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MismatchedRow {
    /// 1-based record number; the header is row 1.
    pub row_number: usize,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatCheckResult {
    pub is_valid: bool,
    pub message: String,
    pub header_column_count: usize,
    /// Field count of every data row, in file order.
    pub data_row_column_counts: Vec<usize>,
    /// Ascending by `row_number`, one entry per offending row.
    pub mismatched_rows: Vec<MismatchedRow>,
}

impl FormatCheckResult {
    fn empty_file() -> Self {
        Self {
            is_valid: false,
            message: EMPTY_FILE_MESSAGE.to_string(),
            header_column_count: 0,
            data_row_column_counts: Vec::new(),
            mismatched_rows: Vec::new(),
        }
    }

    /// Sorted set of field counts seen across the data rows.
    pub fn distinct_column_counts(&self) -> Vec<usize> {
        self.data_row_column_counts
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Scans the whole file and compares each row's field count to the header.
///
/// # Arguments
///
/// * `path` - Validated input path
/// * `delimiter` - Field delimiter byte
///
/// # Returns
///
/// * `ValidatorResult<FormatCheckResult>` - The scan result; `Err` only for
///   I/O faults ([`ValidatorError::Read`]) or parser faults ([`ValidatorError::CsvParse`])
pub fn check_csv_format(path: &ValidatedPath, delimiter: u8) -> ValidatorResult<FormatCheckResult> {
    let file = File::open(path).map_err(|source| ValidatorError::Read { source })?;
    let result = check_csv_format_from_reader(file, delimiter)?;
    info!(
        "Format check finished: {} data rows, {} mismatched",
        result.data_row_column_counts.len(),
        result.mismatched_rows.len()
    );
    Ok(result)
}

/// Same check as [`check_csv_format`] over any byte source.
pub fn check_csv_format_from_reader<R: Read>(
    mut source: R,
    delimiter: u8,
) -> ValidatorResult<FormatCheckResult> {
    // Keep the raw bytes around to find the blank lines the parser drops
    let mut data = Vec::new();
    source
        .read_to_end(&mut data)
        .map_err(|source| ValidatorError::Read { source })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(data.as_slice());

    // Field count of every row in file order, header first
    let mut row_lengths: Vec<usize> = Vec::new();
    let mut record = StringRecord::new();
    let mut consumed = 0usize;

    loop {
        let more = reader
            .read_record(&mut record)
            .map_err(ValidatorError::from_csv)?;
        let end = if more {
            (reader.position().byte() as usize).min(data.len())
        } else {
            data.len()
        };

        // Blank lines skipped on the way to this record become empty rows
        let blank_lines = count_leading_blank_lines(&data, consumed, end);
        row_lengths.resize(row_lengths.len() + blank_lines, 0);

        if !more {
            break;
        }
        row_lengths.push(record.len());
        consumed = end;
    }

    let Some((&expected, data_rows)) = row_lengths.split_first() else {
        return Ok(FormatCheckResult::empty_file());
    };
    if expected == 0 {
        debug!("Header line is blank");
        return Ok(FormatCheckResult::empty_file());
    }

    // Compare every data row against the header, numbering from 2
    let mut mismatched_rows = Vec::new();
    for (&actual, row_number) in data_rows.iter().zip(2usize..) {
        if actual != expected {
            debug!(
                "Row {}: expected {} columns, found {}",
                row_number, expected, actual
            );
            mismatched_rows.push(MismatchedRow {
                row_number,
                expected,
                actual,
            });
        }
    }

    let is_valid = mismatched_rows.is_empty();
    let message = if is_valid {
        VALID_FORMAT_MESSAGE.to_string()
    } else {
        mismatch_message(&mismatched_rows)
    };

    Ok(FormatCheckResult {
        is_valid,
        message,
        header_column_count: expected,
        data_row_column_counts: data_rows.to_vec(),
        mismatched_rows,
    })
}

/// Counts the blank lines at the start of `data[start..end]`.
///
/// `\n`, `\r` and `\r\n` each end one blank line. A `\n` at `start` that
/// completes the previous record's `\r\n` is not a blank line, and
/// neither is a UTF-8 byte-order mark at the start of the file.
fn count_leading_blank_lines(data: &[u8], start: usize, end: usize) -> usize {
    const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

    let mut pos = start;
    if pos == 0 && data.starts_with(UTF8_BOM) {
        pos = UTF8_BOM.len();
    }
    if pos > 0 && pos < end && data[pos - 1] == b'\r' && data[pos] == b'\n' {
        pos += 1;
    }

    let mut blank_lines = 0;
    while pos < end {
        match data[pos] {
            b'\n' => pos += 1,
            b'\r' => {
                pos += 1;
                if pos < end && data[pos] == b'\n' {
                    pos += 1;
                }
            }
            _ => break,
        }
        blank_lines += 1;
    }
    blank_lines
}

fn mismatch_message(rows: &[MismatchedRow]) -> String {
    let mut message = String::new();
    for row in rows {
        message.push_str(&format!(
            "Row {}: Expected {} columns, found {}\n",
            row.row_number, row.expected, row.actual
        ));
    }
    message.trim_end().to_string()
}
