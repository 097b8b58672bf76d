//! Column-major in-memory table with per-column type inference.
//!
//! The whole file is materialised: memory grows linearly with input size.
//!
//! # Inference policy
//!
//! Every column is inferred from all of its cells, never a sample:
//!
//! | Cells (after null detection) | Type |
//! |------------------------------|------|
//! | no rows at all | `object` |
//! | every cell missing | `float64` |
//! | no missing cells, all parse as `i64` | `int64` |
//! | every present cell parses as a number | `float64` |
//! | no missing cells, all `True`/`False` literals | `bool` |
//! | anything else | `object` |
//!
//! Integers with gaps widen to `float64`, and booleans with gaps fall back to
//! `object`. A cell is missing when it matches one of
//! [`DEFAULT_NULL_MARKERS`] exactly.
//!
//! # Example
//!
//! ```
//! use csv_validator_rust::dataframe::{DataFrame, DataType};
//!
//! let df = DataFrame::from_csv_reader("id,score\n1,2.5\n2,\n".as_bytes(), b',').unwrap();
//! assert_eq!(df.row_count(), 2);
//! assert_eq!(df.column(0).unwrap().data_type(), DataType::Int64);
//! assert_eq!(df.column(1).unwrap().data_type(), DataType::Float64);
//! assert_eq!(df.column(1).unwrap().null_count(), 1);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{ValidatorError, ValidatorResult};

/// Cell texts treated as missing values.
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_LITERALS: &[&str] = &["True", "TRUE", "true"];
const FALSE_LITERALS: &[&str] = &["False", "FALSE", "false"];

// ── DataType ──────────────────────────────────────────────────────────

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int64,
    Float64,
    Bool,
    /// Generic text.
    Object,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int64 => write!(f, "int64"),
            Self::Float64 => write!(f, "float64"),
            Self::Bool => write!(f, "bool"),
            Self::Object => write!(f, "object"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column. `None` marks a missing cell where the type allows one.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<i64>),
    Float64(Vec<Option<f64>>),
    Bool(Vec<bool>),
    Object(Vec<Option<String>>),
}

/// Hashable view of one cell, used for distinct counts and row equality.
///
/// Missing cells compare equal to each other. Floats compare by value with
/// `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl Column {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int64(_) => DataType::Int64,
            Self::Float64(_) => DataType::Float64,
            Self::Bool(_) => DataType::Bool,
            Self::Object(_) => DataType::Object,
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Int64(values) => values.len(),
            Self::Float64(values) => values.len(),
            Self::Bool(values) => values.len(),
            Self::Object(values) => values.len(),
        }
    }

    pub fn null_count(&self) -> usize {
        match self {
            Self::Int64(_) | Self::Bool(_) => 0,
            Self::Float64(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Object(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Number of distinct non-missing values.
    pub fn unique_count(&self) -> usize {
        (0..self.len())
            .map(|idx| self.cell_key(idx))
            .filter(|key| *key != CellKey::Null)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Key for the cell at `idx`. Panics if `idx` is out of bounds.
    pub fn cell_key(&self, idx: usize) -> CellKey<'_> {
        match self {
            Self::Int64(values) => CellKey::Int(values[idx]),
            Self::Float64(values) => match values[idx] {
                Some(v) => CellKey::Float(float_bits(v)),
                None => CellKey::Null,
            },
            Self::Bool(values) => CellKey::Bool(values[idx]),
            Self::Object(values) => match &values[idx] {
                Some(s) => CellKey::Text(s.as_str()),
                None => CellKey::Null,
            },
        }
    }
}

fn float_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Named, equally long columns. Names may repeat; columns are addressed by
/// position.
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Loads a delimited file. The first record is the header.
    pub fn from_csv_path(path: impl AsRef<Path>, delimiter: u8) -> ValidatorResult<Self> {
        let file = File::open(path).map_err(|source| ValidatorError::Read { source })?;
        Self::from_csv_reader(file, delimiter)
    }

    /// Loads delimited text from any byte source. Blank lines are skipped;
    /// the format check has already rejected files that contain any.
    ///
    /// Fails with [`ValidatorError::Analysis`] when a row's length differs
    /// from the header's.
    pub fn from_csv_reader<R: io::Read>(source: R, delimiter: u8) -> ValidatorResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(source);

        // The first record supplies the column names
        let mut records = reader.records();
        let mut names: Vec<String> = match records.next() {
            Some(header) => header
                .map_err(ValidatorError::from_csv)?
                .iter()
                .map(str::to_string)
                .collect(),
            None => return Ok(Self::default()),
        };
        if let Some(first) = names.first_mut() {
            if first.starts_with('\u{feff}') {
                first.remove(0);
            }
        }

        // Transpose rows into raw text columns
        let n_cols = names.len();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); n_cols];
        for (record, row_number) in records.zip(2usize..) {
            let record = record.map_err(ValidatorError::from_csv)?;
            if record.len() != n_cols {
                return Err(ValidatorError::analysis(format!(
                    "row {row_number}: expected {n_cols} fields, got {}",
                    record.len()
                )));
            }
            for (col_idx, field) in record.iter().enumerate() {
                raw_columns[col_idx].push(field.to_string());
            }
        }

        // Infer each column's type over all of its cells
        let row_count = raw_columns.first().map(Vec::len).unwrap_or(0);
        let columns = raw_columns.iter().map(|raw| infer_column(raw)).collect();

        Ok(Self {
            names,
            columns,
            row_count,
        })
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// (name, column) pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Rows identical to an earlier row across every column.
    ///
    /// Equals `row_count - distinct_rows`; the first occurrence of each row is
    /// not counted.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(self.row_count);
        (0..self.row_count)
            .filter(|&row| {
                let key: Vec<CellKey<'_>> =
                    self.columns.iter().map(|col| col.cell_key(row)).collect();
                !seen.insert(key)
            })
            .count()
    }
}

// ── Inference ─────────────────────────────────────────────────────────

fn is_null(value: &str) -> bool {
    DEFAULT_NULL_MARKERS.contains(&value)
}

fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if TRUE_LITERALS.contains(&value) {
        Some(true)
    } else if FALSE_LITERALS.contains(&value) {
        Some(false)
    } else {
        None
    }
}

/// Builds a typed column from raw cell text following the module's policy.
fn infer_column(raw: &[String]) -> Column {
    if raw.is_empty() {
        return Column::Object(Vec::new());
    }

    let nulls: Vec<bool> = raw.iter().map(|v| is_null(v)).collect();
    let has_nulls = nulls.iter().any(|&n| n);

    if nulls.iter().all(|&n| n) {
        return Column::Float64(vec![None; raw.len()]);
    }

    if !has_nulls {
        let ints: Option<Vec<i64>> = raw.iter().map(|v| v.trim().parse::<i64>().ok()).collect();
        if let Some(ints) = ints {
            return Column::Int64(ints);
        }
    }

    let floats: Option<Vec<Option<f64>>> = raw
        .iter()
        .zip(&nulls)
        .map(|(v, &null)| if null { Some(None) } else { parse_float(v).map(Some) })
        .collect();
    if let Some(floats) = floats {
        return Column::Float64(floats);
    }

    if !has_nulls {
        let bools: Option<Vec<bool>> = raw.iter().map(|v| parse_bool(v)).collect();
        if let Some(bools) = bools {
            return Column::Bool(bools);
        }
    }

    Column::Object(
        raw.iter()
            .zip(&nulls)
            .map(|(v, &null)| if null { None } else { Some(v.clone()) })
            .collect(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────
