//! Statistical profile of a structurally valid CSV file.

use std::path::Path;

use tracing::info;

use crate::dataframe::{DataFrame, DataType};
use crate::error::{ValidatorError, ValidatorResult};

/// Per-column cardinality and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStats {
    pub unique_value_count: usize,
    pub inferred_type: DataType,
}

/// Summary statistics for one file.
///
/// The per-column entries are kept as ordered `(name, value)` pairs because
/// header names may repeat; position, not name, identifies a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    /// Data rows, header excluded.
    pub total_rows: usize,
    pub total_columns: usize,
    pub column_names: Vec<String>,
    pub null_counts: Vec<(String, usize)>,
    pub duplicate_row_count: usize,
    pub column_stats: Vec<(String, ColumnStats)>,
}

/// Loads the whole file and profiles it.
///
/// Any load failure, including a ragged row, comes back as
/// [`ValidatorError::Analysis`].
pub fn analyze_csv(path: impl AsRef<Path>, delimiter: u8) -> ValidatorResult<AnalysisResult> {
    let df = DataFrame::from_csv_path(path, delimiter).map_err(|err| match err {
        ValidatorError::Analysis { .. } => err,
        other => ValidatorError::analysis(other.to_string()),
    })?;
    let result = analyze_dataframe(&df);
    info!(
        "Analysed {} rows x {} columns ({} duplicate rows)",
        result.total_rows, result.total_columns, result.duplicate_row_count
    );
    Ok(result)
}

pub fn analyze_dataframe(df: &DataFrame) -> AnalysisResult {
    let null_counts = df
        .iter()
        .map(|(name, col)| (name.to_string(), col.null_count()))
        .collect();

    let column_stats = df
        .iter()
        .map(|(name, col)| {
            (
                name.to_string(),
                ColumnStats {
                    unique_value_count: col.unique_count(),
                    inferred_type: col.data_type(),
                },
            )
        })
        .collect();

    AnalysisResult {
        total_rows: df.row_count(),
        total_columns: df.column_count(),
        column_names: df.column_names().to_vec(),
        null_counts,
        duplicate_row_count: df.duplicate_row_count(),
        column_stats,
    }
}
