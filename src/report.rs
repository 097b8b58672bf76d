//! Report rendering and persistence.
//!
//! [`format_report`] is a pure function of the check results. The grid tables
//! follow the familiar `+---+` / `+===+` layout: text left-aligned, numbers
//! right-aligned, one space of padding inside each cell.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::analyzer::AnalysisResult;
use crate::format_checker::FormatCheckResult;

const SECTION_RULE_WIDTH: usize = 20;
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Extra width reserved beside every header label.
const HEADER_MIN_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders the full report.
///
/// Sections, in order: format validation, column alignment (only when the
/// header had columns), then basic statistics, null analysis and column
/// statistics when `analysis` is present.
///
/// # Arguments
///
/// * `format_check` - Result of the structural scan
/// * `analysis` - Statistical profile, `None` when the analysis was skipped
///
/// # Returns
///
/// * `String` - Report sections joined by newlines, without a trailing newline
pub fn format_report(format_check: &FormatCheckResult, analysis: Option<&AnalysisResult>) -> String {
    let mut report: Vec<String> = Vec::new();

    section_title(&mut report, "CSV Format Validation");
    report.push(format!(
        "Status: {}",
        if format_check.is_valid { "✓ Valid" } else { "✗ Invalid" }
    ));
    report.push(format!("Details: {}", format_check.message));
    report.push(String::new());

    if format_check.header_column_count > 0 {
        section_title(&mut report, "Column Alignment Details");
        report.push(format!("Header columns: {}", format_check.header_column_count));
        let counts = format_check.distinct_column_counts();
        match counts.as_slice() {
            [] => report.push("No data rows found".to_string()),
            [only] => report.push(format!("All data rows have {} columns", only)),
            _ => {
                report.push("Warning: Inconsistent column counts detected".to_string());
                let listed: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
                report.push(format!("Column counts found: [{}]", listed.join(", ")));
            }
        }
        report.push(String::new());
    }

    if let Some(results) = analysis {
        section_title(&mut report, "Basic Statistics");
        report.push(format!("Total Rows: {}", results.total_rows));
        report.push(format!("Total Columns: {}", results.total_columns));
        report.push(format!("Duplicate Rows: {}", results.duplicate_row_count));
        report.push(String::new());

        section_title(&mut report, "Null Value Analysis");
        let null_rows: Vec<Vec<String>> = results
            .null_counts
            .iter()
            .map(|(column, count)| vec![column.clone(), count.to_string()])
            .collect();
        report.push(render_grid(
            &["Column", "Null Count"],
            &[Align::Left, Align::Right],
            &null_rows,
        ));
        report.push(String::new());

        section_title(&mut report, "Column Statistics");
        let stats_rows: Vec<Vec<String>> = results
            .column_stats
            .iter()
            .map(|(column, stats)| {
                vec![
                    column.clone(),
                    stats.inferred_type.to_string(),
                    stats.unique_value_count.to_string(),
                ]
            })
            .collect();
        report.push(render_grid(
            &["Column", "Data Type", "Unique Values"],
            &[Align::Left, Align::Left, Align::Right],
            &stats_rows,
        ));
    }

    while report.last().is_some_and(|line| line.is_empty()) {
        report.pop();
    }
    report.join("\n")
}

fn section_title(report: &mut Vec<String>, title: &str) {
    report.push(title.to_string());
    report.push("=".repeat(SECTION_RULE_WIDTH));
}

/// Renders rows as a bordered grid table.
fn render_grid(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| single_line(cell)).collect())
        .collect();

    // Column width is the widest cell, headers padded by HEADER_MIN_PADDING
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count() + HEADER_MIN_PADDING))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = |fill: char| -> String {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&fill.to_string().repeat(width + 2));
            line.push('+');
        }
        line
    };

    let render_row = |row: &[String]| -> String {
        let mut line = String::from("|");
        for ((cell, width), align) in row.iter().zip(&widths).zip(aligns) {
            let padded = match align {
                Align::Left => format!(" {:<width$} ", cell, width = *width),
                Align::Right => format!(" {:>width$} ", cell, width = *width),
            };
            line.push_str(&padded);
            line.push('|');
        }
        line
    };

    let header_row: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![rule('-'), render_row(&header_row), rule('=')];
    for row in &cells {
        lines.push(render_row(row));
        lines.push(rule('-'));
    }
    lines.join("\n")
}

/// Keeps embedded line breaks (legal inside quoted CSV fields) from splitting
/// a table row.
fn single_line(cell: &str) -> String {
    cell.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// `<stem>_validation_report_<YYYYMMDD_HHMMSS>.txt`
pub fn report_file_name(stem: &str, timestamp: &NaiveDateTime) -> String {
    format!(
        "{}_validation_report_{}.txt",
        stem,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Writes the report into `report_dir`, named after the input stem and the
/// current local time.
///
/// # Returns
///
/// * `Result<PathBuf>` - Path of the written file
pub fn write_report(report_dir: &Path, stem: &str, report: &str) -> Result<PathBuf> {
    // Build the report path from the input stem and the current time
    let file_name = report_file_name(stem, &Local::now().naive_local());
    let report_path = report_dir.join(file_name);

    let mut file = File::create(&report_path)
        .with_context(|| format!("could not create {}", report_path.display()))?;
    writeln!(file, "{}", report)
        .with_context(|| format!("could not write {}", report_path.display()))?;

    info!("Report saved to {}", report_path.display());
    Ok(report_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ColumnStats;
    use crate::dataframe::DataType;
    use crate::format_checker::MismatchedRow;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn valid_check() -> FormatCheckResult {
        FormatCheckResult {
            is_valid: true,
            message: "CSV format is valid".to_string(),
            header_column_count: 2,
            data_row_column_counts: vec![2, 2],
            mismatched_rows: Vec::new(),
        }
    }

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            total_rows: 2,
            total_columns: 2,
            column_names: vec!["id".to_string(), "name".to_string()],
            null_counts: vec![("id".to_string(), 0), ("name".to_string(), 1)],
            duplicate_row_count: 0,
            column_stats: vec![
                (
                    "id".to_string(),
                    ColumnStats {
                        unique_value_count: 2,
                        inferred_type: DataType::Int64,
                    },
                ),
                (
                    "name".to_string(),
                    ColumnStats {
                        unique_value_count: 1,
                        inferred_type: DataType::Object,
                    },
                ),
            ],
        }
    }

    #[test]
    fn full_report_layout() {
        let report = format_report(&valid_check(), Some(&sample_analysis()));
        let expected = "\
CSV Format Validation
====================
Status: ✓ Valid
Details: CSV format is valid

Column Alignment Details
====================
Header columns: 2
All data rows have 2 columns

Basic Statistics
====================
Total Rows: 2
Total Columns: 2
Duplicate Rows: 0

Null Value Analysis
====================
+----------+--------------+
| Column   |   Null Count |
+==========+==============+
| id       |            0 |
+----------+--------------+
| name     |            1 |
+----------+--------------+

Column Statistics
====================
+----------+-------------+-----------------+
| Column   | Data Type   |   Unique Values |
+==========+=============+=================+
| id       | int64       |               2 |
+----------+-------------+-----------------+
| name     | object      |               1 |
+----------+-------------+-----------------+";
        assert_eq!(report, expected);
    }

    #[test]
    fn section_order_is_fixed() {
        let report = format_report(&valid_check(), Some(&sample_analysis()));
        let positions: Vec<usize> = [
            "CSV Format Validation",
            "Column Alignment Details",
            "Basic Statistics",
            "Null Value Analysis",
            "Column Statistics",
        ]
        .iter()
        .map(|title| report.find(title).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn inconsistent_counts_are_listed_sorted() {
        let check = FormatCheckResult {
            is_valid: false,
            message: "Row 2: Expected 2 columns, found 3\nRow 3: Expected 2 columns, found 1"
                .to_string(),
            header_column_count: 2,
            data_row_column_counts: vec![3, 1, 2],
            mismatched_rows: vec![
                MismatchedRow {
                    row_number: 2,
                    expected: 2,
                    actual: 3,
                },
                MismatchedRow {
                    row_number: 3,
                    expected: 2,
                    actual: 1,
                },
            ],
        };
        let report = format_report(&check, None);
        assert!(report.contains("Status: ✗ Invalid"));
        assert!(report.contains("Warning: Inconsistent column counts detected"));
        assert!(report.contains("Column counts found: [1, 2, 3]"));
        assert!(!report.contains("Basic Statistics"));
    }

    #[test]
    fn alignment_block_skipped_without_header_columns() {
        let check = FormatCheckResult {
            is_valid: false,
            message: "Empty CSV file".to_string(),
            header_column_count: 0,
            data_row_column_counts: Vec::new(),
            mismatched_rows: Vec::new(),
        };
        let report = format_report(&check, None);
        assert!(!report.contains("Column Alignment Details"));
        assert!(report.ends_with("Details: Empty CSV file"));
    }

    #[test]
    fn header_only_file_reports_no_data_rows() {
        let mut check = valid_check();
        check.data_row_column_counts.clear();
        let report = format_report(&check, None);
        assert!(report.contains("No data rows found"));
    }

    #[test]
    fn grid_widens_to_longest_cell() {
        let grid = render_grid(
            &["Column", "Null Count"],
            &[Align::Left, Align::Right],
            &[vec!["customer_identifier".to_string(), "12345678901234".to_string()]],
        );
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines[0], "+---------------------+----------------+");
        assert_eq!(lines[1], "| Column              |     Null Count |");
        assert_eq!(lines[3], "| customer_identifier | 12345678901234 |");
    }

    #[test]
    fn grid_cells_with_line_breaks_stay_on_one_row() {
        let grid = render_grid(&["Column"], &[Align::Left], &[vec!["a\nb".to_string()]]);
        assert!(grid.contains("| a b      |"));
    }

    #[test]
    fn grid_width_counts_characters_not_bytes() {
        let grid = render_grid(&["C"], &[Align::Left], &[vec!["é".to_string()]]);
        assert_eq!(grid.lines().next().unwrap(), "+-----+");
    }

    #[test]
    fn report_file_name_uses_zero_padded_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap();
        assert_eq!(
            report_file_name("sales", &ts),
            "sales_validation_report_20240307_090502.txt"
        );
    }

    #[test]
    fn write_report_creates_file_in_directory() {
        let dir = tempdir().unwrap();
        let path = write_report(dir.path(), "data", "hello report").unwrap();
        assert_eq!(path.parent().unwrap(), dir.path());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("data_validation_report_"));
        assert!(name.ends_with(".txt"));
        assert_eq!(name.len(), "data_validation_report_".len() + 15 + 4);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello report\n");
    }

    #[test]
    fn write_report_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_report(&missing, "data", "x").unwrap_err();
        assert!(err.to_string().contains("could not create"));
    }
}
