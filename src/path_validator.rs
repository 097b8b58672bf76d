//! Input path validation.
//!
//! Only filesystem metadata is consulted here; the file itself is opened by
//! the later pipeline steps.

use std::path::{Path, PathBuf};

use crate::error::{ValidatorError, ValidatorResult};

/// A path that existed at validation time and carries a `.csv` extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
}

impl ValidatedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// File name without its final extension, used to name the report file.
    ///
    /// `sales.2024.csv` yields `sales.2024`.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Checks that `file_path` exists and ends in `.csv` (any letter case).
///
/// Existence is checked first, so a missing `notes.txt` reports
/// [`ValidatorError::NotFound`] rather than a bad extension.
///
/// # Arguments
///
/// * `file_path` - Path given on the command line
///
/// # Returns
///
/// * `ValidatorResult<ValidatedPath>` - The validated path, or the first check that failed
pub fn validate_file_path(file_path: impl AsRef<Path>) -> ValidatorResult<ValidatedPath> {
    let path = file_path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ValidatorError::NotFound { path: display });
    }

    let is_csv = path
        .extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(ValidatorError::InvalidExtension { path: display });
    }

    Ok(ValidatedPath {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = validate_file_path(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, ValidatorError::NotFound { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn missing_file_with_wrong_extension_is_still_not_found() {
        let dir = tempdir().unwrap();
        let err = validate_file_path(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, ValidatorError::NotFound { .. }));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let err = validate_file_path(&path).unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidExtension { .. }));
        assert!(err.to_string().contains("is not a CSV file"));
    }

    #[test]
    fn extension_check_ignores_case() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("DATA.CsV");
        fs::write(&path, "a\n1\n").unwrap();
        let validated = validate_file_path(&path).unwrap();
        assert_eq!(validated.as_path(), path.as_path());
        assert_eq!(validated.stem(), "DATA");
    }

    #[test]
    fn dotfile_named_csv_has_no_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".csv");
        fs::write(&path, "a\n1\n").unwrap();
        let err = validate_file_path(&path).unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidExtension { .. }));
    }

    #[test]
    fn stem_keeps_inner_dots() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales.2024.csv");
        fs::write(&path, "a\n1\n").unwrap();
        assert_eq!(validate_file_path(&path).unwrap().stem(), "sales.2024");
    }
}
