//! Run configuration.
//!
//! The CLI only takes a file path, so everything tunable lives here with the
//! defaults the tool ships with. Tests override `report_dir` to keep report
//! files out of the working directory.

use std::path::{Path, PathBuf};

/// Number of leading bytes sampled for encoding detection.
pub const DEFAULT_ENCODING_SAMPLE_BYTES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Upper bound on bytes handed to the encoding detector.
    pub encoding_sample_bytes: usize,
    /// Field delimiter used by both the format check and the analysis load.
    pub delimiter: u8,
    /// Directory the timestamped report copy is written to.
    pub report_dir: PathBuf,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            encoding_sample_bytes: DEFAULT_ENCODING_SAMPLE_BYTES,
            delimiter: b',',
            report_dir: PathBuf::from("."),
        }
    }
}

impl ValidatorConfig {
    pub fn with_report_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.report_dir = dir.as_ref().to_path_buf();
        self
    }
}
