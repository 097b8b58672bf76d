//! Encoding sniffing over a byte prefix of the input file.
//!
//! A byte-order mark settles the question outright. Without one, the sample
//! goes through `chardetng`, the statistical detector Firefox uses, with
//! UTF-8 allowed as a guess. Only the prefix is inspected, so a file that
//! switches encoding after the sample is not caught.

use std::fs::File;
use std::io::Read;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, info};

use crate::error::{ValidatorError, ValidatorResult};
use crate::path_validator::ValidatedPath;

/// Outcome of the encoding sniff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingResult {
    pub is_utf8: bool,
    /// Canonical name of the detected encoding, e.g. `UTF-8` or `windows-1252`.
    pub encoding: String,
    pub description: String,
}

/// Reads at most `sample_bytes` from the file and guesses its encoding.
///
/// Pure-ASCII samples (including an empty file) are reported as UTF-8, since
/// every ASCII byte sequence is valid UTF-8.
///
/// # Arguments
///
/// * `path` - Validated input path
/// * `sample_bytes` - Maximum number of leading bytes to inspect
///
/// # Returns
///
/// * `ValidatorResult<EncodingResult>` - The guess, or [`ValidatorError::Encoding`] if the file can't be read
pub fn check_encoding(path: &ValidatedPath, sample_bytes: usize) -> ValidatorResult<EncodingResult> {
    let io_error = |source| ValidatorError::Encoding {
        path: path.as_path().display().to_string(),
        source,
    };

    // Open the file and note its size to tell a full read from a prefix
    let file = File::open(path).map_err(io_error)?;
    let file_len = file.metadata().map_err(io_error)?.len();

    // Read at most sample_bytes from the start
    let mut sample = Vec::with_capacity(sample_bytes.min(file_len as usize));
    file.take(sample_bytes as u64)
        .read_to_end(&mut sample)
        .map_err(io_error)?;

    let whole_file = (sample.len() as u64) >= file_len;
    debug!(
        "Sampled {} of {} bytes for encoding detection",
        sample.len(),
        file_len
    );

    let result = detect_encoding(&sample, whole_file);
    info!("{}", result.description);
    Ok(result)
}

/// Guesses the encoding of an in-memory sample.
///
/// `whole_file` tells the detector whether more bytes follow; when they do, a
/// multi-byte UTF-8 sequence cut off by the sample boundary is dropped before
/// detection instead of being held against UTF-8.
pub fn detect_encoding(sample: &[u8], whole_file: bool) -> EncodingResult {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(sample) {
        return encoding_result(encoding, "byte-order mark");
    }

    if sample.is_ascii() {
        return EncodingResult {
            is_utf8: true,
            encoding: UTF_8.name().to_string(),
            description: format!("Detected encoding: {} (ASCII only)", UTF_8.name()),
        };
    }

    // More bytes follow: drop a character cut in half by the sample boundary
    let sample = if whole_file {
        sample
    } else {
        trim_partial_utf8_tail(sample)
    };

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let encoding = detector.guess(None, true);
    encoding_result(encoding, "content")
}

fn encoding_result(encoding: &'static Encoding, source: &str) -> EncodingResult {
    let name = encoding.name();
    debug!("Encoding {} detected from {}", name, source);
    EncodingResult {
        is_utf8: name.eq_ignore_ascii_case("utf-8"),
        encoding: name.to_string(),
        description: format!("Detected encoding: {}", name),
    }
}

/// Drops an incomplete UTF-8 sequence at the very end of the sample.
///
/// Invalid bytes anywhere else are left alone so the detector still sees them.
fn trim_partial_utf8_tail(sample: &[u8]) -> &[u8] {
    match std::str::from_utf8(sample) {
        Err(e) if e.error_len().is_none() => &sample[..e.valid_up_to()],
        _ => sample,
    }
}
