//! Diagnostic logging to stderr.
//!
//! Controlled by `RUST_LOG`; quiet by default so stderr only carries the
//! one-line error a failed run prints.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. User-facing diagnostics are printed
/// directly, so tracing output stays quiet unless asked for.
const DEFAULT_LOG_LEVEL: &str = "error";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init();
}
