//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the library's callers and tests.
///
/// Honours `RUST_LOG`, defaulting to `info`. Calling it again after a logger
/// is installed is a no-op.
pub fn setup_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Setup logging that is captured by the test harness.
pub fn setup_test_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
