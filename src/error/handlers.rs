//! Error handlers
//!
//! Logging hooks shared by operations that hand a failure back to the caller.

use log::error;
use std::fmt::Display;

/// Log a failed operation and pass the result through unchanged.
pub fn log_failure<T, E: Display>(operation: &str, result: Result<T, E>) -> Result<T, E> {
    if let Err(e) = &result {
        error!("{} failed: {}", operation, e);
    }
    result
}
