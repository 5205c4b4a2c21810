//! Input validation utilities
//!
//! Checks for caller-supplied arguments. A failed `require_*` check is a
//! contract violation and panics.

use std::path::is_separator;

/// Validate that a temp name prefix is non-empty and names a single path
/// component
pub fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.chars().any(is_separator) && !prefix.contains('\0')
}

/// Panic unless `prefix` is a valid temp name prefix
pub fn require_valid_prefix(prefix: &str) {
    assert!(
        is_valid_prefix(prefix),
        "prefix must be a non-empty file name component, got {prefix:?}"
    );
}
