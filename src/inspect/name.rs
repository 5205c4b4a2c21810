//! File name splitting

use std::path::{Path, is_separator};

/// Splits the last component of `path` into its name and extension.
///
/// Names without a dot, and dotfiles such as `.hidden`, have no extension.
/// A trailing dot yields an empty extension.
pub fn split_name(path: impl AsRef<Path>) -> (String, Option<String>) {
    let full = path.as_ref().to_string_lossy();
    let base = full.rsplit(is_separator).next().unwrap_or_default();

    match base.rfind('.') {
        Some(0) | None => (base.to_string(), None),
        Some(dot) => (base[..dot].to_string(), Some(base[dot + 1..].to_string())),
    }
}
