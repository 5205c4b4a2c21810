//! JSON file encoding and decoding
//!
//! Documents are written through a temporary file in the destination
//! directory and renamed over the target, so readers never see a partial
//! document.

use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::handlers::log_failure;
use crate::error::{FsError, JsonError};
use crate::json::finite::ensure_finite;
use crate::json::formatter::EscapingFormatter;
use crate::json::options::{JsonOptions, JsonShape, type_name};
use crate::storage::filesystem::{mode_of, set_mode};
use crate::storage::prepare;

/// Serializes `value` and writes it to `path`, creating missing parent
/// directories with `options.dir_mode`.
pub fn encode_file<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    options: &JsonOptions,
) -> Result<(), JsonError> {
    log_failure("encode_file", write_document(path, value, options))
}

fn write_document<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    options: &JsonOptions,
) -> Result<(), JsonError> {
    let document = to_document(value, options)?;
    prepare(path, options.dir_mode)?;
    write_atomic(path, &document, options.file_mode)?;
    info!("Wrote {} bytes of JSON to {}", document.len(), path.display());
    Ok(())
}

/// Renders `value` as a JSON document according to `options`.
pub fn to_document<T: Serialize + ?Sized>(
    value: &T,
    options: &JsonOptions,
) -> Result<Vec<u8>, JsonError> {
    ensure_finite(value).map_err(|e| JsonError::Encode(e.to_string()))?;

    let mut out = Vec::new();
    if options.pretty {
        serialize_into(&mut out, value, PrettyFormatter::with_indent(b"    "), options)?;
        out.push(b'\n');
    } else {
        serialize_into(&mut out, value, CompactFormatter, options)?;
    }
    Ok(out)
}

fn serialize_into<T, F>(
    out: &mut Vec<u8>,
    value: &T,
    layout: F,
    options: &JsonOptions,
) -> Result<(), JsonError>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let formatter = EscapingFormatter::new(layout, options.escape_slashes, options.escape_unicode);
    value
        .serialize(&mut Serializer::with_formatter(out, formatter))
        .map_err(|e| JsonError::Encode(e.to_string()))
}

/// Write to a temp file beside `path`, then rename it into place.
///
/// An existing target keeps its permission bits; a new one gets `file_mode`.
/// A symlink is followed so the link itself stays in place.
fn write_atomic(path: &Path, data: &[u8], file_mode: u32) -> Result<(), FsError> {
    let resolved = resolve_link(path);
    let path = resolved.as_path();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mode = mode_of(path).unwrap_or(file_mode);

    let temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| FsError::from_io(parent, e))?;
    let mut file = temp.as_file();
    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| FsError::from_io(path, e))?;
    set_mode(temp.path(), mode)?;

    temp.persist(path)
        .map_err(|e| FsError::from_io(path, e.error))?;
    Ok(())
}

// Dangling links are replaced like any other path.
fn resolve_link(path: &Path) -> PathBuf {
    let is_link = path
        .symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_link {
        if let Ok(target) = fs::canonicalize(path) {
            debug!("Writing through {} to {}", path.display(), target.display());
            return target;
        }
    }
    path.to_path_buf()
}

/// Reads and parses the JSON document at `path`.
pub fn decode_file(path: &Path) -> Result<Value, JsonError> {
    log_failure("decode_file", parse_file(path))
}

/// Reads and parses the JSON document at `path`, which must have `shape`.
///
/// # Panics
///
/// Panics if the document parses but is not of the expected shape.
pub fn decode_file_expecting(path: &Path, shape: JsonShape) -> Result<Value, JsonError> {
    let value = decode_file(path)?;
    assert!(
        shape.matches(&value),
        "{} must contain a JSON {}, found {}",
        path.display(),
        shape,
        type_name(&value)
    );
    Ok(value)
}

/// Reads the JSON document at `path` into a typed value.
pub fn decode_file_into<T: DeserializeOwned>(path: &Path) -> Result<T, JsonError> {
    let result = read_document(path).and_then(|bytes| {
        serde_json::from_slice(&bytes).map_err(|e| JsonError::Parse {
            path: path.to_path_buf(),
            error: e.into(),
        })
    });
    log_failure("decode_file_into", result)
}

fn parse_file(path: &Path) -> Result<Value, JsonError> {
    let bytes = read_document(path)?;
    let value = serde_json::from_slice(&bytes).map_err(|e| JsonError::Parse {
        path: path.to_path_buf(),
        error: e.into(),
    })?;
    debug!("Decoded JSON from {}", path.display());
    Ok(value)
}

fn read_document(path: &Path) -> Result<Vec<u8>, JsonError> {
    fs::read(path).map_err(|e| {
        let err = if e.kind() == io::ErrorKind::PermissionDenied {
            FsError::NotReadable(path.to_path_buf())
        } else {
            FsError::from_io(path, e)
        };
        JsonError::Storage(err)
    })
}
