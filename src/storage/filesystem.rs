//! File system operations
//!
//! Thin wrappers that create directories and apply permission bits.

use log::debug;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::FsError;

/// Create a directory and any missing parents, applying `mode` to each
/// directory created.
pub fn create_directory(path: &Path, mode: u32) -> Result<(), FsError> {
    build_dirs(path, mode).map_err(|e| FsError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Created directory {} (mode {:o})", path.display(), mode);
    Ok(())
}

#[cfg(unix)]
fn build_dirs(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn build_dirs(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Apply permission bits to an existing path.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> Result<(), FsError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| FsError::from_io(path, e))
}

/// Apply permission bits to an existing path.
#[cfg(not(unix))]
pub fn set_mode(path: &Path, _mode: u32) -> Result<(), FsError> {
    path.metadata()
        .map(|_| ())
        .map_err(|e| FsError::from_io(path, e))
}

/// Permission bits of an existing path, if it can be stat'ed.
#[cfg(unix)]
pub fn mode_of(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().ok().map(|m| m.permissions().mode() & 0o7777)
}

/// Permission bits of an existing path, if it can be stat'ed.
#[cfg(not(unix))]
pub fn mode_of(_path: &Path) -> Option<u32> {
    None
}
