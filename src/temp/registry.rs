//! Module `registry`
//!
//! Tracks temporary files and directories so they can be removed together.
//! Entries are only ever added; `cleanup` drains the whole registry at once.

use log::{debug, info, warn};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::TempConfig;
use crate::error::{CleanupError, FsError};
use crate::temp::guard::TempGuard;
use crate::utils::validation::require_valid_prefix;

const SUFFIX_LEN: usize = 6;

/// A registered temp path and whether it is a directory, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TempEntry {
    path: PathBuf,
    is_dir: Option<bool>,
}

/// Registry of temp resources, removed by [`TempRegistry::cleanup`] or when
/// the registry is dropped.
#[derive(Debug)]
pub struct TempRegistry {
    base_dir: PathBuf,
    prefix: String,
    max_attempts: usize,
    dir_mode: u32,
    entries: Mutex<Vec<TempEntry>>,
    on_first_register: Option<fn()>,
}

impl TempRegistry {
    /// Creates an empty registry that makes resources in `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let defaults = TempConfig::default();
        Self {
            base_dir: base_dir.into(),
            prefix: defaults.prefix,
            max_attempts: defaults.max_attempts,
            dir_mode: defaults.dir_mode,
            entries: Mutex::new(Vec::new()),
            on_first_register: None,
        }
    }

    pub fn from_config(config: &TempConfig) -> Self {
        Self {
            base_dir: config.base_dir_path(),
            prefix: config.prefix.clone(),
            max_attempts: config.max_attempts,
            dir_mode: config.dir_mode,
            entries: Mutex::new(Vec::new()),
            on_first_register: None,
        }
    }

    /// Runs `hook` whenever a path is registered into an empty registry.
    pub(crate) fn with_first_register_hook(mut self, hook: fn()) -> Self {
        self.on_first_register = Some(hook);
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Prefix used by [`TempRegistry::default_file`] and
    /// [`TempRegistry::default_dir`].
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of registered paths not yet cleaned up.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Creates a uniquely named file, optionally filled with `contents`,
    /// and registers it.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is empty or contains a path separator.
    pub fn file(&self, prefix: &str, contents: Option<&[u8]>) -> Result<PathBuf, FsError> {
        let path = self.create_file(prefix, contents)?;
        self.register_path(&path, Some(false));
        Ok(path)
    }

    /// Creates a uniquely named directory and registers it.
    ///
    /// # Panics
    ///
    /// Panics if `prefix` is empty or contains a path separator.
    pub fn dir(&self, prefix: &str) -> Result<PathBuf, FsError> {
        let path = self.create_dir(prefix)?;
        self.register_path(&path, Some(true));
        Ok(path)
    }

    /// Like [`TempRegistry::file`], named with the configured prefix.
    pub fn default_file(&self, contents: Option<&[u8]>) -> Result<PathBuf, FsError> {
        self.file(&self.prefix, contents)
    }

    /// Like [`TempRegistry::dir`], named with the configured prefix.
    pub fn default_dir(&self) -> Result<PathBuf, FsError> {
        self.dir(&self.prefix)
    }

    /// Creates a temp file owned by the returned guard instead of the
    /// registry; it is removed when the guard drops.
    pub fn scoped_file(&self, prefix: &str, contents: Option<&[u8]>) -> Result<TempGuard, FsError> {
        self.create_file(prefix, contents)
            .map(|path| TempGuard::new(path, false))
    }

    /// Creates a temp directory owned by the returned guard instead of the
    /// registry; it is removed when the guard drops.
    pub fn scoped_dir(&self, prefix: &str) -> Result<TempGuard, FsError> {
        self.create_dir(prefix).map(|path| TempGuard::new(path, true))
    }

    /// Registers `path` for removal. `is_dir` of `None` defers the
    /// file/directory decision to cleanup time.
    pub fn register_path(&self, path: impl Into<PathBuf>, is_dir: Option<bool>) {
        let path = path.into();
        let first = {
            let mut entries = self.lock();
            let first = entries.is_empty();
            debug!("Registered temp path {}", path.display());
            entries.push(TempEntry { path, is_dir });
            first
        };
        if first {
            if let Some(hook) = self.on_first_register {
                hook();
            }
        }
    }

    /// Removes every registered path, newest first.
    ///
    /// Every entry is attempted even after a failure; the error lists each
    /// path that could not be removed. Paths already gone count as removed.
    /// Calling it again with nothing registered succeeds.
    pub fn cleanup(&self) -> Result<(), CleanupError> {
        let entries = std::mem::take(&mut *self.lock());
        if entries.is_empty() {
            return Ok(());
        }

        let total = entries.len();
        let mut failures = Vec::new();
        for entry in entries.into_iter().rev() {
            let is_dir = entry.is_dir.unwrap_or_else(|| entry.path.is_dir());
            match remove_path(&entry.path, is_dir) {
                Ok(()) => debug!("Removed temp path {}", entry.path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Temp path {} was already gone", entry.path.display());
                }
                Err(e) => {
                    warn!("Failed to remove temp path {}: {}", entry.path.display(), e);
                    failures.push((entry.path, e));
                }
            }
        }

        info!(
            "Temp cleanup removed {} of {} path(s)",
            total - failures.len(),
            total
        );
        if failures.is_empty() {
            Ok(())
        } else {
            Err(CleanupError { failures })
        }
    }

    fn create_file(&self, prefix: &str, contents: Option<&[u8]>) -> Result<PathBuf, FsError> {
        require_valid_prefix(prefix);

        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .rand_bytes(SUFFIX_LEN)
            .tempfile_in(&self.base_dir)
            .map_err(|e| FsError::from_io(&self.base_dir, e))?;

        if let Some(data) = contents {
            let mut file = temp.as_file();
            file.write_all(data)
                .map_err(|e| FsError::from_io(temp.path(), e))?;
        }

        let (_, path) = temp
            .keep()
            .map_err(|e| FsError::from_io(&self.base_dir, e.error))?;
        debug!("Created temp file {}", path.display());
        Ok(path)
    }

    fn create_dir(&self, prefix: &str) -> Result<PathBuf, FsError> {
        require_valid_prefix(prefix);

        for _ in 0..self.max_attempts {
            let path = self.base_dir.join(format!("{prefix}{}", random_suffix()));
            match make_dir(&path, self.dir_mode) {
                Ok(()) => {
                    debug!("Created temp directory {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(FsError::from_io(&path, e)),
            }
        }

        Err(FsError::TempNamesExhausted {
            prefix: prefix.to_string(),
            attempts: self.max_attempts,
        })
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TempEntry>> {
        // A panic mid-push cannot leave the vector inconsistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TempRegistry {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!("{}", e);
        }
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect()
}

#[cfg(unix)]
fn make_dir(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(mode).create(path)
}

#[cfg(not(unix))]
fn make_dir(path: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir(path)
}

pub(crate) fn remove_path(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
