//! Scoped temp resources
//!
//! A [`TempGuard`] removes its file or directory when it goes out of scope,
//! including early returns and unwinding.

use log::{debug, warn};
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::temp::registry::remove_path;

/// Owns a temp file or directory until dropped or kept.
#[derive(Debug)]
pub struct TempGuard {
    path: PathBuf,
    is_dir: bool,
    armed: bool,
}

impl TempGuard {
    pub(crate) fn new(path: PathBuf, is_dir: bool) -> Self {
        Self {
            path,
            is_dir,
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Disarms the guard and hands back the path; nothing is removed.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Deref for TempGuard {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempGuard {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match remove_path(&self.path, self.is_dir) {
            Ok(()) => debug!("Released temp path {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to release temp path {}: {}", self.path.display(), e),
        }
    }
}
