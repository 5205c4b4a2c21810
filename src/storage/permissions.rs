//! File permissions
//!
//! Permission testing against the calling process's effective access rights.

use std::ops::{BitOr, BitOrAssign};
use std::path::Path;

/// Bitmask of access rights to test a path for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Access(u8);

impl Access {
    pub const READABLE: Access = Access(0b001);
    pub const WRITABLE: Access = Access(0b010);
    pub const EXECUTABLE: Access = Access(0b100);

    /// Returns true if every flag in `other` is set in `self`.
    pub fn contains(self, other: Access) -> bool {
        self.0 & other.0 == other.0
    }

    #[cfg(unix)]
    fn to_mode(self) -> libc::c_int {
        // An empty mask tests existence only.
        let mut mode = libc::F_OK;
        if self.contains(Access::READABLE) {
            mode |= libc::R_OK;
        }
        if self.contains(Access::WRITABLE) {
            mode |= libc::W_OK;
        }
        if self.contains(Access::EXECUTABLE) {
            mode |= libc::X_OK;
        }
        mode
    }
}

impl BitOr for Access {
    type Output = Access;

    fn bitor(self, rhs: Access) -> Access {
        Access(self.0 | rhs.0)
    }
}

impl BitOrAssign for Access {
    fn bitor_assign(&mut self, rhs: Access) {
        self.0 |= rhs.0;
    }
}

/// Test whether `path` exists and grants every right in `access`.
#[cfg(unix)]
pub fn test(path: &Path, access: Access) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the whole call.
    unsafe { libc::access(c_path.as_ptr(), access.to_mode()) == 0 }
}

/// Test whether `path` exists and grants every right in `access`.
#[cfg(not(unix))]
pub fn test(path: &Path, access: Access) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    !(access.contains(Access::WRITABLE) && metadata.permissions().readonly())
}

/// Check if a path is readable
pub fn is_readable(path: &Path) -> bool {
    test(path, Access::READABLE)
}

/// Check if a path is executable (or searchable, for directories)
pub fn is_executable(path: &Path) -> bool {
    test(path, Access::EXECUTABLE)
}

/// Check if a path is writable.
///
/// A path that does not exist yet is writable when its nearest existing
/// ancestor is a writable directory.
pub fn is_writable(path: &Path) -> bool {
    if path.symlink_metadata().is_ok() {
        return test(path, Access::WRITABLE);
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            if parent.exists() {
                parent.is_dir() && test(parent, Access::WRITABLE)
            } else {
                is_writable(parent)
            }
        }
        // A relative path with no parent component lives in the working directory.
        Some(_) => test(Path::new("."), Access::WRITABLE),
        None => false,
    }
}
