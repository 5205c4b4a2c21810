//! Storage operations
//!
//! Destination preparation and permission-aware file moves.

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::FsError;
use crate::error::handlers::log_failure;
use crate::storage::filesystem::{create_directory, set_mode};
use crate::storage::permissions::{Access, is_writable, test};

/// Makes sure `path` can be written.
///
/// An existing path is only tested for writability. Otherwise the parent
/// directory chain is created with `dir_mode` and the parent must end up a
/// writable directory.
pub fn prepare(path: &Path, dir_mode: u32) -> Result<(), FsError> {
    if path.symlink_metadata().is_ok() {
        return if is_writable(path) {
            Ok(())
        } else {
            Err(FsError::NotWritable(path.to_path_buf()))
        };
    }

    // A bare relative name lives in the working directory.
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        Some(_) => Path::new("."),
        None => return Ok(()),
    };

    if !parent.exists() {
        create_directory(parent, dir_mode)?;
    } else if !parent.is_dir() {
        return Err(FsError::NotADirectory(parent.to_path_buf()));
    }

    if !test(parent, Access::WRITABLE) {
        return Err(FsError::NotWritable(parent.to_path_buf()));
    }

    debug!("Prepared destination {}", path.display());
    Ok(())
}

/// Moves `from` to `to`.
///
/// Steps run in order and the first failure is returned: `from` must be
/// readable and writable, the destination is prepared with `dir_mode`, the
/// file is moved, then `file_mode` is applied when given.
pub fn rename(
    from: &Path,
    to: &Path,
    file_mode: Option<u32>,
    dir_mode: u32,
) -> Result<(), FsError> {
    log_failure("rename", rename_steps(from, to, file_mode, dir_mode))
}

fn rename_steps(
    from: &Path,
    to: &Path,
    file_mode: Option<u32>,
    dir_mode: u32,
) -> Result<(), FsError> {
    if from.symlink_metadata().is_err() {
        return Err(FsError::NotFound(from.to_path_buf()));
    }
    if !test(from, Access::READABLE) {
        return Err(FsError::NotReadable(from.to_path_buf()));
    }
    if !test(from, Access::WRITABLE) {
        return Err(FsError::NotWritable(from.to_path_buf()));
    }

    prepare(to, dir_mode)?;
    move_file(from, to)?;

    if let Some(mode) = file_mode {
        set_mode(to, mode)?;
    }

    info!("Renamed {} to {}", from.display(), to.display());
    Ok(())
}

fn move_file(from: &Path, to: &Path) -> Result<(), FsError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!(
                "{} and {} are on different filesystems, copying instead",
                from.display(),
                to.display()
            );
            fs::copy(from, to).map_err(|e| FsError::from_io(to, e))?;
            fs::remove_file(from).map_err(|e| FsError::from_io(from, e))
        }
        Err(e) => Err(FsError::from_io(to, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_parent_chain() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x/y/z/out.json");

        prepare(&target, 0o755).unwrap();
        assert!(target.parent().unwrap().is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn test_prepare_existing_file_only_tests_writability() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exists.txt");
        fs::write(&target, b"data").unwrap();

        prepare(&target, 0o755).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"data");
    }

    #[test]
    fn test_prepare_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();

        let err = prepare(&file.join("out.json"), 0o755).unwrap_err();
        assert!(matches!(err, FsError::NotADirectory(_)));

        let err = prepare(&file.join("deeper/out.json"), 0o755).unwrap_err();
        assert!(matches!(err, FsError::DirectoryCreationFailed { .. }));
    }

    #[test]
    fn test_prepare_bare_name_checks_working_directory() {
        let target = Path::new("filekit-prepare-bare-name.json");

        assert_eq!(
            prepare(target, 0o755).is_ok(),
            test(Path::new("."), Access::WRITABLE)
        );
        assert!(!target.exists());
    }

    #[test]
    fn test_rename_moves_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("source.txt");
        let to = dir.path().join("dest/inner/target.txt");
        fs::write(&from, b"payload").unwrap();

        rename(&from, &to, Some(0o600), 0o755).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
        #[cfg(unix)]
        assert_eq!(crate::storage::filesystem::mode_of(&to), Some(0o600));
    }

    #[test]
    fn test_rename_missing_source_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        let to = dir.path().join("never/created.txt");

        let err = rename(&dir.path().join("ghost"), &to, None, 0o755).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
        // Destination preparation never ran.
        assert!(!dir.path().join("never").exists());
    }

    #[test]
    fn test_rename_unpreparable_destination_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("source.txt");
        let blocker = dir.path().join("blocker");
        fs::write(&from, b"payload").unwrap();
        fs::write(&blocker, b"").unwrap();

        let err = rename(&from, &blocker.join("sub/target.txt"), None, 0o755).unwrap_err();
        assert!(matches!(err, FsError::DirectoryCreationFailed { .. }));
        assert!(from.exists());
    }

    #[cfg(unix)]
    fn running_as_root() -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_unreadable_source_short_circuits() {
        if running_as_root() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("locked.txt");
        let to = dir.path().join("dest/locked.txt");
        fs::write(&from, b"secret").unwrap();
        set_mode(&from, 0o000).unwrap();

        let err = rename(&from, &to, None, 0o755).unwrap_err();
        assert!(matches!(err, FsError::NotReadable(_)));
        assert!(!dir.path().join("dest").exists());

        set_mode(&from, 0o600).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_read_only_source_short_circuits() {
        if running_as_root() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("readonly.txt");
        let to = dir.path().join("dest/readonly.txt");
        fs::write(&from, b"data").unwrap();
        set_mode(&from, 0o400).unwrap();

        let err = rename(&from, &to, None, 0o755).unwrap_err();
        assert!(matches!(err, FsError::NotWritable(_)));
        assert!(from.exists());
        assert!(!dir.path().join("dest").exists());
    }
}
