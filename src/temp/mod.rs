//! Temp resource management
//!
//! [`TempRegistry`] is the explicit registry owned by the application; the
//! free functions here forward to a process-wide instance that is cleaned up
//! automatically when the process exits normally.

pub mod guard;
pub mod registry;

pub use guard::TempGuard;
pub use registry::TempRegistry;

use log::{error, warn};
use std::path::PathBuf;
use std::sync::{Once, OnceLock};

use crate::config::TempConfig;
use crate::error::{CleanupError, FsError};

static GLOBAL: OnceLock<TempRegistry> = OnceLock::new();
static EXIT_HOOK: Once = Once::new();

/// The process-wide registry.
pub fn global() -> &'static TempRegistry {
    GLOBAL.get_or_init(|| global_from(&TempConfig::default()))
}

/// Builds the process-wide registry from `config`.
///
/// Returns `false` if the registry was already in use, in which case its
/// settings are unchanged.
pub fn configure(config: &TempConfig) -> bool {
    GLOBAL.set(global_from(config)).is_ok()
}

fn global_from(config: &TempConfig) -> TempRegistry {
    TempRegistry::from_config(config).with_first_register_hook(install_exit_hook)
}

/// Creates a registered temp file in the process-wide registry.
pub fn file(prefix: &str, contents: Option<&[u8]>) -> Result<PathBuf, FsError> {
    global().file(prefix, contents)
}

/// Creates a registered temp directory in the process-wide registry.
pub fn dir(prefix: &str) -> Result<PathBuf, FsError> {
    global().dir(prefix)
}

/// Creates a registered temp file named with the configured prefix.
pub fn default_file(contents: Option<&[u8]>) -> Result<PathBuf, FsError> {
    global().default_file(contents)
}

/// Creates a registered temp directory named with the configured prefix.
pub fn default_dir() -> Result<PathBuf, FsError> {
    global().default_dir()
}

/// Registers `path` with the process-wide registry.
pub fn register_path(path: impl Into<PathBuf>, is_dir: Option<bool>) {
    global().register_path(path, is_dir)
}

/// Cleans up the process-wide registry now.
pub fn cleanup() -> Result<(), CleanupError> {
    global().cleanup()
}

fn install_exit_hook() {
    EXIT_HOOK.call_once(|| {
        // SAFETY: `run_exit_cleanup` is a plain `extern "C"` function with
        // static lifetime, which is all `atexit` requires.
        let rc = unsafe { libc::atexit(run_exit_cleanup) };
        if rc != 0 {
            warn!("Could not install temp cleanup exit hook");
        }
    });
}

extern "C" fn run_exit_cleanup() {
    // Unwinding across the FFI boundary would abort the process.
    let _ = std::panic::catch_unwind(|| {
        if let Some(registry) = GLOBAL.get() {
            if let Err(e) = registry.cleanup() {
                error!("{}", e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_registry_round_trip() {
        let path = file("filekit-global-", Some(b"x")).unwrap();
        let work = dir("filekit-global-").unwrap();
        assert!(path.exists() && work.is_dir());
        assert!(EXIT_HOOK.is_completed());

        cleanup().unwrap();
        assert!(!path.exists());
        assert!(!work.exists());
    }

    #[test]
    fn test_configure_after_first_use_is_refused() {
        let prefix = global().prefix().to_string();
        let config = TempConfig {
            prefix: "ignored-".to_string(),
            ..TempConfig::default()
        };
        assert!(!configure(&config));
        assert_eq!(global().prefix(), prefix);

        let path = default_file(None).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(prefix.as_str())
        );
    }
}
