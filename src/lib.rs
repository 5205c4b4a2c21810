//! filekit - small filesystem and JSON file helpers
//!
//! Operations that can fail because of the environment (permissions, a
//! missing or uncreatable parent directory, a full disk, a malformed
//! document) return `Result`, and the error's `Display` is the failure
//! message. Contract violations by the caller panic.

pub mod config;
pub mod error;
pub mod inspect;
pub mod json;
pub mod storage;
pub mod temp;
pub mod utils;

pub use config::FilekitConfig;
pub use error::{CleanupError, FsError, JsonError, ParseError, ParseErrorKind};
pub use inspect::{count_lines, format_path_size, format_size, split_name};
pub use json::{JsonOptions, JsonShape, decode_file, decode_file_expecting, encode_file};
pub use storage::{Access, is_readable, is_writable, prepare, rename};
pub use temp::{TempGuard, TempRegistry};
