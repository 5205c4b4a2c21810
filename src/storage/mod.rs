//! File system storage management
//!
//! Handles permission testing, destination preparation and file moves.

pub mod filesystem;
pub mod operations;
pub mod permissions;

pub use filesystem::{create_directory, set_mode};
pub use operations::{prepare, rename};
pub use permissions::{Access, is_executable, is_readable, is_writable, test};
