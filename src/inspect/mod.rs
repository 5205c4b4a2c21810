//! Inspection helpers
//!
//! Size formatting, file name splitting and line counting.

pub mod lines;
pub mod name;
pub mod size;

pub use lines::count_lines;
pub use name::split_name;
pub use size::{MAX_PRECISION, format_path_size, format_size};
