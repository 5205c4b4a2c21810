//! Error handling
//!
//! Environment failures are returned as these error values; contract
//! violations panic at the call site instead.

pub mod handlers;
pub mod types;

pub use types::*;
