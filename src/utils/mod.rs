//! Utility functions
//!
//! Provides logging setup and argument validation.

pub mod logging;
pub mod validation;
