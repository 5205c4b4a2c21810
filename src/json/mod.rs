//! JSON file codec
//!
//! Encodes serializable values to JSON documents on disk and decodes them
//! back, reporting unreadable or malformed documents as errors.

pub mod codec;
pub mod finite;
pub mod formatter;
pub mod options;

pub use codec::{decode_file, decode_file_expecting, decode_file_into, encode_file, to_document};
pub use options::{JsonOptions, JsonShape};
