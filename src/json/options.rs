//! Encoding options and decoded-shape expectations

use serde_json::Value;
use std::fmt;

use crate::config::FilekitConfig;

/// How a JSON document is written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Indent with four spaces and end with a newline
    pub pretty: bool,
    /// Write `/` as `\/`
    pub escape_slashes: bool,
    /// Write non-ASCII characters as `\uXXXX` escapes
    pub escape_unicode: bool,
    /// Mode for a newly created document
    pub file_mode: u32,
    /// Mode for directories created on the way to the document
    pub dir_mode: u32,
}

impl JsonOptions {
    /// Pretty-printed with literal slashes and non-ASCII characters.
    pub fn human() -> Self {
        Self {
            pretty: true,
            escape_slashes: false,
            escape_unicode: false,
            file_mode: 0o644,
            dir_mode: 0o755,
        }
    }

    /// Single line with escaped slashes and non-ASCII characters.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            escape_slashes: true,
            escape_unicode: true,
            ..Self::human()
        }
    }

    pub fn from_config(config: &FilekitConfig) -> Self {
        let base = if config.json.human {
            Self::human()
        } else {
            Self::compact()
        };
        Self {
            file_mode: config.permissions.file_mode,
            dir_mode: config.permissions.dir_mode,
            ..base
        }
    }
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self::human()
    }
}

/// Shape a decoded document is required to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Any,
    /// An object or an array
    Container,
    Object,
    Array,
}

impl JsonShape {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonShape::Any => true,
            JsonShape::Container => value.is_object() || value.is_array(),
            JsonShape::Object => value.is_object(),
            JsonShape::Array => value.is_array(),
        }
    }
}

impl fmt::Display for JsonShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonShape::Any => "value",
            JsonShape::Container => "object or array",
            JsonShape::Object => "object",
            JsonShape::Array => "array",
        };
        f.write_str(name)
    }
}

/// JSON type name of a decoded value
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
