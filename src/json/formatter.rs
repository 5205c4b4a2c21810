//! Output formatting for JSON documents
//!
//! Wraps a `serde_json` formatter to optionally escape forward slashes and
//! non-ASCII characters, the way non-human output is written.

use serde_json::ser::Formatter;
use std::io::{self, Write};

/// Formatter that delegates layout to `inner` and controls string escaping.
#[derive(Debug, Clone)]
pub struct EscapingFormatter<F> {
    inner: F,
    escape_slashes: bool,
    escape_unicode: bool,
}

impl<F: Formatter> EscapingFormatter<F> {
    pub fn new(inner: F, escape_slashes: bool, escape_unicode: bool) -> Self {
        Self {
            inner,
            escape_slashes,
            escape_unicode,
        }
    }
}

impl<F: Formatter> Formatter for EscapingFormatter<F> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.escape_slashes && !self.escape_unicode {
            return writer.write_all(fragment.as_bytes());
        }

        let bytes = fragment.as_bytes();
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch == '/' && self.escape_slashes {
                writer.write_all(&bytes[start..i])?;
                writer.write_all(b"\\/")?;
                start = i + 1;
            } else if !ch.is_ascii() && self.escape_unicode {
                writer.write_all(&bytes[start..i])?;
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
                start = i + ch.len_utf8();
            }
        }
        writer.write_all(&bytes[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::Serializer;
    use serde_json::ser::{CompactFormatter, PrettyFormatter};

    fn render<T: Serialize, F: Formatter>(value: &T, formatter: F) -> String {
        let mut out = Vec::new();
        value
            .serialize(&mut Serializer::with_formatter(&mut out, formatter))
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_escapes_slashes_and_unicode() {
        let value = serde_json::json!({"url": "http://x/é", "emoji": "😀"});
        let out = render(&value, EscapingFormatter::new(CompactFormatter, true, true));
        assert_eq!(
            out,
            r#"{"url":"http:\/\/x\/\u00e9","emoji":"\ud83d\ude00"}"#
        );
    }

    #[test]
    fn test_passthrough_keeps_literals() {
        let value = serde_json::json!(["a/b", "ü"]);
        let out = render(&value, EscapingFormatter::new(CompactFormatter, false, false));
        assert_eq!(out, r#"["a/b","ü"]"#);
    }

    #[test]
    fn test_pretty_layout_is_delegated() {
        let value = serde_json::json!({"a": [1, 2], "b": {}});
        let out = render(
            &value,
            EscapingFormatter::new(PrettyFormatter::with_indent(b"    "), false, false),
        );
        assert_eq!(out, "{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": {}\n}");
    }

    #[test]
    fn test_standard_escapes_still_apply() {
        let value = serde_json::json!("quote\" tab\t/");
        let out = render(&value, EscapingFormatter::new(CompactFormatter, true, true));
        assert_eq!(out, r#""quote\" tab\t\/""#);
    }
}
