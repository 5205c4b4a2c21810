//! Error types
//!
//! Defines the failure values returned by filesystem and JSON operations.
//! Each `Display` impl yields the human-readable failure message.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem module errors
#[derive(Debug)]
pub enum FsError {
    NotFound(PathBuf),
    NotReadable(PathBuf),
    NotWritable(PathBuf),
    NotADirectory(PathBuf),
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    QuotaExceeded(PathBuf),
    TempNamesExhausted { prefix: String, attempts: usize },
    Io { path: PathBuf, source: io::Error },
}

impl FsError {
    /// Classifies an I/O error raised while operating on `path`.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        let path = path.to_path_buf();
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::NotADirectory => FsError::NotADirectory(path),
            io::ErrorKind::StorageFull | io::ErrorKind::QuotaExceeded => {
                FsError::QuotaExceeded(path)
            }
            _ => FsError::Io {
                path,
                source: error,
            },
        }
    }

    /// The path the failure refers to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::NotFound(p)
            | FsError::NotReadable(p)
            | FsError::NotWritable(p)
            | FsError::NotADirectory(p)
            | FsError::QuotaExceeded(p) => Some(p),
            FsError::DirectoryCreationFailed { path, .. } | FsError::Io { path, .. } => Some(path),
            FsError::TempNamesExhausted { .. } => None,
        }
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsError::NotFound(p) => write!(f, "{} does not exist", p.display()),
            FsError::NotReadable(p) => write!(f, "{} is not readable", p.display()),
            FsError::NotWritable(p) => write!(f, "{} is not writable", p.display()),
            FsError::NotADirectory(p) => write!(f, "{} is not a directory", p.display()),
            FsError::DirectoryCreationFailed { path, source } => {
                write!(f, "Could not create directory {}: {}", path.display(), source)
            }
            FsError::QuotaExceeded(p) => {
                write!(f, "Disk quota exceeded while writing {}", p.display())
            }
            FsError::TempNamesExhausted { prefix, attempts } => write!(
                f,
                "No unused temporary name for prefix \"{}\" after {} attempts",
                prefix, attempts
            ),
            FsError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::DirectoryCreationFailed { source, .. } | FsError::Io { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Category of a JSON parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Syntax,
    UnexpectedEof,
    DepthExceeded,
    Data,
}

/// Parse failure carried by [`JsonError::Parse`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
    pub detail: String,
}

impl ParseError {
    /// Short human string for the failure, in the style of a JSON
    /// decoder's last-error message.
    pub fn message(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::Syntax | ParseErrorKind::UnexpectedEof => "Syntax error",
            ParseErrorKind::DepthExceeded => "Maximum stack depth exceeded",
            ParseErrorKind::Data => "Type mismatch",
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(error: serde_json::Error) -> Self {
        let detail = error.to_string();
        let kind = match error.classify() {
            serde_json::error::Category::Eof => ParseErrorKind::UnexpectedEof,
            serde_json::error::Category::Data => ParseErrorKind::Data,
            _ if detail.contains("recursion limit exceeded") => ParseErrorKind::DepthExceeded,
            _ => ParseErrorKind::Syntax,
        };
        ParseError {
            kind,
            line: error.line(),
            column: error.column(),
            detail,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message(),
            self.line,
            self.column
        )
    }
}

/// JSON module errors
#[derive(Debug)]
pub enum JsonError {
    Storage(FsError),
    Parse { path: PathBuf, error: ParseError },
    Encode(String),
}

impl JsonError {
    /// The parse failure, if this error came from decoding.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            JsonError::Parse { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonError::Storage(e) => write!(f, "{}", e),
            JsonError::Parse { path, error } => {
                write!(f, "\"{}\" does not contain valid JSON: {}", path.display(), error)
            }
            JsonError::Encode(msg) => write!(f, "Could not encode value as JSON: {}", msg),
        }
    }
}

impl std::error::Error for JsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JsonError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FsError> for JsonError {
    fn from(error: FsError) -> Self {
        JsonError::Storage(error)
    }
}

/// Aggregate failure of a temp cleanup pass
#[derive(Debug, Default)]
pub struct CleanupError {
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl fmt::Display for CleanupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to remove {} temporary path(s)", self.failures.len())?;
        for (path, e) in &self.failures {
            write!(f, "; {}: {}", path.display(), e)?;
        }
        Ok(())
    }
}

impl std::error::Error for CleanupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_classifies_kinds() {
        let path = Path::new("/tmp/x");
        let err = FsError::from_io(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, FsError::NotFound(_)));

        let err = FsError::from_io(path, io::Error::from(io::ErrorKind::StorageFull));
        assert!(matches!(err, FsError::QuotaExceeded(_)));
        assert_eq!(err.to_string(), "Disk quota exceeded while writing /tmp/x");

        let err = FsError::from_io(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, FsError::Io { .. }));
        assert_eq!(err.path(), Some(path));
    }

    #[test]
    fn test_parse_error_messages() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let parsed = ParseError::from(err);
        assert_eq!(parsed.kind, ParseErrorKind::UnexpectedEof);
        assert_eq!(parsed.message(), "Syntax error");

        let err = serde_json::from_str::<serde_json::Value>("{]").unwrap_err();
        assert_eq!(ParseError::from(err).kind, ParseErrorKind::Syntax);

        let deep = "[".repeat(200);
        let err = serde_json::from_str::<serde_json::Value>(&deep).unwrap_err();
        assert_eq!(
            ParseError::from(err).message(),
            "Maximum stack depth exceeded"
        );

        let err = serde_json::from_str::<u32>("\"text\"").unwrap_err();
        assert_eq!(ParseError::from(err).message(), "Type mismatch");
    }

    #[test]
    fn test_cleanup_error_lists_failures() {
        let err = CleanupError {
            failures: vec![(
                PathBuf::from("/tmp/a"),
                io::Error::from(io::ErrorKind::PermissionDenied),
            )],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to remove 1 temporary path(s)"));
        assert!(msg.contains("/tmp/a"));
    }
}
