//! Error types for reading pages and writing tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the extraction core.
///
/// A page that simply doesn't contain the expected markup is not an error:
/// extraction returns an empty or partially filled result instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize records for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid fingerprint for {field}: {reason}")]
    InvalidFingerprint { field: &'static str, reason: String },

    #[error("Invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// Returns true for failures on the input side.
    #[cfg(test)]
    pub(crate) fn is_read_error(&self) -> bool {
        matches!(self, Error::Read { .. } | Error::Decode { .. })
    }

    /// Returns true for failures on the output side.
    #[cfg(test)]
    pub(crate) fn is_write_error(&self) -> bool {
        matches!(self, Error::Write { .. } | Error::Io { .. } | Error::Serialize { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let err = Error::Read {
            path: PathBuf::from("/tmp/missing.html"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read"));
        assert!(msg.contains("/tmp/missing.html"));
        assert!(err.is_read_error());
        assert!(!err.is_write_error());
    }

    #[test]
    fn test_decode_error_is_read_error() {
        let bytes = [0xff, 0xfe, 0x00];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let err = Error::Decode { path: PathBuf::from("page.html"), source };
        assert!(err.is_read_error());
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_write_error_classification() {
        let err = Error::Io {
            path: PathBuf::from("/readonly/out.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_write_error());
        assert!(!err.is_read_error());
    }

    #[test]
    fn test_invalid_fingerprint_display() {
        let err = Error::InvalidFingerprint { field: "title", reason: "empty tag".to_string() };
        assert_eq!(err.to_string(), "Invalid fingerprint for title: empty tag");
    }
}
