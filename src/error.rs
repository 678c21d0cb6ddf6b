use thiserror::Error;

use crate::format::tiff::FieldType;

/// I/O errors raised by the byte source while walking a TIFF file.
///
/// Short reads are reported separately from hard I/O failures so callers
/// that care can tell a truncated file from a broken device.
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The stream ended before the requested bytes could be read
    #[error("Unexpected end of stream: requested {requested} bytes at offset {offset}")]
    UnexpectedEof { offset: u64, requested: u64 },

    /// Seeking to an absolute position failed
    #[error("Seek to offset {offset} failed: {message}")]
    Seek { offset: u64, message: String },

    /// Reading failed for a reason other than end of stream
    #[error("Read at offset {offset} failed: {message}")]
    Read { offset: u64, message: String },

    /// The file could not be opened at all
    #[error("Cannot open {path}: {message}")]
    Open { path: String, message: String },
}

impl IoError {
    /// Whether this error is a short read rather than a hard failure.
    pub fn is_eof(&self) -> bool {
        matches!(self, IoError::UnexpectedEof { .. })
    }
}

/// Errors that abort construction of a [`TiffDump`](crate::TiffDump).
///
/// There are only two kinds. Any failure discards everything decoded so far.
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// The stream is not classic TIFF or BigTIFF at all (raised by header parsing only)
    #[error("Format not supported: {reason}")]
    FormatNotSupported {
        reason: String,
        #[source]
        source: Option<IoError>,
    },

    /// The stream looks like TIFF but the directory chain is structurally invalid
    #[error("Bad data: {reason}")]
    BadData {
        reason: String,
        #[source]
        source: Option<IoError>,
    },
}

impl TiffError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        TiffError::FormatNotSupported {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn bad_data(reason: impl Into<String>) -> Self {
        TiffError::BadData {
            reason: reason.into(),
            source: None,
        }
    }

    /// Build a closure mapping an I/O error to `FormatNotSupported`.
    pub(crate) fn unsupported_io(reason: &'static str) -> impl FnOnce(IoError) -> Self {
        move |source| TiffError::FormatNotSupported {
            reason: reason.to_string(),
            source: Some(source),
        }
    }

    /// Build a closure mapping an I/O error to `BadData`.
    pub(crate) fn bad_data_io(reason: impl Into<String>) -> impl FnOnce(IoError) -> Self {
        let reason = reason.into();
        move |source| TiffError::BadData {
            reason,
            source: Some(source),
        }
    }

    /// The underlying I/O error, if the failure came from the byte source.
    pub fn io_error(&self) -> Option<&IoError> {
        match self {
            TiffError::FormatNotSupported { source, .. } | TiffError::BadData { source, .. } => {
                source.as_ref()
            }
        }
    }

    pub fn is_format_not_supported(&self) -> bool {
        matches!(self, TiffError::FormatNotSupported { .. })
    }

    pub fn is_bad_data(&self) -> bool {
        matches!(self, TiffError::BadData { .. })
    }
}

/// Failure of a single typed-accessor call.
///
/// These are local: the dump stays usable for every other query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The directory or the tag does not exist
    #[error("No such value: directory {dir}, tag {tag}")]
    NoSuchValue { dir: usize, tag: u16 },

    /// The stored type does not belong to the requested family
    #[error("Unexpected value type: directory {dir}, tag {tag}, type {field_type}")]
    UnexpectedType {
        dir: usize,
        tag: u16,
        field_type: FieldType,
    },

    /// Element index is outside `[0, count)`
    #[error("Index {index} out of range for directory {dir}, tag {tag} (count {count})")]
    IndexOutOfRange {
        dir: usize,
        tag: u16,
        index: u64,
        count: u64,
    },
}
