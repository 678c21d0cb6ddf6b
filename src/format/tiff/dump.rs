//! The parsed directory chain of one TIFF file.
//!
//! A [`TiffDump`] is built by a single parse call and never changes
//! afterwards, so it can be shared across threads and queried concurrently
//! without locking. Construction either decodes the entire chain or fails;
//! there is no partially populated dump.
//!
//! # Example
//!
//! ```rust,no_run
//! use wsi_tiffdump::TiffDump;
//!
//! let dump = TiffDump::open("slide.svs")?;
//! for dir in 0..dump.directory_count() {
//!     if let Ok(width) = dump.get_uint(dir, 256, 0) {
//!         println!("directory {dir}: width {width}");
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::error::{AccessError, IoError, TiffError};
use crate::io::TiffSource;

use super::chain::walk_chain;
use super::directory::Directory;
use super::parser::{ByteOrder, TiffHeader};
use super::values::{Item, ValueError};

/// Immutable handle over every directory of a TIFF or BigTIFF file.
#[derive(Debug, Clone, PartialEq)]
pub struct TiffDump {
    header: TiffHeader,
    directories: Vec<Directory>,
}

impl TiffDump {
    /// Parse the file at `path`.
    ///
    /// # Errors
    /// `FormatNotSupported` if the file is not TIFF, and also if it cannot
    /// be opened: no header could be read, so the file was never recognized.
    /// The source is then [`IoError::Open`] carrying the OS error.
    /// `BadData` if its directory chain is corrupt.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TiffError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TiffError::FormatNotSupported {
            reason: "File could not be opened".to_string(),
            source: Some(IoError::Open {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse from any seekable reader.
    ///
    /// The reader is consumed; pass `&mut reader` to keep using it after.
    /// The cursor position on return is unspecified.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self, TiffError> {
        let mut source = TiffSource::new(reader)
            .map_err(TiffError::unsupported_io("Cannot determine stream length"))?;

        let result = TiffHeader::read(&mut source).and_then(|header| {
            let directories = walk_chain(&mut source, &header)?;
            Ok(TiffDump {
                header,
                directories,
            })
        });

        match &result {
            Ok(dump) => debug!(directories = dump.directory_count(), "parsed TIFF"),
            Err(e) => debug!(error = %e, "TIFF parse aborted"),
        }
        result
    }

    /// Whether multi-byte values in the file are big-endian.
    #[inline]
    pub fn is_big_endian(&self) -> bool {
        self.header.byte_order == ByteOrder::BigEndian
    }

    /// Whether the file is BigTIFF (64-bit offsets).
    #[inline]
    pub fn is_bigtiff(&self) -> bool {
        self.header.is_bigtiff
    }

    /// Number of directories in the chain.
    #[inline]
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Directory by index, in chain order.
    #[inline]
    pub fn directory(&self, dir: usize) -> Option<&Directory> {
        self.directories.get(dir)
    }

    /// Iterate over all directories in chain order.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.directories.iter()
    }

    /// Entry for `tag` in directory `dir`, if present.
    #[inline]
    pub fn get_item(&self, dir: usize, tag: u16) -> Option<&Item> {
        self.directories.get(dir)?.get(tag)
    }

    /// Declared value count of a tag, or 0 if it is absent. Never fails.
    pub fn get_value_count(&self, dir: usize, tag: u16) -> u64 {
        self.get_item(dir, tag).map_or(0, Item::count)
    }

    fn checked_item(&self, dir: usize, tag: u16) -> Result<&Item, AccessError> {
        self.get_item(dir, tag)
            .ok_or(AccessError::NoSuchValue { dir, tag })
    }

    /// Unsigned value `index` of a BYTE, SHORT, LONG, LONG8, IFD or IFD8 tag.
    pub fn get_uint(&self, dir: usize, tag: u16, index: u64) -> Result<u64, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.uint(index).map_err(|e| access_error(e, dir, tag))
    }

    /// Signed value `index` of an SBYTE, SSHORT, SLONG or SLONG8 tag.
    pub fn get_sint(&self, dir: usize, tag: u16, index: u64) -> Result<i64, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.sint(index).map_err(|e| access_error(e, dir, tag))
    }

    /// Value `index` of a FLOAT, DOUBLE, RATIONAL or SRATIONAL tag as `f64`.
    ///
    /// A rational with a zero denominator divides anyway and produces
    /// infinity or NaN.
    pub fn get_float(&self, dir: usize, tag: u16, index: u64) -> Result<f64, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.float(index).map_err(|e| access_error(e, dir, tag))
    }

    /// Raw bytes of an ASCII or UNDEFINED tag.
    pub fn get_buffer(&self, dir: usize, tag: u16) -> Result<&[u8], AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.buffer().map_err(|e| access_error(e, dir, tag))
    }

    /// All unsigned values of a tag.
    pub fn get_uints(&self, dir: usize, tag: u16) -> Result<Vec<u64>, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.uints().map_err(|e| access_error(e, dir, tag))
    }

    /// All signed values of a tag.
    pub fn get_sints(&self, dir: usize, tag: u16) -> Result<Vec<i64>, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.sints().map_err(|e| access_error(e, dir, tag))
    }

    /// All floating-point values of a tag.
    pub fn get_floats(&self, dir: usize, tag: u16) -> Result<Vec<f64>, AccessError> {
        let item = self.checked_item(dir, tag)?;
        item.floats().map_err(|e| access_error(e, dir, tag))
    }
}

fn access_error(err: ValueError, dir: usize, tag: u16) -> AccessError {
    match err {
        ValueError::UnexpectedType(field_type) => AccessError::UnexpectedType {
            dir,
            tag,
            field_type,
        },
        ValueError::IndexOutOfRange { index, count } => AccessError::IndexOutOfRange {
            dir,
            tag,
            index,
            count,
        },
    }
}

// =============================================================================
// Tests
// =============================================================================
