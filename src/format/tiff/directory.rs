//! Image File Directory decoding.
//!
//! # IFD layout
//! ```text
//! Classic TIFF:  count (2) | entries (12 each) | next IFD offset (4)
//! BigTIFF:       count (8) | entries (20 each) | next IFD offset (8)
//!
//! Entry:         tag (2) | type (2) | count (4/8) | value or offset (4/8)
//! ```
//!
//! Entries are read strictly sequentially. Out-of-line values are fetched
//! with the cursor saved and restored around the read.

use std::collections::HashMap;
use std::io::{Read, Seek};

use tracing::trace;

use crate::error::{IoError, TiffError};
use crate::io::TiffSource;

use super::parser::TiffHeader;
use super::tags::FieldType;
use super::values::{read_value, Item};

/// Upper bound on the value/offset field width (BigTIFF).
const MAX_VALUE_FIELD: usize = 8;

/// A decoded Image File Directory: tag id to [`Item`].
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    offset: u64,
    next_offset: u64,
    items: HashMap<u16, Item>,
}

impl Directory {
    /// File offset this directory was read from.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of the next directory as recorded in the file (0 = last).
    #[inline]
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Number of distinct tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an entry by tag id.
    #[inline]
    pub fn get(&self, tag: u16) -> Option<&Item> {
        self.items.get(&tag)
    }

    /// Tag ids in ascending order.
    pub fn tags(&self) -> Vec<u16> {
        let mut tags: Vec<u16> = self.items.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Decode the directory at `offset`.
    ///
    /// Leaves the cursor just past the next-IFD field. Duplicate tags keep
    /// the last entry.
    ///
    /// # Errors
    /// `BadData` on a failed seek or short read, an unknown field type, or
    /// any value that cannot be decoded.
    pub(crate) fn read<R: Read + Seek>(
        source: &mut TiffSource<R>,
        header: &TiffHeader,
        offset: u64,
    ) -> Result<Self, TiffError> {
        let byte_order = header.byte_order;
        let offset_size = header.offset_size();

        source
            .seek_to(offset)
            .map_err(TiffError::bad_data_io(format!(
                "Cannot seek to directory at offset {offset}"
            )))?;

        let entry_count = source
            .read_uint(header.ifd_count_size(), byte_order)
            .map_err(TiffError::bad_data_io("Cannot read directory entry count"))?;

        let mut items = HashMap::new();
        let mut value_field = [0u8; MAX_VALUE_FIELD];

        for _ in 0..entry_count {
            let (tag, field_type_raw, count) = read_entry_header(source, header)
                .map_err(TiffError::bad_data_io("Cannot read tag, type, and count"))?;

            let field_type = FieldType::from_u16(field_type_raw).ok_or_else(|| {
                TiffError::bad_data(format!(
                    "Unknown type encountered: {field_type_raw} (tag {tag})"
                ))
            })?;

            let field = &mut value_field[..header.value_offset_size()];
            source
                .read_into(field)
                .map_err(TiffError::bad_data_io("Cannot read value/offset"))?;

            let (value, inline) = read_value(source, header, tag, field_type, count, field)?;
            trace!(tag, %field_type, count, inline, "decoded entry");

            items.insert(tag, Item::new(field_type, count, value));
        }

        let next_offset = source
            .read_uint(offset_size, byte_order)
            .map_err(TiffError::bad_data_io("Cannot read next directory offset"))?;

        Ok(Directory {
            offset,
            next_offset,
            items,
        })
    }
}

/// Read the tag, type and count fields of one entry.
fn read_entry_header<R: Read + Seek>(
    source: &mut TiffSource<R>,
    header: &TiffHeader,
) -> Result<(u16, u16, u64), IoError> {
    let tag = source.read_uint(2, header.byte_order)? as u16;
    let field_type = source.read_uint(2, header.byte_order)? as u16;
    let count = source.read_uint(header.offset_size(), header.byte_order)?;
    Ok((tag, field_type, count))
}

// =============================================================================
// Tests
// =============================================================================
