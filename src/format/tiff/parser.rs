//! Header decoding and byte order conversion.
//!
//! The header fixes the byte order and the field widths used for the rest
//! of the walk.
//!
//! ```text
//! offset  classic TIFF            BigTIFF
//! 0       "II" or "MM"            "II" or "MM"
//! 2       42                      43
//! 4       first IFD (u32)         offset width, always 8 (u16)
//! 6                               padding, always 0 (u16)
//! 8                               first IFD (u64)
//! ```

use std::io::{Read, Seek};

use tracing::debug;

use crate::error::TiffError;
use crate::io::TiffSource;

// =============================================================================
// Constants
// =============================================================================

/// `II`: multi-byte fields are little-endian
const BYTE_ORDER_LITTLE_ENDIAN: [u8; 2] = *b"II";

/// `MM`: multi-byte fields are big-endian
const BYTE_ORDER_BIG_ENDIAN: [u8; 2] = *b"MM";

/// Classic TIFF, 32-bit offsets
const VERSION_TIFF: u16 = 42;

/// BigTIFF, 64-bit offsets
const VERSION_BIGTIFF: u16 = 43;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order declared in the first two bytes of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// `II`
    LittleEndian,
    /// `MM`
    BigEndian,
}

impl ByteOrder {
    /// Byte order of the machine we are running on.
    #[inline]
    pub const fn host() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    /// Convert a buffer of `width`-byte unsigned integers between this byte
    /// order and host order, in place.
    ///
    /// `width` must be 1, 2, 4 or 8 and divide the buffer length. Width 1 is
    /// a no-op. The conversion is an involution, so each buffer must be
    /// normalized exactly once.
    pub fn normalize(self, buf: &mut [u8], width: usize) {
        debug_assert!(matches!(width, 1 | 2 | 4 | 8), "bad element width {width}");
        debug_assert_eq!(buf.len() % width, 0);

        if width == 1 || self == Self::host() {
            return;
        }
        for element in buf.chunks_exact_mut(width) {
            element.reverse();
        }
    }

    /// Decode one unsigned integer of 1, 2, 4 or 8 bytes stored in this
    /// byte order.
    pub fn read_uint(self, bytes: &[u8]) -> u64 {
        let mut buf = [0u8; 8];
        let field = &mut buf[..bytes.len()];
        field.copy_from_slice(bytes);
        self.normalize(field, bytes.len());
        decode_host_uint(field)
    }
}

/// Reinterpret 1, 2, 4 or 8 host-order bytes as an unsigned integer.
pub(crate) fn decode_host_uint(bytes: &[u8]) -> u64 {
    match *bytes {
        [a] => a as u64,
        [a, b] => u16::from_ne_bytes([a, b]) as u64,
        [a, b, c, d] => u32::from_ne_bytes([a, b, c, d]) as u64,
        [a, b, c, d, e, f, g, h] => u64::from_ne_bytes([a, b, c, d, e, f, g, h]),
        _ => unreachable!("unsupported integer width {}", bytes.len()),
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Decoded file header: everything needed to start the directory walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Applies to every multi-byte field after the magic
    pub byte_order: ByteOrder,

    /// Version 43: 8-byte offsets and counts
    pub is_bigtiff: bool,

    /// Offset to the first IFD in the file (0 means no directories)
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Read and validate the header at the start of the source.
    ///
    /// Seeks to offset 0 first, wherever the cursor was.
    ///
    /// # Errors
    /// Every failure, including a short read, is `FormatNotSupported`:
    /// - magic is not `II` or `MM`
    /// - version is not 42 or 43
    /// - BigTIFF offset size is not 8, or the pad field is not 0
    pub fn read<R: Read + Seek>(source: &mut TiffSource<R>) -> Result<Self, TiffError> {
        source
            .seek_to(0)
            .map_err(TiffError::unsupported_io("Can't seek to TIFF header"))?;

        let magic: [u8; 2] = source
            .read_array()
            .map_err(TiffError::unsupported_io("Can't read TIFF magic number"))?;
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => {
                return Err(TiffError::unsupported(format!(
                    "Unrecognized TIFF magic number 0x{:02X}{:02X}",
                    magic[0], magic[1]
                )))
            }
        };

        let version = source
            .read_uint(2, byte_order)
            .map_err(TiffError::unsupported_io("Can't read TIFF version"))?
            as u16;

        let is_bigtiff = match version {
            VERSION_TIFF => false,
            VERSION_BIGTIFF => {
                let offset_size = source
                    .read_uint(2, byte_order)
                    .map_err(TiffError::unsupported_io("Can't read BigTIFF offset size"))?;
                let pad = source
                    .read_uint(2, byte_order)
                    .map_err(TiffError::unsupported_io("Can't read BigTIFF header padding"))?;
                if offset_size != 8 || pad != 0 {
                    return Err(TiffError::unsupported(format!(
                        "Unexpected value in BigTIFF header: offset size {offset_size}, pad {pad}"
                    )));
                }
                true
            }
            _ => {
                return Err(TiffError::unsupported(format!(
                    "Unrecognized TIFF version {version}"
                )))
            }
        };

        let header = TiffHeader {
            byte_order,
            is_bigtiff,
            first_ifd_offset: 0,
        };
        let first_ifd_offset = source
            .read_uint(header.offset_size(), byte_order)
            .map_err(TiffError::unsupported_io("Can't read first directory offset"))?;

        let header = TiffHeader {
            first_ifd_offset,
            ..header
        };
        debug!(
            byte_order = ?header.byte_order,
            bigtiff = header.is_bigtiff,
            first_ifd_offset,
            "parsed TIFF header"
        );
        Ok(header)
    }

    /// Width of file offsets and of the next-IFD field.
    ///
    /// Classic TIFF: 4 bytes, BigTIFF: 8 bytes
    #[inline]
    pub const fn offset_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            4
        }
    }

    /// Width of the entry count that opens each directory.
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            2
        }
    }

    /// Size of the value/offset field in an IFD entry, which is also the
    /// inline value threshold.
    #[inline]
    pub const fn value_offset_size(&self) -> usize {
        self.offset_size()
    }
}

// =============================================================================
// Tests
// =============================================================================
