//! TIFF field type definitions.
//!
//! A field type determines how the value bytes of an IFD entry are laid out:
//! the width of each element and how it should be reinterpreted. The set
//! covers classic TIFF (types 1-13) and the BigTIFF additions (16-18).
//!
//! Tag *meanings* are deliberately absent here. Directory entries are keyed
//! by their raw 16-bit tag id and interpreted by callers.

use std::fmt;

use serde::Serialize;

// =============================================================================
// TIFF Field Types
// =============================================================================

/// TIFF field types that determine how values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator, denominator
    SRational = 10,

    /// IEEE single precision
    Float = 11,

    /// IEEE double precision
    Double = 12,

    /// 32-bit IFD offset
    Ifd = 13,

    /// Unsigned 64-bit integer (BigTIFF)
    Long8 = 16,

    /// Signed 64-bit integer (BigTIFF)
    SLong8 = 17,

    /// 64-bit IFD offset (BigTIFF)
    Ifd8 = 18,
}

impl FieldType {
    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values, which the directory decoder
    /// treats as corruption.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            13 => Some(FieldType::Ifd),
            16 => Some(FieldType::Long8),
            17 => Some(FieldType::SLong8),
            18 => Some(FieldType::Ifd8),
            _ => None,
        }
    }

    /// Get the numeric type id.
    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Width in bytes of one stored element.
    ///
    /// Rationals are stored as two 4-byte integers, so their element width
    /// is 4 and the stored element count is doubled (see
    /// [`storage_count`](Self::storage_count)).
    #[inline]
    pub const fn element_size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long
            | FieldType::SLong
            | FieldType::Float
            | FieldType::Ifd
            | FieldType::Rational
            | FieldType::SRational => 4,
            FieldType::Double | FieldType::Long8 | FieldType::SLong8 | FieldType::Ifd8 => 8,
        }
    }

    /// Number of stored elements for a declared value count.
    ///
    /// Returns `None` if doubling a rational count overflows.
    #[inline]
    pub fn storage_count(self, count: u64) -> Option<u64> {
        match self {
            FieldType::Rational | FieldType::SRational => count.checked_mul(2),
            _ => Some(count),
        }
    }

    /// Total byte length of a value with `count` elements.
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn byte_length(self, count: u64) -> Option<u64> {
        self.storage_count(count)?
            .checked_mul(self.element_size() as u64)
    }

    /// BYTE, SHORT, LONG, LONG8, IFD, IFD8
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            FieldType::Byte
                | FieldType::Short
                | FieldType::Long
                | FieldType::Long8
                | FieldType::Ifd
                | FieldType::Ifd8
        )
    }

    /// SBYTE, SSHORT, SLONG, SLONG8
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            FieldType::SByte | FieldType::SShort | FieldType::SLong | FieldType::SLong8
        )
    }

    /// FLOAT, DOUBLE, RATIONAL, SRATIONAL
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            FieldType::Float | FieldType::Double | FieldType::Rational | FieldType::SRational
        )
    }

    /// ASCII, UNDEFINED
    pub const fn is_buffer(self) -> bool {
        matches!(self, FieldType::Ascii | FieldType::Undefined)
    }

    /// Conventional upper-case TIFF name of the type.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Ifd => "IFD",
            FieldType::Long8 => "LONG8",
            FieldType::SLong8 => "SLONG8",
            FieldType::Ifd8 => "IFD8",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================
