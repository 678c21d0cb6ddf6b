//! TIFF tag value storage.
//!
//! An [`Item`] owns one decoded entry: its declared type, its declared count
//! and the value bytes, already converted to host byte order. Typed access
//! reinterprets those bytes according to the stored type only.
//!
//! Values are resolved eagerly while a directory is decoded. Small values
//! live inline in the entry's value/offset field, larger ones are fetched
//! from the offset stored there. Both paths go through [`read_value`] and
//! produce identical items.

use std::io::{Read, Seek};

use bytes::Bytes;

use crate::error::TiffError;
use crate::io::TiffSource;

use super::parser::{decode_host_uint, TiffHeader};
use super::tags::FieldType;

// =============================================================================
// Item
// =============================================================================

/// One decoded tag entry.
///
/// `value.len() == field_type.byte_length(count)` always holds; rationals
/// store two 4-byte integers per value.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    field_type: FieldType,
    count: u64,
    value: Bytes,
}

/// Why a typed read of an [`Item`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueError {
    /// The stored type is not in the requested family
    UnexpectedType(FieldType),
    /// Element index is outside `[0, count)`
    IndexOutOfRange { index: u64, count: u64 },
}

impl Item {
    /// Build an item from host-order value bytes.
    pub(crate) fn new(field_type: FieldType, count: u64, value: Bytes) -> Self {
        debug_assert_eq!(
            field_type.byte_length(count),
            Some(value.len() as u64),
            "value length does not match {field_type} x {count}"
        );
        Self {
            field_type,
            count,
            value,
        }
    }

    /// Declared field type.
    #[inline]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Declared value count (rationals count once per fraction).
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Value bytes in host byte order.
    #[inline]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.value
    }

    fn check_index(&self, index: u64) -> Result<usize, ValueError> {
        if index >= self.count {
            return Err(ValueError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        // count fits in memory, so index does too
        Ok(index as usize)
    }

    /// Host-order bytes of stored element `i` (not rational-aware).
    fn element(&self, i: usize) -> &[u8] {
        let width = self.field_type.element_size();
        &self.value[i * width..(i + 1) * width]
    }

    /// Read an unsigned value (BYTE, SHORT, LONG, LONG8, IFD, IFD8).
    pub fn uint(&self, index: u64) -> Result<u64, ValueError> {
        if !self.field_type.is_unsigned() {
            return Err(ValueError::UnexpectedType(self.field_type));
        }
        let i = self.check_index(index)?;
        Ok(decode_host_uint(self.element(i)))
    }

    /// Read a signed value (SBYTE, SSHORT, SLONG, SLONG8).
    pub fn sint(&self, index: u64) -> Result<i64, ValueError> {
        if !self.field_type.is_signed() {
            return Err(ValueError::UnexpectedType(self.field_type));
        }
        let i = self.check_index(index)?;
        let bits = decode_host_uint(self.element(i));
        Ok(sign_extend(bits, self.field_type.element_size()))
    }

    /// Read a floating-point value (FLOAT, DOUBLE, RATIONAL, SRATIONAL).
    ///
    /// Rationals are `numerator / denominator` in `f64`. A zero denominator
    /// is not special-cased and yields infinity or NaN.
    pub fn float(&self, index: u64) -> Result<f64, ValueError> {
        if !self.field_type.is_float() {
            return Err(ValueError::UnexpectedType(self.field_type));
        }
        let i = self.check_index(index)?;
        let value = match self.field_type {
            FieldType::Float => {
                f32::from_bits(decode_host_uint(self.element(i)) as u32) as f64
            }
            FieldType::Double => f64::from_bits(decode_host_uint(self.element(i))),
            FieldType::Rational => {
                let numerator = decode_host_uint(self.element(2 * i)) as u32;
                let denominator = decode_host_uint(self.element(2 * i + 1)) as u32;
                numerator as f64 / denominator as f64
            }
            FieldType::SRational => {
                let numerator = decode_host_uint(self.element(2 * i)) as u32 as i32;
                let denominator = decode_host_uint(self.element(2 * i + 1)) as u32 as i32;
                numerator as f64 / denominator as f64
            }
            _ => unreachable!("checked float family"),
        };
        Ok(value)
    }

    /// Borrow the raw bytes of an ASCII or UNDEFINED value.
    ///
    /// ASCII values are returned as stored, including any NUL terminator.
    pub fn buffer(&self) -> Result<&[u8], ValueError> {
        if !self.field_type.is_buffer() {
            return Err(ValueError::UnexpectedType(self.field_type));
        }
        Ok(&self.value)
    }

    /// All unsigned values.
    pub fn uints(&self) -> Result<Vec<u64>, ValueError> {
        (0..self.count).map(|i| self.uint(i)).collect()
    }

    /// All signed values.
    pub fn sints(&self) -> Result<Vec<i64>, ValueError> {
        (0..self.count).map(|i| self.sint(i)).collect()
    }

    /// All floating-point values.
    pub fn floats(&self) -> Result<Vec<f64>, ValueError> {
        (0..self.count).map(|i| self.float(i)).collect()
    }
}

fn sign_extend(bits: u64, width: usize) -> i64 {
    match width {
        1 => bits as u8 as i8 as i64,
        2 => bits as u16 as i16 as i64,
        4 => bits as u32 as i32 as i64,
        _ => bits as i64,
    }
}

// =============================================================================
// Value decoding
// =============================================================================

/// Decode the value of one entry from its value/offset field.
///
/// If the value fits in the field it is taken from there, otherwise the
/// field holds a file offset and the value is read from the source with the
/// cursor restored afterwards. The bytes are converted to host order per
/// element width before being returned.
///
/// # Errors
/// `BadData` if the byte length overflows, is zero, or the out-of-line
/// read fails or runs past the end of the stream.
pub(crate) fn read_value<R: Read + Seek>(
    source: &mut TiffSource<R>,
    header: &TiffHeader,
    tag: u16,
    field_type: FieldType,
    count: u64,
    value_field: &[u8],
) -> Result<(Bytes, bool), TiffError> {
    let byte_length = field_type
        .byte_length(count)
        .filter(|&len| len <= isize::MAX as u64)
        .ok_or_else(|| TiffError::bad_data(format!("Value count too large for tag {tag}")))?;
    if byte_length == 0 {
        return Err(TiffError::bad_data(format!("Invalid count 0 for tag {tag}")));
    }

    let inline = byte_length <= value_field.len() as u64;
    let mut buf = if inline {
        value_field[..byte_length as usize].to_vec()
    } else {
        let offset = header.byte_order.read_uint(value_field);
        source
            .read_at(offset, byte_length)
            .map_err(TiffError::bad_data_io(format!(
                "Couldn't read value of tag {tag} at offset {offset}"
            )))?
    };

    header
        .byte_order
        .normalize(&mut buf, field_type.element_size());
    Ok((Bytes::from(buf), inline))
}

// =============================================================================
// Tests
// =============================================================================
