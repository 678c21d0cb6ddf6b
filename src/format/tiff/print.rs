//! Diagnostic listing of a parsed TIFF.
//!
//! Everything here goes through the public accessors of [`TiffDump`]; it
//! has no privileged view of the file. Two renderings exist: a plain text
//! listing in the spirit of `tiffdump`, and a [`DumpReport`] that can be
//! serialized with serde.

use std::io::{self, Write};

use serde::Serialize;

use super::dump::TiffDump;
use super::tags::FieldType;

/// Default number of values printed per tag before truncating.
pub const DEFAULT_MAX_ITEMS: usize = 24;

/// Options for the text listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Only print this directory
    pub directory: Option<usize>,
    /// Values printed per tag before ` ...`; 0 prints everything
    pub max_items: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            directory: None,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

// =============================================================================
// Decoded values
// =============================================================================

/// The values of one tag, decoded through the typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum TagValues {
    Unsigned(Vec<u64>),
    /// IFD / IFD8 offsets
    Offsets(Vec<u64>),
    Signed(Vec<i64>),
    Float(Vec<f64>),
    Text { text: String, terminated: bool },
    Bytes(Vec<u8>),
    /// The accessor refused the value
    Unreadable(String),
}

impl TagValues {
    fn read(dump: &TiffDump, dir: usize, tag: u16, field_type: FieldType) -> Self {
        let result = match field_type {
            FieldType::Ifd | FieldType::Ifd8 => dump.get_uints(dir, tag).map(TagValues::Offsets),
            t if t.is_unsigned() => dump.get_uints(dir, tag).map(TagValues::Unsigned),
            t if t.is_signed() => dump.get_sints(dir, tag).map(TagValues::Signed),
            t if t.is_float() => dump.get_floats(dir, tag).map(TagValues::Float),
            FieldType::Ascii => dump.get_buffer(dir, tag).map(|buf| {
                let (text, terminated) = match buf.iter().position(|&b| b == 0) {
                    Some(end) => (&buf[..end], true),
                    None => (buf, false),
                };
                TagValues::Text {
                    text: String::from_utf8_lossy(text).into_owned(),
                    terminated,
                }
            }),
            _ => dump
                .get_buffer(dir, tag)
                .map(|buf| TagValues::Bytes(buf.to_vec())),
        };
        result.unwrap_or_else(|e| TagValues::Unreadable(e.to_string()))
    }

    fn write_text<W: Write>(&self, out: &mut W, max_items: usize) -> io::Result<()> {
        fn list<W: Write, T>(
            out: &mut W,
            values: &[T],
            max_items: usize,
            fmt: impl Fn(&mut W, &T) -> io::Result<()>,
        ) -> io::Result<()> {
            let shown = if max_items == 0 {
                values.len()
            } else {
                values.len().min(max_items)
            };
            for value in &values[..shown] {
                write!(out, " ")?;
                fmt(out, value)?;
            }
            if shown < values.len() {
                write!(out, " ...")?;
            }
            Ok(())
        }

        match self {
            TagValues::Unsigned(v) => list(out, v, max_items, |o, x| write!(o, "{x}")),
            TagValues::Offsets(v) => list(out, v, max_items, |o, x| write!(o, "{x:#018x}")),
            TagValues::Signed(v) => list(out, v, max_items, |o, x| write!(o, "{x}")),
            TagValues::Float(v) => list(out, v, max_items, |o, x| write!(o, "{x}")),
            TagValues::Bytes(v) => list(out, v, max_items, |o, x| write!(o, "{x}")),
            TagValues::Text { text, terminated } => {
                write!(out, " {text:?}")?;
                if !terminated {
                    write!(out, " [unterminated]")?;
                }
                Ok(())
            }
            TagValues::Unreadable(reason) => write!(out, " <{reason}>"),
        }
    }
}

// =============================================================================
// Report
// =============================================================================

/// Serializable description of a whole dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpReport {
    pub big_endian: bool,
    pub bigtiff: bool,
    pub directory_count: usize,
    pub directories: Vec<DirectoryReport>,
}

/// One directory of a [`DumpReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryReport {
    pub index: usize,
    pub offset: u64,
    pub next_offset: u64,
    pub entries: Vec<EntryReport>,
}

/// One tag of a [`DirectoryReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub tag: u16,
    pub field_type: FieldType,
    pub count: u64,
    #[serde(flatten)]
    pub values: TagValues,
}

impl DumpReport {
    /// Build a report for every directory, or only `directory` if given.
    ///
    /// An out-of-range `directory` produces an empty directory list.
    pub fn from_dump(dump: &TiffDump, directory: Option<usize>) -> Self {
        let directories = (0..dump.directory_count())
            .filter(|&i| directory.map_or(true, |d| d == i))
            .filter_map(|index| {
                let dir = dump.directory(index)?;
                let entries = dir
                    .tags()
                    .into_iter()
                    .filter_map(|tag| {
                        let item = dump.get_item(index, tag)?;
                        Some(EntryReport {
                            tag,
                            field_type: item.field_type(),
                            count: dump.get_value_count(index, tag),
                            values: TagValues::read(dump, index, tag, item.field_type()),
                        })
                    })
                    .collect();
                Some(DirectoryReport {
                    index,
                    offset: dir.offset(),
                    next_offset: dir.next_offset(),
                    entries,
                })
            })
            .collect();

        DumpReport {
            big_endian: dump.is_big_endian(),
            bigtiff: dump.is_bigtiff(),
            directory_count: dump.directory_count(),
            directories,
        }
    }
}

// =============================================================================
// Text listing
// =============================================================================

/// Write a human-readable listing of `dump` to `out`.
pub fn write_dump<W: Write>(dump: &TiffDump, out: &mut W, options: &DumpOptions) -> io::Result<()> {
    let report = DumpReport::from_dump(dump, options.directory);

    writeln!(
        out,
        "{}-endian {}, {} directories",
        if report.big_endian { "Big" } else { "Little" },
        if report.bigtiff { "BigTIFF" } else { "TIFF" },
        report.directory_count
    )?;

    for dir in &report.directories {
        writeln!(
            out,
            "Directory {}: offset {} ({:#x}) next {} ({:#x})",
            dir.index, dir.offset, dir.offset, dir.next_offset, dir.next_offset
        )?;
        for entry in &dir.entries {
            write!(
                out,
                " {} ({:#06x}) {} {}<",
                entry.tag, entry.tag, entry.field_type, entry.count
            )?;
            entry.values.write_text(out, options.max_items)?;
            writeln!(out, " >")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
