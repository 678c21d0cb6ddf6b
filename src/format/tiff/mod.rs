//! TIFF/BigTIFF directory-chain parsing for Whole Slide Images.
//!
//! Most slide formats are TIFF dialects with vendor tags and private
//! directories. This module walks the IFD chain generically and exposes
//! typed, bounds-checked values without assuming any vendor profile.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian, MM = big-endian)
//!   in the header. Every multi-byte field is converted to host order exactly once.
//!
//! - **Classic TIFF vs BigTIFF**: Classic TIFF uses 32-bit offsets (max 4GB files),
//!   while BigTIFF uses 64-bit offsets. The parser handles both transparently.
//!
//! - **IFD (Image File Directory)**: A block of tagged entries plus a link to the
//!   next IFD. The chain is followed until a zero link; revisiting an offset is an error.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD entry,
//!   larger values are stored at an offset pointed to by the entry. Callers never see
//!   the difference.

mod chain;
mod directory;
mod dump;
mod parser;
mod print;
mod tags;
mod values;

pub use directory::Directory;
pub use dump::TiffDump;
pub use parser::{ByteOrder, TiffHeader};
pub use print::{
    write_dump, DirectoryReport, DumpOptions, DumpReport, EntryReport, TagValues,
    DEFAULT_MAX_ITEMS,
};
pub use tags::FieldType;
pub use values::{Item, ValueError};
