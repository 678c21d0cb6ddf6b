//! # WSI TiffDump
//!
//! Safe, vendor-neutral introspection of TIFF and BigTIFF directory chains.
//!
//! Whole Slide Image scanners write multi-gigapixel pyramids into TIFF
//! dialects with proprietary tags and private directories. Before any
//! vendor logic can run, the tag structure has to be parsed generically and
//! defensively. This crate does exactly that: it walks the IFD chain,
//! decodes every entry in either byte order, rejects directory cycles and
//! truncated data, and exposes typed accessors keyed by directory index and
//! tag id.
//!
//! ## Architecture
//!
//! - [`io`] - byte source wrapper and read budget
//! - [`mod@format`] - header, directory, chain and value decoding
//! - [`config`] - CLI configuration for the `wsi-tiffdump` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use wsi_tiffdump::TiffDump;
//!
//! let dump = TiffDump::open("CMU-1.svs")?;
//! println!("{} directories", dump.directory_count());
//!
//! // ImageDescription of the first directory
//! if let Ok(description) = dump.get_buffer(0, 270) {
//!     println!("{}", String::from_utf8_lossy(description));
//! }
//! # Ok::<(), wsi_tiffdump::TiffError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{AccessError, IoError, TiffError};
pub use format::tiff::{
    write_dump, ByteOrder, Directory, DirectoryReport, DumpOptions, DumpReport, EntryReport,
    FieldType, Item, TagValues, TiffDump, TiffHeader, ValueError, DEFAULT_MAX_ITEMS,
};
pub use io::{BudgetedReader, TiffSource};
