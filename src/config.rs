//! Configuration for the `wsi-tiffdump` binary.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks using the `TIFFDUMP_` prefix:
//!
//! - `TIFFDUMP_FORMAT` - Output format, `text` or `json` (default: text)
//! - `TIFFDUMP_MAX_ITEMS` - Values printed per tag in text output (default: 24)
//! - `TIFFDUMP_MAX_READ_BYTES` - Abort parsing after reading this many bytes

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::format::tiff::{DumpOptions, DEFAULT_MAX_ITEMS};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Output style of the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// tiffdump-style text listing
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// WSI TiffDump - list the directory chain of a TIFF or BigTIFF slide.
///
/// Walks every Image File Directory of the file and prints each tag with its
/// type, count and decoded values. Corrupt chains are reported, never
/// partially printed.
#[derive(Parser, Debug, Clone)]
#[command(name = "wsi-tiffdump")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Slide or TIFF file to inspect.
    pub path: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "TIFFDUMP_FORMAT")]
    pub format: OutputFormat,

    /// Only print this directory (0-based).
    #[arg(short, long)]
    pub directory: Option<usize>,

    /// Values printed per tag in text output; 0 prints everything.
    #[arg(long, default_value_t = DEFAULT_MAX_ITEMS, env = "TIFFDUMP_MAX_ITEMS")]
    pub max_items: usize,

    /// Fail once this many bytes have been read from the file.
    ///
    /// Bounds the work a hostile file can cause. Unlimited by default.
    #[arg(long, env = "TIFFDUMP_MAX_READ_BYTES")]
    pub max_read_bytes: Option<u64>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("A file path is required".to_string());
        }

        if self.max_read_bytes == Some(0) {
            return Err("max_read_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Options for the text listing.
    pub fn dump_options(&self) -> DumpOptions {
        DumpOptions {
            directory: self.directory,
            max_items: self.max_items,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
