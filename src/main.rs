//! WSI TiffDump - print the directory chain of a TIFF or BigTIFF slide.
//!
//! Logs go to stderr; the listing goes to stdout.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wsi_tiffdump::{write_dump, BudgetedReader, Config, DumpReport, OutputFormat, TiffDump};

fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let dump = match parse(&config) {
        Ok(dump) => dump,
        Err(e) => {
            error!("{}: {}", config.path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = config.directory {
        if dir >= dump.directory_count() {
            error!(
                "Directory {} out of range: file has {} directories",
                dir,
                dump.directory_count()
            );
            return ExitCode::FAILURE;
        }
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = match config.format {
        OutputFormat::Text => write_dump(&dump, &mut out, &config.dump_options()),
        OutputFormat::Json => {
            let report = DumpReport::from_dump(&dump, config.directory);
            serde_json::to_writer_pretty(&mut out, &report)
                .map_err(io::Error::from)
                .and_then(|()| writeln!(out))
        }
    };

    match result.and_then(|()| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to write output: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Open the file, wrap it in a read budget if requested, and parse it.
fn parse(config: &Config) -> Result<TiffDump, Box<dyn std::error::Error>> {
    let file = File::open(&config.path)?;

    // The budget sits under the buffer so it counts bytes pulled from disk
    let dump = match config.max_read_bytes {
        Some(budget) => {
            debug!(budget, "limiting bytes read");
            TiffDump::from_reader(BufReader::new(BudgetedReader::new(file, budget)))?
        }
        None => TiffDump::from_reader(BufReader::new(file))?,
    };
    Ok(dump)
}

/// Initialize the logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "wsi_tiffdump=debug"
    } else {
        "wsi_tiffdump=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
