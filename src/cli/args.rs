//! Command-line argument definitions for the SSIM processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::SsimConfig;
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the SSIM schedule converter
///
/// Converts IATA SSIM flight schedule files into carrier, flight and
/// segment tables written as CSV or Parquet.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ssim_processor",
    version,
    about = "Convert IATA SSIM flight schedules into CSV or Parquet tables",
    long_about = "Streams fixed-width SSIM schedule files of any size, attaches segment data \
                  elements to their flight legs, reconciles carrier trailers and writes the \
                  resulting carrier, flight and segment tables as CSV or partitioned Parquet."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors and critical messages. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Write all records as one flattened CSV file
    Csv(CsvArgs),
    /// Write one Parquet file per table into a directory
    Parquet(ParquetArgs),
    /// Parse and report table sizes and warnings without writing
    Inspect(InspectArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, clap::Args)]
pub struct ParseOptions {
    /// SSIM file to read
    #[arg(value_name = "SSIM_PATH")]
    pub input: PathBuf,

    /// Rows per table buffered before a flush (memory only, never results)
    #[arg(long = "batch-size", value_name = "ROWS")]
    pub batch_size: Option<usize>,

    /// Fail on missing trailers and trailer count mismatches
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct CsvArgs {
    #[command(flatten)]
    pub parse: ParseOptions,

    /// Output CSV file; parent directories are created
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct ParquetArgs {
    #[command(flatten)]
    pub parse: ParseOptions,

    /// Output directory for carriers, flights and segments files
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Compression codec
    #[arg(
        short = 'c',
        long = "compression",
        value_name = "CODEC",
        help = "snappy, gzip, lz4, lzo, zstd, brotli or uncompressed"
    )]
    pub compression: Option<String>,
}

#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    #[command(flatten)]
    pub parse: ParseOptions,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ParseOptions {
    /// Environment-layered defaults with these flags applied on top
    pub fn to_config(&self) -> Result<SsimConfig> {
        let mut config = SsimConfig::from_env()?;
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }
        if self.strict {
            config = config.with_strict(true);
        }
        config.validate()?;
        Ok(config)
    }
}
