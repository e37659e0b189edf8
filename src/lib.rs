//! SSIM Processor Library
//!
//! A Rust library for converting IATA SSIM (Standard Schedule Information
//! Manual) flight schedule files into relational tables for analytics.
//!
//! This library provides tools for:
//! - Streaming fixed-width SSIM files of any size line by line
//! - Decoding header, carrier, flight leg, segment and trailer records
//! - Attaching segment data elements to the flight legs that own them
//! - Reconciling carrier trailers against the records actually read
//! - Producing Polars DataFrames, a flattened CSV file or one Parquet file per table
//!
//! Results never depend on the batch size; it only bounds memory.
//!
//! ```rust,no_run
//! use ssim_processor::{SsimConfig, ssim_to_dataframes};
//!
//! # fn main() -> ssim_processor::Result<()> {
//! let tables = ssim_to_dataframes("schedule.ssim", &SsimConfig::default())?;
//! println!("{} flights, {} segments", tables.flights.height(), tables.segments.height());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod processor;
pub mod scanner;
pub mod schema;
pub mod sinks;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{CompressionAlgorithm, SsimConfig};
pub use error::{Result, SsimError, StructuralWarning};
pub use models::{ParseSummary, RecordType};
pub use processor::pipeline::run_pipelined;
pub use processor::{ConversionReport, SsimReader};
pub use sinks::{BatchSink, CsvSink, ParquetSink, SinkReport, SsimTables, TableSink};

use polars::prelude::DataFrame;
use std::io::Read;
use std::path::Path;

/// Parse a file into one merged table with a `record_type` discriminant
pub fn ssim_to_dataframe(source: impl AsRef<Path>, config: &SsimConfig) -> Result<DataFrame> {
    let mut reader = SsimReader::open(source, config.clone())?;
    let mut sink = TableSink::merged();
    run_single(&mut reader, &mut sink)?;
    Ok(sink.into_merged())
}

/// Parse a file into separate carrier, flight and segment tables
pub fn ssim_to_dataframes(source: impl AsRef<Path>, config: &SsimConfig) -> Result<SsimTables> {
    let mut reader = SsimReader::open(source, config.clone())?;
    let mut sink = TableSink::split();
    run_single(&mut reader, &mut sink)?;
    Ok(sink.into_tables())
}

/// Parse any byte stream into separate tables
pub fn ssim_to_dataframes_from_reader<R: Read>(
    reader: R,
    config: &SsimConfig,
) -> Result<SsimTables> {
    let mut reader = SsimReader::from_reader(reader, "<stream>", config.clone())?;
    let mut sink = TableSink::split();
    run_single(&mut reader, &mut sink)?;
    Ok(sink.into_tables())
}

/// Parse a file and write one flattened CSV file
///
/// The source is opened before the output is created, so a missing source
/// leaves no file behind.
pub fn ssim_to_csv(
    source: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &SsimConfig,
) -> Result<ConversionReport> {
    let mut reader = SsimReader::open(source, config.clone())?;
    let mut sink = CsvSink::create(output_path)?;
    run_single(&mut reader, &mut sink)
}

/// Parse a file and write `carriers`, `flights` and `segments` Parquet files
/// into `output_dir`, compressed with `config.compression`
pub fn ssim_to_parquets(
    source: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &SsimConfig,
) -> Result<ConversionReport> {
    let mut reader = SsimReader::open(source, config.clone())?;
    let mut sink = ParquetSink::create(output_dir, config.compression)?;
    run_single(&mut reader, &mut sink)
}

fn run_single<R: std::io::BufRead>(
    reader: &mut SsimReader<R>,
    sink: &mut dyn BatchSink,
) -> Result<ConversionReport> {
    let mut sinks = [sink];
    reader.run(&mut sinks)
}
