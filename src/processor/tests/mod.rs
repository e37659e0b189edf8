//! Tests for the processor module
//!
//! Drives whole generated SSIM files through the reader and checks table
//! cardinalities, batch-size independence and error propagation.

pub mod batch_invariance;
pub mod error_handling;

use crate::config::SsimConfig;
use crate::processor::{ConversionReport, SsimReader};
use crate::sinks::{BatchSink, SsimTables, TableSink};
use std::io::Cursor;

/// Parse in-memory content into split tables
pub fn parse_tables(content: &str, config: SsimConfig) -> crate::Result<(ConversionReport, SsimTables)> {
    let mut reader = SsimReader::from_reader(Cursor::new(content.to_string()), "fixture", config)?;
    let mut sink = TableSink::split();
    let mut sinks: [&mut dyn BatchSink; 1] = [&mut sink];
    let report = reader.run(&mut sinks)?;
    Ok((report, sink.into_tables()))
}
