//! Output sinks for flushed batches.
//!
//! Every sink receives the same batches in flush order. A sink that fails or
//! is aborted removes whatever partial output it created.
//!
//! - [`table`] - In-memory Polars tables, merged or split
//! - [`csv`] - One flattened CSV file
//! - [`parquet`] - One Parquet file per table with a chosen codec

pub mod csv;
pub mod parquet;
pub mod table;

pub use self::csv::CsvSink;
pub use self::parquet::ParquetSink;
pub use self::table::{SsimTables, TableLayout, TableSink};

use crate::error::Result;
use crate::processor::batch::SsimBatch;
use std::path::PathBuf;
use tracing::warn;

/// What a sink produced once finished
#[derive(Debug, Clone, Default)]
pub struct SinkReport {
    pub sink: &'static str,
    pub rows_written: usize,
    pub files: Vec<PathBuf>,
}

/// Consumer of flushed batches
pub trait BatchSink {
    fn name(&self) -> &'static str;

    fn write_batch(&mut self, batch: &SsimBatch) -> Result<()>;

    /// Flush and close outputs after the last batch
    fn finish(&mut self) -> Result<SinkReport>;

    /// Discard partial output after a failure
    fn abort(&mut self) {}
}

/// Hand a batch to every sink in order, stopping at the first failure
pub fn broadcast(sinks: &mut [&mut dyn BatchSink], batch: &SsimBatch) -> Result<()> {
    for sink in sinks.iter_mut() {
        sink.write_batch(batch)?;
    }
    Ok(())
}

pub fn abort_all(sinks: &mut [&mut dyn BatchSink]) {
    for sink in sinks.iter_mut() {
        warn!("Aborting {} sink, partial output removed", sink.name());
        sink.abort();
    }
}
