//! Batch accumulation of decoded records.
//!
//! Rows are appended to one column buffer per table. When any buffer reaches
//! the batch size the three buffers are drained together into an
//! [`SsimBatch`], so a batch is always a consistent slice of the input.

use crate::constants::LINE_NUMBER_COLUMN;
use crate::models::{CarrierRecord, ElementRecord, LegRecord};
use crate::parser::LegContext;
use crate::schema::{CarrierColumns, FlightColumns, SegmentColumns, align_to_schema, merged_schema};
use polars::prelude::*;
use tracing::debug;

/// Rows of all three tables flushed together
#[derive(Debug, Clone)]
pub struct SsimBatch {
    /// Zero-based position of this batch in the flush sequence
    pub index: usize,
    pub carriers: DataFrame,
    pub flights: DataFrame,
    pub segments: DataFrame,
}

impl SsimBatch {
    pub fn rows(&self) -> usize {
        self.carriers.height() + self.flights.height() + self.segments.height()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0
    }

    /// Single table over the merged schema, in source line order
    pub fn merged(&self) -> PolarsResult<DataFrame> {
        let schema = merged_schema();
        let mut merged = align_to_schema(&self.carriers, schema)?;
        merged.vstack_mut(&align_to_schema(&self.flights, schema)?)?;
        merged.vstack_mut(&align_to_schema(&self.segments, schema)?)?;
        merged.sort([LINE_NUMBER_COLUMN], SortMultipleOptions::default())
    }
}

/// Accumulates rows and cuts them into batches
#[derive(Debug)]
pub struct BatchBuilder {
    batch_size: usize,
    carriers: CarrierColumns,
    flights: FlightColumns,
    segments: SegmentColumns,
    flushed: usize,
}

impl BatchBuilder {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            carriers: CarrierColumns::default(),
            flights: FlightColumns::default(),
            segments: SegmentColumns::default(),
            flushed: 0,
        }
    }

    pub fn push_carrier(&mut self, record: &CarrierRecord, line_number: usize) {
        self.carriers.push(record, line_number);
    }

    pub fn push_leg(&mut self, record: &LegRecord, leg: &LegContext<'_>) {
        self.flights.push(record, leg);
    }

    pub fn push_segment(&mut self, record: &ElementRecord, owner: &LegContext<'_>, line_number: usize) {
        self.segments.push(record, owner, line_number);
    }

    /// Whether any table buffer has reached the batch size
    pub fn is_full(&self) -> bool {
        self.carriers.len() >= self.batch_size
            || self.flights.len() >= self.batch_size
            || self.segments.len() >= self.batch_size
    }

    pub fn pending_rows(&self) -> usize {
        self.carriers.len() + self.flights.len() + self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending_rows() == 0
    }

    pub fn batches_flushed(&self) -> usize {
        self.flushed
    }

    /// Drain all buffers into a batch; `None` when nothing is pending
    pub fn flush(&mut self) -> PolarsResult<Option<SsimBatch>> {
        if self.is_empty() {
            return Ok(None);
        }

        let batch = SsimBatch {
            index: self.flushed,
            carriers: self.carriers.take_frame()?,
            flights: self.flights.take_frame()?,
            segments: self.segments.take_frame()?,
        };
        self.flushed += 1;
        debug!(
            "Flushed batch {}: {} carriers, {} flights, {} segments",
            batch.index,
            batch.carriers.height(),
            batch.flights.height(),
            batch.segments.height()
        );
        Ok(Some(batch))
    }
}
