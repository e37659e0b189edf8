//! In-memory table sink.

use super::{BatchSink, SinkReport};
use crate::error::Result;
use crate::processor::batch::SsimBatch;
use crate::schema::{CarrierColumns, FlightColumns, SegmentColumns, merged_schema};
use polars::prelude::*;

/// The three relational tables of a parse
#[derive(Debug, Clone)]
pub struct SsimTables {
    pub carriers: DataFrame,
    pub flights: DataFrame,
    pub segments: DataFrame,
}

impl SsimTables {
    pub fn empty() -> Self {
        Self {
            carriers: DataFrame::empty_with_schema(&CarrierColumns::schema()),
            flights: DataFrame::empty_with_schema(&FlightColumns::schema()),
            segments: DataFrame::empty_with_schema(&SegmentColumns::schema()),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.carriers.height() + self.flights.height() + self.segments.height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// One table with a `record_type` discriminant
    Merged,
    /// Separate carrier, flight and segment tables
    Split,
}

/// Appends every batch to tables held in memory
#[derive(Debug)]
pub struct TableSink {
    layout: TableLayout,
    tables: SsimTables,
    merged: DataFrame,
    rows: usize,
}

impl TableSink {
    pub fn new(layout: TableLayout) -> Self {
        Self {
            layout,
            tables: SsimTables::empty(),
            merged: DataFrame::empty_with_schema(merged_schema()),
            rows: 0,
        }
    }

    pub fn merged() -> Self {
        Self::new(TableLayout::Merged)
    }

    pub fn split() -> Self {
        Self::new(TableLayout::Split)
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn into_tables(self) -> SsimTables {
        self.tables
    }

    pub fn into_merged(self) -> DataFrame {
        self.merged
    }
}

impl BatchSink for TableSink {
    fn name(&self) -> &'static str {
        "table"
    }

    fn write_batch(&mut self, batch: &SsimBatch) -> Result<()> {
        match self.layout {
            TableLayout::Merged => {
                self.merged.vstack_mut(&batch.merged()?)?;
            }
            TableLayout::Split => {
                self.tables.carriers.vstack_mut(&batch.carriers)?;
                self.tables.flights.vstack_mut(&batch.flights)?;
                self.tables.segments.vstack_mut(&batch.segments)?;
            }
        }
        self.rows += batch.rows();
        Ok(())
    }

    fn finish(&mut self) -> Result<SinkReport> {
        match self.layout {
            TableLayout::Merged => {
                self.merged.as_single_chunk_par();
            }
            TableLayout::Split => {
                self.tables.carriers.as_single_chunk_par();
                self.tables.flights.as_single_chunk_par();
                self.tables.segments.as_single_chunk_par();
            }
        }
        Ok(SinkReport {
            sink: self.name(),
            rows_written: self.rows,
            files: Vec::new(),
        })
    }

    fn abort(&mut self) {
        self.tables = SsimTables::empty();
        self.merged = DataFrame::empty_with_schema(merged_schema());
        self.rows = 0;
    }
}
