//! Partitioned Parquet sink: one file per table.
//!
//! Each table gets its own batched Polars writer, so every flush becomes a
//! row group and memory stays bounded by the batch size.

use super::{BatchSink, SinkReport};
use crate::config::CompressionAlgorithm;
use crate::constants::tables;
use crate::error::{Result, SsimError};
use crate::processor::batch::SsimBatch;
use crate::schema::{CarrierColumns, FlightColumns, SegmentColumns};
use polars::io::parquet::write::BatchedWriter;
use polars::prelude::{DataFrame, ParquetWriter as PolarsParquetWriter, Schema, StatisticsOptions};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

struct TableWriter {
    table: &'static str,
    path: PathBuf,
    writer: Option<BatchedWriter<File>>,
    rows: usize,
}

impl std::fmt::Debug for TableWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWriter")
            .field("table", &self.table)
            .field("path", &self.path)
            .field("open", &self.writer.is_some())
            .field("rows", &self.rows)
            .finish()
    }
}

impl TableWriter {
    fn create(
        output_dir: &Path,
        table: &'static str,
        schema: &Schema,
        compression: CompressionAlgorithm,
    ) -> Result<Self> {
        let path = output_dir.join(compression.output_file_name(table));
        let file = File::create(&path).map_err(|e| {
            SsimError::sink("parquet", format!("cannot create {}", path.display()), e)
        })?;
        let writer = PolarsParquetWriter::new(file)
            .with_compression(compression.to_polars_compression())
            .with_statistics(StatisticsOptions::full())
            .batched(schema)?;
        debug!("Opened {} writer at {}", table, path.display());

        Ok(Self {
            table,
            path,
            writer: Some(writer),
            rows: 0,
        })
    }

    fn write(&mut self, frame: &DataFrame) -> Result<()> {
        if frame.height() == 0 {
            return Ok(());
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(SsimError::sink(
                "parquet",
                format!("{} is already closed", self.path.display()),
                std::io::Error::other("write after finish"),
            ));
        };
        writer.write_batch(frame)?;
        self.rows += frame.height();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.finish()?;
        }
        Ok(())
    }

    fn discard(&mut self) {
        self.writer = None;
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove {}: {}", self.path.display(), e);
        }
    }
}

/// Writes carriers, flights and segments into a target directory
#[derive(Debug)]
pub struct ParquetSink {
    output_dir: PathBuf,
    compression: CompressionAlgorithm,
    carriers: TableWriter,
    flights: TableWriter,
    segments: TableWriter,
}

impl ParquetSink {
    /// Create the output directory and open one writer per table
    pub fn create(output_dir: impl AsRef<Path>, compression: CompressionAlgorithm) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if output_dir.extension().is_some() && !output_dir.is_dir() {
            return Err(SsimError::configuration(format!(
                "Parquet output must be a directory, got {}",
                output_dir.display()
            )));
        }
        fs::create_dir_all(&output_dir).map_err(|e| {
            SsimError::sink(
                "parquet",
                format!("cannot create directory {}", output_dir.display()),
                e,
            )
        })?;
        if compression.falls_back_to_uncompressed() {
            warn!(
                "Polars cannot encode {} pages; writing uncompressed pages",
                compression
            );
        }

        let mut opened: Vec<TableWriter> = Vec::with_capacity(tables::ALL.len());
        for (table, schema) in [
            (tables::CARRIERS, CarrierColumns::schema()),
            (tables::FLIGHTS, FlightColumns::schema()),
            (tables::SEGMENTS, SegmentColumns::schema()),
        ] {
            match TableWriter::create(&output_dir, table, &schema, compression) {
                Ok(writer) => opened.push(writer),
                Err(e) => {
                    opened.iter_mut().for_each(TableWriter::discard);
                    return Err(e);
                }
            }
        }

        let mut writers = opened.into_iter();
        match (writers.next(), writers.next(), writers.next()) {
            (Some(carriers), Some(flights), Some(segments)) => Ok(Self {
                output_dir,
                compression,
                carriers,
                flights,
                segments,
            }),
            _ => Err(SsimError::configuration("failed to open table writers")),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn compression(&self) -> CompressionAlgorithm {
        self.compression
    }

    fn writers_mut(&mut self) -> [&mut TableWriter; 3] {
        [&mut self.carriers, &mut self.flights, &mut self.segments]
    }
}

impl BatchSink for ParquetSink {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn write_batch(&mut self, batch: &SsimBatch) -> Result<()> {
        self.carriers.write(&batch.carriers)?;
        self.flights.write(&batch.flights)?;
        self.segments.write(&batch.segments)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<SinkReport> {
        let mut rows_written = 0;
        let mut files = Vec::with_capacity(3);
        for writer in self.writers_mut() {
            writer.finish()?;
            info!(
                "Wrote {} {} rows to {}",
                writer.rows,
                writer.table,
                writer.path.display()
            );
            rows_written += writer.rows;
            files.push(writer.path.clone());
        }

        Ok(SinkReport {
            sink: self.name(),
            rows_written,
            files,
        })
    }

    fn abort(&mut self) {
        for writer in self.writers_mut() {
            writer.discard();
        }
    }
}
