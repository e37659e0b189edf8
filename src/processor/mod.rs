//! Main processing engine.
//!
//! Drives the single forward pass over an SSIM source: scan, classify and
//! decode each line, update the carrier context, accumulate rows and hand
//! completed batches to the sinks.

pub mod batch;
pub mod pipeline;

#[cfg(test)]
pub mod tests;

use self::batch::{BatchBuilder, SsimBatch};

use crate::config::SsimConfig;
use crate::error::{Result, SsimError};
use crate::models::{ParseSummary, SsimRecord};
use crate::parser::{ContextTracker, decode_line};
use crate::scanner::LineScanner;
use crate::sinks::{BatchSink, SinkReport, abort_all, broadcast};

use indicatif::ProgressBar;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Outcome of a conversion: parse statistics plus what each sink wrote
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub summary: ParseSummary,
    pub sinks: Vec<SinkReport>,
}

impl ConversionReport {
    /// Rows written by the first sink (all sinks receive the same batches)
    pub fn rows_written(&self) -> usize {
        self.sinks.first().map(|s| s.rows_written).unwrap_or(0)
    }
}

/// Streaming SSIM reader
#[derive(Debug)]
pub struct SsimReader<R> {
    scanner: LineScanner<R>,
    config: SsimConfig,
    cancellation: Option<CancellationToken>,
    progress: Option<ProgressBar>,
}

impl SsimReader<BufReader<File>> {
    /// Open a file source; the configuration is validated first
    pub fn open(path: impl AsRef<Path>, config: SsimConfig) -> Result<Self> {
        config.validate()?;
        let scanner = LineScanner::open(path, config.buffer_size)?;
        Ok(Self::with_scanner(scanner, config))
    }
}

impl<R: Read> SsimReader<BufReader<R>> {
    pub fn from_reader(reader: R, source: impl Into<String>, config: SsimConfig) -> Result<Self> {
        config.validate()?;
        let scanner = LineScanner::from_reader(reader, source, config.buffer_size);
        Ok(Self::with_scanner(scanner, config))
    }
}

impl<R: BufRead> SsimReader<R> {
    pub fn with_scanner(scanner: LineScanner<R>, config: SsimConfig) -> Self {
        Self {
            scanner,
            config,
            cancellation: None,
            progress: None,
        }
    }

    /// Stop between batches once the token is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report line progress on a spinner or bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &SsimConfig {
        &self.config
    }

    pub fn source_name(&self) -> &str {
        self.scanner.source_name()
    }

    /// Parse the whole source into `sinks`, finishing them on success and
    /// aborting them on any failure
    pub fn run(&mut self, sinks: &mut [&mut dyn BatchSink]) -> Result<ConversionReport> {
        let summary = match self.process_batches(|batch| broadcast(sinks, &batch)) {
            Ok(summary) => summary,
            Err(e) => {
                abort_all(sinks);
                return Err(e);
            }
        };

        let mut reports = Vec::with_capacity(sinks.len());
        for index in 0..sinks.len() {
            match sinks[index].finish() {
                Ok(report) => reports.push(report),
                Err(e) => {
                    abort_all(sinks);
                    return Err(e);
                }
            }
        }

        Ok(ConversionReport {
            summary,
            sinks: reports,
        })
    }

    /// Parse the source, passing each completed batch to `on_batch` in order
    pub fn process_batches<F>(&mut self, mut on_batch: F) -> Result<ParseSummary>
    where
        F: FnMut(SsimBatch) -> Result<()>,
    {
        let start = Instant::now();
        let Self {
            scanner,
            config,
            cancellation,
            progress,
        } = self;

        info!(
            "Parsing SSIM source {} (batch size {}, strict {})",
            scanner.source_name(),
            config.batch_size,
            config.strict
        );

        let mut tracker = ContextTracker::new(config.strict);
        let mut builder = BatchBuilder::new(config.batch_size);
        let mut summary = ParseSummary::default();

        while let Some((line_number, line)) = scanner.next_line()? {
            summary.lines_read = line_number;
            let Some(record) = decode_line(line, line_number)? else {
                continue;
            };
            if let Some(serial) = record.record_serial_number() {
                tracker.observe_serial(line_number, serial);
            }

            match record {
                SsimRecord::Filler => summary.filler_records += 1,
                SsimRecord::Header(header) => {
                    tracker.on_header(line_number)?;
                    if summary.header.is_none() {
                        summary.header = Some(header);
                    }
                }
                SsimRecord::Carrier(carrier) => {
                    tracker.on_carrier(&carrier, line_number)?;
                    builder.push_carrier(&carrier, line_number);
                    summary.carriers += 1;
                }
                SsimRecord::Leg(leg) => {
                    let context = tracker.on_leg(&leg, line_number)?;
                    builder.push_leg(&leg, &context);
                    summary.legs += 1;
                }
                SsimRecord::Element(element) => {
                    let owner = tracker.resolve_element(&element, line_number)?;
                    builder.push_segment(&element, &owner, line_number);
                    tracker.record_element();
                    summary.elements += 1;
                }
                SsimRecord::Trailer(trailer) => {
                    tracker.on_trailer(&trailer, line_number)?;
                    summary.trailers += 1;
                }
            }

            if builder.is_full() {
                emit(&mut builder, &mut on_batch, cancellation.as_ref())?;
                if let Some(progress) = progress.as_ref() {
                    progress.set_position(line_number as u64);
                }
            }
        }

        tracker.finish(summary.lines_read)?;
        emit(&mut builder, &mut on_batch, cancellation.as_ref())?;

        let (warnings, warning_count) = tracker.take_warnings();
        summary.warnings = warnings;
        summary.warning_count = warning_count;
        summary.batches_flushed = builder.batches_flushed();
        summary.processing_time_ms = start.elapsed().as_millis();

        if let Some(progress) = progress.as_ref() {
            progress.set_position(summary.lines_read as u64);
        }
        info!(
            "Parsed {} lines: {} carriers, {} legs, {} elements in {} batches ({} warnings)",
            summary.lines_read,
            summary.carriers,
            summary.legs,
            summary.elements,
            summary.batches_flushed,
            summary.warning_count
        );
        Ok(summary)
    }
}

/// Flush pending rows unless the parse has been cancelled
fn emit<F>(
    builder: &mut BatchBuilder,
    on_batch: &mut F,
    cancellation: Option<&CancellationToken>,
) -> Result<()>
where
    F: FnMut(SsimBatch) -> Result<()>,
{
    if cancellation.is_some_and(|token| token.is_cancelled()) {
        return Err(SsimError::Cancelled);
    }
    match builder.flush()? {
        Some(batch) => on_batch(batch),
        None => Ok(()),
    }
}
