//! Two-stage asynchronous pipeline.
//!
//! The parse stage (scan, classify, decode, build batches) and the sink stage
//! each run on a blocking thread, connected by a bounded channel. A full
//! channel blocks the parser; an empty one blocks the sinks.

use super::batch::SsimBatch;
use super::{ConversionReport, SsimReader};
use crate::error::{Result, SsimError};
use crate::sinks::{BatchSink, abort_all, broadcast};
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub type BoxedSink = Box<dyn BatchSink + Send>;

/// Run a parse with sink writes overlapped on a second thread
///
/// Sinks are finished when both stages succeed and aborted otherwise. The
/// token is checked between batches.
pub async fn run_pipelined<R>(
    reader: SsimReader<R>,
    sinks: Vec<BoxedSink>,
    cancellation: CancellationToken,
) -> Result<ConversionReport>
where
    R: BufRead + Send + 'static,
{
    let capacity = reader.config().pipeline_capacity.max(1);
    let (tx, mut rx) = mpsc::channel::<SsimBatch>(capacity);
    debug!("Starting pipeline with {} batches in flight", capacity);

    let parse_stage = task::spawn_blocking(move || {
        let mut reader = reader.with_cancellation(cancellation);
        reader.process_batches(|batch| {
            tx.blocking_send(batch)
                .map_err(|_| SsimError::pipeline("sink stage stopped receiving batches"))
        })
    });

    let sink_stage = task::spawn_blocking(move || {
        let mut sinks = sinks;
        let mut outcome = Ok(());
        while let Some(batch) = rx.blocking_recv() {
            let mut targets = as_targets(&mut sinks);
            if let Err(e) = broadcast(&mut targets, &batch) {
                outcome = Err(e);
                break;
            }
        }
        (sinks, outcome)
    });

    let (parsed, written) = tokio::join!(parse_stage, sink_stage);
    let (mut sinks, write_outcome) =
        written.map_err(|e| SsimError::pipeline(format!("sink stage panicked: {}", e)))?;
    let parse_outcome =
        parsed.unwrap_or_else(|e| Err(SsimError::pipeline(format!("parse stage panicked: {}", e))));

    // A sink failure closes the channel, so the parser error it causes is secondary
    let summary = match (parse_outcome, write_outcome) {
        (Ok(summary), Ok(())) => summary,
        (_, Err(e)) | (Err(e), Ok(())) => {
            warn!("Pipeline failed: {}", e);
            task::spawn_blocking(move || abort_all(&mut as_targets(&mut sinks)))
                .await
                .map_err(|e| SsimError::pipeline(format!("abort panicked: {}", e)))?;
            return Err(e);
        }
    };

    task::spawn_blocking(move || {
        let mut targets = as_targets(&mut sinks);
        let mut reports = Vec::with_capacity(targets.len());
        for index in 0..targets.len() {
            match targets[index].finish() {
                Ok(report) => reports.push(report),
                Err(e) => {
                    abort_all(&mut targets);
                    return Err(e);
                }
            }
        }
        Ok(ConversionReport {
            summary,
            sinks: reports,
        })
    })
    .await
    .map_err(|e| SsimError::pipeline(format!("finish panicked: {}", e)))?
}

fn as_targets(sinks: &mut [BoxedSink]) -> Vec<&mut dyn BatchSink> {
    sinks
        .iter_mut()
        .map(|sink| sink.as_mut() as &mut dyn BatchSink)
        .collect()
}
