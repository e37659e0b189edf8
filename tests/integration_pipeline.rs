//! Tests for the asynchronous two-stage pipeline

mod common;

use common::{schedule_lines, write_schedule};
use polars::prelude::*;
use ssim_processor::processor::pipeline::BoxedSink;
use ssim_processor::{
    CompressionAlgorithm, CsvSink, ParquetSink, SsimConfig, SsimError, SsimReader, run_pipelined,
    ssim_to_dataframes,
};
use std::fs::{self, File};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_pipeline_feeds_every_sink() {
    let temp_dir = TempDir::new().unwrap();
    let lines = schedule_lines(&["BA", "AA", "DL"], 30, 2, 2);
    let source = write_schedule(temp_dir.path(), "schedule.ssim", &lines);
    let config = SsimConfig::default().with_batch_size(17).with_pipeline_capacity(2);

    let csv_path = temp_dir.path().join("schedule.csv");
    let parquet_dir = temp_dir.path().join("tables");
    let sinks: Vec<BoxedSink> = vec![
        Box::new(CsvSink::create(&csv_path).unwrap()),
        Box::new(ParquetSink::create(&parquet_dir, CompressionAlgorithm::Zstd).unwrap()),
    ];

    let reader = SsimReader::open(&source, config.clone()).unwrap();
    let report = run_pipelined(reader, sinks, CancellationToken::new())
        .await
        .unwrap();

    // 3 carriers, 180 legs and 360 segments
    assert_eq!(report.sinks.len(), 2);
    assert_eq!(report.sinks[0].rows_written, 543);
    assert_eq!(report.sinks[1].rows_written, 543);
    assert_eq!(report.summary.legs, 180);
    assert!(report.summary.batches_flushed > 1);

    let csv_lines = fs::read_to_string(&csv_path).unwrap().lines().count();
    assert_eq!(csv_lines, 544);

    let expected = ssim_to_dataframes(&source, &config).unwrap();
    let flights = ParquetReader::new(File::open(parquet_dir.join("flights.zstd.parquet")).unwrap())
        .finish()
        .unwrap();
    assert!(flights.equals_missing(&expected.flights));
}

#[tokio::test]
async fn test_cancelled_pipeline_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let lines = schedule_lines(&["BA"], 50, 1, 1);
    let source = write_schedule(temp_dir.path(), "schedule.ssim", &lines);

    let csv_path = temp_dir.path().join("partial.csv");
    let parquet_dir = temp_dir.path().join("tables");
    let sinks: Vec<BoxedSink> = vec![
        Box::new(CsvSink::create(&csv_path).unwrap()),
        Box::new(ParquetSink::create(&parquet_dir, CompressionAlgorithm::Snappy).unwrap()),
    ];

    let token = CancellationToken::new();
    token.cancel();
    let reader = SsimReader::open(&source, SsimConfig::default().with_batch_size(10)).unwrap();
    let result = run_pipelined(reader, sinks, token).await;

    assert!(matches!(result, Err(SsimError::Cancelled)));
    assert!(!csv_path.exists());
    assert_eq!(fs::read_dir(&parquet_dir).unwrap().count(), 0);
}

#[tokio::test]
async fn test_parse_error_aborts_sinks() {
    let temp_dir = TempDir::new().unwrap();
    let mut lines = schedule_lines(&["BA"], 5, 1, 1);
    lines.pop();
    let source = write_schedule(temp_dir.path(), "truncated.ssim", &lines);

    let csv_path = temp_dir.path().join("truncated.csv");
    let sinks: Vec<BoxedSink> = vec![Box::new(CsvSink::create(&csv_path).unwrap())];
    let reader = SsimReader::open(&source, SsimConfig::default().with_batch_size(3)).unwrap();
    let result = run_pipelined(reader, sinks, CancellationToken::new()).await;

    assert!(matches!(result, Err(SsimError::TruncatedFile { .. })));
    assert!(!csv_path.exists());
}
