//! Error handling and warning propagation tests

use super::parse_tables;
use crate::config::SsimConfig;
use crate::error::{SsimError, StructuralWarning};
use crate::parser::tests::{SsimFixture, element_line, trailer_line};
use crate::processor::SsimReader;
use crate::sinks::{BatchSink, TableSink};
use std::io::Cursor;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Fixture lines with the last trailer's check reference shifted by `delta`
fn with_bad_trailer(delta: u32) -> String {
    let mut lines = SsimFixture::new(&["XX"], 3, 1, 1).lines();
    let last = lines.len() - 1;
    // 6 records follow the carrier at serial 2, so the true reference is 8
    lines[last] = trailer_line("XX", 8 + delta, 9);
    lines.join("\n")
}

#[test]
fn test_count_mismatch_is_a_warning_by_default() {
    let (report, tables) = parse_tables(&with_bad_trailer(2), SsimConfig::default()).unwrap();
    assert_eq!(tables.flights.height(), 3);
    assert_eq!(report.summary.warning_count, 1);
    assert!(matches!(
        report.summary.warnings[0],
        StructuralWarning::CountMismatch {
            declared: 8,
            counted: 6,
            ..
        }
    ));
}

#[test]
fn test_count_mismatch_fails_in_strict_mode() {
    let result = parse_tables(&with_bad_trailer(2), SsimConfig::default().with_strict(true));
    match result {
        Err(SsimError::CountMismatch {
            airline_designator,
            declared,
            counted,
            ..
        }) => {
            assert_eq!(airline_designator, "XX");
            assert_eq!(declared, 8);
            assert_eq!(counted, 6);
        }
        other => panic!("expected count mismatch, got {:?}", other.map(|(r, _)| r)),
    }
}

#[test]
fn test_orphan_element_aborts_parse() {
    let mut lines = SsimFixture::new(&["XX"], 2, 1, 0).lines();
    // Element for a flight that was never declared, placed after the last leg
    lines.insert(lines.len() - 1, element_line("XX", 99, 1, 1, 10, 5));
    let result = parse_tables(&lines.join("\n"), SsimConfig::default());
    match result {
        Err(error @ SsimError::OrphanElement { .. }) => {
            assert_eq!(error.line_number(), Some(lines.len() - 1));
        }
        other => panic!("expected orphan element, got {:?}", other.map(|(r, _)| r)),
    }
}

#[test]
fn test_truncated_file_is_fatal() {
    let mut lines = SsimFixture::new(&["XX"], 2, 1, 1).lines();
    lines.pop();
    let result = parse_tables(&lines.join("\n"), SsimConfig::default());
    assert!(matches!(
        result,
        Err(SsimError::TruncatedFile { ref airline_designator, .. }) if airline_designator == "XX"
    ));
}

#[test]
fn test_malformed_field_reports_line() {
    let mut lines = SsimFixture::new(&["XX"], 2, 1, 0).lines();
    // Corrupt the departure time of the first leg
    lines[2].replace_range(39..43, "2599");
    let result = parse_tables(&lines.join("\n"), SsimConfig::default());
    match result {
        Err(error @ SsimError::MalformedField { .. }) => assert_eq!(error.line_number(), Some(3)),
        other => panic!("expected malformed field, got {:?}", other.map(|(r, _)| r)),
    }
}

#[test]
fn test_missing_source_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let result = SsimReader::open(temp_dir.path().join("absent.ssim"), SsimConfig::default());
    assert!(matches!(result, Err(SsimError::SourceUnavailable { .. })));
}

#[test]
fn test_invalid_configuration_is_rejected_before_reading() {
    let result = SsimReader::from_reader(
        Cursor::new(String::new()),
        "fixture",
        SsimConfig::default().with_batch_size(0),
    );
    assert!(matches!(result, Err(SsimError::Configuration { .. })));
}

#[test]
fn test_cancellation_stops_between_batches() {
    let content = SsimFixture::new(&["XX"], 20, 1, 1).render();
    let token = CancellationToken::new();
    token.cancel();

    let mut reader = SsimReader::from_reader(
        Cursor::new(content),
        "fixture",
        SsimConfig::default().with_batch_size(5),
    )
    .unwrap()
    .with_cancellation(token);
    let mut sink = TableSink::split();
    let mut sinks: [&mut dyn BatchSink; 1] = [&mut sink];
    let result = reader.run(&mut sinks);
    assert!(matches!(result, Err(SsimError::Cancelled)));
    assert_eq!(sink.into_tables().total_rows(), 0);
}
