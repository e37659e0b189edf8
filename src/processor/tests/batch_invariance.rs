//! Batch size only bounds memory; results must not depend on it

use super::parse_tables;
use crate::config::SsimConfig;
use crate::parser::tests::SsimFixture;
use crate::processor::SsimReader;
use crate::sinks::{BatchSink, TableSink};
use std::io::Cursor;

fn assert_same_tables(fixture: &SsimFixture, sizes: &[usize]) {
    let content = fixture.render();
    let (_, baseline) = parse_tables(&content, SsimConfig::default().with_batch_size(usize::MAX)).unwrap();

    for &batch_size in sizes {
        let (report, tables) =
            parse_tables(&content, SsimConfig::default().with_batch_size(batch_size)).unwrap();
        assert!(
            tables.carriers.equals_missing(&baseline.carriers),
            "carriers differ at batch size {}",
            batch_size
        );
        assert!(
            tables.flights.equals_missing(&baseline.flights),
            "flights differ at batch size {}",
            batch_size
        );
        assert!(
            tables.segments.equals_missing(&baseline.segments),
            "segments differ at batch size {}",
            batch_size
        );
        assert!(report.summary.batches_flushed >= 1);
    }
}

#[test]
fn test_single_row_batches() {
    let fixture = SsimFixture::new(&["XX", "YY"], 6, 2, 2);
    assert_same_tables(&fixture, &[1]);
}

#[test]
fn test_assorted_batch_sizes() {
    let fixture = SsimFixture::new(&["XX", "YY", "ZZ"], 40, 3, 2);
    assert_same_tables(&fixture, &[7, 1000, 10_000]);
}

#[test]
fn test_merged_table_is_batch_invariant() {
    let content = SsimFixture::new(&["XX", "YY"], 8, 2, 1).render();
    let merged = |batch_size: usize| {
        let config = SsimConfig::default().with_batch_size(batch_size);
        let mut reader = SsimReader::from_reader(Cursor::new(content.clone()), "fixture", config).unwrap();
        let mut sink = TableSink::merged();
        let mut sinks: [&mut dyn BatchSink; 1] = [&mut sink];
        reader.run(&mut sinks).unwrap();
        sink.into_merged()
    };

    let small = merged(3);
    let large = merged(usize::MAX);
    assert_eq!(small.height(), 2 + 32 + 32);
    assert!(small.equals_missing(&large));
}

#[test]
fn test_small_batches_flush_more_often() {
    let content = SsimFixture::new(&["XX"], 10, 1, 1).render();
    let (few, _) = parse_tables(&content, SsimConfig::default().with_batch_size(1000)).unwrap();
    let (many, _) = parse_tables(&content, SsimConfig::default().with_batch_size(2)).unwrap();
    assert_eq!(few.summary.batches_flushed, 1);
    assert!(many.summary.batches_flushed > few.summary.batches_flushed);
}
