//! Parse throughput over generated schedules of increasing size

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ssim_processor::{SsimConfig, ssim_to_dataframes_from_reader};
use std::io::Cursor;

#[path = "../tests/common/mod.rs"]
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_to_tables");
    let config = SsimConfig::default();

    for flights in [100u32, 1_000, 5_000] {
        let mut content = common::schedule_lines(&["BA", "AA"], flights, 2, 2).join("\n");
        content.push('\n');
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(flights), &content, |b, content| {
            b.iter(|| {
                let tables =
                    ssim_to_dataframes_from_reader(Cursor::new(content.as_bytes()), &config).unwrap();
                black_box(tables.total_rows())
            })
        });
    }
    group.finish();
}

fn bench_batch_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_size");
    let mut content = common::schedule_lines(&["BA"], 2_000, 2, 2).join("\n");
    content.push('\n');

    for batch_size in [100usize, 10_000, 100_000] {
        let config = SsimConfig::default().with_batch_size(batch_size);
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &config, |b, config| {
            b.iter(|| {
                let tables =
                    ssim_to_dataframes_from_reader(Cursor::new(content.as_bytes()), config).unwrap();
                black_box(tables.total_rows())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_batch_sizes);
criterion_main!(benches);
