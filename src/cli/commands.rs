//! Command implementations for the SSIM processor CLI
//!
//! Each subcommand opens the source, wires up its sinks and drives the
//! pipelined reader, then prints a short summary to stdout.

use crate::cli::args::{Args, Commands, CsvArgs, InspectArgs, ParquetArgs, ParseOptions};
use crate::config::{CompressionAlgorithm, SsimConfig};
use crate::models::ParseSummary;
use crate::processor::pipeline::{BoxedSink, run_pipelined};
use crate::processor::{ConversionReport, SsimReader};
use crate::sinks::{BatchSink, CsvSink, ParquetSink, TableSink};
use anyhow::Context;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Warnings listed in the summary before the rest are elided
const WARNINGS_SHOWN: usize = 10;

/// Run the selected subcommand until completion or cancellation
pub async fn run(args: Args, cancellation: CancellationToken) -> anyhow::Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let show_progress = args.show_progress();
    match args.command {
        Commands::Csv(csv) => run_csv(csv, show_progress, cancellation).await,
        Commands::Parquet(parquet) => run_parquet(parquet, show_progress, cancellation).await,
        Commands::Inspect(inspect) => run_inspect(inspect, show_progress, cancellation).await,
    }
}

async fn run_csv(
    args: CsvArgs,
    show_progress: bool,
    cancellation: CancellationToken,
) -> anyhow::Result<()> {
    let (reader, progress) = open_reader(&args.parse, args.parse.to_config()?, show_progress)?;
    let sink = CsvSink::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    info!("Writing CSV to {}", args.output.display());

    let sinks: Vec<BoxedSink> = vec![Box::new(sink)];
    let result = run_pipelined(reader, sinks, cancellation).await;
    finish_progress(progress, result.is_ok());
    let report = result.context("SSIM to CSV conversion failed")?;

    print_report("CSV Conversion Summary", &report);
    Ok(())
}

async fn run_parquet(
    args: ParquetArgs,
    show_progress: bool,
    cancellation: CancellationToken,
) -> anyhow::Result<()> {
    let mut config = args.parse.to_config()?;
    if let Some(name) = args.compression.as_deref() {
        config = config.with_compression_name(name)?;
    }
    let compression = config.compression;

    let (reader, progress) = open_reader(&args.parse, config, show_progress)?;
    let sink = ParquetSink::create(&args.output_dir, compression).with_context(|| {
        format!(
            "Failed to prepare Parquet output in {}",
            args.output_dir.display()
        )
    })?;
    info!(
        "Writing {} Parquet tables to {}",
        compression,
        args.output_dir.display()
    );

    let sinks: Vec<BoxedSink> = vec![Box::new(sink)];
    let result = run_pipelined(reader, sinks, cancellation).await;
    finish_progress(progress, result.is_ok());
    let report = result.context("SSIM to Parquet conversion failed")?;

    print_report("Parquet Conversion Summary", &report);
    if compression == CompressionAlgorithm::Lzo {
        println!(
            "  {} {}",
            "Note:".bright_yellow(),
            "LZO is not supported by the Parquet encoder, pages are uncompressed"
        );
    }
    Ok(())
}

async fn run_inspect(
    args: InspectArgs,
    show_progress: bool,
    cancellation: CancellationToken,
) -> anyhow::Result<()> {
    let config = args.parse.to_config()?;
    let (reader, progress) = open_reader(&args.parse, config, show_progress)?;
    let reader = reader.with_cancellation(cancellation);

    // Inspection keeps every table in memory
    let outcome = tokio::task::spawn_blocking(move || {
        let mut reader = reader;
        let mut sink = TableSink::split();
        let mut sinks: [&mut dyn BatchSink; 1] = [&mut sink];
        let report = reader.run(&mut sinks)?;
        Ok::<_, crate::SsimError>((report, sink.into_tables()))
    })
    .await
    .context("Inspection task panicked")?;
    finish_progress(progress, outcome.is_ok());
    let (report, tables) = outcome.context("SSIM inspection failed")?;

    println!("\n{}", "SSIM Inspection".bright_green().bold());
    if let Some(header) = report.summary.header.as_ref() {
        println!(
            "  {} {}",
            "Title:".bright_cyan(),
            header.title_of_contents.bright_white()
        );
    }
    for (label, frame) in [
        ("Carriers:", &tables.carriers),
        ("Flights:", &tables.flights),
        ("Segments:", &tables.segments),
    ] {
        println!(
            "  {} {} rows x {} columns",
            label.bright_cyan(),
            frame.height().to_string().bright_white().bold(),
            frame.width()
        );
    }
    print_parse_summary(&report.summary);
    Ok(())
}

fn open_reader(
    options: &ParseOptions,
    config: SsimConfig,
    show_progress: bool,
) -> anyhow::Result<(SsimReader<BufReader<File>>, Option<ProgressBar>)> {
    let reader = SsimReader::open(&options.input, config)
        .with_context(|| format!("Failed to open {}", options.input.display()))?;

    if !show_progress {
        return Ok((reader, None));
    }
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} lines {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_message(format!("Parsing {}", options.input.display()));
    progress.enable_steady_tick(Duration::from_millis(120));
    Ok((reader.with_progress(progress.clone()), Some(progress)))
}

fn finish_progress(progress: Option<ProgressBar>, succeeded: bool) {
    if let Some(progress) = progress {
        if succeeded {
            progress.finish_with_message("done");
        } else {
            progress.abandon_with_message("failed");
        }
    }
}

fn print_report(title: &str, report: &ConversionReport) {
    println!("\n{}", title.bright_green().bold());
    print_parse_summary(&report.summary);
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        report.rows_written().to_string().bright_white().bold()
    );
    for sink in &report.sinks {
        for file in &sink.files {
            println!("  {} {}", "Output:".bright_cyan(), file.display());
        }
    }
}

fn print_parse_summary(summary: &ParseSummary) {
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Lines read:".bright_cyan(),
        summary.lines_read.to_string().bright_white()
    );
    println!(
        "  {} {} carriers, {} legs, {} segments",
        "Records:".bright_cyan(),
        summary.carriers,
        summary.legs,
        summary.elements
    );
    if summary.has_warnings() {
        println!(
            "  {} {}",
            "Warnings:".bright_yellow(),
            summary.warning_count.to_string().bright_yellow().bold()
        );
        for warning in summary.warnings.iter().take(WARNINGS_SHOWN) {
            println!("    {}", warning);
        }
        if summary.warning_count > WARNINGS_SHOWN {
            println!("    ... and {} more", summary.warning_count - WARNINGS_SHOWN);
        }
    }
}

/// Set up structured logging on stderr so stdout stays free for the summary
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ssim_processor={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}
