//! Application constants for the SSIM processor
//!
//! Record geometry, processing defaults, environment variable names and
//! output table names used throughout the crate.

// =============================================================================
// Record Geometry
// =============================================================================

/// Every SSIM record (all types) is exactly this many bytes wide
pub const RECORD_LENGTH: usize = 200;

/// Date placeholder meaning "no end date" in leg and carrier validity periods
pub const INDEFINITE_DATE: &str = "00XXX00";

/// `NaiveDate::num_days_from_ce` for 1970-01-01, used to build Polars `Date` columns
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// =============================================================================
// Processing Defaults
// =============================================================================

/// Rows buffered per table before a batch is flushed to the sinks
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Read buffer for the line scanner (8 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Batches allowed in flight between the parse and sink stages of the pipeline
pub const DEFAULT_PIPELINE_CAPACITY: usize = 4;

/// Structural warnings retained in a parse summary; later ones are only counted
pub const MAX_RECORDED_WARNINGS: usize = 1_000;

/// Serial number warnings logged at warn level before dropping to debug
pub const LOGGED_SERIAL_WARNINGS: usize = 10;

// =============================================================================
// Output Tables
// =============================================================================

/// Logical table names, also used as Parquet file stems
pub mod tables {
    pub const CARRIERS: &str = "carriers";
    pub const FLIGHTS: &str = "flights";
    pub const SEGMENTS: &str = "segments";

    /// All tables in the order they are written
    pub const ALL: [&str; 3] = [CARRIERS, FLIGHTS, SEGMENTS];
}

/// Column every table is sorted by when tables are merged
pub const LINE_NUMBER_COLUMN: &str = "line_number";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variables layered over the default configuration
pub mod env {
    pub const BATCH_SIZE: &str = "SSIM_BATCH_SIZE";
    pub const BUFFER_SIZE: &str = "SSIM_BUFFER_SIZE";
    pub const STRICT: &str = "SSIM_STRICT";
    pub const COMPRESSION: &str = "SSIM_COMPRESSION";
}
