//! Configuration management and validation.
//!
//! Provides the processing configuration, the Parquet compression selection
//! and its file naming policy. Settings are layered: defaults, then
//! environment variables, then explicit builder calls (the CLI flags).

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BUFFER_SIZE, DEFAULT_PIPELINE_CAPACITY, env,
};
use crate::error::{Result, SsimError};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    Gzip,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// Accepted for compatibility; the Polars encoder writes these pages uncompressed
    Lzo,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    Brotli,
    /// No compression
    #[default]
    Uncompressed,
}

impl CompressionAlgorithm {
    pub const ALL: [CompressionAlgorithm; 7] = [
        CompressionAlgorithm::Snappy,
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Lz4,
        CompressionAlgorithm::Lzo,
        CompressionAlgorithm::Zstd,
        CompressionAlgorithm::Brotli,
        CompressionAlgorithm::Uncompressed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Snappy => "snappy",
            CompressionAlgorithm::Gzip => "gzip",
            CompressionAlgorithm::Lz4 => "lz4",
            CompressionAlgorithm::Lzo => "lzo",
            CompressionAlgorithm::Zstd => "zstd",
            CompressionAlgorithm::Brotli => "brotli",
            CompressionAlgorithm::Uncompressed => "uncompressed",
        }
    }

    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Gzip => ParquetCompression::Gzip(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Brotli => ParquetCompression::Brotli(None),
            CompressionAlgorithm::Lzo | CompressionAlgorithm::Uncompressed => {
                ParquetCompression::Uncompressed
            }
        }
    }

    /// Whether the encoder substitutes uncompressed pages for this codec
    pub fn falls_back_to_uncompressed(&self) -> bool {
        matches!(self, CompressionAlgorithm::Lzo)
    }

    /// File name for one table written with this codec
    ///
    /// `carriers.parquet` when uncompressed, `carriers.parquet.gz` for gzip and
    /// `carriers.<codec>.parquet` otherwise.
    pub fn output_file_name(&self, table: &str) -> String {
        match self {
            CompressionAlgorithm::Uncompressed => format!("{}.parquet", table),
            CompressionAlgorithm::Gzip => format!("{}.parquet.gz", table),
            other => format!("{}.{}.parquet", table, other.name()),
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = SsimError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "gzip" => Ok(CompressionAlgorithm::Gzip),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "lzo" => Ok(CompressionAlgorithm::Lzo),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "brotli" => Ok(CompressionAlgorithm::Brotli),
            "uncompressed" | "none" => Ok(CompressionAlgorithm::Uncompressed),
            _ => Err(SsimError::UnsupportedCompression {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Global configuration for SSIM processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SsimConfig {
    /// Rows per table buffered before a batch is flushed to the sinks
    pub batch_size: usize,

    /// Read buffer capacity of the line scanner in bytes
    pub buffer_size: usize,

    /// Promote reconciliation warnings (missing trailer, count mismatch) to errors
    pub strict: bool,

    /// Parquet page compression
    pub compression: CompressionAlgorithm,

    /// Batches allowed in flight between the parse and sink stages
    pub pipeline_capacity: usize,
}

impl Default for SsimConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            strict: false,
            compression: CompressionAlgorithm::Uncompressed,
            pipeline_capacity: DEFAULT_PIPELINE_CAPACITY,
        }
    }
}

impl SsimConfig {
    /// Defaults overlaid with `SSIM_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup (`std::env::var` in production)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env::BATCH_SIZE) {
            self.batch_size = parse_size(env::BATCH_SIZE, &value)?;
        }
        if let Some(value) = lookup(env::BUFFER_SIZE) {
            self.buffer_size = parse_size(env::BUFFER_SIZE, &value)?;
        }
        if let Some(value) = lookup(env::STRICT) {
            self.strict = parse_flag(env::STRICT, &value)?;
        }
        if let Some(value) = lookup(env::COMPRESSION) {
            self.compression = value.parse()?;
        }
        debug!("Configuration after environment overrides: {:?}", self);
        Ok(self)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Select a codec by name, failing immediately on an unknown name
    pub fn with_compression_name(mut self, name: &str) -> Result<Self> {
        self.compression = name.parse()?;
        Ok(self)
    }

    pub fn with_pipeline_capacity(mut self, capacity: usize) -> Self {
        self.pipeline_capacity = capacity;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(SsimError::configuration("batch_size must be greater than 0"));
        }
        if self.buffer_size == 0 {
            return Err(SsimError::configuration(
                "buffer_size must be greater than 0",
            ));
        }
        if self.pipeline_capacity == 0 {
            return Err(SsimError::configuration(
                "pipeline_capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

fn parse_size(key: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|e| {
        SsimError::configuration(format!("{} must be a positive integer, got '{}' ({})", key, value, e))
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SsimError::configuration(format!(
            "{} must be a boolean flag, got '{}'",
            key, value
        ))),
    }
}
