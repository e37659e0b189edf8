//! Error handling for SSIM processing operations.
//!
//! Provides error types with enough context (line number, record type, field
//! name) to locate the offending input line, plus the non-fatal structural
//! warnings collected during a parse.

use crate::models::RecordType;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsimError {
    #[error("Source unavailable: {path} - {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unrecognized record at line {line_number} (leading {leading:?}): {reason}")]
    UnrecognizedRecord {
        line_number: usize,
        leading: char,
        reason: String,
    },

    #[error("Malformed {record_type} field '{field_name}' at line {line_number}: {value:?}")]
    MalformedField {
        record_type: RecordType,
        field_name: &'static str,
        line_number: usize,
        value: String,
    },

    #[error("Orphan element record at line {line_number}: {reason}")]
    OrphanElement { line_number: usize, reason: String },

    #[error("Leg record at line {line_number} appears outside any carrier section")]
    OrphanLeg { line_number: usize },

    #[error("Carrier {airline_designator} has no trailer before line {line_number}")]
    MissingTrailer {
        airline_designator: String,
        line_number: usize,
    },

    #[error(
        "Trailer count mismatch for carrier {airline_designator} at line {line_number}: declared {declared}, counted {counted}"
    )]
    CountMismatch {
        airline_designator: String,
        line_number: usize,
        declared: u32,
        counted: u32,
    },

    #[error("Structural error at line {line_number}: {message}")]
    Structural { line_number: usize, message: String },

    #[error("Unsupported compression: {name}")]
    UnsupportedCompression { name: String },

    #[error("Input ended at line {line_number} inside carrier section {airline_designator}")]
    TruncatedFile {
        airline_designator: String,
        line_number: usize,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("{sink} sink failed: {message} - {source}")]
    Sink {
        sink: &'static str,
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Pipeline failure: {message}")]
    Pipeline { message: String },

    #[error("Processing cancelled")]
    Cancelled,
}

impl SsimError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn pipeline(message: impl Into<String>) -> Self {
        Self::Pipeline {
            message: message.into(),
        }
    }

    pub fn sink(sink: &'static str, message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Sink {
            sink,
            message: message.into(),
            source,
        }
    }

    /// Source line the error points at, when it has one
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::UnrecognizedRecord { line_number, .. }
            | Self::MalformedField { line_number, .. }
            | Self::OrphanElement { line_number, .. }
            | Self::OrphanLeg { line_number }
            | Self::MissingTrailer { line_number, .. }
            | Self::CountMismatch { line_number, .. }
            | Self::Structural { line_number, .. }
            | Self::TruncatedFile { line_number, .. } => Some(*line_number),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SsimError>;

/// Non-fatal inconsistencies found while reconciling carrier sections.
///
/// Reconciliation warnings become errors in strict mode; the others are
/// always reported and never abort a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralWarning {
    /// A header record after the first carrier record
    OutOfOrderHeader { line_number: usize },
    /// A carrier record opened while the previous section had no trailer
    MissingTrailer {
        airline_designator: String,
        line_number: usize,
    },
    CountMismatch {
        airline_designator: String,
        line_number: usize,
        declared: u32,
        counted: u32,
    },
    TrailerWithoutCarrier { line_number: usize },
    TrailerCarrierMismatch {
        expected: String,
        found: String,
        line_number: usize,
    },
    SerialOutOfOrder {
        line_number: usize,
        previous: u32,
        current: u32,
    },
}

impl StructuralWarning {
    pub fn line_number(&self) -> usize {
        match self {
            Self::OutOfOrderHeader { line_number }
            | Self::MissingTrailer { line_number, .. }
            | Self::CountMismatch { line_number, .. }
            | Self::TrailerWithoutCarrier { line_number }
            | Self::TrailerCarrierMismatch { line_number, .. }
            | Self::SerialOutOfOrder { line_number, .. } => *line_number,
        }
    }

    /// Whether strict mode turns this warning into an error
    pub fn is_reconciliation(&self) -> bool {
        matches!(
            self,
            Self::MissingTrailer { .. }
                | Self::CountMismatch { .. }
                | Self::TrailerWithoutCarrier { .. }
                | Self::TrailerCarrierMismatch { .. }
        )
    }

    pub fn into_error(self) -> SsimError {
        match self {
            Self::MissingTrailer {
                airline_designator,
                line_number,
            } => SsimError::MissingTrailer {
                airline_designator,
                line_number,
            },
            Self::CountMismatch {
                airline_designator,
                line_number,
                declared,
                counted,
            } => SsimError::CountMismatch {
                airline_designator,
                line_number,
                declared,
                counted,
            },
            other => SsimError::Structural {
                line_number: other.line_number(),
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrderHeader { line_number } => {
                write!(f, "header record after carrier data at line {}", line_number)
            }
            Self::MissingTrailer {
                airline_designator,
                line_number,
            } => write!(
                f,
                "carrier {} closed without trailer at line {}",
                airline_designator, line_number
            ),
            Self::CountMismatch {
                airline_designator,
                line_number,
                declared,
                counted,
            } => write!(
                f,
                "trailer for {} at line {} declares {} records, counted {}",
                airline_designator, line_number, declared, counted
            ),
            Self::TrailerWithoutCarrier { line_number } => {
                write!(f, "trailer without open carrier at line {}", line_number)
            }
            Self::TrailerCarrierMismatch {
                expected,
                found,
                line_number,
            } => write!(
                f,
                "trailer for {} closes carrier {} at line {}",
                found, expected, line_number
            ),
            Self::SerialOutOfOrder {
                line_number,
                previous,
                current,
            } => write!(
                f,
                "record serial {} follows {} at line {}",
                current, previous, line_number
            ),
        }
    }
}
