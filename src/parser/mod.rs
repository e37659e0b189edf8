//! SSIM record parser
//!
//! Turns raw fixed-width lines into typed records and tracks the carrier and
//! leg context that ties supplementary records to their flights.
//!
//! ## Architecture
//!
//! - [`classifier`] - Record type detection from the leading character
//! - [`layout`] - Fixed column ranges per record type
//! - [`field_parsers`] - Typed field extraction and validation
//! - [`record_parser`] - One decoder per record type
//! - [`context`] - Carrier section state machine and trailer reconciliation
//!
//! ## Usage
//!
//! ```rust
//! use ssim_processor::parser::{ContextTracker, decode_line};
//! use ssim_processor::models::SsimRecord;
//!
//! # fn example(line: &str) -> ssim_processor::Result<()> {
//! let mut tracker = ContextTracker::new(false);
//! if let Some(SsimRecord::Carrier(carrier)) = decode_line(line, 2)? {
//!     tracker.on_carrier(&carrier, 2)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod context;
pub mod field_parsers;
pub mod layout;
pub mod record_parser;

#[cfg(test)]
pub mod tests;

pub use classifier::classify;
pub use context::{ContextTracker, LegContext, SectionState};
pub use record_parser::{
    parse_carrier_record, parse_element_record, parse_header_record, parse_leg_record,
    parse_trailer_record,
};

use crate::Result;
use crate::models::{RecordType, SsimRecord};

/// Classify and decode one line; blank lines yield `None`
pub fn decode_line(line: &str, line_number: usize) -> Result<Option<SsimRecord>> {
    let Some(record_type) = classify(line, line_number)? else {
        return Ok(None);
    };

    let record = match record_type {
        RecordType::Filler => SsimRecord::Filler,
        RecordType::Header => SsimRecord::Header(parse_header_record(line, line_number)?),
        RecordType::Carrier => SsimRecord::Carrier(parse_carrier_record(line, line_number)?),
        RecordType::Leg => SsimRecord::Leg(parse_leg_record(line, line_number)?),
        RecordType::Element => SsimRecord::Element(parse_element_record(line, line_number)?),
        RecordType::Trailer => SsimRecord::Trailer(parse_trailer_record(line, line_number)?),
    };
    Ok(Some(record))
}
