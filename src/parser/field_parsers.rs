//! Field parsing utilities for fixed-width SSIM records
//!
//! This module provides helper functions for extracting typed fields from
//! column ranges with proper error handling. Every failure names the field
//! and carries the raw value so the offending line can be found.

use super::layout::Columns;
use crate::constants::INDEFINITE_DATE;
use crate::error::{Result, SsimError};
use crate::models::{DaysOfOperation, RecordType};
use chrono::NaiveDate;

/// One input line being decoded as a given record type
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    line: &'a str,
    line_number: usize,
    record_type: RecordType,
}

impl<'a> RawRecord<'a> {
    pub fn new(line: &'a str, line_number: usize, record_type: RecordType) -> Self {
        Self {
            line,
            line_number,
            record_type,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Raw (untrimmed) columns of a field
    pub fn field(&self, field_name: &'static str, columns: Columns) -> Result<&'a str> {
        let end = columns.end;
        self.line.get(columns).ok_or_else(|| {
            let value = if self.line.len() < end {
                format!("<line ends at byte {}>", self.line.len())
            } else {
                "<non-ASCII content>".to_string()
            };
            self.malformed(field_name, value)
        })
    }

    pub fn malformed(&self, field_name: &'static str, value: impl Into<String>) -> SsimError {
        SsimError::MalformedField {
            record_type: self.record_type,
            field_name,
            line_number: self.line_number,
            value: value.into(),
        }
    }
}

/// Parse a trimmed string field, which may be empty
pub fn parse_string(record: &RawRecord, field_name: &'static str, columns: Columns) -> Result<String> {
    Ok(record.field(field_name, columns)?.trim().to_string())
}

/// Parse a trimmed string field that must not be blank
pub fn parse_required_string(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<String> {
    let value = record.field(field_name, columns)?.trim();
    if value.is_empty() {
        return Err(record.malformed(field_name, value));
    }
    Ok(value.to_string())
}

/// Parse an all-digit field after trimming
pub fn parse_required_u32(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<u32> {
    let raw = record.field(field_name, columns)?;
    let value = raw.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(record.malformed(field_name, raw));
    }
    value
        .parse::<u32>()
        .map_err(|_| record.malformed(field_name, raw))
}

/// Parse a mandatory `DDMMMYY` date
pub fn parse_required_date(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<NaiveDate> {
    let raw = record.field(field_name, columns)?;
    parse_ssim_date(raw).ok_or_else(|| record.malformed(field_name, raw))
}

/// Parse an end date where `00XXX00` means open-ended
pub fn parse_open_date(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<Option<NaiveDate>> {
    let raw = record.field(field_name, columns)?;
    if raw == INDEFINITE_DATE {
        return Ok(None);
    }
    parse_ssim_date(raw)
        .map(Some)
        .ok_or_else(|| record.malformed(field_name, raw))
}

/// Parse a date that may be left blank
pub fn parse_optional_date(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<Option<NaiveDate>> {
    let raw = record.field(field_name, columns)?;
    if raw.trim().is_empty() || raw == INDEFINITE_DATE {
        return Ok(None);
    }
    parse_ssim_date(raw)
        .map(Some)
        .ok_or_else(|| record.malformed(field_name, raw))
}

/// Parse a four digit `HHMM` local time
pub fn parse_time(record: &RawRecord, field_name: &'static str, columns: Columns) -> Result<String> {
    let raw = record.field(field_name, columns)?;
    if is_hhmm(raw) {
        Ok(raw.to_string())
    } else {
        Err(record.malformed(field_name, raw))
    }
}

/// Parse a signed `+HHMM` / `-HHMM` UTC variation
pub fn parse_utc_variation(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<String> {
    let raw = record.field(field_name, columns)?;
    let valid = match raw.as_bytes().first() {
        Some(b'+') | Some(b'-') => is_hhmm(&raw[1..]),
        _ => false,
    };
    if valid {
        Ok(raw.to_string())
    } else {
        Err(record.malformed(field_name, raw))
    }
}

pub fn parse_days_of_operation(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<DaysOfOperation> {
    let raw = record.field(field_name, columns)?;
    DaysOfOperation::parse(raw).ok_or_else(|| record.malformed(field_name, raw))
}

/// Parse a 2-3 character alphanumeric airline designator
pub fn parse_airline_designator(
    record: &RawRecord,
    field_name: &'static str,
    columns: Columns,
) -> Result<String> {
    let raw = record.field(field_name, columns)?;
    let value = raw.trim();
    if (2..=3).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(value.to_string())
    } else {
        Err(record.malformed(field_name, raw))
    }
}

/// Parse an SSIM `DDMMMYY` date such as `25MAR18`
pub fn parse_ssim_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 7 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%d%b%y").ok()
}

fn is_hhmm(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let hours = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    let minutes = (bytes[2] - b'0') * 10 + (bytes[3] - b'0');
    // 2400 is the only valid time in hour 24
    minutes <= 59 && (hours < 24 || (hours == 24 && minutes == 0))
}
