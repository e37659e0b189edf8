//! Record classification by leading character
//!
//! Classification looks only at the first character and the line length;
//! field extraction is left to the per-type decoders.

use crate::error::{Result, SsimError};
use crate::models::RecordType;

/// Classify a raw line, returning `None` for blank lines
pub fn classify(line: &str, line_number: usize) -> Result<Option<RecordType>> {
    let Some(leading) = line.chars().next() else {
        return Ok(None);
    };
    if line.trim().is_empty() {
        return Ok(None);
    }

    let record_type =
        RecordType::from_tag(leading).ok_or_else(|| SsimError::UnrecognizedRecord {
            line_number,
            leading,
            reason: "unknown record type".to_string(),
        })?;

    if line.len() < record_type.min_length() {
        return Err(SsimError::UnrecognizedRecord {
            line_number,
            leading,
            reason: format!(
                "{} record needs at least {} bytes, line has {}",
                record_type,
                record_type.min_length(),
                line.len()
            ),
        });
    }

    Ok(Some(record_type))
}
