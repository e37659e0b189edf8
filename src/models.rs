//! Core data structures and types for SSIM processing.
//!
//! Defines the record types, the typed records produced by the field
//! decoders, the leg key used to associate supplementary records, and the
//! summary returned after a parse.

use crate::error::StructuralWarning;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SSIM record types, identified by the first character of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Block padding (`0`), skipped
    Filler,
    Header,
    Carrier,
    Leg,
    Element,
    Trailer,
}

impl RecordType {
    /// Classify a leading character
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            '0' => Some(RecordType::Filler),
            '1' => Some(RecordType::Header),
            '2' => Some(RecordType::Carrier),
            '3' => Some(RecordType::Leg),
            '4' => Some(RecordType::Element),
            '5' => Some(RecordType::Trailer),
            _ => None,
        }
    }

    pub fn tag(&self) -> char {
        match self {
            RecordType::Filler => '0',
            RecordType::Header => '1',
            RecordType::Carrier => '2',
            RecordType::Leg => '3',
            RecordType::Element => '4',
            RecordType::Trailer => '5',
        }
    }

    /// Shortest line that still holds the identifying prefix of this type
    pub fn min_length(&self) -> usize {
        match self {
            RecordType::Filler => 1,
            RecordType::Header => 2,
            RecordType::Carrier | RecordType::Trailer => 5,
            RecordType::Leg | RecordType::Element => 14,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RecordType::Filler => "filler",
            RecordType::Header => "header",
            RecordType::Carrier => "carrier",
            RecordType::Leg => "leg",
            RecordType::Element => "element",
            RecordType::Trailer => "trailer",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Days of operation as a weekday bitmask (bit 0 = Monday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DaysOfOperation(u8);

impl DaysOfOperation {
    /// Parse the seven positional columns; each must be blank or its ISO weekday digit
    pub fn parse(columns: &str) -> Option<Self> {
        if columns.len() != 7 {
            return None;
        }
        let mut mask = 0u8;
        for (index, byte) in columns.bytes().enumerate() {
            match byte {
                b' ' => {}
                digit if digit == b'1' + index as u8 => mask |= 1 << index,
                _ => return None,
            }
        }
        Some(Self(mask))
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether the flight operates on an ISO weekday (1 = Monday .. 7 = Sunday)
    pub fn operates_on(&self, weekday: u8) -> bool {
        (1..=7).contains(&weekday) && self.0 & (1 << (weekday - 1)) != 0
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl fmt::Display for DaysOfOperation {
    /// Operating weekday digits, e.g. `135` for Monday, Wednesday and Friday
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for weekday in 1..=7u8 {
            if self.operates_on(weekday) {
                write!(f, "{}", weekday)?;
            }
        }
        Ok(())
    }
}

/// Type 1: one per file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRecord {
    pub title_of_contents: String,
    pub number_of_seasons: String,
    pub data_set_serial_number: u32,
    pub record_serial_number: u32,
}

/// Type 2: opens a carrier section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierRecord {
    pub time_mode: String,
    pub airline_designator: String,
    pub season: String,
    pub period_of_schedule_validity_from: NaiveDate,
    /// `None` when open-ended
    pub period_of_schedule_validity_to: Option<NaiveDate>,
    pub creation_date: NaiveDate,
    pub title_of_data: String,
    pub release_date: Option<NaiveDate>,
    pub schedule_status: String,
    pub creator_reference: String,
    pub duplicate_airline_designator_marker: String,
    pub general_information: String,
    pub in_flight_service_information: String,
    pub electronic_ticketing_information: String,
    pub creation_time: String,
    pub record_serial_number: u32,
}

/// Type 3: one flight leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegRecord {
    pub operational_suffix: String,
    pub airline_designator: String,
    pub flight_number: u32,
    pub itinerary_variation_identifier: u32,
    pub leg_sequence_number: u32,
    pub service_type: String,
    pub period_of_operation_from: NaiveDate,
    pub period_of_operation_to: Option<NaiveDate>,
    pub days_of_operation: DaysOfOperation,
    pub frequency_rate: String,
    pub departure_station: String,
    pub scheduled_time_of_passenger_departure: String,
    pub scheduled_time_of_aircraft_departure: String,
    pub utc_local_time_variation_departure: String,
    pub passenger_terminal_departure: String,
    pub arrival_station: String,
    pub scheduled_time_of_aircraft_arrival: String,
    pub scheduled_time_of_passenger_arrival: String,
    pub utc_local_time_variation_arrival: String,
    pub passenger_terminal_arrival: String,
    pub aircraft_type: String,
    pub passenger_reservations_booking_designator: String,
    pub passenger_reservations_booking_modifier: String,
    pub meal_service_note: String,
    pub joint_operation_airline_designators: String,
    pub min_connecting_time_status_departure: String,
    pub min_connecting_time_status_arrival: String,
    pub secure_flight_indicator: String,
    pub itinerary_variation_identifier_overflow: String,
    pub aircraft_owner: String,
    pub cockpit_crew_employer: String,
    pub cabin_crew_employer: String,
    pub onward_airline_designator: String,
    pub onward_flight_number: String,
    pub aircraft_rotation_layover: String,
    pub onward_operational_suffix: String,
    pub flight_transit_layover: String,
    pub operating_airline_disclosure: String,
    pub traffic_restriction_code: String,
    pub traffic_restriction_code_leg_overflow_indicator: String,
    pub aircraft_configuration: String,
    pub date_variation: String,
    pub record_serial_number: u32,
}

impl LegRecord {
    pub fn key(&self) -> LegKey {
        LegKey {
            airline_designator: self.airline_designator.clone(),
            flight_number: self.flight_number,
            itinerary_variation_identifier: self.itinerary_variation_identifier,
            leg_sequence_number: self.leg_sequence_number,
            service_type: self.service_type.clone(),
        }
    }

    /// Join key shared by a flight and its segments, e.g. `XX_0012 01`
    ///
    /// Airline, the carrier's duplicate indicator, flight number and suffix,
    /// then the IVI with its overflow character. Blank parts collapse.
    pub fn flight_designator(&self, control_duplicate_indicator: &str) -> String {
        let designator = format!(
            "{}_{}{:04}{} {:02} {}",
            self.airline_designator,
            control_duplicate_indicator,
            self.flight_number,
            self.operational_suffix,
            self.itinerary_variation_identifier,
            self.itinerary_variation_identifier_overflow
        );
        designator.trim_end().to_string()
    }
}

/// Type 4: supplementary data attached to the preceding leg
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub operational_suffix: String,
    pub airline_designator: String,
    pub flight_number: u32,
    pub itinerary_variation_identifier: u32,
    pub leg_sequence_number: u32,
    pub service_type: String,
    pub itinerary_variation_identifier_overflow: String,
    pub board_point_indicator: String,
    pub off_point_indicator: String,
    pub data_element_identifier: u32,
    pub board_point: String,
    pub off_point: String,
    pub data: String,
    pub record_serial_number: u32,
}

/// Type 5: closes a carrier section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerRecord {
    pub airline_designator: String,
    pub release_date: Option<NaiveDate>,
    /// Serial number of the last record in the section
    pub serial_number_check_reference: u32,
    pub continuation_end_code: String,
    pub record_serial_number: u32,
}

/// Identity of a flight leg, shared by the leg and its element records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegKey {
    pub airline_designator: String,
    pub flight_number: u32,
    pub itinerary_variation_identifier: u32,
    pub leg_sequence_number: u32,
    pub service_type: String,
}

impl fmt::Display for LegKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{:02}/{:02}",
            self.airline_designator,
            self.flight_number,
            self.itinerary_variation_identifier,
            self.leg_sequence_number
        )
    }
}

/// A decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsimRecord {
    Filler,
    Header(HeaderRecord),
    Carrier(CarrierRecord),
    Leg(LegRecord),
    Element(ElementRecord),
    Trailer(TrailerRecord),
}

impl SsimRecord {
    pub fn record_type(&self) -> RecordType {
        match self {
            SsimRecord::Filler => RecordType::Filler,
            SsimRecord::Header(_) => RecordType::Header,
            SsimRecord::Carrier(_) => RecordType::Carrier,
            SsimRecord::Leg(_) => RecordType::Leg,
            SsimRecord::Element(_) => RecordType::Element,
            SsimRecord::Trailer(_) => RecordType::Trailer,
        }
    }

    pub fn record_serial_number(&self) -> Option<u32> {
        match self {
            SsimRecord::Filler => None,
            SsimRecord::Header(r) => Some(r.record_serial_number),
            SsimRecord::Carrier(r) => Some(r.record_serial_number),
            SsimRecord::Leg(r) => Some(r.record_serial_number),
            SsimRecord::Element(r) => Some(r.record_serial_number),
            SsimRecord::Trailer(r) => Some(r.record_serial_number),
        }
    }
}

/// Processing statistics for one parse
#[derive(Debug, Clone, Default)]
pub struct ParseSummary {
    pub lines_read: usize,
    pub header: Option<HeaderRecord>,
    pub carriers: usize,
    pub legs: usize,
    pub elements: usize,
    pub trailers: usize,
    pub filler_records: usize,
    pub batches_flushed: usize,
    /// First warnings encountered, capped
    pub warnings: Vec<StructuralWarning>,
    /// Total warnings, including those beyond the cap
    pub warning_count: usize,
    pub processing_time_ms: u128,
}

impl ParseSummary {
    /// Rows produced across all three tables
    pub fn table_rows(&self) -> usize {
        self.carriers + self.legs + self.elements
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_tags() {
        for tag in ['0', '1', '2', '3', '4', '5'] {
            let record_type = RecordType::from_tag(tag).unwrap();
            assert_eq!(record_type.tag(), tag);
        }
        assert_eq!(RecordType::from_tag('6'), None);
        assert_eq!(RecordType::from_tag('X'), None);
    }

    #[test]
    fn test_days_of_operation() {
        let days = DaysOfOperation::parse("1 3 5  ").unwrap();
        assert!(days.operates_on(1));
        assert!(!days.operates_on(2));
        assert!(days.operates_on(5));
        assert_eq!(days.count(), 3);
        assert_eq!(days.to_string(), "135");

        assert_eq!(DaysOfOperation::parse("1234567").unwrap().bits(), 0x7f);
        assert_eq!(DaysOfOperation::parse("       ").unwrap().count(), 0);
    }

    #[test]
    fn test_days_of_operation_rejects_misplaced_digits() {
        assert!(DaysOfOperation::parse("2      ").is_none());
        assert!(DaysOfOperation::parse("1234X67").is_none());
        assert!(DaysOfOperation::parse("123").is_none());
    }
}
