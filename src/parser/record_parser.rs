//! Record decoders, one per SSIM record type
//!
//! Each decoder is pure: it maps the fixed column layout of its record type
//! onto a typed record and never consults parse context.

use super::field_parsers::{
    RawRecord, parse_airline_designator, parse_days_of_operation, parse_open_date,
    parse_optional_date, parse_required_date, parse_required_string, parse_required_u32,
    parse_string, parse_time, parse_utc_variation,
};
use super::layout;
use crate::Result;
use crate::models::{
    CarrierRecord, ElementRecord, HeaderRecord, LegRecord, RecordType, TrailerRecord,
};

/// Parse a type 1 header record
pub fn parse_header_record(line: &str, line_number: usize) -> Result<HeaderRecord> {
    use layout::header::*;
    let record = RawRecord::new(line, line_number, RecordType::Header);

    Ok(HeaderRecord {
        title_of_contents: parse_string(&record, "title_of_contents", TITLE_OF_CONTENTS)?,
        number_of_seasons: parse_string(&record, "number_of_seasons", NUMBER_OF_SEASONS)?,
        data_set_serial_number: parse_required_u32(
            &record,
            "data_set_serial_number",
            DATA_SET_SERIAL_NUMBER,
        )?,
        record_serial_number: parse_required_u32(
            &record,
            "record_serial_number",
            RECORD_SERIAL_NUMBER,
        )?,
    })
}

/// Parse a type 2 carrier record
pub fn parse_carrier_record(line: &str, line_number: usize) -> Result<CarrierRecord> {
    use layout::carrier::*;
    let record = RawRecord::new(line, line_number, RecordType::Carrier);

    Ok(CarrierRecord {
        time_mode: parse_string(&record, "time_mode", TIME_MODE)?,
        airline_designator: parse_airline_designator(
            &record,
            "airline_designator",
            AIRLINE_DESIGNATOR,
        )?,
        season: parse_string(&record, "season", SEASON)?,
        period_of_schedule_validity_from: parse_required_date(
            &record,
            "period_of_schedule_validity_from",
            VALIDITY_FROM,
        )?,
        period_of_schedule_validity_to: parse_open_date(
            &record,
            "period_of_schedule_validity_to",
            VALIDITY_TO,
        )?,
        creation_date: parse_required_date(&record, "creation_date", CREATION_DATE)?,
        title_of_data: parse_string(&record, "title_of_data", TITLE_OF_DATA)?,
        release_date: parse_optional_date(&record, "release_date", RELEASE_DATE)?,
        schedule_status: parse_string(&record, "schedule_status", SCHEDULE_STATUS)?,
        creator_reference: parse_string(&record, "creator_reference", CREATOR_REFERENCE)?,
        duplicate_airline_designator_marker: parse_string(
            &record,
            "duplicate_airline_designator_marker",
            DUPLICATE_DESIGNATOR_MARKER,
        )?,
        general_information: parse_string(&record, "general_information", GENERAL_INFORMATION)?,
        in_flight_service_information: parse_string(
            &record,
            "in_flight_service_information",
            IN_FLIGHT_SERVICE_INFORMATION,
        )?,
        electronic_ticketing_information: parse_string(
            &record,
            "electronic_ticketing_information",
            ELECTRONIC_TICKETING_INFORMATION,
        )?,
        creation_time: parse_string(&record, "creation_time", CREATION_TIME)?,
        record_serial_number: parse_required_u32(
            &record,
            "record_serial_number",
            RECORD_SERIAL_NUMBER,
        )?,
    })
}

/// Parse a type 3 flight leg record
pub fn parse_leg_record(line: &str, line_number: usize) -> Result<LegRecord> {
    use layout::leg::*;
    let record = RawRecord::new(line, line_number, RecordType::Leg);

    // Key fields first so a bad key is reported before any schedule detail
    let operational_suffix = parse_string(&record, "operational_suffix", OPERATIONAL_SUFFIX)?;
    let airline_designator =
        parse_airline_designator(&record, "airline_designator", AIRLINE_DESIGNATOR)?;
    let flight_number = parse_required_u32(&record, "flight_number", FLIGHT_NUMBER)?;
    let itinerary_variation_identifier = parse_required_u32(
        &record,
        "itinerary_variation_identifier",
        ITINERARY_VARIATION_IDENTIFIER,
    )?;
    let leg_sequence_number =
        parse_required_u32(&record, "leg_sequence_number", LEG_SEQUENCE_NUMBER)?;
    let service_type = parse_required_string(&record, "service_type", SERVICE_TYPE)?;

    Ok(LegRecord {
        operational_suffix,
        airline_designator,
        flight_number,
        itinerary_variation_identifier,
        leg_sequence_number,
        service_type,
        period_of_operation_from: parse_required_date(
            &record,
            "period_of_operation_from",
            PERIOD_OF_OPERATION_FROM,
        )?,
        period_of_operation_to: parse_open_date(
            &record,
            "period_of_operation_to",
            PERIOD_OF_OPERATION_TO,
        )?,
        days_of_operation: parse_days_of_operation(
            &record,
            "days_of_operation",
            DAYS_OF_OPERATION,
        )?,
        frequency_rate: parse_string(&record, "frequency_rate", FREQUENCY_RATE)?,
        departure_station: parse_required_string(&record, "departure_station", DEPARTURE_STATION)?,
        scheduled_time_of_passenger_departure: parse_time(
            &record,
            "scheduled_time_of_passenger_departure",
            PASSENGER_DEPARTURE_TIME,
        )?,
        scheduled_time_of_aircraft_departure: parse_time(
            &record,
            "scheduled_time_of_aircraft_departure",
            AIRCRAFT_DEPARTURE_TIME,
        )?,
        utc_local_time_variation_departure: parse_utc_variation(
            &record,
            "utc_local_time_variation_departure",
            DEPARTURE_UTC_VARIATION,
        )?,
        passenger_terminal_departure: parse_string(
            &record,
            "passenger_terminal_departure",
            PASSENGER_TERMINAL_DEPARTURE,
        )?,
        arrival_station: parse_required_string(&record, "arrival_station", ARRIVAL_STATION)?,
        scheduled_time_of_aircraft_arrival: parse_time(
            &record,
            "scheduled_time_of_aircraft_arrival",
            AIRCRAFT_ARRIVAL_TIME,
        )?,
        scheduled_time_of_passenger_arrival: parse_time(
            &record,
            "scheduled_time_of_passenger_arrival",
            PASSENGER_ARRIVAL_TIME,
        )?,
        utc_local_time_variation_arrival: parse_utc_variation(
            &record,
            "utc_local_time_variation_arrival",
            ARRIVAL_UTC_VARIATION,
        )?,
        passenger_terminal_arrival: parse_string(
            &record,
            "passenger_terminal_arrival",
            PASSENGER_TERMINAL_ARRIVAL,
        )?,
        aircraft_type: parse_string(&record, "aircraft_type", AIRCRAFT_TYPE)?,
        passenger_reservations_booking_designator: parse_string(
            &record,
            "passenger_reservations_booking_designator",
            BOOKING_DESIGNATOR,
        )?,
        passenger_reservations_booking_modifier: parse_string(
            &record,
            "passenger_reservations_booking_modifier",
            BOOKING_MODIFIER,
        )?,
        meal_service_note: parse_string(&record, "meal_service_note", MEAL_SERVICE_NOTE)?,
        joint_operation_airline_designators: parse_string(
            &record,
            "joint_operation_airline_designators",
            JOINT_OPERATION_AIRLINE_DESIGNATORS,
        )?,
        min_connecting_time_status_departure: parse_string(
            &record,
            "min_connecting_time_status_departure",
            MCT_STATUS_DEPARTURE,
        )?,
        min_connecting_time_status_arrival: parse_string(
            &record,
            "min_connecting_time_status_arrival",
            MCT_STATUS_ARRIVAL,
        )?,
        secure_flight_indicator: parse_string(
            &record,
            "secure_flight_indicator",
            SECURE_FLIGHT_INDICATOR,
        )?,
        itinerary_variation_identifier_overflow: parse_string(
            &record,
            "itinerary_variation_identifier_overflow",
            IVI_OVERFLOW,
        )?,
        aircraft_owner: parse_string(&record, "aircraft_owner", AIRCRAFT_OWNER)?,
        cockpit_crew_employer: parse_string(&record, "cockpit_crew_employer", COCKPIT_CREW_EMPLOYER)?,
        cabin_crew_employer: parse_string(&record, "cabin_crew_employer", CABIN_CREW_EMPLOYER)?,
        onward_airline_designator: parse_string(
            &record,
            "onward_airline_designator",
            ONWARD_AIRLINE_DESIGNATOR,
        )?,
        onward_flight_number: parse_string(&record, "onward_flight_number", ONWARD_FLIGHT_NUMBER)?,
        aircraft_rotation_layover: parse_string(
            &record,
            "aircraft_rotation_layover",
            AIRCRAFT_ROTATION_LAYOVER,
        )?,
        onward_operational_suffix: parse_string(
            &record,
            "onward_operational_suffix",
            ONWARD_OPERATIONAL_SUFFIX,
        )?,
        flight_transit_layover: parse_string(
            &record,
            "flight_transit_layover",
            FLIGHT_TRANSIT_LAYOVER,
        )?,
        operating_airline_disclosure: parse_string(
            &record,
            "operating_airline_disclosure",
            OPERATING_AIRLINE_DISCLOSURE,
        )?,
        traffic_restriction_code: parse_string(
            &record,
            "traffic_restriction_code",
            TRAFFIC_RESTRICTION_CODE,
        )?,
        traffic_restriction_code_leg_overflow_indicator: parse_string(
            &record,
            "traffic_restriction_code_leg_overflow_indicator",
            TRC_LEG_OVERFLOW,
        )?,
        aircraft_configuration: parse_string(
            &record,
            "aircraft_configuration",
            AIRCRAFT_CONFIGURATION,
        )?,
        date_variation: parse_string(&record, "date_variation", DATE_VARIATION)?,
        record_serial_number: parse_required_u32(
            &record,
            "record_serial_number",
            RECORD_SERIAL_NUMBER,
        )?,
    })
}

/// Parse a type 4 segment data element record
pub fn parse_element_record(line: &str, line_number: usize) -> Result<ElementRecord> {
    use layout::element::*;
    let record = RawRecord::new(line, line_number, RecordType::Element);

    Ok(ElementRecord {
        operational_suffix: parse_string(&record, "operational_suffix", OPERATIONAL_SUFFIX)?,
        airline_designator: parse_airline_designator(
            &record,
            "airline_designator",
            AIRLINE_DESIGNATOR,
        )?,
        flight_number: parse_required_u32(&record, "flight_number", FLIGHT_NUMBER)?,
        itinerary_variation_identifier: parse_required_u32(
            &record,
            "itinerary_variation_identifier",
            ITINERARY_VARIATION_IDENTIFIER,
        )?,
        leg_sequence_number: parse_required_u32(
            &record,
            "leg_sequence_number",
            LEG_SEQUENCE_NUMBER,
        )?,
        service_type: parse_required_string(&record, "service_type", SERVICE_TYPE)?,
        itinerary_variation_identifier_overflow: parse_string(
            &record,
            "itinerary_variation_identifier_overflow",
            IVI_OVERFLOW,
        )?,
        board_point_indicator: parse_string(&record, "board_point_indicator", BOARD_POINT_INDICATOR)?,
        off_point_indicator: parse_string(&record, "off_point_indicator", OFF_POINT_INDICATOR)?,
        data_element_identifier: parse_required_u32(
            &record,
            "data_element_identifier",
            DATA_ELEMENT_IDENTIFIER,
        )?,
        board_point: parse_string(&record, "board_point", BOARD_POINT)?,
        off_point: parse_string(&record, "off_point", OFF_POINT)?,
        data: parse_string(&record, "data", DATA)?,
        record_serial_number: parse_required_u32(
            &record,
            "record_serial_number",
            RECORD_SERIAL_NUMBER,
        )?,
    })
}

/// Parse a type 5 carrier trailer record
pub fn parse_trailer_record(line: &str, line_number: usize) -> Result<TrailerRecord> {
    use layout::trailer::*;
    let record = RawRecord::new(line, line_number, RecordType::Trailer);

    Ok(TrailerRecord {
        airline_designator: parse_airline_designator(
            &record,
            "airline_designator",
            AIRLINE_DESIGNATOR,
        )?,
        release_date: parse_optional_date(&record, "release_date", RELEASE_DATE)?,
        serial_number_check_reference: parse_required_u32(
            &record,
            "serial_number_check_reference",
            SERIAL_NUMBER_CHECK_REFERENCE,
        )?,
        continuation_end_code: parse_string(
            &record,
            "continuation_end_code",
            CONTINUATION_END_CODE,
        )?,
        record_serial_number: parse_required_u32(
            &record,
            "record_serial_number",
            RECORD_SERIAL_NUMBER,
        )?,
    })
}
