//! Fixed column layout of each SSIM record type (Chapter 7).
//!
//! Ranges are zero-based and half-open over the 200 byte record.

use std::ops::Range;

pub type Columns = Range<usize>;

pub mod header {
    use super::Columns;

    pub const TITLE_OF_CONTENTS: Columns = 1..35;
    pub const NUMBER_OF_SEASONS: Columns = 40..41;
    pub const DATA_SET_SERIAL_NUMBER: Columns = 191..194;
    pub const RECORD_SERIAL_NUMBER: Columns = 194..200;
}

pub mod carrier {
    use super::Columns;

    pub const TIME_MODE: Columns = 1..2;
    pub const AIRLINE_DESIGNATOR: Columns = 2..5;
    pub const SEASON: Columns = 10..13;
    pub const VALIDITY_FROM: Columns = 14..21;
    pub const VALIDITY_TO: Columns = 21..28;
    pub const CREATION_DATE: Columns = 28..35;
    pub const TITLE_OF_DATA: Columns = 35..64;
    pub const RELEASE_DATE: Columns = 64..71;
    pub const SCHEDULE_STATUS: Columns = 71..72;
    pub const CREATOR_REFERENCE: Columns = 72..107;
    pub const DUPLICATE_DESIGNATOR_MARKER: Columns = 107..108;
    pub const GENERAL_INFORMATION: Columns = 108..169;
    pub const IN_FLIGHT_SERVICE_INFORMATION: Columns = 169..188;
    pub const ELECTRONIC_TICKETING_INFORMATION: Columns = 188..190;
    pub const CREATION_TIME: Columns = 190..194;
    pub const RECORD_SERIAL_NUMBER: Columns = 194..200;
}

pub mod leg {
    use super::Columns;

    pub const OPERATIONAL_SUFFIX: Columns = 1..2;
    pub const AIRLINE_DESIGNATOR: Columns = 2..5;
    pub const FLIGHT_NUMBER: Columns = 5..9;
    pub const ITINERARY_VARIATION_IDENTIFIER: Columns = 9..11;
    pub const LEG_SEQUENCE_NUMBER: Columns = 11..13;
    pub const SERVICE_TYPE: Columns = 13..14;
    pub const PERIOD_OF_OPERATION_FROM: Columns = 14..21;
    pub const PERIOD_OF_OPERATION_TO: Columns = 21..28;
    pub const DAYS_OF_OPERATION: Columns = 28..35;
    pub const FREQUENCY_RATE: Columns = 35..36;
    pub const DEPARTURE_STATION: Columns = 36..39;
    pub const PASSENGER_DEPARTURE_TIME: Columns = 39..43;
    pub const AIRCRAFT_DEPARTURE_TIME: Columns = 43..47;
    pub const DEPARTURE_UTC_VARIATION: Columns = 47..52;
    pub const PASSENGER_TERMINAL_DEPARTURE: Columns = 52..54;
    pub const ARRIVAL_STATION: Columns = 54..57;
    pub const AIRCRAFT_ARRIVAL_TIME: Columns = 57..61;
    pub const PASSENGER_ARRIVAL_TIME: Columns = 61..65;
    pub const ARRIVAL_UTC_VARIATION: Columns = 65..70;
    pub const PASSENGER_TERMINAL_ARRIVAL: Columns = 70..72;
    pub const AIRCRAFT_TYPE: Columns = 72..75;
    pub const BOOKING_DESIGNATOR: Columns = 75..95;
    pub const BOOKING_MODIFIER: Columns = 95..100;
    pub const MEAL_SERVICE_NOTE: Columns = 100..110;
    pub const JOINT_OPERATION_AIRLINE_DESIGNATORS: Columns = 110..119;
    pub const MCT_STATUS_DEPARTURE: Columns = 119..120;
    pub const MCT_STATUS_ARRIVAL: Columns = 120..121;
    pub const SECURE_FLIGHT_INDICATOR: Columns = 121..122;
    pub const IVI_OVERFLOW: Columns = 127..128;
    pub const AIRCRAFT_OWNER: Columns = 128..131;
    pub const COCKPIT_CREW_EMPLOYER: Columns = 131..134;
    pub const CABIN_CREW_EMPLOYER: Columns = 134..137;
    pub const ONWARD_AIRLINE_DESIGNATOR: Columns = 137..140;
    pub const ONWARD_FLIGHT_NUMBER: Columns = 140..144;
    pub const AIRCRAFT_ROTATION_LAYOVER: Columns = 144..145;
    pub const ONWARD_OPERATIONAL_SUFFIX: Columns = 145..146;
    pub const FLIGHT_TRANSIT_LAYOVER: Columns = 147..148;
    pub const OPERATING_AIRLINE_DISCLOSURE: Columns = 148..149;
    pub const TRAFFIC_RESTRICTION_CODE: Columns = 149..160;
    pub const TRC_LEG_OVERFLOW: Columns = 160..161;
    pub const AIRCRAFT_CONFIGURATION: Columns = 172..192;
    pub const DATE_VARIATION: Columns = 192..194;
    pub const RECORD_SERIAL_NUMBER: Columns = 194..200;
}

pub mod element {
    use super::Columns;

    pub const OPERATIONAL_SUFFIX: Columns = 1..2;
    pub const AIRLINE_DESIGNATOR: Columns = 2..5;
    pub const FLIGHT_NUMBER: Columns = 5..9;
    pub const ITINERARY_VARIATION_IDENTIFIER: Columns = 9..11;
    pub const LEG_SEQUENCE_NUMBER: Columns = 11..13;
    pub const SERVICE_TYPE: Columns = 13..14;
    pub const IVI_OVERFLOW: Columns = 27..28;
    pub const BOARD_POINT_INDICATOR: Columns = 28..29;
    pub const OFF_POINT_INDICATOR: Columns = 29..30;
    pub const DATA_ELEMENT_IDENTIFIER: Columns = 30..33;
    pub const BOARD_POINT: Columns = 33..36;
    pub const OFF_POINT: Columns = 36..39;
    pub const DATA: Columns = 39..194;
    pub const RECORD_SERIAL_NUMBER: Columns = 194..200;
}

pub mod trailer {
    use super::Columns;

    pub const AIRLINE_DESIGNATOR: Columns = 2..5;
    pub const RELEASE_DATE: Columns = 5..12;
    pub const SERIAL_NUMBER_CHECK_REFERENCE: Columns = 187..193;
    pub const CONTINUATION_END_CODE: Columns = 193..194;
    pub const RECORD_SERIAL_NUMBER: Columns = 194..200;
}
