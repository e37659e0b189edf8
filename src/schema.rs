//! Table schemas and column-oriented row buffers.
//!
//! Each output table is declared once through `table_columns!`, which
//! generates the buffer struct, its Polars schema and the conversion into a
//! `DataFrame`. Columns that appear in several tables share a name and a
//! dtype, so the tables can be joined and merged.

use crate::constants::UNIX_EPOCH_DAYS_FROM_CE;
use crate::models::{CarrierRecord, ElementRecord, LegRecord, RecordType};
use crate::parser::LegContext;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::sync::LazyLock;

macro_rules! column_storage {
    (text) => { String };
    (uint) => { u32 };
    (line) => { u64 };
    (date) => { Option<i32> };
}

macro_rules! column_dtype {
    (text) => { DataType::String };
    (uint) => { DataType::UInt32 };
    (line) => { DataType::UInt64 };
    (date) => { DataType::Date };
}

macro_rules! column_build {
    (date, $name:expr, $values:expr) => {
        Column::new(PlSmallStr::from_static($name), $values).cast(&DataType::Date)?
    };
    ($kind:ident, $name:expr, $values:expr) => {
        Column::new(PlSmallStr::from_static($name), $values)
    };
}

macro_rules! table_columns {
    ($(#[$meta:meta])* $name:ident { $($column:ident: $kind:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        pub struct $name {
            rows: usize,
            $($column: Vec<column_storage!($kind)>,)*
        }

        impl $name {
            /// Polars schema of the table this buffer produces
            pub fn schema() -> Schema {
                Schema::from_iter([
                    $(Field::new(PlSmallStr::from_static(stringify!($column)), column_dtype!($kind)),)*
                ])
            }

            pub fn len(&self) -> usize {
                self.rows
            }

            pub fn is_empty(&self) -> bool {
                self.rows == 0
            }

            /// Drain buffered rows into a `DataFrame`, leaving the buffer empty
            pub fn take_frame(&mut self) -> PolarsResult<DataFrame> {
                self.rows = 0;
                DataFrame::new(vec![
                    $(column_build!($kind, stringify!($column), std::mem::take(&mut self.$column)),)*
                ])
            }
        }
    };
}

table_columns! {
    /// One row per carrier record
    CarrierColumns {
        record_type: text,
        airline_designator: text,
        time_mode: text,
        season: text,
        period_of_schedule_validity_from: date,
        period_of_schedule_validity_to: date,
        creation_date: date,
        title_of_data: text,
        release_date: date,
        schedule_status: text,
        creator_reference: text,
        duplicate_airline_designator_marker: text,
        general_information: text,
        in_flight_service_information: text,
        electronic_ticketing_information: text,
        creation_time: text,
        record_serial_number: uint,
        line_number: line,
    }
}

table_columns! {
    /// One row per flight leg record
    FlightColumns {
        record_type: text,
        airline_designator: text,
        control_duplicate_indicator: text,
        flight_designator: text,
        flight_number: uint,
        itinerary_variation_identifier: uint,
        leg_sequence_number: uint,
        service_type: text,
        operational_suffix: text,
        period_of_operation_from: date,
        period_of_operation_to: date,
        days_of_operation: text,
        frequency_rate: text,
        departure_station: text,
        scheduled_time_of_passenger_departure: text,
        scheduled_time_of_aircraft_departure: text,
        utc_local_time_variation_departure: text,
        passenger_terminal_departure: text,
        arrival_station: text,
        scheduled_time_of_aircraft_arrival: text,
        scheduled_time_of_passenger_arrival: text,
        utc_local_time_variation_arrival: text,
        passenger_terminal_arrival: text,
        aircraft_type: text,
        passenger_reservations_booking_designator: text,
        passenger_reservations_booking_modifier: text,
        meal_service_note: text,
        joint_operation_airline_designators: text,
        min_connecting_time_status_departure: text,
        min_connecting_time_status_arrival: text,
        secure_flight_indicator: text,
        itinerary_variation_identifier_overflow: text,
        aircraft_owner: text,
        cockpit_crew_employer: text,
        cabin_crew_employer: text,
        onward_airline_designator: text,
        onward_flight_number: text,
        aircraft_rotation_layover: text,
        onward_operational_suffix: text,
        flight_transit_layover: text,
        operating_airline_disclosure: text,
        traffic_restriction_code: text,
        traffic_restriction_code_leg_overflow_indicator: text,
        aircraft_configuration: text,
        date_variation: text,
        record_serial_number: uint,
        line_number: line,
    }
}

table_columns! {
    /// One row per segment data element, joined to its leg by flight designator
    SegmentColumns {
        record_type: text,
        airline_designator: text,
        control_duplicate_indicator: text,
        flight_designator: text,
        flight_number: uint,
        itinerary_variation_identifier: uint,
        leg_sequence_number: uint,
        service_type: text,
        operational_suffix: text,
        itinerary_variation_identifier_overflow: text,
        board_point_indicator: text,
        off_point_indicator: text,
        data_element_identifier: uint,
        board_point: text,
        off_point: text,
        data: text,
        record_serial_number: uint,
        line_number: line,
        leg_line_number: line,
    }
}

/// Days since 1970-01-01, the physical value of a Polars `Date`
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn record_tag(record_type: RecordType) -> String {
    record_type.tag().to_string()
}

impl CarrierColumns {
    pub fn push(&mut self, record: &CarrierRecord, line_number: usize) {
        self.record_type.push(record_tag(RecordType::Carrier));
        self.airline_designator.push(record.airline_designator.clone());
        self.time_mode.push(record.time_mode.clone());
        self.season.push(record.season.clone());
        self.period_of_schedule_validity_from
            .push(Some(epoch_days(record.period_of_schedule_validity_from)));
        self.period_of_schedule_validity_to
            .push(record.period_of_schedule_validity_to.map(epoch_days));
        self.creation_date.push(Some(epoch_days(record.creation_date)));
        self.title_of_data.push(record.title_of_data.clone());
        self.release_date.push(record.release_date.map(epoch_days));
        self.schedule_status.push(record.schedule_status.clone());
        self.creator_reference.push(record.creator_reference.clone());
        self.duplicate_airline_designator_marker
            .push(record.duplicate_airline_designator_marker.clone());
        self.general_information.push(record.general_information.clone());
        self.in_flight_service_information
            .push(record.in_flight_service_information.clone());
        self.electronic_ticketing_information
            .push(record.electronic_ticketing_information.clone());
        self.creation_time.push(record.creation_time.clone());
        self.record_serial_number.push(record.record_serial_number);
        self.line_number.push(line_number as u64);
        self.rows += 1;
    }
}

impl FlightColumns {
    /// `leg` is the context the tracker returned when registering `record`
    pub fn push(&mut self, record: &LegRecord, leg: &LegContext<'_>) {
        self.record_type.push(record_tag(RecordType::Leg));
        self.airline_designator.push(record.airline_designator.clone());
        self.control_duplicate_indicator
            .push(leg.control_duplicate_indicator.to_string());
        self.flight_designator.push(leg.flight_designator.to_string());
        self.flight_number.push(record.flight_number);
        self.itinerary_variation_identifier
            .push(record.itinerary_variation_identifier);
        self.leg_sequence_number.push(record.leg_sequence_number);
        self.service_type.push(record.service_type.clone());
        self.operational_suffix.push(record.operational_suffix.clone());
        self.period_of_operation_from
            .push(Some(epoch_days(record.period_of_operation_from)));
        self.period_of_operation_to
            .push(record.period_of_operation_to.map(epoch_days));
        self.days_of_operation
            .push(record.days_of_operation.to_string());
        self.frequency_rate.push(record.frequency_rate.clone());
        self.departure_station.push(record.departure_station.clone());
        self.scheduled_time_of_passenger_departure
            .push(record.scheduled_time_of_passenger_departure.clone());
        self.scheduled_time_of_aircraft_departure
            .push(record.scheduled_time_of_aircraft_departure.clone());
        self.utc_local_time_variation_departure
            .push(record.utc_local_time_variation_departure.clone());
        self.passenger_terminal_departure
            .push(record.passenger_terminal_departure.clone());
        self.arrival_station.push(record.arrival_station.clone());
        self.scheduled_time_of_aircraft_arrival
            .push(record.scheduled_time_of_aircraft_arrival.clone());
        self.scheduled_time_of_passenger_arrival
            .push(record.scheduled_time_of_passenger_arrival.clone());
        self.utc_local_time_variation_arrival
            .push(record.utc_local_time_variation_arrival.clone());
        self.passenger_terminal_arrival
            .push(record.passenger_terminal_arrival.clone());
        self.aircraft_type.push(record.aircraft_type.clone());
        self.passenger_reservations_booking_designator
            .push(record.passenger_reservations_booking_designator.clone());
        self.passenger_reservations_booking_modifier
            .push(record.passenger_reservations_booking_modifier.clone());
        self.meal_service_note.push(record.meal_service_note.clone());
        self.joint_operation_airline_designators
            .push(record.joint_operation_airline_designators.clone());
        self.min_connecting_time_status_departure
            .push(record.min_connecting_time_status_departure.clone());
        self.min_connecting_time_status_arrival
            .push(record.min_connecting_time_status_arrival.clone());
        self.secure_flight_indicator
            .push(record.secure_flight_indicator.clone());
        self.itinerary_variation_identifier_overflow
            .push(record.itinerary_variation_identifier_overflow.clone());
        self.aircraft_owner.push(record.aircraft_owner.clone());
        self.cockpit_crew_employer
            .push(record.cockpit_crew_employer.clone());
        self.cabin_crew_employer.push(record.cabin_crew_employer.clone());
        self.onward_airline_designator
            .push(record.onward_airline_designator.clone());
        self.onward_flight_number
            .push(record.onward_flight_number.clone());
        self.aircraft_rotation_layover
            .push(record.aircraft_rotation_layover.clone());
        self.onward_operational_suffix
            .push(record.onward_operational_suffix.clone());
        self.flight_transit_layover
            .push(record.flight_transit_layover.clone());
        self.operating_airline_disclosure
            .push(record.operating_airline_disclosure.clone());
        self.traffic_restriction_code
            .push(record.traffic_restriction_code.clone());
        self.traffic_restriction_code_leg_overflow_indicator
            .push(record.traffic_restriction_code_leg_overflow_indicator.clone());
        self.aircraft_configuration
            .push(record.aircraft_configuration.clone());
        self.date_variation.push(record.date_variation.clone());
        self.record_serial_number.push(record.record_serial_number);
        self.line_number.push(leg.line_number as u64);
        self.rows += 1;
    }
}

impl SegmentColumns {
    /// Key columns are the element's own; the owning leg contributes the
    /// flight designator and its line number
    pub fn push(&mut self, record: &ElementRecord, owner: &LegContext<'_>, line_number: usize) {
        self.record_type.push(record_tag(RecordType::Element));
        self.airline_designator.push(record.airline_designator.clone());
        self.control_duplicate_indicator
            .push(owner.control_duplicate_indicator.to_string());
        self.flight_designator.push(owner.flight_designator.to_string());
        self.flight_number.push(record.flight_number);
        self.itinerary_variation_identifier
            .push(record.itinerary_variation_identifier);
        self.leg_sequence_number.push(record.leg_sequence_number);
        self.service_type.push(record.service_type.clone());
        self.operational_suffix.push(record.operational_suffix.clone());
        self.itinerary_variation_identifier_overflow
            .push(record.itinerary_variation_identifier_overflow.clone());
        self.board_point_indicator
            .push(record.board_point_indicator.clone());
        self.off_point_indicator.push(record.off_point_indicator.clone());
        self.data_element_identifier
            .push(record.data_element_identifier);
        self.board_point.push(record.board_point.clone());
        self.off_point.push(record.off_point.clone());
        self.data.push(record.data.clone());
        self.record_serial_number.push(record.record_serial_number);
        self.line_number.push(line_number as u64);
        self.leg_line_number.push(owner.line_number as u64);
        self.rows += 1;
    }
}

static MERGED_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let tables = [
        CarrierColumns::schema(),
        FlightColumns::schema(),
        SegmentColumns::schema(),
    ];
    let mut merged = Schema::with_capacity(tables.iter().map(|s| s.len()).sum());
    for schema in &tables {
        for (name, dtype) in schema.iter() {
            if !merged.contains(name.as_str()) {
                merged.with_column(name.clone(), dtype.clone());
            }
        }
    }
    merged
});

/// Union of all table columns, carrier columns first
pub fn merged_schema() -> &'static Schema {
    &MERGED_SCHEMA
}

/// Reorder a frame to `schema`, adding null columns it lacks
pub fn align_to_schema(frame: &DataFrame, schema: &Schema) -> PolarsResult<DataFrame> {
    let height = frame.height();
    let columns = schema
        .iter()
        .map(|(name, dtype)| match frame.column(name.as_str()) {
            Ok(column) => column.clone(),
            Err(_) => Column::full_null(name.clone(), height, dtype),
        })
        .collect::<Vec<_>>();
    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_columns_have_one_dtype() {
        let merged = merged_schema();
        for schema in [
            CarrierColumns::schema(),
            FlightColumns::schema(),
            SegmentColumns::schema(),
        ] {
            for (name, dtype) in schema.iter() {
                assert_eq!(merged.get(name.as_str()), Some(dtype), "column {name}");
            }
        }
    }

    #[test]
    fn test_merged_schema_starts_with_carrier_columns() {
        let names: Vec<&str> = merged_schema().iter_names().map(|n| n.as_str()).collect();
        assert_eq!(names[0], "record_type");
        assert_eq!(names[1], "airline_designator");
        assert!(names.contains(&"leg_line_number"));
        assert!(names.contains(&"data_element_identifier"));
        assert_eq!(
            names.iter().filter(|n| **n == "line_number").count(),
            1
        );
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(2018, 3, 25).unwrap()), 17615);
    }

    #[test]
    fn test_empty_buffer_produces_typed_frame() {
        let mut buffer = SegmentColumns::default();
        let frame = buffer.take_frame().unwrap();
        assert_eq!(frame.height(), 0);
        let expected: Vec<DataType> = SegmentColumns::schema().iter_values().cloned().collect();
        assert_eq!(frame.dtypes(), expected);
    }

    #[test]
    fn test_align_adds_null_columns() {
        let mut buffer = CarrierColumns::default();
        let frame = buffer.take_frame().unwrap();
        let aligned = align_to_schema(&frame, merged_schema()).unwrap();
        assert_eq!(aligned.width(), merged_schema().len());
        assert_eq!(
            aligned.column("flight_number").unwrap().dtype(),
            &DataType::UInt32
        );
    }
}
