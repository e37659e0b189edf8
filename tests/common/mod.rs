//! Shared fixture builder for integration tests
//!
//! Generates well-formed SSIM files whose trailers reconcile.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const RECORD_LENGTH: usize = 200;

fn record(tag: char, fields: &[(usize, &str)], serial: u32) -> String {
    let mut bytes = vec![b' '; RECORD_LENGTH];
    bytes[0] = tag as u8;
    for (offset, value) in fields {
        bytes[*offset..*offset + value.len()].copy_from_slice(value.as_bytes());
    }
    let serial = format!("{:06}", serial);
    bytes[194..200].copy_from_slice(serial.as_bytes());
    String::from_utf8(bytes).unwrap()
}

pub fn header_line(serial: u32) -> String {
    record('1', &[(1, "AIRLINE STANDARD SCHEDULE DATA SET"), (191, "001")], serial)
}

pub fn carrier_line(airline: &str, serial: u32) -> String {
    let airline = format!("{:<3}", airline);
    record(
        '2',
        &[
            (1, "U"),
            (2, &airline),
            (10, "W23"),
            (14, "29OCT23"),
            (21, "30MAR24"),
            (28, "01SEP23"),
            (35, "WINTER"),
            (71, "P"),
        ],
        serial,
    )
}

pub fn leg_line(airline: &str, flight: u32, ivi: u32, serial: u32) -> String {
    let airline = format!("{:<3}", airline);
    let flight = format!("{:>4}", flight);
    let ivi = format!("{:02}", ivi);
    record(
        '3',
        &[
            (2, &airline),
            (5, &flight),
            (9, &ivi),
            (11, "01"),
            (13, "J"),
            (14, "29OCT23"),
            (21, "00XXX00"),
            (28, "12345  "),
            (36, "LHR"),
            (39, "0905"),
            (43, "0905"),
            (47, "+0000"),
            (54, "JFK"),
            (57, "1210"),
            (61, "1210"),
            (65, "-0500"),
            (72, "77W"),
            (75, "JCDY"),
        ],
        serial,
    )
}

pub fn element_line(airline: &str, flight: u32, ivi: u32, dei: u32, serial: u32) -> String {
    let airline = format!("{:<3}", airline);
    let flight = format!("{:>4}", flight);
    let ivi = format!("{:02}", ivi);
    let dei = format!("{:03}", dei);
    record(
        '4',
        &[
            (2, &airline),
            (5, &flight),
            (9, &ivi),
            (11, "01"),
            (13, "J"),
            (28, "A"),
            (29, "B"),
            (30, &dei),
            (33, "LHR"),
            (36, "JFK"),
            (39, "AA 6143"),
        ],
        serial,
    )
}

pub fn trailer_line(airline: &str, check_reference: u32, serial: u32) -> String {
    let airline = format!("{:<3}", airline);
    let check_reference = format!("{:06}", check_reference);
    record('5', &[(2, &airline), (187, &check_reference), (193, "E")], serial)
}

/// Builds `carriers x flights x variations` legs with `elements` segments each
pub fn schedule_lines(carriers: &[&str], flights: u32, variations: u32, elements: u32) -> Vec<String> {
    let mut serial = 1;
    let mut lines = vec![header_line(serial)];
    for airline in carriers {
        serial += 1;
        lines.push(carrier_line(airline, serial));
        for flight in 1..=flights {
            for ivi in 1..=variations {
                serial += 1;
                lines.push(leg_line(airline, flight, ivi, serial));
                for element in 0..elements {
                    serial += 1;
                    lines.push(element_line(airline, flight, ivi, 10 + element, serial));
                }
            }
        }
        let check_reference = serial;
        serial += 1;
        lines.push(trailer_line(airline, check_reference, serial));
    }
    lines
}

/// Write a schedule file into `dir` and return its path
pub fn write_schedule(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}
