//! Test utilities for SSIM parser and processor testing
//!
//! Builds well-formed 200 byte records field by field and generates whole
//! files with consistent serial numbers, so trailer reconciliation holds.

use crate::constants::RECORD_LENGTH;


pub const HEADER_TITLE: &str = "AIRLINE STANDARD SCHEDULE DATA SET";

/// A blank record with fields written at their column offsets
#[derive(Debug, Clone)]
pub struct RecordLine {
    bytes: Vec<u8>,
}

impl RecordLine {
    pub fn new(tag: char) -> Self {
        let mut bytes = vec![b' '; RECORD_LENGTH];
        bytes[0] = tag as u8;
        Self { bytes }
    }

    pub fn put(mut self, offset: usize, value: &str) -> Self {
        self.bytes[offset..offset + value.len()].copy_from_slice(value.as_bytes());
        self
    }

    pub fn serial(self, serial: u32) -> Self {
        self.put(194, &format!("{:06}", serial))
    }

    pub fn build(self) -> String {
        String::from_utf8(self.bytes).unwrap()
    }
}

pub fn header_line(serial: u32) -> String {
    RecordLine::new('1')
        .put(1, HEADER_TITLE)
        .put(191, "001")
        .serial(serial)
        .build()
}

pub fn carrier_line(airline: &str, serial: u32) -> String {
    RecordLine::new('2')
        .put(1, "U")
        .put(2, &format!("{:<3}", airline))
        .put(10, "S18")
        .put(14, "25MAR18")
        .put(21, "27OCT18")
        .put(28, "13OCT17")
        .put(35, "SUMMER SCHEDULE")
        .put(71, "P")
        .put(190, "1301")
        .serial(serial)
        .build()
}

pub fn leg_line(airline: &str, flight: u32, ivi: u32, leg: u32, serial: u32) -> String {
    RecordLine::new('3')
        .put(2, &format!("{:<3}", airline))
        .put(5, &format!("{:>4}", flight))
        .put(9, &format!("{:02}", ivi))
        .put(11, &format!("{:02}", leg))
        .put(13, "J")
        .put(14, "28MAR18")
        .put(21, "03APR18")
        .put(28, "1 3 5 7")
        .put(36, "KEF")
        .put(39, "0510")
        .put(43, "0510")
        .put(47, "+0000")
        .put(54, "AMS")
        .put(57, "0800")
        .put(61, "0800")
        .put(65, "+0200")
        .put(72, "73H")
        .put(75, "Y")
        .put(137, "XY")
        .put(142, "13")
        .put(172, "Y189VV738H189")
        .serial(serial)
        .build()
}

pub fn element_line(airline: &str, flight: u32, ivi: u32, leg: u32, dei: u32, serial: u32) -> String {
    RecordLine::new('4')
        .put(2, &format!("{:<3}", airline))
        .put(5, &format!("{:>4}", flight))
        .put(9, &format!("{:02}", ivi))
        .put(11, &format!("{:02}", leg))
        .put(13, "J")
        .put(28, "A")
        .put(29, "B")
        .put(30, &format!("{:03}", dei))
        .put(33, "AMS")
        .put(36, "GRQ")
        .put(39, "KL 2562")
        .serial(serial)
        .build()
}

pub fn trailer_line(airline: &str, check_reference: u32, serial: u32) -> String {
    RecordLine::new('5')
        .put(2, &format!("{:<3}", airline))
        .put(187, &format!("{:06}", check_reference))
        .put(193, "E")
        .serial(serial)
        .build()
}

/// Generator for complete, well-formed SSIM files
#[derive(Debug, Clone)]
pub struct SsimFixture {
    pub carriers: Vec<String>,
    pub flights: u32,
    pub variations: u32,
    pub elements_per_leg: u32,
}

impl SsimFixture {
    pub fn new(carriers: &[&str], flights: u32, variations: u32, elements_per_leg: u32) -> Self {
        Self {
            carriers: carriers.iter().map(|c| c.to_string()).collect(),
            flights,
            variations,
            elements_per_leg,
        }
    }

    pub fn legs_per_carrier(&self) -> usize {
        (self.flights * self.variations) as usize
    }

    pub fn lines(&self) -> Vec<String> {
        let mut serial = 1;
        let mut lines = vec![header_line(serial)];

        for airline in &self.carriers {
            serial += 1;
            lines.push(carrier_line(airline, serial));
            for flight in 1..=self.flights {
                for ivi in 1..=self.variations {
                    serial += 1;
                    lines.push(leg_line(airline, flight, ivi, 1, serial));
                    for element in 0..self.elements_per_leg {
                        serial += 1;
                        lines.push(element_line(airline, flight, ivi, 1, 50 + element, serial));
                    }
                }
            }
            let check_reference = serial;
            serial += 1;
            lines.push(trailer_line(airline, check_reference, serial));
        }
        lines
    }

    pub fn render(&self) -> String {
        let mut content = self.lines().join("\n");
        content.push('\n');
        content
    }
}
