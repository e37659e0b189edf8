//! Cross-line parse context
//!
//! The tracker follows carrier sections as they open and close, indexes the
//! legs of the open section by key so that element records can be attached
//! to them, and tallies the records of each section for reconciliation
//! against its trailer.

use crate::constants::{LOGGED_SERIAL_WARNINGS, MAX_RECORDED_WARNINGS};
use crate::error::{Result, SsimError, StructuralWarning};
use crate::models::{CarrierRecord, ElementRecord, LegKey, LegRecord, TrailerRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Position of the tracker within the file structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    /// No carrier section open
    Idle,
    InCarrier,
    InLeg,
}

/// A leg of the open section as rows see it
#[derive(Debug, Clone, Copy)]
pub struct LegContext<'a> {
    pub key: &'a LegKey,
    pub line_number: usize,
    pub flight_designator: &'a str,
    pub control_duplicate_indicator: &'a str,
}

/// Airline, flight number, IVI and leg sequence; service type is not part of it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LegPrefix {
    airline_designator: String,
    flight_number: u32,
    itinerary_variation_identifier: u32,
    leg_sequence_number: u32,
}

impl LegPrefix {
    fn of_leg(key: &LegKey) -> Self {
        Self {
            airline_designator: key.airline_designator.clone(),
            flight_number: key.flight_number,
            itinerary_variation_identifier: key.itinerary_variation_identifier,
            leg_sequence_number: key.leg_sequence_number,
        }
    }

    fn of_element(element: &ElementRecord) -> Self {
        Self {
            airline_designator: element.airline_designator.clone(),
            flight_number: element.flight_number,
            itinerary_variation_identifier: element.itinerary_variation_identifier,
            leg_sequence_number: element.leg_sequence_number,
        }
    }
}

#[derive(Debug)]
struct SectionLeg {
    key: LegKey,
    line_number: usize,
    flight_designator: String,
}

#[derive(Debug)]
struct CarrierSection {
    airline_designator: String,
    control_duplicate_indicator: String,
    record_serial_number: u32,
    /// Most recent leg per prefix; a repeated prefix replaces the earlier leg
    legs_by_prefix: HashMap<LegPrefix, SectionLeg>,
    last_leg: Option<LegPrefix>,
    legs: u32,
    elements: u32,
}

impl CarrierSection {
    fn counted(&self) -> u32 {
        self.legs + self.elements
    }

    fn context<'a>(&'a self, leg: &'a SectionLeg) -> LegContext<'a> {
        LegContext {
            key: &leg.key,
            line_number: leg.line_number,
            flight_designator: &leg.flight_designator,
            control_duplicate_indicator: &self.control_duplicate_indicator,
        }
    }
}

/// Single-owner cursor over carrier sections
#[derive(Debug)]
pub struct ContextTracker {
    strict: bool,
    carriers_seen: usize,
    section: Option<CarrierSection>,
    last_serial: Option<u32>,
    serial_warnings: usize,
    warnings: Vec<StructuralWarning>,
    warning_count: usize,
}

impl ContextTracker {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            carriers_seen: 0,
            section: None,
            last_serial: None,
            serial_warnings: 0,
            warnings: Vec::new(),
            warning_count: 0,
        }
    }

    pub fn state(&self) -> SectionState {
        match &self.section {
            None => SectionState::Idle,
            Some(section) if section.last_leg.is_some() => SectionState::InLeg,
            Some(_) => SectionState::InCarrier,
        }
    }

    pub fn current_airline(&self) -> Option<&str> {
        self.section
            .as_ref()
            .map(|section| section.airline_designator.as_str())
    }

    /// Most recently seen leg of the open section
    pub fn current_leg(&self) -> Option<&LegKey> {
        let section = self.section.as_ref()?;
        let prefix = section.last_leg.as_ref()?;
        section.legs_by_prefix.get(prefix).map(|leg| &leg.key)
    }

    /// Record serial numbers should increase through the file
    pub fn observe_serial(&mut self, line_number: usize, serial: u32) {
        if let Some(previous) = self.last_serial {
            if serial <= previous {
                self.record_warning(StructuralWarning::SerialOutOfOrder {
                    line_number,
                    previous,
                    current: serial,
                });
            }
        }
        self.last_serial = Some(serial);
    }

    pub fn on_header(&mut self, line_number: usize) -> Result<()> {
        if self.carriers_seen > 0 {
            self.report(StructuralWarning::OutOfOrderHeader { line_number })?;
        }
        Ok(())
    }

    pub fn on_carrier(&mut self, carrier: &CarrierRecord, line_number: usize) -> Result<()> {
        if let Some(previous) = self.section.take() {
            debug!(
                "Carrier {} opened while {} ({} records) had no trailer",
                carrier.airline_designator,
                previous.airline_designator,
                previous.counted()
            );
            self.report(StructuralWarning::MissingTrailer {
                airline_designator: previous.airline_designator,
                line_number,
            })?;
        }

        self.carriers_seen += 1;
        self.section = Some(CarrierSection {
            airline_designator: carrier.airline_designator.clone(),
            control_duplicate_indicator: carrier.duplicate_airline_designator_marker.clone(),
            record_serial_number: carrier.record_serial_number,
            legs_by_prefix: HashMap::new(),
            last_leg: None,
            legs: 0,
            elements: 0,
        });
        Ok(())
    }

    /// Register a leg in the open section and return its row context
    pub fn on_leg(&mut self, leg: &LegRecord, line_number: usize) -> Result<LegContext<'_>> {
        let section = self
            .section
            .as_mut()
            .ok_or(SsimError::OrphanLeg { line_number })?;

        let key = leg.key();
        let prefix = LegPrefix::of_leg(&key);
        let entry = SectionLeg {
            flight_designator: leg.flight_designator(&section.control_duplicate_indicator),
            key,
            line_number,
        };
        section.legs_by_prefix.insert(prefix.clone(), entry);
        section.last_leg = Some(prefix);
        section.legs += 1;

        let section = &*section;
        match section
            .last_leg
            .as_ref()
            .and_then(|prefix| section.legs_by_prefix.get(prefix))
        {
            Some(entry) => Ok(section.context(entry)),
            None => Err(SsimError::OrphanLeg { line_number }),
        }
    }

    /// Find the most recent leg of the open section sharing the element's
    /// key prefix, without changing any state
    pub fn resolve_element(
        &self,
        element: &ElementRecord,
        line_number: usize,
    ) -> Result<LegContext<'_>> {
        let section = self.section.as_ref().ok_or_else(|| SsimError::OrphanElement {
            line_number,
            reason: "no carrier section is open".to_string(),
        })?;
        let Some(last_leg) = section
            .last_leg
            .as_ref()
            .and_then(|prefix| section.legs_by_prefix.get(prefix))
        else {
            return Err(SsimError::OrphanElement {
                line_number,
                reason: format!(
                    "no leg precedes it in carrier section {}",
                    section.airline_designator
                ),
            });
        };

        match section
            .legs_by_prefix
            .get(&LegPrefix::of_element(element))
        {
            Some(leg) => Ok(section.context(leg)),
            None => Err(SsimError::OrphanElement {
                line_number,
                reason: format!(
                    "key {} {}/{:02}/{:02} matches no leg of carrier section {} (last leg {})",
                    element.airline_designator,
                    element.flight_number,
                    element.itinerary_variation_identifier,
                    element.leg_sequence_number,
                    section.airline_designator,
                    last_leg.key
                ),
            }),
        }
    }

    /// Count an element that has been attached to a leg
    pub fn record_element(&mut self) {
        if let Some(section) = self.section.as_mut() {
            section.elements += 1;
        }
    }

    /// Close the open section, reconciling its tally against the trailer
    pub fn on_trailer(&mut self, trailer: &TrailerRecord, line_number: usize) -> Result<()> {
        let Some(section) = self.section.take() else {
            return self.report(StructuralWarning::TrailerWithoutCarrier { line_number });
        };

        if trailer.airline_designator != section.airline_designator {
            self.report(StructuralWarning::TrailerCarrierMismatch {
                expected: section.airline_designator.clone(),
                found: trailer.airline_designator.clone(),
                line_number,
            })?;
        }

        let declared = trailer
            .serial_number_check_reference
            .saturating_sub(section.record_serial_number);
        let counted = section.counted();
        if declared != counted {
            self.report(StructuralWarning::CountMismatch {
                airline_designator: section.airline_designator.clone(),
                line_number,
                declared,
                counted,
            })?;
        }

        debug!(
            "Closed carrier section {}: {} legs, {} elements",
            section.airline_designator, section.legs, section.elements
        );
        Ok(())
    }

    /// End of input must leave no section open
    pub fn finish(&self, last_line: usize) -> Result<()> {
        match &self.section {
            Some(section) => Err(SsimError::TruncatedFile {
                airline_designator: section.airline_designator.clone(),
                line_number: last_line,
            }),
            None => Ok(()),
        }
    }

    /// Retained warnings and the total number reported
    pub fn take_warnings(&mut self) -> (Vec<StructuralWarning>, usize) {
        let count = std::mem::take(&mut self.warning_count);
        (std::mem::take(&mut self.warnings), count)
    }

    fn report(&mut self, warning: StructuralWarning) -> Result<()> {
        if self.strict && warning.is_reconciliation() {
            return Err(warning.into_error());
        }
        self.record_warning(warning);
        Ok(())
    }

    fn record_warning(&mut self, warning: StructuralWarning) {
        if matches!(warning, StructuralWarning::SerialOutOfOrder { .. }) {
            // Files with reset serials would otherwise flood the log
            self.serial_warnings += 1;
            if self.serial_warnings < LOGGED_SERIAL_WARNINGS {
                warn!("{}", warning);
            } else if self.serial_warnings == LOGGED_SERIAL_WARNINGS {
                warn!("{}; further serial number warnings are logged at debug level", warning);
            } else {
                debug!("{}", warning);
            }
        } else {
            warn!("{}", warning);
        }

        self.warning_count += 1;
        if self.warnings.len() < MAX_RECORDED_WARNINGS {
            self.warnings.push(warning);
        }
    }

    /// Serial number warnings reported so far
    pub fn serial_warning_count(&self) -> usize {
        self.serial_warnings
    }
}
