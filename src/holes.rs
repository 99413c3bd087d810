//! Hole ledger: near-duplicate merging of drill hits before emission.
//!
//! Every hole enters the ledger as either fixed (final) or loose (a merge
//! candidate). A loose hole that lands within the merge margin of an
//! existing loose hole with the same diameter and plating is merged with it:
//! the pair becomes one fixed hole at their midpoint. First match wins; the
//! scan is linear because a board carries few enough holes.

use std::fmt;

use crate::defaults;
use crate::types::{AlmostEq, Location, Tolerance};

/// A drill hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hole {
    pub location: Location,
    pub diameter: f64,
    pub plated: bool,
}

impl Hole {
    /// A plated hole
    pub fn new(location: Location, diameter: f64) -> Self {
        Hole { location, diameter, plated: true }
    }

    pub fn non_plated(location: Location, diameter: f64) -> Self {
        Hole { location, diameter, plated: false }
    }

    /// Same kind of hole, centers strictly closer than `margin`
    pub fn too_close(&self, other: &Hole, margin: f64, tolerance: Tolerance) -> bool {
        self.plated == other.plated
            && self.diameter.almost_eq(&other.diameter, tolerance)
            && self.location.distance(other.location) < margin
    }

    /// One hole halfway between the two
    pub fn merged(&self, other: &Hole) -> Hole {
        Hole { location: self.location.midpoint(other.location), ..*self }
    }
}

impl AlmostEq for Hole {
    fn almost_eq(&self, other: &Hole, tolerance: Tolerance) -> bool {
        self.plated == other.plated
            && self.diameter.almost_eq(&other.diameter, tolerance)
            && self.location.almost_eq(&other.location, tolerance)
    }
}

impl fmt::Display for Hole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ⌀{:.3}{}",
            self.location,
            self.diameter,
            if self.plated { "" } else { " npth" }
        )
    }
}

/// Which bucket a hole enters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoleState {
    Fixed,
    Loose,
}

/// Receiver of drill hits, typically an Excellon writer
pub trait HoleSink {
    fn add_hole(&mut self, location: Location, diameter: f64, plated: bool);
}

/// Owner of every hole on a board until write-out
#[derive(Clone, Debug)]
pub struct HoleLedger {
    fixed: Vec<Hole>,
    loose: Vec<Hole>,
    merge_margin: f64,
    merging: bool,
    tolerance: Tolerance,
}

impl Default for HoleLedger {
    fn default() -> Self {
        HoleLedger {
            fixed: Vec::new(),
            loose: Vec::new(),
            merge_margin: defaults::HOLE_MERGE_MARGIN,
            merging: true,
            tolerance: defaults::TOLERANCE,
        }
    }
}

impl HoleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_merge_margin(mut self, margin: f64) -> Self {
        self.merge_margin = margin;
        self
    }

    /// With merging off every hole is fixed on arrival
    pub fn with_merging(mut self, merging: bool) -> Self {
        self.merging = merging;
        self
    }

    /// Precision for the diameter comparison
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn add(&mut self, hole: Hole, state: HoleState) {
        if state == HoleState::Fixed || !self.merging {
            self.fixed.push(hole);
            return;
        }

        let margin = self.merge_margin;
        let tolerance = self.tolerance;
        match self.loose.iter().position(|h| h.too_close(&hole, margin, tolerance)) {
            Some(index) => {
                let merged = self.loose.remove(index).merged(&hole);
                crate::log::debug!(
                    x = merged.location.x,
                    y = merged.location.y,
                    "merged loose holes"
                );
                self.fixed.push(merged);
            }
            None => self.loose.push(hole),
        }
    }

    pub fn fixed(&self) -> &[Hole] {
        &self.fixed
    }

    pub fn loose(&self) -> &[Hole] {
        &self.loose
    }

    pub fn len(&self) -> usize {
        self.fixed.len() + self.loose.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand every hole to `sink`, fixed ones first, and return how many
    pub fn flush(self, sink: &mut dyn HoleSink) -> usize {
        let count = self.len();
        for hole in self.fixed.into_iter().chain(self.loose) {
            sink.add_hole(hole.location, hole.diameter, hole.plated);
        }
        crate::log::debug!(count, "flushed hole ledger");
        count
    }
}

/// Holes added through the sink interface are final
impl HoleSink for HoleLedger {
    fn add_hole(&mut self, location: Location, diameter: f64, plated: bool) {
        self.add(Hole { location, diameter, plated }, HoleState::Fixed);
    }
}

/// In-memory hole sink
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoleList {
    pub holes: Vec<Hole>,
}

impl HoleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plated(&self) -> impl Iterator<Item = &Hole> {
        self.holes.iter().filter(|h| h.plated)
    }

    pub fn non_plated(&self) -> impl Iterator<Item = &Hole> {
        self.holes.iter().filter(|h| !h.plated)
    }
}

impl HoleSink for HoleList {
    fn add_hole(&mut self, location: Location, diameter: f64, plated: bool) {
        self.holes.push(Hole { location, diameter, plated });
    }
}

impl fmt::Display for HoleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hole in &self.holes {
            writeln!(f, "{hole}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn via(x: f64, y: f64) -> Hole {
        Hole::new(Location::new(x, y), 0.3)
    }

    #[test]
    fn test_close_loose_holes_merge_at_midpoint() {
        let mut ledger = HoleLedger::new();
        ledger.add(via(1.0, 1.0), HoleState::Loose);
        ledger.add(via(1.06, 1.0), HoleState::Loose);
        assert!(ledger.loose().is_empty());
        assert_eq!(ledger.fixed().len(), 1);
        assert_almost_eq!(ledger.fixed()[0], via(1.03, 1.0), TOL);
    }

    #[test]
    fn test_distant_loose_holes_stay_separate() {
        let mut ledger = HoleLedger::new();
        ledger.add(via(1.0, 1.0), HoleState::Loose);
        ledger.add(via(1.2, 1.0), HoleState::Loose);
        assert_eq!(ledger.loose().len(), 2);
        assert!(ledger.fixed().is_empty());
    }

    #[test]
    fn test_different_kinds_never_merge() {
        let mut ledger = HoleLedger::new();
        ledger.add(via(0.0, 0.0), HoleState::Loose);
        ledger.add(Hole::new(Location::new(0.01, 0.0), 0.5), HoleState::Loose);
        ledger.add(Hole::non_plated(Location::new(0.0, 0.01), 0.3), HoleState::Loose);
        assert_eq!(ledger.loose().len(), 3);
    }

    #[test]
    fn test_fixed_holes_are_not_merge_candidates() {
        let mut ledger = HoleLedger::new();
        ledger.add(via(0.0, 0.0), HoleState::Fixed);
        ledger.add(via(0.0, 0.0), HoleState::Loose);
        assert_eq!(ledger.fixed().len(), 1);
        assert_eq!(ledger.loose().len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        let mut ledger = HoleLedger::new();
        ledger.add(via(0.0, 0.0), HoleState::Loose);
        ledger.add(via(0.1, 0.0), HoleState::Loose);
        // Within reach of both; merges with the first
        ledger.add(via(0.05, 0.0), HoleState::Loose);
        assert_eq!(ledger.fixed().len(), 1);
        assert_almost_eq!(ledger.fixed()[0], via(0.025, 0.0), TOL);
        assert_eq!(ledger.loose(), &[via(0.1, 0.0)]);
    }

    #[test]
    fn test_merging_disabled() {
        let mut ledger = HoleLedger::new().with_merging(false);
        ledger.add(via(0.0, 0.0), HoleState::Loose);
        ledger.add(via(0.0, 0.0), HoleState::Loose);
        assert_eq!(ledger.fixed().len(), 2);
    }

    #[test]
    fn test_flush_order() {
        let mut ledger = HoleLedger::new().with_merge_margin(0.5);
        ledger.add(via(5.0, 0.0), HoleState::Loose);
        ledger.add_hole(Location::new(1.0, 0.0), 1.0, false);
        let mut list = HoleList::new();
        assert_eq!(ledger.flush(&mut list), 2);
        assert_eq!(list.to_string(), "(1.000, 0.000) ⌀1.000 npth\n(5.000, 0.000) ⌀0.300\n");
        assert_eq!(list.plated().count(), 1);
        assert_eq!(list.non_plated().count(), 1);
    }
}
