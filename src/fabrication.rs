//! Fabrication classifications: what a board house can drill and plate.
//!
//! The kernel sizes vias and clearances through [`FabricationClass`] and
//! never hard-codes a manufacturing limit. [`EuroCircuits`] implements the
//! pattern/drill class tables of that board house.
//!
//! # Hole sizes
//!
//! The *finished* hole is what remains after plating; the *production* hole
//! is what gets drilled. Annular rings are measured from the production hole.

use crate::errors::GeometryError;
use crate::holes::HoleSink;
use crate::shapes::Circle;
use crate::sink::DrawingSink;
use crate::types::{Location, Tolerance};

/// Manufacturing rules consumed by via and clearance sizing (mm throughout)
pub trait FabricationClass {
    /// Smallest pad that keeps the annular ring around a finished hole
    fn minimum_via_pad(&self, finished_hole_diameter: f64, is_inner: bool) -> f64;

    /// Largest finished hole a pad can carry
    fn maximum_finished_hole_diameter(
        &self,
        pad_diameter: f64,
        is_inner: bool,
    ) -> Result<f64, GeometryError>;

    /// Distance from a via row to the copper it stitches
    fn via_clearance(&self, finished_hole_diameter: f64, is_inner: bool) -> f64;

    /// Pitch of a stitching via row
    fn via_stitching_pitch(&self, finished_hole_diameter: f64) -> f64;

    fn solder_mask_misalignment(&self) -> f64;

    /// Diameter of the copper-free area around a pad
    fn minimum_via_clear_pad(&self, pad_diameter: f64) -> f64;

    fn minimum_finished_hole_diameter(&self) -> Result<f64, GeometryError>;
}

/// Pattern classes: copper feature limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternClass {
    Class5,
    Class6,
}

/// Drill classes: smallest production hole
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillClass {
    B,
    C,
}

/// EuroCircuits rules for one pattern class and one drill class
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EuroCircuits {
    pub minimum_pad_to_pad: f64,
    pub minimum_outer_annular_ring: f64,
    pub minimum_inner_annular_ring: f64,
    pub minimum_production_hole_diameter: f64,
    pub solder_mask_misalignment: f64,
}

impl EuroCircuits {
    pub fn new(pattern: PatternClass, drill: DrillClass) -> Self {
        let (pad_to_pad, outer_ring, inner_ring) = match pattern {
            PatternClass::Class5 => (0.200, 0.150, 0.200),
            PatternClass::Class6 => (0.150, 0.125, 0.175),
        };
        let minimum_production_hole_diameter = match drill {
            DrillClass::B => 0.45,
            DrillClass::C => 0.35,
        };
        EuroCircuits {
            minimum_pad_to_pad: pad_to_pad,
            minimum_outer_annular_ring: outer_ring,
            minimum_inner_annular_ring: inner_ring,
            minimum_production_hole_diameter,
            solder_mask_misalignment: 0.1,
        }
    }

    /// Pattern class 6, drill class C
    pub fn class_6c() -> Self {
        EuroCircuits::new(PatternClass::Class6, DrillClass::C)
    }

    pub fn minimum_annular_ring(&self, is_inner: bool) -> f64 {
        if is_inner {
            self.minimum_inner_annular_ring
        } else {
            self.minimum_outer_annular_ring
        }
    }

    /// Drill size for a finished hole (plating allowance grows above 0.45 mm)
    pub fn production_hole_diameter(&self, finished_hole_diameter: f64) -> f64 {
        if finished_hole_diameter <= 0.450 {
            finished_hole_diameter + 0.100
        } else {
            finished_hole_diameter + 0.150
        }
    }

    /// Finished size for a drill. Drills between 0.55 and 0.60 mm fall in
    /// the gap between the two plating allowances and finish at 0.45 mm.
    pub fn finished_hole_diameter(
        &self,
        production_hole_diameter: f64,
    ) -> Result<f64, GeometryError> {
        if production_hole_diameter < 0.100 {
            Err(GeometryError::HoleTooSmall { production: production_hole_diameter })
        } else if production_hole_diameter <= 0.450 + 0.100 {
            Ok(production_hole_diameter - 0.100)
        } else if production_hole_diameter <= 0.450 + 0.150 {
            Ok(0.450)
        } else {
            Ok(production_hole_diameter - 0.150)
        }
    }
}

impl Default for EuroCircuits {
    fn default() -> Self {
        EuroCircuits::class_6c()
    }
}

impl FabricationClass for EuroCircuits {
    fn minimum_via_pad(&self, finished_hole_diameter: f64, is_inner: bool) -> f64 {
        self.production_hole_diameter(finished_hole_diameter)
            + 2.0 * self.minimum_annular_ring(is_inner)
    }

    fn maximum_finished_hole_diameter(
        &self,
        pad_diameter: f64,
        is_inner: bool,
    ) -> Result<f64, GeometryError> {
        self.finished_hole_diameter(pad_diameter - 2.0 * self.minimum_annular_ring(is_inner))
    }

    fn via_clearance(&self, finished_hole_diameter: f64, is_inner: bool) -> f64 {
        0.5 * self.minimum_via_pad(finished_hole_diameter, is_inner)
    }

    fn via_stitching_pitch(&self, finished_hole_diameter: f64) -> f64 {
        self.production_hole_diameter(finished_hole_diameter) + 0.15
    }

    fn solder_mask_misalignment(&self) -> f64 {
        self.solder_mask_misalignment
    }

    fn minimum_via_clear_pad(&self, pad_diameter: f64) -> f64 {
        pad_diameter + 2.0 * self.minimum_pad_to_pad
    }

    fn minimum_finished_hole_diameter(&self) -> Result<f64, GeometryError> {
        self.finished_hole_diameter(self.minimum_production_hole_diameter)
    }
}

/// A plated through hole with a round pad
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Via {
    pub location: Location,
    pub finished_hole_diameter: f64,
    pub pad_diameter: f64,
}

impl Via {
    /// Refuses a hole larger than the pad can carry under `class`
    pub fn new(
        location: Location,
        finished_hole_diameter: f64,
        pad_diameter: f64,
        class: &dyn FabricationClass,
        is_inner: bool,
        tolerance: Tolerance,
    ) -> Result<Via, GeometryError> {
        let maximum = class.maximum_finished_hole_diameter(pad_diameter, is_inner)?;
        if finished_hole_diameter > maximum + tolerance.raw() {
            return Err(GeometryError::ConstraintOverflow {
                requested: finished_hole_diameter,
                maximum,
                pad_diameter,
            });
        }
        Ok(Via { location, finished_hole_diameter, pad_diameter })
    }

    /// The smallest pad `class` allows around the hole
    pub fn minimum(
        location: Location,
        finished_hole_diameter: f64,
        class: &dyn FabricationClass,
        is_inner: bool,
        tolerance: Tolerance,
    ) -> Result<Via, GeometryError> {
        let pad_diameter = class.minimum_via_pad(finished_hole_diameter, is_inner);
        Via::new(location, finished_hole_diameter, pad_diameter, class, is_inner, tolerance)
    }

    /// Flash the pad and record the hole as fixed
    pub fn draw(&self, copper: &mut dyn DrawingSink, holes: &mut dyn HoleSink) {
        Circle::new(self.location, self.pad_diameter).draw(copper);
        holes.add_hole(self.location, self.finished_hole_diameter, true);
    }
}
