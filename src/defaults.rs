//! Default tolerances, via parameters and layer indices (all lengths in mm)

use crate::types::Tolerance;

/// Precision used when callers have no tighter contract of their own
pub const TOLERANCE: Tolerance = Tolerance::DEFAULT;

pub const VIA_PITCH: f64 = 2.0;
pub const VIA_DIAMETER: f64 = 0.15;
pub const VIA_CLEARANCE: f64 = 0.3;
pub const VIA_START_OFFSET: f64 = 0.0;
pub const VIA_END_OFFSET: f64 = 0.0;

/// Loose holes closer than this are merged into one
pub const HOLE_MERGE_MARGIN: f64 = 0.1;

/// First aperture number handed out by recording sinks (D10, as in RS274X)
pub const APERTURE_BASE: u32 = 10;

// Layer indices inside a layered sink. Higher indices draw on top and
// polarity alternates starting with dark at 0. The mask opening goes to the
// solder mask file, copper and clearance to the conductor file.
pub const MASK_LAYER: usize = 0;
pub const CLEARANCE_LAYER: usize = 1;
pub const COPPER_LAYER: usize = 2;
