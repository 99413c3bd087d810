//! Coplanar waveguide routing: a trace with a ground gap on both sides and
//! rows of stitching vias along each rail.
//!
//! A [`CoplanarTrace`] paints three envelopes of the same centerline:
//!
//! | layer | width |
//! |---|---|
//! | copper | `width` |
//! | clearance | `width + 2·gap` |
//! | solder mask | `width + 2·gap + 4·via_clearance` |
//!
//! Vias sit on both rails at `±(width/2 + gap + via_clearance)` from the
//! centerline, at stations between the two via offsets. The offsets are
//! exclusion distances from the nearer end and follow edits: appending a path
//! grows the end offset by its length, inserting at the head shrinks the
//! start offset by its length.

use crate::defaults;
use crate::fabrication::FabricationClass;
use crate::holes::{Hole, HoleLedger, HoleSink, HoleState};
use crate::path::{Curve, Line, Path};
use crate::pose::Arrow;
use crate::sink::{DrawingSink, LayeredSink};
use crate::trace::{Trace, TraceBuilder};
use crate::types::{Location, Tolerance};

/// Station indices to leave without a via, per rail
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViaSkips {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl ViaSkips {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(
        left: impl IntoIterator<Item = usize>,
        right: impl IntoIterator<Item = usize>,
    ) -> Self {
        ViaSkips {
            left: left.into_iter().collect(),
            right: right.into_iter().collect(),
        }
    }

    fn skips(&self, side: Side, index: usize) -> bool {
        match side {
            Side::Left => self.left.contains(&index),
            Side::Right => self.right.contains(&index),
        }
    }
}

/// Rail relative to the direction of travel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// One via position
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViaSite {
    /// Station index, as used by [`ViaSkips`]
    pub index: usize,
    /// Distance along the centerline
    pub station: f64,
    pub side: Side,
    pub location: Location,
}

/// A trace with coplanar ground and via stitching
#[derive(Clone, Debug)]
pub struct CoplanarTrace {
    builder: TraceBuilder,
    width: f64,
    gap: f64,
    via_pitch: f64,
    via_diameter: f64,
    via_clearance: f64,
    via_start_offset: f64,
    via_end_offset: f64,
    tolerance: Tolerance,
}

impl CoplanarTrace {
    pub fn new(start: Arrow, width: f64, gap: f64) -> Self {
        CoplanarTrace::from_builder(TraceBuilder::new(start), width, gap)
    }

    /// Wrap an existing route. The via offsets start at their defaults and
    /// do not grow by the adopted paths.
    pub fn from_trace(trace: Trace, width: f64, gap: f64) -> Self {
        CoplanarTrace::from_builder(trace.into_builder(), width, gap)
    }

    /// Via hole, clearance and pitch taken from a fabrication class
    pub fn for_classification(
        start: Arrow,
        width: f64,
        gap: f64,
        finished_hole_diameter: f64,
        is_inner: bool,
        class: &dyn FabricationClass,
    ) -> Self {
        CoplanarTrace::new(start, width, gap)
            .with_via_diameter(finished_hole_diameter)
            .with_via_clearance(class.via_clearance(finished_hole_diameter, is_inner))
            .with_via_pitch(class.via_stitching_pitch(finished_hole_diameter))
    }

    fn from_builder(builder: TraceBuilder, width: f64, gap: f64) -> Self {
        CoplanarTrace {
            builder,
            width,
            gap,
            via_pitch: defaults::VIA_PITCH,
            via_diameter: defaults::VIA_DIAMETER,
            via_clearance: defaults::VIA_CLEARANCE,
            via_start_offset: defaults::VIA_START_OFFSET,
            via_end_offset: defaults::VIA_END_OFFSET,
            tolerance: defaults::TOLERANCE,
        }
    }

    pub fn with_via_pitch(mut self, pitch: f64) -> Self {
        self.via_pitch = pitch;
        self
    }

    pub fn with_via_diameter(mut self, diameter: f64) -> Self {
        self.via_diameter = diameter;
        self
    }

    pub fn with_via_clearance(mut self, clearance: f64) -> Self {
        self.via_clearance = clearance;
        self
    }

    pub fn with_via_start_offset(mut self, offset: f64) -> Self {
        self.via_start_offset = offset;
        self
    }

    pub fn with_via_end_offset(mut self, offset: f64) -> Self {
        self.via_end_offset = offset;
        self
    }

    /// Precision for station counting
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn via_pitch(&self) -> f64 {
        self.via_pitch
    }

    pub fn via_diameter(&self) -> f64 {
        self.via_diameter
    }

    pub fn via_clearance(&self) -> f64 {
        self.via_clearance
    }

    pub fn via_start_offset(&self) -> f64 {
        self.via_start_offset
    }

    pub fn via_end_offset(&self) -> f64 {
        self.via_end_offset
    }

    pub fn set_via_start_offset(&mut self, offset: f64) {
        self.via_start_offset = offset;
    }

    pub fn set_via_end_offset(&mut self, offset: f64) {
        self.via_end_offset = offset;
    }

    pub fn trace(&self) -> &Trace {
        self.builder.current()
    }

    pub fn into_trace(self) -> Trace {
        self.builder.build()
    }

    /// Extend the route; the end exclusion grows with it
    pub fn append(&mut self, path: impl Into<Path>) -> &mut Self {
        let path = path.into();
        self.via_end_offset += path.length();
        self.builder.append(path);
        self
    }

    /// Insert like [`TraceBuilder::insert`]; at the head the start offset
    /// shrinks by the new path's length
    pub fn insert(&mut self, index: usize, path: impl Into<Path>) -> &mut Self {
        let path = path.into();
        if index == 0 {
            self.via_start_offset -= path.length();
        }
        self.builder.insert(index, path);
        self
    }

    pub fn copper_clearance(&self) -> f64 {
        2.0 * self.gap
    }

    pub fn solder_mask_clearance(&self) -> f64 {
        self.copper_clearance() + 4.0 * self.via_clearance
    }

    /// Distance between the two via rails
    pub fn via_span(&self) -> f64 {
        self.width + 2.0 * self.gap + 2.0 * self.via_clearance
    }

    /// Evenly spaced distances from the start offset to the end offset,
    /// both included. The spacing is the via pitch stretched so a whole
    /// number of intervals fills the span. A pitch below the tolerance
    /// places no vias.
    pub fn via_stations(&self) -> Vec<f64> {
        let first = self.via_start_offset;
        let last = self.length() - self.via_end_offset;
        let span = last - first;
        let tolerance = self.tolerance.raw();

        if self.via_pitch.is_nan() || self.via_pitch < tolerance || !span.is_finite() {
            crate::log::warn!(pitch = self.via_pitch, span, "no via stations for this pitch");
            return Vec::new();
        }
        if span < -tolerance {
            crate::log::warn!(span, "via offsets overlap, no vias placed");
            return Vec::new();
        }

        let intervals = (span.max(0.0) / self.via_pitch + tolerance).floor() as usize;
        if intervals == 0 {
            return vec![first];
        }
        let step = span / intervals as f64;
        (0..=intervals).map(|i| first + step * i as f64).collect()
    }

    /// Via positions on both rails, skipped stations left out
    pub fn via_sites(&self, skips: &ViaSkips) -> Vec<ViaSite> {
        let half_span = self.via_span() / 2.0;
        let mut sites = Vec::new();
        for (index, station) in self.via_stations().into_iter().enumerate() {
            let (left, right) = self.along_arrow(station).left_right(half_span);
            for (side, location) in [(Side::Left, left), (Side::Right, right)] {
                if !skips.skips(side, index) {
                    sites.push(ViaSite { index, station, side, location });
                }
            }
        }
        sites
    }

    /// Paint copper, stitching vias, clearance and solder mask.
    ///
    /// Vias enter `holes` as loose holes so they can merge with vias of a
    /// neighboring trace. Without a ledger no vias are placed.
    pub fn draw(
        &self,
        conductor: &mut dyn LayeredSink,
        solder_mask: Option<&mut dyn LayeredSink>,
        holes: Option<&mut HoleLedger>,
        skips: &ViaSkips,
    ) {
        self.paint(conductor.layer(defaults::COPPER_LAYER), self.width);

        if let Some(holes) = holes {
            let stations = self.via_stations().len();
            if skips.left.iter().chain(&skips.right).any(|&i| i >= stations) {
                crate::log::warn!(?skips, stations, "via skip index matches no station");
            }
            let sites = self.via_sites(skips);
            crate::log::debug!(stations, vias = sites.len(), "stitching coplanar trace");
            for site in sites {
                holes.add(Hole::new(site.location, self.via_diameter), HoleState::Loose);
            }
        }

        self.paint(
            conductor.layer(defaults::CLEARANCE_LAYER),
            self.width + self.copper_clearance(),
        );

        if let Some(mask) = solder_mask {
            self.paint(
                mask.layer(defaults::MASK_LAYER),
                self.width + self.solder_mask_clearance(),
            );
        }
    }
}

impl Curve for CoplanarTrace {
    fn length(&self) -> f64 {
        self.trace().length()
    }

    fn start_arrow(&self) -> Arrow {
        self.trace().start_arrow()
    }

    fn end_arrow(&self) -> Arrow {
        self.trace().end_arrow()
    }

    fn along_arrow(&self, distance: f64) -> Arrow {
        self.trace().along_arrow(distance)
    }

    fn paint(&self, sink: &mut dyn DrawingSink, width: f64) {
        self.trace().paint(sink, width);
    }
}

// ============================================================================
// End caps
// ============================================================================

/// Termination of a coplanar trace
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndKind {
    /// The conductor stops `gap` short of the ground
    Open { gap: f64 },
    /// The conductor runs into the ground
    Short,
}

impl EndKind {
    pub fn length(&self) -> f64 {
        match self {
            EndKind::Open { gap } => *gap,
            EndKind::Short => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEnd {
    Start,
    End,
}

/// A termination attached to one end of a [`CoplanarTrace`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndCap {
    kind: EndKind,
    end: TraceEnd,
}

impl EndCap {
    /// Terminate `trace` at `end`. The via rows of that end are moved past
    /// the cap, so attach once the route is complete.
    pub fn attach(kind: EndKind, end: TraceEnd, trace: &mut CoplanarTrace) -> EndCap {
        let offset = -kind.length() - trace.via_clearance();
        match end {
            TraceEnd::Start => trace.set_via_start_offset(offset),
            TraceEnd::End => trace.set_via_end_offset(offset),
        }
        EndCap { kind, end }
    }

    pub fn kind(&self) -> EndKind {
        self.kind
    }

    pub fn length(&self) -> f64 {
        self.kind.length()
    }

    /// Pose at the trace end, pointing away from the trace
    pub fn pose(&self, trace: &CoplanarTrace) -> Arrow {
        match self.end {
            TraceEnd::Start => trace.start_arrow().reversed(),
            TraceEnd::End => trace.end_arrow(),
        }
    }

    /// Place the closing via behind the cap and open clearance and mask over it
    pub fn draw(
        &self,
        trace: &CoplanarTrace,
        conductor: &mut dyn LayeredSink,
        solder_mask: Option<&mut dyn LayeredSink>,
        holes: &mut dyn HoleSink,
    ) {
        let pose = self.pose(trace);
        let clearance = trace.via_clearance();
        holes.add_hole(pose.along(self.length() + clearance), trace.via_diameter(), true);

        let mask_length = match self.kind {
            EndKind::Open { gap } => {
                let width = trace.width() + trace.copper_clearance();
                Line::new(gap)
                    .with_start(pose)
                    .paint(conductor.layer(defaults::CLEARANCE_LAYER), width);
                gap + 2.0 * clearance
            }
            EndKind::Short => 2.0 * clearance,
        };

        if let Some(mask) = solder_mask {
            let width = trace.width() + trace.solder_mask_clearance();
            Line::new(mask_length)
                .with_start(pose)
                .paint(mask.layer(defaults::MASK_LAYER), width);
        }
    }
}
