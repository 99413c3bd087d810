//! Path primitives: straight [`Line`]s and circular [`Bend`]s.
//!
//! Both are functions from arc length to [`Arrow`]. A path owns its start
//! pose; the end pose is derived. Setting the end pose instead back-solves
//! the start, which is how a trace keeps its downstream fixed on insert.
//!
//! # Key Concepts
//!
//! - **Signed radius**: positive bends turn left (counter-clockwise),
//!   negative bends turn right
//! - **Center of curvature**: `start.turned_left().along(radius)`
//! - **Painting**: a path paints its copper outline at a given width to a
//!   [`DrawingSink`]; lines as a rectangle, bends as two arcs joined by two
//!   straight end caps

use std::fmt;

use enum_dispatch::enum_dispatch;

use crate::contour::{ClosedContour, Edge};
use crate::errors::{GeometryError, finite};
use crate::implicit::ImplicitLine;
use crate::pose::Arrow;
use crate::sink::DrawingSink;
use crate::types::{AlmostEq, Location, Tolerance};

/// Common behavior for anything parametrized by arc length
#[enum_dispatch]
pub trait Curve {
    /// Arc length in mm
    fn length(&self) -> f64;

    fn start_arrow(&self) -> Arrow;

    fn end_arrow(&self) -> Arrow;

    /// Pose at `distance` along the curve. Distances outside `0..=length`
    /// extrapolate rather than fail.
    fn along_arrow(&self, distance: f64) -> Arrow;

    /// Emit the outline of a conductor of `width` following this curve
    fn paint(&self, sink: &mut dyn DrawingSink, width: f64);

    /// End pose coincides with start pose
    fn is_closed(&self, tolerance: Tolerance) -> bool {
        self.end_arrow().almost_eq(&self.start_arrow(), tolerance)
    }

    /// Poses at an even pitch no larger than `target_pitch`.
    ///
    /// The real pitch divides the length exactly. Open curves get a stamp at
    /// both ends; closed curves skip the end (it is the start again).
    /// With `centered` every stamp sits in the middle of its interval.
    fn stamp(&self, target_pitch: f64, centered: bool, tolerance: Tolerance) -> Vec<Arrow> {
        let length = self.length();
        let intervals = (length / target_pitch + tolerance.raw()).floor();
        if !intervals.is_finite() || intervals < 1.0 {
            return Vec::new();
        }
        let count = intervals as usize;
        let pitch = length / intervals;
        let offset = if centered { 0.5 * pitch } else { 0.0 };
        let steps = if centered || self.is_closed(tolerance) { count } else { count + 1 };
        (0..steps)
            .map(|i| self.along_arrow(i as f64 * pitch + offset))
            .collect()
    }
}

// ============================================================================
// Line
// ============================================================================

/// A straight run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    length: f64,
    start: Arrow,
}

/// How two segments meet
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    Point(Location),
    /// Collinear segments sharing a stretch
    Overlap(Line),
}

impl Line {
    /// A line of `length` starting at the origin heading east
    pub fn new(length: f64) -> Self {
        Line { length, start: Arrow::default() }
    }

    pub fn with_start(mut self, start: Arrow) -> Self {
        self.start = start;
        self
    }

    /// The line from `start` to `end`, None when they coincide
    pub fn between(start: Location, end: Location) -> Option<Self> {
        let span = end - start;
        let heading = span.direction()?;
        Some(Line { length: span.length(), start: Arrow::new(start, heading) })
    }

    pub fn start_point(&self) -> Location {
        self.start.origin
    }

    pub fn end_point(&self) -> Location {
        self.start.along(self.length)
    }

    pub fn set_start_arrow(&mut self, start: Arrow) {
        self.start = start;
    }

    pub fn set_end_arrow(&mut self, end: Arrow) {
        self.start = end.along_arrow(-self.length);
    }

    /// Same segment walked the other way
    pub fn reversed(&self) -> Line {
        Line { length: self.length, start: self.end_arrow().reversed() }
    }

    /// Rectangle of `width` centered on the line, counter-clockwise from the
    /// start's right corner
    pub fn outline(&self, width: f64) -> ClosedContour {
        let end = self.end_arrow();
        let (start_left, start_right) = self.start.left_right(width / 2.0);
        let (end_left, end_right) = end.left_right(width / 2.0);
        ClosedContour::polygon(vec![start_right, end_right, end_left, start_left])
    }

    /// Whether `point` lies on the segment, endpoints included
    pub fn contains_point(&self, point: Location, tolerance: Tolerance) -> bool {
        let offset = point - self.start.origin;
        let heading = self.start.heading.to_vector();
        let along = offset.dot(heading);
        let across = heading.cross(offset);
        across.abs() <= tolerance.raw()
            && along >= -tolerance.raw()
            && along <= self.length + tolerance.raw()
    }

    /// Intersection with another segment.
    ///
    /// Crossing segments meet in a point. Collinear segments meet in their
    /// shared stretch, or in a point when they only touch end to end.
    pub fn intersection(&self, other: &Line, tolerance: Tolerance) -> Option<SegmentIntersection> {
        let this_line = ImplicitLine::through(&self.start);
        let other_line = ImplicitLine::through(&other.start);

        if this_line.almost_eq(&other_line, tolerance) {
            let heading = self.start.heading.to_vector();
            let project = |p: Location| (p - self.start.origin).dot(heading);
            let (a, b) = (project(other.start_point()), project(other.end_point()));
            let low = a.min(b).max(0.0);
            let high = a.max(b).min(self.length);
            if high < low - tolerance.raw() {
                return None;
            }
            if high - low <= tolerance.raw() {
                return Some(SegmentIntersection::Point(self.start.along(low)));
            }
            return Line::between(self.start.along(low), self.start.along(high))
                .map(SegmentIntersection::Overlap);
        }

        let point = this_line.intersection(&other_line, tolerance)?;
        (self.contains_point(point, tolerance) && other.contains_point(point, tolerance))
            .then_some(SegmentIntersection::Point(point))
    }
}

impl Curve for Line {
    fn length(&self) -> f64 {
        self.length
    }

    fn start_arrow(&self) -> Arrow {
        self.start
    }

    fn end_arrow(&self) -> Arrow {
        self.start.along_arrow(self.length)
    }

    fn along_arrow(&self, distance: f64) -> Arrow {
        self.start.along_arrow(distance)
    }

    fn paint(&self, sink: &mut dyn DrawingSink, width: f64) {
        sink.add_outline(self.outline(width).edges(), None);
    }
}

impl AlmostEq for Line {
    fn almost_eq(&self, other: &Line, tolerance: Tolerance) -> bool {
        self.length.almost_eq(&other.length, tolerance)
            && self.start.almost_eq(&other.start, tolerance)
    }
}

// ============================================================================
// Bend
// ============================================================================

/// A constant-radius arc; the sign of the radius picks the turn direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bend {
    length: f64,
    radius: f64,
    start: Arrow,
}

impl Bend {
    /// A bend of arc `length` starting at the origin heading east.
    ///
    /// Fails for a zero radius and for non-finite inputs.
    pub fn new(length: f64, radius: f64) -> Result<Self, GeometryError> {
        let length = finite("bend length", length)?;
        let radius = finite("bend radius", radius)?;
        if radius == 0.0 {
            return Err(GeometryError::ZeroBendRadius);
        }
        Ok(Bend { length, radius, start: Arrow::default() })
    }

    pub fn with_start(mut self, start: Arrow) -> Self {
        self.start = start;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Swept angle, signed like the radius
    pub fn angle(&self) -> f64 {
        self.length / self.radius
    }

    /// Center of curvature
    pub fn center(&self) -> Location {
        self.start.left(self.radius)
    }

    pub fn set_start_arrow(&mut self, start: Arrow) {
        self.start = start;
    }

    pub fn set_end_arrow(&mut self, end: Arrow) {
        let center = end.left(self.radius);
        self.start = end.rotated_around(center, -self.angle());
    }

    /// Same arc walked the other way (the turn flips handedness)
    pub fn reversed(&self) -> Bend {
        Bend { length: self.length, radius: -self.radius, start: self.end_arrow().reversed() }
    }

    /// Outline of a conductor of `width`: right rail, end cap, left rail,
    /// start cap. The two rails sweep in opposite senses.
    pub fn outline(&self, width: f64) -> Vec<Edge> {
        let center = self.center();
        let end = self.end_arrow();
        let (start_left, start_right) = self.start.left_right(width / 2.0);
        let (end_left, end_right) = end.left_right(width / 2.0);
        vec![
            Edge::Stroke { target: start_right },
            Edge::Arc { target: end_right, center, counter_clockwise: self.radius >= 0.0 },
            Edge::Stroke { target: end_left },
            Edge::Arc { target: start_left, center, counter_clockwise: self.radius < 0.0 },
        ]
    }
}

impl Curve for Bend {
    fn length(&self) -> f64 {
        self.length
    }

    fn start_arrow(&self) -> Arrow {
        self.start
    }

    fn end_arrow(&self) -> Arrow {
        self.along_arrow(self.length)
    }

    fn along_arrow(&self, distance: f64) -> Arrow {
        self.start.rotated_around(self.center(), distance / self.radius)
    }

    fn paint(&self, sink: &mut dyn DrawingSink, width: f64) {
        sink.add_outline(&self.outline(width), None);
    }
}

impl AlmostEq for Bend {
    fn almost_eq(&self, other: &Bend, tolerance: Tolerance) -> bool {
        self.length.almost_eq(&other.length, tolerance)
            && self.radius.almost_eq(&other.radius, tolerance)
            && self.start.almost_eq(&other.start, tolerance)
    }
}

// ============================================================================
// Path
// ============================================================================

/// One segment of a trace
#[enum_dispatch(Curve)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Path {
    Line,
    Bend,
}

impl Path {
    pub fn set_start_arrow(&mut self, start: Arrow) {
        match self {
            Path::Line(line) => line.set_start_arrow(start),
            Path::Bend(bend) => bend.set_start_arrow(start),
        }
    }

    /// Move the path so it ends at `end`
    pub fn set_end_arrow(&mut self, end: Arrow) {
        match self {
            Path::Line(line) => line.set_end_arrow(end),
            Path::Bend(bend) => bend.set_end_arrow(end),
        }
    }

    pub fn reversed(&self) -> Path {
        match self {
            Path::Line(line) => Path::Line(line.reversed()),
            Path::Bend(bend) => Path::Bend(bend.reversed()),
        }
    }
}

impl AlmostEq for Path {
    fn almost_eq(&self, other: &Path, tolerance: Tolerance) -> bool {
        match (self, other) {
            (Path::Line(a), Path::Line(b)) => a.almost_eq(b, tolerance),
            (Path::Bend(a), Path::Bend(b)) => a.almost_eq(b, tolerance),
            _ => false,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Line(line) => write!(f, "Line({:.3})", line.length),
            Path::Bend(bend) => write!(
                f,
                "Bend({:.3}, r={:.3} {})",
                bend.length,
                bend.radius,
                if bend.radius > 0.0 { "CCW" } else { "CW" }
            ),
        }
    }
}
