//! Closed contours: board outlines, pads, clearance and mask envelopes.
//!
//! A [`ClosedContour`] is a cyclic list of [`Edge`]s. Edge `i` runs from the
//! target of edge `i - 1` to its own target, and edge 0 starts at the last
//! target, so the loop is closed by construction.
//!
//! Counter-clockwise winding puts the material on the left of travel. With
//! that winding, [`ClosedContour::outset`] by a positive clearance grows the
//! shape and by a negative one shrinks it.
//!
//! Offsetting and union work on straight edges only and refuse contours that
//! contain arcs. Offsetting a reflex corner by more than it can absorb yields
//! self-intersecting output; that input shape is not supported.

use std::fmt;

use crate::errors::GeometryError;
use crate::implicit::ImplicitLine;
use crate::path::{Curve, Line};
use crate::shapes::Rectangle;
use crate::sink::DrawingSink;
use crate::types::{AlmostEq, Location, Tolerance, Vector};

/// One edge of an outline, described by where it ends
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Stroke { target: Location },
    Arc { target: Location, center: Location, counter_clockwise: bool },
}

impl Edge {
    pub fn target(&self) -> Location {
        match self {
            Edge::Stroke { target } | Edge::Arc { target, .. } => *target,
        }
    }

    pub fn translated(&self, offset: Vector) -> Edge {
        match *self {
            Edge::Stroke { target } => Edge::Stroke { target: target + offset },
            Edge::Arc { target, center, counter_clockwise } => Edge::Arc {
                target: target + offset,
                center: center + offset,
                counter_clockwise,
            },
        }
    }
}

impl AlmostEq for Edge {
    fn almost_eq(&self, other: &Edge, tolerance: Tolerance) -> bool {
        match (self, other) {
            (Edge::Stroke { target: a }, Edge::Stroke { target: b }) => a.almost_eq(b, tolerance),
            (
                Edge::Arc { target: a, center: ca, counter_clockwise: wa },
                Edge::Arc { target: b, center: cb, counter_clockwise: wb },
            ) => wa == wb && a.almost_eq(b, tolerance) && ca.almost_eq(cb, tolerance),
            _ => false,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Stroke { target } => write!(f, "L{target}"),
            Edge::Arc { target, center, counter_clockwise } => write!(
                f,
                "A{target}@{center}{}",
                if *counter_clockwise { "ccw" } else { "cw" }
            ),
        }
    }
}

/// A closed loop of edges
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedContour {
    edges: Vec<Edge>,
}

impl ClosedContour {
    /// Straight-edged contour through `corners`, in order
    pub fn from_corners(
        corners: impl IntoIterator<Item = Location>,
    ) -> Result<Self, GeometryError> {
        let corners: Vec<Location> = corners.into_iter().collect();
        if corners.len() < 3 {
            return Err(GeometryError::TooFewCorners { count: corners.len() });
        }
        Ok(Self::polygon(corners))
    }

    pub fn from_edges(edges: Vec<Edge>) -> Result<Self, GeometryError> {
        if edges.len() < 3 {
            return Err(GeometryError::TooFewCorners { count: edges.len() });
        }
        Ok(ClosedContour { edges })
    }

    /// Unchecked; callers guarantee at least three corners
    pub(crate) fn polygon(corners: Vec<Location>) -> Self {
        ClosedContour {
            edges: corners.into_iter().map(|target| Edge::Stroke { target }).collect(),
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edge targets, in order
    pub fn corners(&self) -> Vec<Location> {
        self.edges.iter().map(Edge::target).collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Corners of a contour that has no arcs
    fn straight_corners(&self) -> Result<Vec<Location>, GeometryError> {
        self.edges
            .iter()
            .enumerate()
            .map(|(index, edge)| match edge {
                Edge::Stroke { target } => Ok(*target),
                Edge::Arc { .. } => Err(GeometryError::ArcEdge { index }),
            })
            .collect()
    }

    /// The straight edges as segments, segment `i` leaving corner `i`.
    /// Zero-length edges (repeated corners) are dropped.
    pub fn lines(&self) -> Result<Vec<Line>, GeometryError> {
        let corners = self.straight_corners()?;
        let next = corners.iter().cycle().skip(1);
        Ok(corners
            .iter()
            .zip(next)
            .filter_map(|(start, end)| Line::between(*start, *end))
            .collect())
    }

    /// Rotate so that edge `steps` comes first
    pub fn rotated_left(&self, steps: usize) -> Self {
        let mut edges = self.edges.clone();
        if !edges.is_empty() {
            let steps = steps % edges.len();
            edges.rotate_left(steps);
        }
        ClosedContour { edges }
    }

    /// Rotate so that the last `steps` edges come first
    pub fn rotated_right(&self, steps: usize) -> Self {
        let mut edges = self.edges.clone();
        if !edges.is_empty() {
            let steps = steps % edges.len();
            edges.rotate_right(steps);
        }
        ClosedContour { edges }
    }

    /// Rotated so the lowest corner (leftmost among equals) comes first.
    /// That corner is always on the convex hull.
    pub fn bottom_left_first(&self) -> Self {
        let first = self
            .edges
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| is_below_left_order(a.target(), b.target()))
            .map_or(0, |(index, _)| index);
        self.rotated_left(first)
    }

    /// Same loop walked the other way
    pub fn reversed(&self) -> Self {
        let n = self.edges.len();
        let edges = (0..n)
            .map(|j| {
                // New edge j spans old target n-j .. old target n-1-j, which is
                // old edge (n - j) % n walked backwards.
                let target = self.edges[n - 1 - j].target();
                match self.edges[(n - j) % n] {
                    Edge::Stroke { .. } => Edge::Stroke { target },
                    Edge::Arc { center, counter_clockwise, .. } => Edge::Arc {
                        target,
                        center,
                        counter_clockwise: !counter_clockwise,
                    },
                }
            })
            .collect();
        ClosedContour { edges }
    }

    pub fn translated(&self, offset: Vector) -> Self {
        ClosedContour { edges: self.edges.iter().map(|e| e.translated(offset)).collect() }
    }

    /// Axis-aligned box around the edge targets (arcs are not bulged out)
    pub fn rectangular_hull(&self) -> Rectangle {
        let mut min = Location::new(f64::MAX, f64::MAX);
        let mut max = Location::new(f64::MIN, f64::MIN);
        let mut expand = |p: Location| {
            min = Location::new(min.x.min(p.x), min.y.min(p.y));
            max = Location::new(max.x.max(p.x), max.y.max(p.y));
        };
        for edge in &self.edges {
            expand(edge.target());
        }
        Rectangle::from_corners(min, max)
    }

    /// Even-odd containment over the corners. Points on the boundary count
    /// as inside. Arcs are treated as their chords.
    pub fn contains(&self, point: Location, tolerance: Tolerance) -> bool {
        let corners = self.corners();
        let on_boundary = corners
            .iter()
            .zip(corners.iter().cycle().skip(1))
            .filter_map(|(a, b)| Line::between(*a, *b))
            .any(|line| line.contains_point(point, tolerance));
        if on_boundary {
            return true;
        }

        let mut inside = false;
        for (a, b) in corners.iter().zip(corners.iter().cycle().skip(1)) {
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Contour grown by `clearance` (shrunk when negative).
    ///
    /// Every edge is replaced by the parallel line `clearance` to its right
    /// and each corner by the intersection of its two neighbours' lines. A
    /// corner between collinear edges has no intersection and is dropped.
    pub fn outset(&self, clearance: f64, tolerance: Tolerance) -> Result<Self, GeometryError> {
        let lines = self.lines()?;
        if lines.len() < 3 {
            return Err(GeometryError::TooFewCorners { count: lines.len() });
        }
        let offset: Vec<ImplicitLine> = lines
            .iter()
            .map(|line| ImplicitLine::through(&line.start_arrow().outset_arrow(clearance)))
            .collect();

        let previous = offset.iter().cycle().skip(offset.len() - 1);
        let mut corners = Vec::with_capacity(offset.len());
        for (before, after) in previous.zip(&offset) {
            match before.intersection(after, tolerance) {
                Some(corner) => corners.push(corner),
                None => {
                    crate::log::warn!(
                        kept = corners.len(),
                        "outset dropped a corner between parallel edges"
                    );
                }
            }
        }
        ClosedContour::from_corners(corners)
    }

    /// Emit as one filled outline
    pub fn draw(&self, sink: &mut dyn DrawingSink) {
        sink.add_outline(&self.edges, None);
    }
}

/// Lexicographic order on (y, x)
pub(crate) fn is_below_left_order(a: Location, b: Location) -> std::cmp::Ordering {
    a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x))
}

impl AlmostEq for ClosedContour {
    fn almost_eq(&self, other: &ClosedContour, tolerance: Tolerance) -> bool {
        self.edges.almost_eq(&other.edges, tolerance)
    }
}

impl fmt::Display for ClosedContour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match edge {
                Edge::Stroke { target } => write!(f, "{target}")?,
                arc => write!(f, "{arc}")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use crate::sink::Recorder;
    use std::f64::consts::SQRT_2;

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn loc(x: f64, y: f64) -> Location {
        Location::new(x, y)
    }

    fn chamfered() -> ClosedContour {
        ClosedContour::from_corners([
            loc(5.0, 1.0),
            loc(5.0, 3.0),
            loc(4.0, 4.0),
            loc(1.0, 4.0),
            loc(1.0, 1.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_corners_needs_three() {
        assert_eq!(
            ClosedContour::from_corners([loc(0.0, 0.0), loc(1.0, 0.0)]),
            Err(GeometryError::TooFewCorners { count: 2 })
        );
    }

    #[test]
    fn test_lines_close_the_loop() {
        let lines = chamfered().lines().unwrap();
        assert_eq!(lines.len(), 5);
        assert_almost_eq!(lines[4].start_point(), loc(1.0, 1.0), TOL);
        assert_almost_eq!(lines[4].end_point(), loc(5.0, 1.0), TOL);
    }

    #[test]
    fn test_lines_skip_repeated_corners() {
        let corners = [loc(0.0, 0.0), loc(1.0, 0.0), loc(1.0, 0.0), loc(0.0, 1.0)];
        let contour = ClosedContour::from_corners(corners).unwrap();
        assert_eq!(contour.lines().unwrap().len(), 3);
    }

    #[test]
    fn test_outset_grows() {
        let grown = chamfered().outset(1.0, TOL).unwrap();
        let expected = vec![
            loc(6.0, 0.0),
            loc(6.0, 2.0 + SQRT_2),
            loc(3.0 + SQRT_2, 5.0),
            loc(0.0, 5.0),
            loc(0.0, 0.0),
        ];
        assert_almost_eq!(grown.corners(), expected, TOL);
    }

    #[test]
    fn test_outset_shrinks() {
        let shrunk = chamfered().outset(-0.5, TOL).unwrap();
        let half = SQRT_2 / 2.0;
        let expected = vec![
            loc(4.5, 1.5),
            loc(4.5, 3.5 - half),
            loc(4.5 - half, 3.5),
            loc(1.5, 3.5),
            loc(1.5, 1.5),
        ];
        assert_almost_eq!(shrunk.corners(), expected, TOL);
    }

    #[test]
    fn test_outset_round_trip() {
        let corners = [loc(0.0, 0.0), loc(4.0, 0.0), loc(4.0, 2.0), loc(0.0, 2.0)];
        let rectangle = ClosedContour::from_corners(corners).unwrap();
        let back = rectangle.outset(0.7, TOL).unwrap().outset(-0.7, TOL).unwrap();
        assert_almost_eq!(back, rectangle, TOL);
    }

    #[test]
    fn test_outset_drops_collinear_corner() {
        let contour = ClosedContour::from_corners([
            loc(0.0, 0.0),
            loc(2.0, 0.0),
            loc(4.0, 0.0),
            loc(4.0, 4.0),
            loc(0.0, 4.0),
        ])
        .unwrap();
        let grown = contour.outset(1.0, TOL).unwrap();
        assert_eq!(grown.len(), 4);
    }

    #[test]
    fn test_outset_refuses_arcs() {
        let contour = ClosedContour::from_edges(vec![
            Edge::Stroke { target: loc(0.0, 0.0) },
            Edge::Stroke { target: loc(2.0, 0.0) },
            Edge::Arc { target: loc(0.0, 2.0), center: loc(0.0, 0.0), counter_clockwise: true },
        ])
        .unwrap();
        assert_eq!(contour.outset(1.0, TOL), Err(GeometryError::ArcEdge { index: 2 }));
    }

    #[test]
    fn test_rotation() {
        let contour = chamfered();
        assert_almost_eq!(contour.rotated_left(2).corners()[0], loc(4.0, 4.0), TOL);
        assert_almost_eq!(contour.rotated_right(1).corners()[0], loc(1.0, 1.0), TOL);
        assert_eq!(contour.rotated_left(7), contour.rotated_left(2));
    }

    #[test]
    fn test_bottom_left_first() {
        let first = chamfered().bottom_left_first().corners()[0];
        assert_eq!(first, loc(1.0, 1.0));
    }

    #[test]
    fn test_reversed_keeps_arcs_attached() {
        let quarter = ClosedContour::from_edges(vec![
            Edge::Stroke { target: loc(0.0, 0.0) },
            Edge::Stroke { target: loc(2.0, 0.0) },
            Edge::Arc { target: loc(0.0, 2.0), center: loc(0.0, 0.0), counter_clockwise: true },
        ])
        .unwrap();
        let back = quarter.reversed();
        assert_eq!(
            back.edges(),
            &[
                Edge::Stroke { target: loc(0.0, 2.0) },
                Edge::Arc {
                    target: loc(2.0, 0.0),
                    center: loc(0.0, 0.0),
                    counter_clockwise: false,
                },
                Edge::Stroke { target: loc(0.0, 0.0) },
            ]
        );
        assert_eq!(back.reversed(), quarter);
    }

    #[test]
    fn test_contains() {
        let contour = chamfered();
        assert!(contour.contains(loc(2.0, 2.0), TOL));
        assert!(contour.contains(loc(5.0, 2.0), TOL));
        assert!(!contour.contains(loc(4.9, 3.9), TOL));
        assert!(!contour.contains(loc(0.0, 2.0), TOL));
    }

    #[test]
    fn test_rectangular_hull() {
        let hull = chamfered().rectangular_hull();
        assert_almost_eq!(hull.width(), 4.0, TOL);
        assert_almost_eq!(hull.height(), 3.0, TOL);
        assert_almost_eq!(hull.center(), loc(3.0, 2.5), TOL);
    }

    #[test]
    fn test_display_and_draw() {
        let triangle =
            ClosedContour::from_corners([loc(0.0, 0.0), loc(1.0, 0.0), loc(0.0, 1.0)]).unwrap();
        assert_eq!(triangle.to_string(), "[(0.000, 0.000) (1.000, 0.000) (0.000, 1.000)]");
        let mut sink = Recorder::new();
        triangle.translated(Vector::new(1.0, 1.0)).draw(&mut sink);
        assert_eq!(sink.to_string(), "outline L(1.000, 1.000) L(2.000, 1.000) L(1.000, 2.000)\n");
    }
}
