//! Boolean union of two closed straight-edged contours (Sloan's walk).
//!
//! Both contours start at their lowest-then-leftmost corner, which lies on
//! the union boundary. The contour whose start is lower becomes the walker.
//! Each step looks for the nearest contact on the walker's current edge that
//! has not been seen yet. Contacts are crossings, touching corners and the
//! ends of shared collinear stretches.
//!
//! - the other contour leaves the contact turning further right than the
//!   walker: emit it, re-start the other contour's edge list there, and swap
//!   roles
//! - otherwise the contact is passed over
//! - no contact left: emit the end of the current edge and advance the walker
//!
//! The walk ends when it comes back to the first emitted point, and corners
//! left in the middle of a straight run are dropped. Every step consumes an
//! edge or a contact, so the walk is bounded; the bound is still checked to
//! turn floating point pathologies into an error.

use crate::contour::{ClosedContour, is_below_left_order};
use crate::errors::GeometryError;
use crate::path::{Curve, Line, SegmentIntersection};
use crate::types::{AlmostEq, Location, Tolerance, Vector};

impl ClosedContour {
    /// Outline of the area covered by `self` or `other`.
    ///
    /// A contour enclosed by the other yields the enclosing one unchanged.
    /// Disjoint contours are refused with [`GeometryError::DisjointContours`].
    pub fn union(
        &self,
        other: &ClosedContour,
        tolerance: Tolerance,
    ) -> Result<ClosedContour, GeometryError> {
        let mut walker = canonical_lines(self)?;
        let mut source = canonical_lines(other)?;
        if is_below_left_order(source[0].start_point(), walker[0].start_point()).is_lt() {
            std::mem::swap(&mut walker, &mut source);
        }

        let max_steps = 4 * (walker.len() + 2) * (source.len() + 2);
        let mut joint = vec![walker[0].start_point()];
        let mut passed: Vec<Location> = Vec::new();
        let mut crossings = 0usize;

        for _ in 0..max_steps {
            let edge = walker[0];
            let contact = first_contact(&source, &edge, [&joint[..], &passed[..]], tolerance);
            match contact {
                Some((point, index))
                    if leaves_to_the_right(&walker, &source, index, point, tolerance) =>
                {
                    crate::log::debug!(x = point.x, y = point.y, index, "union crossing");
                    joint.push(point);
                    crossings += 1;
                    restart_at(&mut source, index, point, tolerance);
                    std::mem::swap(&mut walker, &mut source);
                }
                Some((point, _)) => passed.push(point),
                None => {
                    joint.push(edge.end_point());
                    walker.rotate_left(1);
                }
            }

            let closed = joint
                .last()
                .is_some_and(|last| joint.len() > 1 && last.almost_eq(&joint[0], tolerance));
            if closed {
                joint.pop();
                if crossings == 0 && !encloses(&walker, &source, tolerance) {
                    return Err(GeometryError::DisjointContours);
                }
                let corners = without_straight_corners(&joint, tolerance);
                crate::log::debug!(corners = corners.len(), crossings, "union closed");
                return ClosedContour::from_corners(corners);
            }
        }

        Err(GeometryError::UnionDidNotClose { steps: max_steps })
    }
}

fn canonical_lines(contour: &ClosedContour) -> Result<Vec<Line>, GeometryError> {
    let lines = contour.bottom_left_first().lines()?;
    if lines.len() < 3 {
        return Err(GeometryError::TooFewCorners { count: lines.len() });
    }
    Ok(lines)
}

/// Nearest contact of `edge` with any of `lines`, measured from the edge's
/// start, skipping points already seen. Both ends of a shared stretch count
/// as contacts. Returns the point and the index of the line it lies on.
fn first_contact(
    lines: &[Line],
    edge: &Line,
    seen: [&[Location]; 2],
    tolerance: Tolerance,
) -> Option<(Location, usize)> {
    let start = edge.start_point();
    lines
        .iter()
        .enumerate()
        .flat_map(|(index, line)| {
            let points = match edge.intersection(line, tolerance) {
                Some(SegmentIntersection::Point(point)) => vec![point],
                Some(SegmentIntersection::Overlap(shared)) => {
                    vec![shared.start_point(), shared.end_point()]
                }
                None => Vec::new(),
            };
            points.into_iter().map(move |point| (point, index))
        })
        .filter(|(point, _)| {
            !seen.iter().flat_map(|s| s.iter()).any(|v| v.almost_eq(point, tolerance))
        })
        .min_by(|(a, _), (b, _)| start.distance(*a).total_cmp(&start.distance(*b)))
}

/// Whether the boundary leaving `point` along `source` turns further right
/// than the walker's own continuation. For counter-clockwise loops that is
/// the side away from the walker's material.
fn leaves_to_the_right(
    walker: &[Line],
    source: &[Line],
    index: usize,
    point: Location,
    tolerance: Tolerance,
) -> bool {
    let edge = walker[0];
    let incoming = heading(&edge);
    let walker_out = if point.almost_eq(&edge.end_point(), tolerance) {
        heading(&walker[1 % walker.len()])
    } else {
        incoming
    };
    let line = source[index];
    let source_out = if point.almost_eq(&line.end_point(), tolerance) {
        heading(&source[(index + 1) % source.len()])
    } else {
        heading(&line)
    };
    turn(incoming, source_out, tolerance) < turn(incoming, walker_out, tolerance) - tolerance.raw()
}

fn heading(line: &Line) -> Vector {
    line.start_arrow().heading.to_vector()
}

/// Signed angle from `from` to `to`, negative to the right. Turning back
/// is always +π.
fn turn(from: Vector, to: Vector, tolerance: Tolerance) -> f64 {
    let across = from.cross(to);
    let across = if across.abs() <= tolerance.raw() { 0.0 } else { across };
    across.atan2(from.dot(to))
}

/// Drop corners that sit on the straight line between their neighbours
fn without_straight_corners(corners: &[Location], tolerance: Tolerance) -> Vec<Location> {
    let count = corners.len();
    (0..count)
        .filter(|&i| {
            let before = corners[(i + count - 1) % count];
            let after = corners[(i + 1) % count];
            !Line::between(before, after)
                .is_some_and(|line| line.contains_point(corners[i], tolerance))
        })
        .map(|i| corners[i])
        .collect()
}

/// Rotate `lines` so the line holding `point` comes first, cut it at
/// `point`, and close the loop with the piece that was cut off.
fn restart_at(lines: &mut Vec<Line>, index: usize, point: Location, tolerance: Tolerance) {
    lines.rotate_left(index);
    let cut = lines[0];

    if point.almost_eq(&cut.end_point(), tolerance) {
        lines.remove(0);
    } else if let Some(rest) = Line::between(point, cut.end_point()) {
        lines[0] = rest;
    }

    if !point.almost_eq(&cut.start_point(), tolerance) {
        if let Some(head) = Line::between(cut.start_point(), point) {
            lines.push(head);
        }
    }
}

/// Whether every corner of the loop `inner` lies inside or on the loop `outer`
fn encloses(outer: &[Line], inner: &[Line], tolerance: Tolerance) -> bool {
    let corners: Vec<Location> = outer.iter().map(Line::start_point).collect();
    match ClosedContour::from_corners(corners) {
        Ok(outer) => inner.iter().all(|line| outer.contains(line.start_point(), tolerance)),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn loc(x: f64, y: f64) -> Location {
        Location::new(x, y)
    }

    fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> ClosedContour {
        ClosedContour::from_corners([loc(x0, y0), loc(x1, y0), loc(x1, y1), loc(x0, y1)]).unwrap()
    }

    #[test]
    fn test_notched_union() {
        let union = rectangle(0.0, 0.0, 4.0, 4.0)
            .union(&rectangle(1.0, 3.0, 3.0, 5.0), TOL)
            .unwrap();
        let expected = vec![
            loc(0.0, 0.0),
            loc(4.0, 0.0),
            loc(4.0, 4.0),
            loc(3.0, 4.0),
            loc(3.0, 5.0),
            loc(1.0, 5.0),
            loc(1.0, 4.0),
            loc(0.0, 4.0),
        ];
        assert_almost_eq!(union.corners(), expected, TOL);
    }

    #[test]
    fn test_union_is_symmetric_in_argument_order() {
        let a = rectangle(0.0, 0.0, 4.0, 4.0);
        let b = rectangle(1.0, 3.0, 3.0, 5.0);
        assert_almost_eq!(b.union(&a, TOL).unwrap(), a.union(&b, TOL).unwrap(), TOL);
    }

    #[test]
    fn test_union_with_itself() {
        let a = rectangle(0.0, 0.0, 2.0, 1.0);
        assert_almost_eq!(a.union(&a, TOL).unwrap(), a, TOL);
    }

    #[test]
    fn test_union_with_enclosed() {
        let outer = rectangle(0.0, 0.0, 10.0, 10.0);
        let inner = rectangle(2.0, 2.0, 4.0, 4.0);
        assert_almost_eq!(outer.union(&inner, TOL).unwrap(), outer, TOL);
        assert_almost_eq!(inner.union(&outer, TOL).unwrap(), outer, TOL);
    }

    #[test]
    fn test_union_along_a_shared_edge() {
        let union = rectangle(0.0, 0.0, 4.0, 4.0)
            .union(&rectangle(2.0, 0.0, 6.0, 2.0), TOL)
            .unwrap();
        let expected = vec![
            loc(0.0, 0.0),
            loc(6.0, 0.0),
            loc(6.0, 2.0),
            loc(4.0, 2.0),
            loc(4.0, 4.0),
            loc(0.0, 4.0),
        ];
        assert_almost_eq!(union.corners(), expected, TOL);
    }

    #[test]
    fn test_union_with_enclosed_touching_the_edge() {
        let board = rectangle(0.0, 0.0, 20.0, 10.0);
        let tab = rectangle(16.0, 3.0, 20.0, 7.0);
        assert_almost_eq!(board.union(&tab, TOL).unwrap(), board, TOL);
        assert_almost_eq!(tab.union(&board, TOL).unwrap(), board, TOL);
    }

    #[test]
    fn test_union_of_side_by_side_squares() {
        let left = rectangle(0.0, 0.0, 1.0, 1.0);
        let right = rectangle(1.0, 0.0, 2.0, 1.0);
        assert_almost_eq!(left.union(&right, TOL).unwrap(), rectangle(0.0, 0.0, 2.0, 1.0), TOL);
    }

    #[test]
    fn test_turning_back_is_the_leftmost_turn() {
        let east = Vector::new(1.0, 0.0);
        assert_almost_eq!(turn(east, Vector::new(-1.0, -0.0), TOL), std::f64::consts::PI, TOL);
        assert!(turn(east, Vector::new(0.0, -1.0), TOL) < turn(east, east, TOL));
    }

    #[test]
    fn test_straight_corners_are_dropped() {
        let corners = [loc(0.0, 0.0), loc(1.0, 0.0), loc(2.0, 0.0), loc(2.0, 1.0), loc(0.0, 1.0)];
        assert_almost_eq!(
            without_straight_corners(&corners, TOL),
            vec![loc(0.0, 0.0), loc(2.0, 0.0), loc(2.0, 1.0), loc(0.0, 1.0)],
            TOL
        );
    }

    #[test]
    fn test_union_of_disjoint_is_refused() {
        let a = rectangle(0.0, 0.0, 1.0, 1.0);
        let b = rectangle(5.0, 5.0, 6.0, 6.0);
        assert_eq!(a.union(&b, TOL), Err(GeometryError::DisjointContours));
    }

    #[test]
    fn test_restart_at_mid_segment() {
        let mut lines = rectangle(0.0, 0.0, 2.0, 2.0).lines().unwrap();
        restart_at(&mut lines, 1, loc(2.0, 1.0), TOL);
        let starts: Vec<Location> = lines.iter().map(Line::start_point).collect();
        assert_almost_eq!(
            starts,
            vec![loc(2.0, 1.0), loc(2.0, 2.0), loc(0.0, 2.0), loc(0.0, 0.0), loc(2.0, 0.0)],
            TOL
        );
    }

    #[test]
    fn test_restart_at_corner_drops_empty_pieces() {
        let mut lines = rectangle(0.0, 0.0, 2.0, 2.0).lines().unwrap();
        restart_at(&mut lines, 0, loc(2.0, 0.0), TOL);
        assert_eq!(lines.len(), 4);
        assert_almost_eq!(lines[0].start_point(), loc(2.0, 0.0), TOL);
    }
}
