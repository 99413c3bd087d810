//! Arrows: a location plus a heading.
//!
//! An [`Arrow`] is the pose used to anchor everything oriented on the board:
//! trace segments, pads, connectors, rows of vias. Arrows are values; every
//! transform returns a new one.
//!
//! # Conventions
//!
//! - Angles are radians, counter-clockwise positive
//! - "Left" and "right" are relative to the heading
//! - [`Arrow::outset_arrow`] offsets to the right, so a counter-clockwise
//!   contour grows when its edges are outset by a positive amount

use std::fmt;

use glam::DMat2;

use crate::implicit::ImplicitLine;
use crate::types::{AlmostEq, Direction, Location, Tolerance, Vector};

/// A position with a heading
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Arrow {
    pub origin: Location,
    pub heading: Direction,
}

impl Arrow {
    pub const fn new(origin: Location, heading: Direction) -> Self {
        Arrow { origin, heading }
    }

    /// Heading angle in radians
    pub fn angle(&self) -> f64 {
        self.heading.angle()
    }

    /// The point `length` ahead (behind when negative)
    pub fn along(&self, length: f64) -> Location {
        self.origin + self.heading * length
    }

    /// Same heading, moved `length` ahead
    pub fn along_arrow(&self, length: f64) -> Arrow {
        Arrow::new(self.along(length), self.heading)
    }

    /// Heading rotated in place
    pub fn rotated(&self, angle: f64) -> Arrow {
        Arrow::new(self.origin, self.heading.rotated(angle))
    }

    /// Rotate both origin and heading about `pivot`
    pub fn rotated_around(&self, pivot: Location, angle: f64) -> Arrow {
        let offset = DMat2::from_angle(angle) * (self.origin - pivot).to_dvec2();
        Arrow::new(pivot + Vector::from_dvec2(offset), self.heading.rotated(angle))
    }

    pub fn turned_left(&self) -> Arrow {
        Arrow::new(self.origin, self.heading.turned_left())
    }

    pub fn turned_right(&self) -> Arrow {
        Arrow::new(self.origin, self.heading.turned_right())
    }

    /// Half turn in place
    pub fn reversed(&self) -> Arrow {
        Arrow::new(self.origin, self.heading.reversed())
    }

    pub fn translated(&self, offset: Vector) -> Arrow {
        Arrow::new(self.origin + offset, self.heading)
    }

    /// Point `offset` to the left of the origin
    pub fn left(&self, offset: f64) -> Location {
        self.turned_left().along(offset)
    }

    /// Point `offset` to the right of the origin
    pub fn right(&self, offset: f64) -> Location {
        self.turned_right().along(offset)
    }

    /// `(left(offset), right(offset))`, the two rails of a centerline
    pub fn left_right(&self, offset: f64) -> (Location, Location) {
        (self.left(offset), self.right(offset))
    }

    /// Parallel arrow shifted `offset` to the right
    pub fn outset_arrow(&self, offset: f64) -> Arrow {
        Arrow::new(self.right(offset), self.heading)
    }

    /// Where the infinite lines through both arrows cross, if they are not parallel
    pub fn crossing(&self, other: &Arrow, tolerance: Tolerance) -> Option<Location> {
        ImplicitLine::through(self).intersection(&ImplicitLine::through(other), tolerance)
    }

    /// `count` parallel arrows stepping `pitch` to the right, starting with `self`
    pub fn repeat_right(&self, pitch: f64, count: usize) -> Vec<Arrow> {
        (0..count)
            .map(|i| self.outset_arrow(pitch * i as f64))
            .collect()
    }
}

impl AlmostEq for Arrow {
    fn almost_eq(&self, other: &Arrow, tolerance: Tolerance) -> bool {
        self.origin.almost_eq(&other.origin, tolerance)
            && self.heading.almost_eq(&other.heading, tolerance)
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.origin, self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_almost_eq;
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI, SQRT_2};

    const TOL: Tolerance = Tolerance::DEFAULT;

    fn loc(x: f64, y: f64) -> Location {
        Location::new(x, y)
    }

    fn diagonal() -> Arrow {
        Arrow::new(loc(0.0, 1.0), Direction::normalized(-1.0, 1.0).unwrap())
    }

    #[test]
    fn test_angle_and_along() {
        let a = diagonal();
        assert_almost_eq!(a.angle(), 0.75 * PI, TOL);
        assert_almost_eq!(a.along(8.0_f64.sqrt()), loc(-2.0, 3.0), TOL);
    }

    #[test]
    fn test_rotated() {
        // 0.75π + 0.75π points straight down
        assert_almost_eq!(diagonal().rotated(0.75 * PI).along(1.0), loc(0.0, 0.0), TOL);
    }

    #[test]
    fn test_rotated_around() {
        let a = diagonal().rotated_around(loc(1.0, 1.0), -FRAC_PI_4);
        assert_almost_eq!(a.origin, loc(1.0 - FRAC_1_SQRT_2, 1.0 + FRAC_1_SQRT_2), TOL);
        assert_almost_eq!(a.angle(), FRAC_PI_2, TOL);
    }

    #[test]
    fn test_rotated_around_preserves_radius() {
        let pivot = loc(3.0, -2.0);
        let a = diagonal();
        let radius = a.origin.distance(pivot);
        for step in 0..16 {
            let rotated = a.rotated_around(pivot, step as f64 * 0.4);
            assert_almost_eq!(rotated.origin.distance(pivot), radius, TOL);
        }
    }

    #[test]
    fn test_left_right() {
        let (left, right) = diagonal().left_right(SQRT_2);
        assert_almost_eq!(left, loc(-1.0, 0.0), TOL);
        assert_almost_eq!(right, loc(1.0, 2.0), TOL);
    }

    #[test]
    fn test_outset_arrow_goes_right() {
        let a = Arrow::new(loc(0.0, 0.0), Direction::E).outset_arrow(2.0);
        assert_almost_eq!(a, Arrow::new(loc(0.0, -2.0), Direction::E), TOL);
    }

    #[test]
    fn test_reversed_twice_is_identity() {
        let a = diagonal();
        assert_almost_eq!(a.reversed().reversed(), a, TOL);
        assert_almost_eq!(a.reversed().heading, Direction::SE, TOL);
    }

    #[test]
    fn test_rotation_round_trip() {
        let a = diagonal();
        for theta in [0.1, 1.0, -2.5, PI, 7.0] {
            assert_almost_eq!(a.rotated(theta).rotated(-theta), a, TOL);
        }
    }

    #[test]
    fn test_crossing() {
        let a = Arrow::new(loc(0.0, 0.0), Direction::E);
        let b = Arrow::new(loc(1.0, 1.0), Direction::SE);
        assert_almost_eq!(a.crossing(&b, TOL).unwrap(), loc(2.0, 0.0), TOL);
        assert!(a.crossing(&a.translated(Vector::new(0.0, 1.0)), TOL).is_none());
    }

    #[test]
    fn test_repeat_right() {
        let rows = Arrow::new(loc(0.0, 0.0), Direction::N).repeat_right(0.5, 3);
        assert_eq!(rows.len(), 3);
        assert_almost_eq!(rows[2].origin, loc(1.0, 0.0), TOL);
    }
}
