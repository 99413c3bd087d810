//! Infinite lines in implicit form `a·x + b·y + c = 0`.
//!
//! The normal `(a, b)` is kept at unit length, so [`ImplicitLine::signed_distance`]
//! is a true distance. Lines built from an [`Arrow`] have their normal
//! pointing to the left of the heading.

use glam::dvec2;

use crate::pose::Arrow;
use crate::types::{AlmostEq, Location, Tolerance};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImplicitLine {
    a: f64,
    b: f64,
    c: f64,
}

impl ImplicitLine {
    /// Normalize `(a, b, c)`. Returns None when `(a, b)` is the zero vector.
    pub fn new(a: f64, b: f64, c: f64) -> Option<Self> {
        let norm = dvec2(a, b).length();
        if norm == 0.0 || !norm.is_finite() {
            return None;
        }
        Some(ImplicitLine { a: a / norm, b: b / norm, c: c / norm })
    }

    /// The line an arrow travels along
    pub fn through(arrow: &Arrow) -> Self {
        let normal = arrow.heading.turned_left();
        let (a, b) = (normal.dx(), normal.dy());
        ImplicitLine { a, b, c: -(a * arrow.origin.x + b * arrow.origin.y) }
    }

    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Positive on the side the normal points to
    pub fn signed_distance(&self, point: Location) -> f64 {
        self.a * point.x + self.b * point.y + self.c
    }

    /// Solve the 2x2 system. Parallel and coincident lines have no single
    /// intersection and give `None`.
    pub fn intersection(&self, other: &ImplicitLine, tolerance: Tolerance) -> Option<Location> {
        let det = dvec2(self.a, self.b).perp_dot(dvec2(other.a, other.b));
        if det.abs() <= tolerance.raw() {
            return None;
        }
        let x = (self.b * other.c - other.b * self.c) / det;
        let y = (other.a * self.c - self.a * other.c) / det;
        Some(Location::new(x, y))
    }
}

/// Same set of points, whichever way the normal faces
impl AlmostEq for ImplicitLine {
    fn almost_eq(&self, other: &ImplicitLine, tolerance: Tolerance) -> bool {
        let same = |sign: f64| {
            (self.a - sign * other.a).abs() <= tolerance.raw()
                && (self.b - sign * other.b).abs() <= tolerance.raw()
                && (self.c - sign * other.c).abs() <= tolerance.raw()
        };
        same(1.0) || same(-1.0)
    }
}
