//! Typed planar primitives for board geometry (all lengths in mm).
//!
//! - `Location` is a point on the board, `Vector` a free displacement
//! - `Location - Location = Vector`, `Location + Vector = Location`
//! - `Direction` is unit length by construction; its fields are private so
//!   nothing can build a denormalized one
//! - Equality of derived geometry is always approximate, see [`AlmostEq`]

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use glam::{DVec2, dvec2};

use crate::errors::GeometryError;

/// Precision contract for almost-equality (mm for lengths, rad for angles)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: Tolerance = Tolerance(1e-6);

    /// Create a tolerance with validation (must be positive and finite)
    pub fn try_new(value: f64) -> Result<Tolerance, GeometryError> {
        if value.is_finite() && value > 0.0 {
            Ok(Tolerance(value))
        } else {
            Err(GeometryError::InvalidTolerance { value })
        }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::DEFAULT
    }
}

/// Approximate equality under an explicit tolerance
pub trait AlmostEq {
    fn almost_eq(&self, other: &Self, tolerance: Tolerance) -> bool;

    /// Panic with both values when they differ by more than `tolerance`
    #[track_caller]
    fn assert_almost_eq(&self, other: &Self, tolerance: Tolerance)
    where
        Self: fmt::Debug,
    {
        assert!(
            self.almost_eq(other, tolerance),
            "values differ by more than {}:\n  left: {:?}\n right: {:?}",
            tolerance.raw(),
            self,
            other
        );
    }
}

impl AlmostEq for f64 {
    fn almost_eq(&self, other: &f64, tolerance: Tolerance) -> bool {
        (self - other).abs() <= tolerance.raw()
    }
}

impl<T: AlmostEq + ?Sized> AlmostEq for &T {
    fn almost_eq(&self, other: &&T, tolerance: Tolerance) -> bool {
        (**self).almost_eq(*other, tolerance)
    }
}

impl<T: AlmostEq> AlmostEq for [T] {
    fn almost_eq(&self, other: &[T], tolerance: Tolerance) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| a.almost_eq(b, tolerance))
    }
}

impl<T: AlmostEq> AlmostEq for Vec<T> {
    fn almost_eq(&self, other: &Vec<T>, tolerance: Tolerance) -> bool {
        self.as_slice().almost_eq(other.as_slice(), tolerance)
    }
}

impl<T: AlmostEq> AlmostEq for Option<T> {
    fn almost_eq(&self, other: &Option<T>, tolerance: Tolerance) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.almost_eq(b, tolerance),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Thousandths of an inch, in mm
#[inline]
pub fn mil(value: f64) -> f64 {
    value * 0.0254
}

/// Inches, in mm
#[inline]
pub fn inch(value: f64) -> f64 {
    value * 25.4
}

/// Round for display so that tiny negative residues print as `0.000`
fn display_mm(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

// ============================================================================
// Location
// ============================================================================

/// A point on the board plane
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub const ORIGIN: Location = Location { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Location { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(self, other: Location) -> Location {
        Location::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Location) -> f64 {
        (other - self).length()
    }

    #[inline]
    pub(crate) fn to_dvec2(self) -> DVec2 {
        dvec2(self.x, self.y)
    }
}

impl AlmostEq for Location {
    fn almost_eq(&self, other: &Location, tolerance: Tolerance) -> bool {
        self.distance(*other) <= tolerance.raw()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", display_mm(self.x), display_mm(self.y))
    }
}

/// Subtract two locations to get a vector
impl Sub for Location {
    type Output = Vector;
    fn sub(self, rhs: Location) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vector> for Location {
    type Output = Location;
    fn add(self, rhs: Vector) -> Location {
        Location::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub<Vector> for Location {
    type Output = Location;
    fn sub(self, rhs: Vector) -> Location {
        Location::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl AddAssign<Vector> for Location {
    fn add_assign(&mut self, rhs: Vector) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

// ============================================================================
// Vector
// ============================================================================

/// A free displacement (not a position, not normalized)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Vector { dx, dy }
    }

    pub fn length(self) -> f64 {
        self.to_dvec2().length()
    }

    /// Unit direction of this vector, `None` for the zero vector
    pub fn direction(self) -> Option<Direction> {
        Direction::normalized(self.dx, self.dy)
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.to_dvec2().dot(other.to_dvec2())
    }

    /// z component of the cross product (positive when `other` is to the left)
    pub fn cross(self, other: Vector) -> f64 {
        self.to_dvec2().perp_dot(other.to_dvec2())
    }

    /// Rotated a quarter turn counter-clockwise
    pub fn orthogonal(self) -> Vector {
        Vector::new(-self.dy, self.dx)
    }

    #[inline]
    pub(crate) fn to_dvec2(self) -> DVec2 {
        dvec2(self.dx, self.dy)
    }

    #[inline]
    pub(crate) fn from_dvec2(v: DVec2) -> Self {
        Vector::new(v.x, v.y)
    }
}

impl AlmostEq for Vector {
    fn almost_eq(&self, other: &Vector, tolerance: Tolerance) -> bool {
        (*self - *other).length() <= tolerance.raw()
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.dx * rhs, self.dy * rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.dx, -self.dy)
    }
}

// ============================================================================
// Direction
// ============================================================================

// 1/√2 for diagonal directions
const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// A unit heading in the board plane (y up, angles counter-clockwise from +x)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    dx: f64,
    dy: f64,
}

impl Direction {
    pub const E: Direction = Direction { dx: 1.0, dy: 0.0 };
    pub const NE: Direction = Direction { dx: FRAC_1_SQRT_2, dy: FRAC_1_SQRT_2 };
    pub const N: Direction = Direction { dx: 0.0, dy: 1.0 };
    pub const NW: Direction = Direction { dx: -FRAC_1_SQRT_2, dy: FRAC_1_SQRT_2 };
    pub const W: Direction = Direction { dx: -1.0, dy: 0.0 };
    pub const SW: Direction = Direction { dx: -FRAC_1_SQRT_2, dy: -FRAC_1_SQRT_2 };
    pub const S: Direction = Direction { dx: 0.0, dy: -1.0 };
    pub const SE: Direction = Direction { dx: FRAC_1_SQRT_2, dy: -FRAC_1_SQRT_2 };

    /// Create a normalized direction from components.
    /// Returns None if the input has zero length or is not finite.
    pub fn normalized(dx: f64, dy: f64) -> Option<Self> {
        let v = dvec2(dx, dy);
        let len = v.length();
        if len == 0.0 || !len.is_finite() {
            None
        } else {
            Some(Direction { dx: dx / len, dy: dy / len })
        }
    }

    /// Heading at `angle` radians counter-clockwise from east
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Direction { dx: cos, dy: sin }
    }

    pub fn dx(self) -> f64 {
        self.dx
    }

    pub fn dy(self) -> f64 {
        self.dy
    }

    /// Angle in radians, in (-π, π]
    pub fn angle(self) -> f64 {
        self.dy.atan2(self.dx)
    }

    /// Re-derived from the summed angle rather than rotating the components
    pub fn rotated(self, angle: f64) -> Direction {
        Direction::from_angle(self.angle() + angle)
    }

    pub fn turned_left(self) -> Direction {
        Direction { dx: -self.dy, dy: self.dx }
    }

    pub fn turned_right(self) -> Direction {
        Direction { dx: self.dy, dy: -self.dx }
    }

    pub fn reversed(self) -> Direction {
        Direction { dx: -self.dx, dy: -self.dy }
    }

    pub fn to_vector(self) -> Vector {
        Vector::new(self.dx, self.dy)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::E
    }
}

impl AlmostEq for Direction {
    fn almost_eq(&self, other: &Direction, tolerance: Tolerance) -> bool {
        self.to_vector().almost_eq(&other.to_vector(), tolerance)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.3}, {:.3}>", display_mm(self.dx), display_mm(self.dy))
    }
}

/// Scale a direction by a length to get a displacement
impl Mul<f64> for Direction {
    type Output = Vector;
    fn mul(self, len: f64) -> Vector {
        Vector::new(self.dx * len, self.dy * len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOL: Tolerance = Tolerance::DEFAULT;

    // ==================== Tolerance tests ====================

    #[test]
    fn tolerance_try_new_valid() {
        assert_eq!(Tolerance::try_new(1e-3).map(Tolerance::raw), Ok(1e-3));
    }

    #[test]
    fn tolerance_try_new_rejects_non_positive() {
        assert!(Tolerance::try_new(0.0).is_err());
        assert!(Tolerance::try_new(-1e-6).is_err());
        assert!(Tolerance::try_new(f64::NAN).is_err());
    }

    // ==================== Location / Vector tests ====================

    #[test]
    fn location_difference_is_vector() {
        let v = Location::new(3.0, 4.0) - Location::new(1.0, 1.0);
        assert_eq!(v, Vector::new(2.0, 3.0));
        assert_eq!(Location::new(1.0, 1.0) + v, Location::new(3.0, 4.0));
    }

    #[test]
    fn location_midpoint_and_distance() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);
        assert_eq!(a.midpoint(b), Location::new(1.5, 2.0));
        assert!(a.distance(b).almost_eq(&5.0, TOL));
    }

    #[test]
    fn location_almost_eq_uses_distance() {
        let a = Location::new(1.0, 1.0);
        assert!(a.almost_eq(&Location::new(1.0 + 5e-7, 1.0), TOL));
        assert!(!a.almost_eq(&Location::new(1.0 + 5e-6, 1.0), TOL));
    }

    #[test]
    fn vector_cross_sign() {
        let east = Vector::new(1.0, 0.0);
        assert!(east.cross(Vector::new(0.0, 1.0)) > 0.0);
        assert!(east.cross(Vector::new(0.0, -1.0)) < 0.0);
        assert_eq!(east.orthogonal(), Vector::new(0.0, 1.0));
    }

    #[test]
    fn display_hides_negative_zero() {
        assert_eq!(Location::new(-1e-17, 4.0).to_string(), "(0.000, 4.000)");
    }

    // ==================== Direction tests ====================

    #[test]
    fn direction_normalized() {
        let d = Direction::normalized(3.0, 4.0).unwrap();
        assert!(d.dx().almost_eq(&0.6, TOL));
        assert!(d.dy().almost_eq(&0.8, TOL));
        assert!(Direction::normalized(0.0, 0.0).is_none());
        assert!(Direction::normalized(f64::NAN, 1.0).is_none());
    }

    #[test]
    fn direction_constants_match_angles() {
        assert!(Direction::N.almost_eq(&Direction::from_angle(FRAC_PI_2), TOL));
        assert!(Direction::W.almost_eq(&Direction::from_angle(PI), TOL));
        assert!(Direction::SE.almost_eq(&Direction::from_angle(-PI / 4.0), TOL));
    }

    #[test]
    fn direction_quarter_turns_are_exact() {
        assert_eq!(Direction::E.turned_left(), Direction::N);
        assert_eq!(Direction::E.turned_right(), Direction::S);
        assert_eq!(Direction::N.reversed(), Direction::S);
    }

    #[test]
    fn direction_rotation_stays_unit() {
        let mut d = Direction::NE;
        for _ in 0..1000 {
            d = d.rotated(0.123);
        }
        assert!(d.to_vector().length().almost_eq(&1.0, Tolerance::try_new(1e-12).unwrap()));
    }

    #[test]
    fn unit_helpers() {
        assert!(mil(1000.0).almost_eq(&25.4, TOL));
        assert!(inch(0.5).almost_eq(&12.7, TOL));
    }
}
