//! Rectangles and circles built on the pose and contour algebra
//!
//! Each shape knows how to:
//! - Produce its outline or flash for a [`DrawingSink`]
//! - Grow or shrink by a clearance (`outset`)
//! - Answer containment queries

use crate::contour::ClosedContour;
use crate::pose::Arrow;
use crate::sink::DrawingSink;
use crate::types::{AlmostEq, Direction, Location, Tolerance};

/// A rectangle anchored at its bottom-left corner; the anchor's heading runs
/// along the width, the height extends to its left
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    start: Arrow,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub fn new(start: Arrow, width: f64, height: f64) -> Self {
        Rectangle { start, width, height }
    }

    /// Axis-aligned rectangle spanning two opposite corners
    pub fn from_corners(bottom_left: Location, top_right: Location) -> Self {
        Rectangle {
            start: Arrow::new(bottom_left, Direction::E),
            width: top_right.x - bottom_left.x,
            height: top_right.y - bottom_left.y,
        }
    }

    /// Rectangle of `width` along and `height` across `center`'s heading
    pub fn centered(center: Arrow, width: f64, height: f64) -> Self {
        let corner = center.along_arrow(-width / 2.0).right(height / 2.0);
        let start = Arrow::new(corner, center.heading);
        Rectangle { start, width, height }
    }

    /// Square of side `width` centered on `center`
    pub fn centered_square(center: Arrow, width: f64) -> Self {
        Rectangle::centered(center, width, width)
    }

    pub fn start_arrow(&self) -> Arrow {
        self.start
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn center(&self) -> Location {
        self.start.along_arrow(self.width / 2.0).left(self.height / 2.0)
    }

    /// Bottom-left, bottom-right, top-right, top-left
    pub fn corners(&self) -> [Location; 4] {
        let bottom_right = self.start.along_arrow(self.width);
        [
            self.start.origin,
            bottom_right.origin,
            bottom_right.left(self.height),
            self.start.left(self.height),
        ]
    }

    /// Counter-clockwise outline
    pub fn outline(&self) -> ClosedContour {
        ClosedContour::polygon(self.corners().to_vec())
    }

    pub fn outset(&self, clearance: f64) -> Rectangle {
        let corner = self.start.along_arrow(-clearance).right(clearance);
        let start = Arrow::new(corner, self.start.heading);
        Rectangle {
            start,
            width: self.width + 2.0 * clearance,
            height: self.height + 2.0 * clearance,
        }
    }

    /// Boundary included
    pub fn contains(&self, point: Location, tolerance: Tolerance) -> bool {
        let offset = point - self.start.origin;
        let along = offset.dot(self.start.heading.to_vector());
        let across = offset.dot(self.start.heading.turned_left().to_vector());
        let t = tolerance.raw();
        along >= -t && along <= self.width + t && across >= -t && across <= self.height + t
    }

    pub fn draw(&self, sink: &mut dyn DrawingSink) {
        self.outline().draw(sink);
    }
}

impl AlmostEq for Rectangle {
    fn almost_eq(&self, other: &Rectangle, tolerance: Tolerance) -> bool {
        self.start.almost_eq(&other.start, tolerance)
            && self.width.almost_eq(&other.width, tolerance)
            && self.height.almost_eq(&other.height, tolerance)
    }
}

/// A round pad or void, drawn as a single flash
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Location,
    pub diameter: f64,
}

impl Circle {
    pub fn new(center: Location, diameter: f64) -> Self {
        Circle { center, diameter }
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn outset(&self, clearance: f64) -> Circle {
        Circle { center: self.center, diameter: self.diameter + 2.0 * clearance }
    }

    pub fn contains(&self, point: Location, tolerance: Tolerance) -> bool {
        self.center.distance(point) <= self.radius() + tolerance.raw()
    }

    pub fn draw(&self, sink: &mut dyn DrawingSink) {
        let aperture = sink.circular_aperture(self.diameter);
        sink.flash_aperture(self.center, aperture);
    }
}
