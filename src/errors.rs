//! Error types with diagnostic codes using miette
//!
//! Geometry that is ambiguous but legitimate (parallel lines, a zero-length
//! direction) is reported with `Option`. Everything here is a refusal to
//! build geometry that would be wrong or unmanufacturable.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while constructing or combining board geometry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    // ========================================================================
    // Numeric input
    // ========================================================================
    #[error("{what} must be finite, got {value}")]
    #[diagnostic(code(copperline::input::non_finite))]
    NonFinite { what: &'static str, value: f64 },

    #[error("tolerance must be positive and finite, got {value}")]
    #[diagnostic(
        code(copperline::input::invalid_tolerance),
        help("use Tolerance::DEFAULT (1e-6 mm) unless you need something coarser")
    )]
    InvalidTolerance { value: f64 },

    // ========================================================================
    // Paths
    // ========================================================================
    #[error("bend radius must be non-zero")]
    #[diagnostic(
        code(copperline::path::zero_bend_radius),
        help("a straight run is a Line; positive radii turn left, negative radii turn right")
    )]
    ZeroBendRadius,

    // ========================================================================
    // Contours
    // ========================================================================
    #[error("edge {index} of the contour is an arc, only straight edges are supported here")]
    #[diagnostic(code(copperline::contour::arc_edge))]
    ArcEdge { index: usize },

    #[error("a closed contour needs at least 3 corners, got {count}")]
    #[diagnostic(code(copperline::contour::too_few_corners))]
    TooFewCorners { count: usize },

    #[error("contours are disjoint and neither contains the other")]
    #[diagnostic(
        code(copperline::contour::disjoint),
        help("a union of disjoint shapes is not a single closed contour; draw them separately")
    )]
    DisjointContours,

    #[error("contour union did not close after {steps} steps")]
    #[diagnostic(
        code(copperline::contour::union_did_not_close),
        help("the inputs probably touch along nearly coincident edges; try a coarser tolerance")
    )]
    UnionDidNotClose { steps: usize },

    // ========================================================================
    // Fabrication
    // ========================================================================
    #[error(
        "finished hole of {requested} mm does not fit a {pad_diameter} mm pad (maximum {maximum} mm)"
    )]
    #[diagnostic(
        code(copperline::fabrication::constraint_overflow),
        help("enlarge the pad or drill a smaller hole")
    )]
    ConstraintOverflow {
        requested: f64,
        maximum: f64,
        pad_diameter: f64,
    },

    #[error("production hole of {production} mm is below what can be drilled")]
    #[diagnostic(code(copperline::fabrication::hole_too_small))]
    HoleTooSmall { production: f64 },
}

/// Reject NaN and infinities for a named input
pub(crate) fn finite(what: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { what, value })
    }
}
