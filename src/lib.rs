//! Plane geometry for printed circuit board layout.
//!
//! Boards are described with poses ([`Arrow`]), paths ([`Line`], [`Bend`])
//! chained into [`Trace`]s, and closed outlines ([`ClosedContour`]) that can
//! be offset and merged. Drawing goes through explicit sinks
//! ([`DrawingSink`], [`LayeredSink`], [`HoleSink`]); the kernel itself never
//! writes files.
//!
//! All lengths are millimetres and all angles radians. Every floating point
//! comparison takes an explicit [`Tolerance`].

pub mod log;
mod macros;

pub mod contour;
pub mod coplanar;
pub mod defaults;
pub mod errors;
pub mod fabrication;
pub mod holes;
pub mod implicit;
pub mod path;
pub mod pose;
pub mod shapes;
pub mod sink;
pub mod trace;
pub mod types;
mod union;

pub use contour::{ClosedContour, Edge};
pub use coplanar::{CoplanarTrace, EndCap, EndKind, Side, TraceEnd, ViaSite, ViaSkips};
pub use errors::GeometryError;
pub use fabrication::{DrillClass, EuroCircuits, FabricationClass, PatternClass, Via};
pub use holes::{Hole, HoleLedger, HoleList, HoleSink, HoleState};
pub use implicit::ImplicitLine;
pub use path::{Bend, Curve, Line, Path, SegmentIntersection};
pub use pose::Arrow;
pub use shapes::{Circle, Rectangle};
pub use sink::{ApertureId, Drawing, DrawingSink, LayeredRecorder, LayeredSink, Recorder};
pub use trace::{Trace, TraceBuilder};
pub use types::{AlmostEq, Direction, Location, Tolerance, Vector, inch, mil};
