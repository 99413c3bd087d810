//! Traces: chains of paths whose ends kiss.
//!
//! A [`Trace`] is immutable. Edits go through a [`TraceBuilder`], which
//! re-establishes pose continuity after every append or insert, so no caller
//! can hold a trace whose interior poses disagree.
//!
//! ```
//! use copperline::{Arrow, Bend, Curve, Line, Location, Direction, TraceBuilder};
//!
//! let mut builder = TraceBuilder::new(Arrow::new(Location::ORIGIN, Direction::E));
//! builder.append(Line::new(2.0)).append(Bend::new(1.0, 3.0).unwrap());
//! let trace = builder.build();
//! assert_eq!(trace.len(), 2);
//! assert!((trace.length() - 3.0).abs() < 1e-12);
//! ```

use crate::path::{Curve, Path};
use crate::pose::Arrow;
use crate::sink::DrawingSink;
use crate::types::{AlmostEq, Tolerance};

/// An ordered run of [`Path`]s from a start pose
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    start: Arrow,
    paths: Vec<Path>,
}

impl Trace {
    /// Start editing a trace at `start`
    pub fn builder(start: Arrow) -> TraceBuilder {
        TraceBuilder::new(start)
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resume editing
    pub fn into_builder(self) -> TraceBuilder {
        TraceBuilder { trace: self }
    }

    /// Every path starts where the previous one ends, the first at the trace start
    pub fn is_continuous(&self, tolerance: Tolerance) -> bool {
        let mut pose = self.start;
        for path in &self.paths {
            if !path.start_arrow().almost_eq(&pose, tolerance) {
                return false;
            }
            pose = path.end_arrow();
        }
        true
    }

    fn propagate(&mut self) {
        let mut pose = self.start;
        for path in &mut self.paths {
            path.set_start_arrow(pose);
            pose = path.end_arrow();
        }
    }
}

impl Curve for Trace {
    fn length(&self) -> f64 {
        self.paths.iter().map(Curve::length).sum()
    }

    fn start_arrow(&self) -> Arrow {
        self.start
    }

    fn end_arrow(&self) -> Arrow {
        self.paths.last().map_or(self.start, Curve::end_arrow)
    }

    /// Past the last path the trace continues straight ahead
    fn along_arrow(&self, distance: f64) -> Arrow {
        let mut remaining = distance;
        for path in &self.paths {
            let length = path.length();
            if remaining <= length {
                return path.along_arrow(remaining);
            }
            remaining -= length;
        }
        self.end_arrow().along_arrow(remaining)
    }

    fn paint(&self, sink: &mut dyn DrawingSink, width: f64) {
        for path in &self.paths {
            path.paint(sink, width);
        }
    }
}

impl AlmostEq for Trace {
    fn almost_eq(&self, other: &Trace, tolerance: Tolerance) -> bool {
        self.start.almost_eq(&other.start, tolerance)
            && self.paths.almost_eq(&other.paths, tolerance)
    }
}

/// Editor for a [`Trace`]
#[derive(Clone, Debug)]
pub struct TraceBuilder {
    trace: Trace,
}

impl TraceBuilder {
    pub fn new(start: Arrow) -> Self {
        TraceBuilder { trace: Trace { start, paths: Vec::new() } }
    }

    /// Add `path` after the current end; its own start pose is replaced
    pub fn append(&mut self, path: impl Into<Path>) -> &mut Self {
        self.trace.paths.push(path.into());
        self.trace.propagate();
        crate::log::debug!(
            paths = self.trace.len(),
            end = %self.trace.end_arrow(),
            "appended to trace"
        );
        self
    }

    /// Put `path` at `index`, keeping everything from `index` on in place.
    ///
    /// The new path and every path before it are moved back so they end
    /// where their successor starts; the trace start follows the head.
    /// Inserting at `len` is an append.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, path: impl Into<Path>) -> &mut Self {
        if index == self.trace.len() {
            return self.append(path);
        }

        let paths = &mut self.trace.paths;
        paths.insert(index, path.into());
        for i in (0..=index).rev() {
            let next_start = paths[i + 1].start_arrow();
            paths[i].set_end_arrow(next_start);
        }
        self.trace.start = paths[0].start_arrow();
        crate::log::debug!(
            index,
            start = %self.trace.start,
            "inserted into trace"
        );
        self
    }

    /// Insert at the head, keeping the current start path in place
    pub fn prepend(&mut self, path: impl Into<Path>) -> &mut Self {
        self.insert(0, path)
    }

    /// Move the whole trace to a new start pose
    pub fn set_start_arrow(&mut self, start: Arrow) -> &mut Self {
        self.trace.start = start;
        self.trace.propagate();
        self
    }

    /// The trace as edited so far
    pub fn current(&self) -> &Trace {
        &self.trace
    }

    pub fn build(self) -> Trace {
        self.trace
    }
}

impl From<TraceBuilder> for Trace {
    fn from(builder: TraceBuilder) -> Trace {
        builder.build()
    }
}
