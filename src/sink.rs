//! Drawing sinks: where finished geometry goes.
//!
//! The kernel never formats output itself. Outlines and flashes are handed
//! to a [`DrawingSink`], which may become an RS274X region, an SVG path or a
//! test recording. A [`LayeredSink`] is a file made of stacked layers of
//! alternating polarity, addressed by index.

use std::fmt;

use crate::contour::Edge;
use crate::defaults;
use crate::types::Location;

/// Identifier of an aperture registered with a sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApertureId(pub u32);

impl fmt::Display for ApertureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// Receiver of finished 2D geometry
pub trait DrawingSink {
    /// Register a circular aperture and return the id to flash or stroke with
    fn circular_aperture(&mut self, diameter: f64) -> ApertureId;

    /// One outline. Each edge runs from the previous edge's target (the last
    /// edge's target for the first edge) to its own target. Without an
    /// aperture the outline is a filled region, with one it is a stroke.
    fn add_outline(&mut self, edges: &[Edge], aperture: Option<ApertureId>);

    /// A single flash of `aperture` centered on `location`
    fn flash_aperture(&mut self, location: Location, aperture: ApertureId);
}

/// A file made of stacked layers
pub trait LayeredSink {
    fn layer(&mut self, index: usize) -> &mut dyn DrawingSink;
}

/// Something a [`Recorder`] was asked to draw
#[derive(Clone, Debug, PartialEq)]
pub enum Drawing {
    Outline { edges: Vec<Edge>, aperture: Option<ApertureId> },
    Flash { location: Location, aperture: ApertureId },
}

impl fmt::Display for Drawing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drawing::Outline { edges, aperture } => {
                write!(f, "outline")?;
                if let Some(aperture) = aperture {
                    write!(f, " {aperture}")?;
                }
                for edge in edges {
                    write!(f, " {edge}")?;
                }
                Ok(())
            }
            Drawing::Flash { location, aperture } => write!(f, "flash {aperture} at {location}"),
        }
    }
}

/// In-memory sink that keeps everything in drawing order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recorder {
    apertures: Vec<f64>,
    drawings: Vec<Drawing>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    pub fn outlines(&self) -> impl Iterator<Item = &[Edge]> {
        self.drawings.iter().filter_map(|d| match d {
            Drawing::Outline { edges, .. } => Some(edges.as_slice()),
            Drawing::Flash { .. } => None,
        })
    }

    pub fn flashes(&self) -> impl Iterator<Item = (Location, ApertureId)> + '_ {
        self.drawings.iter().filter_map(|d| match d {
            Drawing::Flash { location, aperture } => Some((*location, *aperture)),
            Drawing::Outline { .. } => None,
        })
    }

    pub fn aperture_diameter(&self, aperture: ApertureId) -> Option<f64> {
        let index = aperture.0.checked_sub(defaults::APERTURE_BASE)?;
        self.apertures.get(index as usize).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }
}

impl DrawingSink for Recorder {
    fn circular_aperture(&mut self, diameter: f64) -> ApertureId {
        // Equal diameters share one aperture
        let index = match self.apertures.iter().position(|d| *d == diameter) {
            Some(index) => index,
            None => {
                self.apertures.push(diameter);
                self.apertures.len() - 1
            }
        };
        ApertureId(defaults::APERTURE_BASE + index as u32)
    }

    fn add_outline(&mut self, edges: &[Edge], aperture: Option<ApertureId>) {
        self.drawings.push(Drawing::Outline { edges: edges.to_vec(), aperture });
    }

    fn flash_aperture(&mut self, location: Location, aperture: ApertureId) {
        self.drawings.push(Drawing::Flash { location, aperture });
    }
}

impl fmt::Display for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for drawing in &self.drawings {
            writeln!(f, "{drawing}")?;
        }
        Ok(())
    }
}

/// A [`Recorder`] per layer, created on first use
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayeredRecorder {
    layers: Vec<Recorder>,
}

impl LayeredRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The recording of layer `index`, if anything addressed it
    pub fn recorded(&self, index: usize) -> Option<&Recorder> {
        self.layers.get(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl LayeredSink for LayeredRecorder {
    fn layer(&mut self, index: usize) -> &mut dyn DrawingSink {
        if index >= self.layers.len() {
            self.layers.resize_with(index + 1, Recorder::default);
        }
        &mut self.layers[index]
    }
}
