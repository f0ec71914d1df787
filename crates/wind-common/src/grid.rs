//! Grid records and the velocity texture derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{WindError, WindResult};

/// Wind velocity component carried by a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Eastward velocity (U).
    East,
    /// Northward velocity (V).
    North,
}

impl Component {
    /// Both components in processing order.
    pub const ALL: [Component; 2] = [Component::East, Component::North];

    /// GRIB variable short name selected from the filter service.
    pub fn grib_variable(&self) -> &'static str {
        match self {
            Component::East => "UGRD",
            Component::North => "VGRD",
        }
    }

    /// Single-letter suffix used for temporary file names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Component::East => "u",
            Component::North => "v",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::East => f.write_str("east"),
            Component::North => f.write_str("north"),
        }
    }
}

/// A decoded rectangular grid of scalar samples.
///
/// Samples are row-major with `index = row * width + col`, in the order the
/// source grid delivers them (first column at longitude 0).
#[derive(Debug, Clone, PartialEq)]
pub struct GridRecord {
    width: usize,
    height: usize,
    samples: Vec<f64>,
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl GridRecord {
    /// Create a record, checking that the dimensions are positive and match
    /// the number of samples.
    pub fn new(width: usize, height: usize, samples: Vec<f64>) -> WindResult<Self> {
        if width == 0 || height == 0 {
            return Err(WindError::MalformedDump(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            WindError::MalformedDump(format!("grid dimensions overflow: {}x{}", width, height))
        })?;
        if samples.len() != expected {
            return Err(WindError::MalformedDump(format!(
                "expected {} samples for a {}x{} grid, got {}",
                expected,
                width,
                height,
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            samples,
            minimum: None,
            maximum: None,
        })
    }

    /// Attach the extrema reported by the source, if any.
    pub fn with_extrema(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Minimum reported by the source. Informational only.
    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    /// Maximum reported by the source. Informational only.
    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    /// Sample at a flat row-major index.
    pub fn sample(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the record holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// East and north grids that share one shape.
#[derive(Debug, Clone)]
pub struct ComponentPair {
    east: GridRecord,
    north: GridRecord,
}

impl ComponentPair {
    /// Pair two grids, failing if their dimensions disagree.
    pub fn new(east: GridRecord, north: GridRecord) -> WindResult<Self> {
        if east.width != north.width || east.height != north.height {
            return Err(WindError::DimensionMismatch {
                east_width: east.width,
                east_height: east.height,
                north_width: north.width,
                north_height: north.height,
            });
        }
        Ok(Self { east, north })
    }

    pub fn east(&self) -> &GridRecord {
        &self.east
    }

    pub fn north(&self) -> &GridRecord {
        &self.north
    }

    pub fn width(&self) -> usize {
        self.east.width
    }

    pub fn height(&self) -> usize {
        self.east.height
    }
}

/// Two-channel velocity image: red is east, green is north, blue is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VelocityTexture {
    width: usize,
    height: usize,
    /// Interleaved RGB, 3 bytes per pixel, row-major.
    pixels: Vec<u8>,
}

impl VelocityTexture {
    /// Wrap an interleaved RGB buffer. The buffer must hold exactly
    /// `width * height` pixels.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<u8>) -> WindResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| {
                WindError::Encode(format!("texture dimensions overflow: {}x{}", width, height))
            })?;
        if pixels.len() != expected {
            return Err(WindError::Encode(format!(
                "RGB buffer holds {} bytes, {}x{} texture needs {}",
                pixels.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw interleaved RGB bytes.
    pub fn as_rgb(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 3;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }
}
