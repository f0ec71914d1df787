//! Velocity texture composition.
//!
//! Packs an east/north wind pair into an RGB buffer for GPU particle
//! advection:
//! - red: east component, normalized to [0, 255]
//! - green: north component, normalized to [0, 255]
//! - blue: always 0
//!
//! Columns are rotated by half the grid width so that a longitude-0-origin
//! source grid comes out with the antimeridian at the left edge.

use tracing::debug;
use wind_common::{Component, ComponentPair, GridRecord, VelocityTexture, WindError, WindResult};

/// Lower normalization bound in m/s. Maps to 0.
pub const NORMALIZATION_MIN: f64 = -25.0;

/// Upper normalization bound in m/s. Maps to 255.
pub const NORMALIZATION_MAX: f64 = 25.0;

/// Source column for output column `x`: `(x + width / 2) % width`.
///
/// `width / 2` truncates, so for odd widths the seam sits half a cell west
/// of the antimeridian.
#[inline]
pub fn dateline_column(x: usize, width: usize) -> usize {
    (x + width / 2) % width
}

/// Map a velocity onto a byte using the fixed bounds.
///
/// Values outside the bounds clip to 0 or 255; the fractional part is
/// truncated, so 0.0 m/s maps to 127.
#[inline]
pub fn normalize_velocity(value: f64) -> u8 {
    let scaled = 255.0 * (value - NORMALIZATION_MIN) / (NORMALIZATION_MAX - NORMALIZATION_MIN);
    scaled.clamp(0.0, 255.0) as u8
}

fn read_sample(grid: &GridRecord, component: Component, index: usize) -> WindResult<f64> {
    // index is always in range: both grids were checked to be width * height long
    let value = grid.samples()[index];
    if !value.is_finite() {
        return Err(WindError::InvalidSample {
            component,
            index,
            value,
        });
    }
    Ok(value)
}

/// Compose a velocity texture from a validated component pair.
pub fn compose_pair(pair: &ComponentPair) -> WindResult<VelocityTexture> {
    let width = pair.width();
    let height = pair.height();
    let mut pixels = Vec::with_capacity(width * height * 3);

    for y in 0..height {
        let row = y * width;
        for x in 0..width {
            let source_index = row + dateline_column(x, width);
            let u = read_sample(pair.east(), Component::East, source_index)?;
            let v = read_sample(pair.north(), Component::North, source_index)?;
            pixels.extend_from_slice(&[normalize_velocity(u), normalize_velocity(v), 0]);
        }
    }

    debug!(width, height, "Composed velocity texture");
    VelocityTexture::from_rgb(width, height, pixels)
}

/// Compose a velocity texture from east and north grids.
///
/// Fails with `DimensionMismatch` if the grids differ in shape and with
/// `InvalidSample` on the first NaN or infinite sample read.
pub fn compose(east: GridRecord, north: GridRecord) -> WindResult<VelocityTexture> {
    let pair = ComponentPair::new(east, north)?;
    compose_pair(&pair)
}
