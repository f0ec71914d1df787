//! Synthetic grid and dump generators.
//!
//! Grids are plain `Vec<f64>` in row-major order so they can be fed to both
//! `GridRecord::new` and [`grib_dump_json`].

use serde_json::{json, Value};

/// Grid where every cell holds the same value.
pub fn uniform_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Grid whose value encodes its column: `col` as f64, repeated for every row.
///
/// Useful for checking the dateline column permutation.
pub fn column_index_grid(width: usize, height: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        for col in 0..width {
            data.push(col as f64);
        }
    }
    data
}

/// Grid that ramps linearly from `min` at column 0 to `max` at the last column.
pub fn zonal_ramp_grid(width: usize, height: usize, min: f64, max: f64) -> Vec<f64> {
    let step = if width > 1 {
        (max - min) / (width - 1) as f64
    } else {
        0.0
    };
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        for col in 0..width {
            data.push(min + step * col as f64);
        }
    }
    data
}

/// Build a `grib_dump -j` document for one message.
///
/// Extrema are computed from `values` and emitted after the dimensions, in
/// the same order the real tool uses.
pub fn grib_dump_json(width: usize, height: usize, values: &[f64]) -> Value {
    let minimum = values.iter().copied().fold(f64::INFINITY, f64::min);
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    json!({
        "messages": [[
            { "key": "editionNumber", "value": 2 },
            { "key": "shortName", "value": "10u" },
            { "key": "Ni", "value": width },
            { "key": "Nj", "value": height },
            { "key": "minimum", "value": minimum },
            { "key": "maximum", "value": maximum },
            { "key": "values", "value": values }
        ]]
    })
}

/// Same as [`grib_dump_json`], serialized to bytes.
pub fn grib_dump_bytes(width: usize, height: usize, values: &[f64]) -> Vec<u8> {
    grib_dump_json(width, height, values).to_string().into_bytes()
}
