//! GRIB grid normalization and decoding.
//!
//! Grids are handled through an external toolchain rather than an in-process
//! decoder. The ecCodes command line utilities rewrite a downloaded message
//! to simple packing (`grib_set`) and then serialize it as JSON
//! (`grib_dump -j`). This crate wraps both steps behind [`GridToolchain`]
//! and turns the JSON into a typed [`wind_common::GridRecord`].
//!
//! # Dump shape
//!
//! ```text
//! { "messages": [ [ { "key": "Ni", "value": 360 }, ..., { "key": "values", "value": [..] } ] ] }
//! ```
//!
//! Only the first message is consulted.

pub mod dump;
pub mod toolchain;

pub use dump::{decode_record, extract, FieldRecord, StructuredDump};
pub use toolchain::{EccodesToolchain, GridToolchain};
