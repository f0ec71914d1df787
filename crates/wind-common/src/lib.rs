//! Common types shared by the wind texture crates.

pub mod error;
pub mod grid;
pub mod request;

pub use error::{WindError, WindResult};
pub use grid::{Component, ComponentPair, GridRecord, VelocityTexture};
pub use request::{parse_date, Cycle, ForecastRequest, Resolution, DEFAULT_BASE_URL};
