//! Wind velocity texture generator.
//!
//! Fetches the GFS 10 m U and V analysis grids from the NOMADS filter
//! service, decodes them through the ecCodes toolchain, packs them into an
//! RGB velocity texture and optionally writes a companion `.earth` scene
//! descriptor.

pub mod config;
pub mod fetch;
pub mod pipeline;

pub use config::{Args, DescriptorConfig, FetchConfig, PipelineConfig};
pub use fetch::{GridFetcher, HttpGridFetcher};
pub use pipeline::{run, PipelineOutput};
