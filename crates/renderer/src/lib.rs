//! Velocity texture rendering.
//!
//! - [`compose`]: dateline reprojection, fixed-range normalization and
//!   two-channel packing of an east/north wind pair
//! - [`png`]: lossless RGB PNG encoding of the packed texture
//! - [`scene`]: companion `.earth` scene descriptor
//! - [`output`]: staged writes that land whole or not at all

pub mod compose;
pub mod output;
pub mod png;
pub mod scene;

pub use compose::{compose, compose_pair, dateline_column, NORMALIZATION_MAX, NORMALIZATION_MIN};
pub use output::{stage, write_atomic, StagedFile};
pub use png::{create_png_rgb, write_texture};
pub use scene::{render_scene, write_scene, SceneOptions, VelocityLayerPreset};
