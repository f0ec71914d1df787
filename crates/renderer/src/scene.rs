//! Scene descriptor (`.earth` file) generation.
//!
//! The descriptor tells the globe viewer how to load the velocity texture
//! as a `VelocityParticleImage` layer, optionally on top of the stock base
//! map layers.

use std::fmt::Write as _;
use std::path::Path;

use quick_xml::escape::escape;
use tracing::debug;
use wind_common::WindResult;

use crate::output::write_atomic;

/// Layer opacity for the velocity layer.
pub const VELOCITY_OPACITY: &str = "0.8";

/// Sprite image referenced in sprite mode.
pub const SPRITE_URI: &str = "WindSprite.png";

const PREAMBLE: &str = r#"<?xml version="1.0" ?>
<map>
  <version>3</version>
  <options name="SIMDIS Default">
    <type>geocentric</type>
    <profile>
      <srs>wgs84</srs>
    </profile>
    <terrain>
      <first_level>0</first_level>
      <driver>rex</driver>
      <first_lod>0</first_lod>
    </terrain>
  </options>
"#;

const BASE_LAYERS: &str = r#"  <MBTilesElevation name="Ni`ihau">
    <nodata_value>0</nodata_value>
    <compute_levels>false</compute_levels>
    <cache_policy>
      <usage>no_cache</usage>
    </cache_policy>
    <visible>true</visible>
    <no_data_value>0</no_data_value>
    <min_valid_value>0.001</min_valid_value>
    <filename>USGS/Niihau_USGS_NED_10m_L12.mbtiles</filename>
  </MBTilesElevation>
  <MBTilesElevation name="Kaua`i">
    <nodata_value>0</nodata_value>
    <compute_levels>false</compute_levels>
    <cache_policy>
      <usage>no_cache</usage>
    </cache_policy>
    <visible>true</visible>
    <no_data_value>0</no_data_value>
    <min_valid_value>0.001</min_valid_value>
    <filename>USGS/Kauai_USGS_NED_10m_L12.mbtiles</filename>
  </MBTilesElevation>
  <MBTilesImage name="Whole Earth">
    <compute_levels>false</compute_levels>
    <cache_policy>
      <usage>no_cache</usage>
    </cache_policy>
    <visible>true</visible>
    <opacity>1</opacity>
    <filename>WorldImagery/TE2_480_srtm30_plus_bathy_hill_0-5.mbtiles</filename>
  </MBTilesImage>
  <MBTilesImage name="Kaua`i Ni`ihau">
    <compute_levels>false</compute_levels>
    <cache_policy>
      <usage>no_cache</usage>
    </cache_policy>
    <visible>true</visible>
    <opacity>1</opacity>
    <filename>WorldImagery/Kauai_wv3_Niihau_wv2_8_12_webp.mbtiles</filename>
  </MBTilesImage>
"#;

/// Options controlling descriptor content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneOptions {
    /// Render particles as sprites instead of points.
    pub use_sprites: bool,
    /// Omit the static elevation and imagery layers.
    pub exclude_base_map: bool,
}

/// Particle rendering parameters for the velocity layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityLayerPreset {
    pub particle_dimension: u32,
    pub speed_factor: f64,
    pub point_size: u32,
    pub sprite_uri: Option<&'static str>,
}

impl VelocityLayerPreset {
    /// Fewer, slower, larger particles drawn with a sprite image.
    pub const SPRITES: Self = Self {
        particle_dimension: 512,
        speed_factor: 0.25,
        point_size: 6,
        sprite_uri: Some(SPRITE_URI),
    };

    /// Dense, small point particles.
    pub const POINTS: Self = Self {
        particle_dimension: 1024,
        speed_factor: 0.5,
        point_size: 2,
        sprite_uri: None,
    };

    pub fn for_options(options: &SceneOptions) -> Self {
        if options.use_sprites {
            Self::SPRITES
        } else {
            Self::POINTS
        }
    }
}

fn velocity_layer(out: &mut String, texture_ref: &str, preset: &VelocityLayerPreset) {
    let name = escape(texture_ref);
    // Writing to a String cannot fail
    let _ = writeln!(out, "  <VelocityParticleImage name=\"{}\">", name);
    let _ = writeln!(out, "    <opacity>{}</opacity>", VELOCITY_OPACITY);
    let _ = writeln!(
        out,
        "    <particle_dimension>{}</particle_dimension>",
        preset.particle_dimension
    );
    let _ = writeln!(out, "    <speed_factor>{}</speed_factor>", preset.speed_factor);
    let _ = writeln!(out, "    <point_size>{}</point_size>", preset.point_size);
    if let Some(sprite) = preset.sprite_uri {
        let _ = writeln!(out, "    <sprite_uri>{}</sprite_uri>", sprite);
    }
    let _ = writeln!(out, "    <uri>{}</uri>", name);
    out.push_str("  </VelocityParticleImage>\n");
}

/// Render the full descriptor document.
pub fn render_scene(texture_ref: &str, options: &SceneOptions) -> String {
    let mut out = String::with_capacity(PREAMBLE.len() + BASE_LAYERS.len() + 512);
    out.push_str(PREAMBLE);
    if !options.exclude_base_map {
        out.push_str(BASE_LAYERS);
    }
    velocity_layer(
        &mut out,
        texture_ref,
        &VelocityLayerPreset::for_options(options),
    );
    out.push_str("</map>\n");
    out
}

/// Render the descriptor and write it to `destination`.
pub fn write_scene(texture_ref: &str, options: &SceneOptions, destination: &Path) -> WindResult<()> {
    let document = render_scene(texture_ref, options);
    write_atomic(destination, document.as_bytes())?;
    debug!(
        path = %destination.display(),
        sprites = options.use_sprites,
        base_map = !options.exclude_base_map,
        "Wrote scene descriptor"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_selection() {
        let sprites = SceneOptions {
            use_sprites: true,
            exclude_base_map: false,
        };
        assert_eq!(
            VelocityLayerPreset::for_options(&sprites),
            VelocityLayerPreset::SPRITES
        );
        assert_eq!(
            VelocityLayerPreset::for_options(&SceneOptions::default()),
            VelocityLayerPreset::POINTS
        );
    }

    #[test]
    fn test_texture_ref_is_escaped() {
        let doc = render_scene("wind <&> \"1\".png", &SceneOptions::default());
        assert!(doc.contains("<uri>wind &lt;&amp;&gt; &quot;1&quot;.png</uri>"));
    }

    #[test]
    fn test_document_is_closed() {
        let doc = render_scene("nws.png", &SceneOptions::default());
        assert!(doc.starts_with("<?xml version=\"1.0\" ?>\n<map>\n"));
        assert!(doc.ends_with("  </VelocityParticleImage>\n</map>\n"));
    }
}
