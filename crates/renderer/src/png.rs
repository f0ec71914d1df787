//! PNG encoding for velocity textures.
//!
//! Textures are written as truecolor PNG (color type 2, 8 bits per channel)
//! with no scanline filtering and zlib-compressed IDAT. The encoding is
//! lossless, so the channel bytes read back exactly as composed.

use std::io::Write;
use std::path::Path;

use tracing::{debug, instrument};
use wind_common::{VelocityTexture, WindError, WindResult};

use crate::output::write_atomic;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Largest dimension PNG allows (2^31 - 1).
const MAX_DIMENSION: usize = i32::MAX as usize;

/// Bytes per RGB pixel.
const CHANNELS: usize = 3;

/// Create a PNG image from interleaved RGB pixel data (color type 2).
///
/// # Arguments
/// - `pixels`: RGB pixel data (3 bytes per pixel)
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> WindResult<Vec<u8>> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(WindError::Encode(format!(
            "unsupported PNG dimensions {}x{}",
            width, height
        )));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS));
    if expected != Some(pixels.len()) {
        return Err(WindError::Encode(format!(
            "expected {} RGB bytes for {}x{}, got {}",
            width.saturating_mul(height).saturating_mul(CHANNELS),
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::new();

    // PNG signature
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(2); // color type (RGB)
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    // IDAT chunk (image data)
    let idat_data = deflate_idat_rgb(pixels, width, height)
        .map_err(|e| WindError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    // IEND chunk
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode a texture and write it to `path`.
#[instrument(skip(texture), fields(width = texture.width(), height = texture.height()))]
pub fn write_texture(texture: &VelocityTexture, path: &Path) -> WindResult<()> {
    let png = create_png_rgb(texture.as_rgb(), texture.width(), texture.height())?;
    write_atomic(path, &png)?;
    debug!(path = %path.display(), bytes = png.len(), "Wrote texture");
    Ok(())
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    // Write length
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());

    // Write chunk type
    png.extend_from_slice(chunk_type);

    // Write data
    png.extend_from_slice(data);

    // CRC covers type and data, not length
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGB image data for IDAT chunk.
fn deflate_idat_rgb(pixels: &[u8], width: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let stride = width * CHANNELS;

    // Add filter byte (0 = no filter) to each scanline
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    // Compress with flate2
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ihdr_layout() {
        let png = create_png_rgb(&[255, 127, 0, 0, 127, 0], 2, 1).unwrap();

        assert_eq!(&png[0..8], &PNG_SIGNATURE);
        // length (13) + "IHDR"
        assert_eq!(&png[8..12], &13u32.to_be_bytes());
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(&png[16..20], &2u32.to_be_bytes());
        assert_eq!(&png[20..24], &1u32.to_be_bytes());
        assert_eq!(png[24], 8); // bit depth
        assert_eq!(png[25], 2); // truecolor
    }

    #[test]
    fn test_ends_with_iend() {
        let png = create_png_rgb(&[0; 12], 2, 2).unwrap();
        let tail = &png[png.len() - 12..];
        assert_eq!(&tail[0..4], &0u32.to_be_bytes());
        assert_eq!(&tail[4..8], b"IEND");
        assert_eq!(&tail[8..12], &crc32fast::hash(b"IEND").to_be_bytes());
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        assert!(matches!(
            create_png_rgb(&[], 0, 4),
            Err(WindError::Encode(_))
        ));
    }

    #[test]
    fn test_rejects_buffer_length_mismatch() {
        assert!(matches!(
            create_png_rgb(&[0; 5], 1, 2),
            Err(WindError::Encode(_))
        ));
    }
}
