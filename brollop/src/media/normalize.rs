//! Bounded-dimension re-encoding of uploaded photos.
//!
//! Photos whose longest edge fits within [`NormalizeSettings::max_edge`] keep their dimensions;
//! larger photos are scaled down so the longest edge is exactly `max_edge`, preserving the aspect
//! ratio. The output is always a JPEG, whatever the input format was.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, codecs::jpeg::JpegEncoder, imageops::FilterType};
use thiserror::Error;

use crate::config::PhotosConfig;

#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The bytes are not a raster image we can read
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The decoded image could not be written as JPEG
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSettings {
    pub max_edge: u32,
    pub jpeg_quality: u8,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            max_edge: 1920,
            jpeg_quality: 80,
        }
    }
}

impl From<&PhotosConfig> for NormalizeSettings {
    fn from(config: &PhotosConfig) -> Self {
        Self {
            max_edge: config.max_edge,
            jpeg_quality: config.jpeg_quality,
        }
    }
}

/// A re-encoded photo, ready for object storage.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Dimensions of the decoded source, after EXIF orientation
    pub source_width: u32,
    pub source_height: u32,
}

impl NormalizedImage {
    pub const CONTENT_TYPE: &'static str = "image/jpeg";
    pub const EXTENSION: &'static str = "jpg";
}

/// Output dimensions for a `width` x `height` source.
///
/// Never upscales. When scaling, each side is rounded to the nearest pixel and kept at least 1px.
pub fn target_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }

    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_edge);
    (scaled(width), scaled(height))
}

/// Decode `bytes`, bound its dimensions and re-encode it as JPEG.
///
/// CPU bound; call it from `spawn_blocking` in async code.
pub fn normalize(bytes: &[u8], settings: NormalizeSettings) -> Result<NormalizedImage, NormalizeError> {
    let source = decode(bytes)?;
    let (source_width, source_height) = (source.width(), source.height());
    let (width, height) = target_dimensions(source_width, source_height, settings.max_edge);

    let resized = if (width, height) == (source_width, source_height) {
        source
    } else {
        source.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = resized.into_rgb8();

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, settings.jpeg_quality)
        .encode_image(&rgb)
        .map_err(|e| NormalizeError::Encode(e.to_string()))?;

    Ok(NormalizedImage {
        bytes: buf,
        width,
        height,
        source_width,
        source_height,
    })
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, NormalizeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| NormalizeError::Decode(e.to_string()))?;

    let mut decoder = reader.into_decoder().map_err(|e| NormalizeError::Decode(e.to_string()))?;
    let orientation = decoder.orientation().map_err(|e| NormalizeError::Decode(e.to_string()))?;

    let mut image = DynamicImage::from_decoder(decoder).map_err(|e| NormalizeError::Decode(e.to_string()))?;
    image.apply_orientation(orientation);
    Ok(image)
}
