//! Best-effort decoding of embedded cover art.

use image::DynamicImage;
use image::imageops::FilterType;

use crate::error::CoverError;
use crate::player::{CoverSample, CoverTagType};

/// Decode an embedded cover sample and scale it to a square display edge.
///
/// Only samples tagged as front cover, or left untyped by the tagger, are
/// accepted; anything else (back covers, leaflets, inline thumbnails) is
/// rejected so it never replaces the artwork.
pub fn decode_cover(sample: &CoverSample, edge: u32) -> Result<DynamicImage, CoverError> {
    match sample.tag_type {
        CoverTagType::FrontCover | CoverTagType::Undefined | CoverTagType::None => {}
        other => return Err(CoverError::UnsupportedImageType(other)),
    }
    let decoded = image::load_from_memory(&sample.data)?;
    Ok(decoded.resize_exact(edge, edge, FilterType::Triangle))
}

/// Encoded PNG bytes for tests that need a decodable cover sample.
#[cfg(test)]
pub(crate) fn sample_png_bytes() -> Vec<u8> {
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        4,
        4,
        image::Rgba([10, 20, 30, 255]),
    ));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}
