// THEORY:
// Ingestion and egestion around the packed transport. An image file becomes a
// packed `0x00RRGGBB` word buffer plus its dimensions, and a packed edge buffer
// becomes a single-channel image on disk again.

use crate::core_modules::geometry::FrameGeometry;
use crate::core_modules::transport::{TransportWord, pack_rgb, pack_slots, unpack_slots};
use crate::error::EdgeError;
use image::{GrayImage, RgbImage};
use log::debug;
use std::path::Path;

/// A packed input frame ready for the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedFrame {
    pub words: Vec<TransportWord>,
    pub geometry: FrameGeometry,
}

/// Packs an RGB image in row-major order.
pub fn pack_rgb_image(image: &RgbImage) -> PackedFrame {
    let slots: Vec<u32> = image.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();
    PackedFrame {
        words: pack_slots(&slots),
        geometry: FrameGeometry::new(image.height() as usize, image.width() as usize),
    }
}

/// Decodes any format the `image` crate understands and packs it.
pub fn load_packed(path: impl AsRef<Path>) -> Result<PackedFrame, EdgeError> {
    let path = path.as_ref();
    let rgb = image::open(path)?.to_rgb8();
    debug!("loaded {} ({}x{})", path.display(), rgb.width(), rgb.height());
    Ok(pack_rgb_image(&rgb))
}

/// Rebuilds the `(height - 2) x (width - 2)` edge image from packed output.
///
/// The grey value is the low byte of each slot. Returns `None` when the input frame
/// was degenerate and there is nothing to show.
pub fn edge_image(words: &[TransportWord], geometry: FrameGeometry) -> Option<GrayImage> {
    if geometry.output_pixels() == 0 {
        return None;
    }
    let gray: Vec<u8> = unpack_slots(words, geometry.output_pixels())
        .into_iter()
        .map(|slot| (slot & 0xFF) as u8)
        .collect();
    GrayImage::from_raw(geometry.output_width() as u32, geometry.output_height() as u32, gray)
}

/// Writes the edge image, the encoder picked from the file extension.
///
/// Returns `Ok(false)` if the frame had no interior and nothing was written.
pub fn save_edges(words: &[TransportWord], geometry: FrameGeometry, path: impl AsRef<Path>) -> Result<bool, EdgeError> {
    let Some(image) = edge_image(words, geometry) else {
        return Ok(false);
    };
    image.save(path.as_ref())?;
    debug!("saved {} ({}x{})", path.as_ref().display(), image.width(), image.height());
    Ok(true)
}
