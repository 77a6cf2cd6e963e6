// Shared fixtures for the integration tests.

#![allow(dead_code)]

use edge_stream::TransportWord;
use edge_stream::core_modules::transport::{pack_rgb, pack_slots};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A noisy RGB frame as a flat row-major `(r, g, b)` list.
pub fn noise_pixels(height: usize, width: usize, seed: u64) -> Vec<(u8, u8, u8)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..height * width).map(|_| rng.r#gen()).collect()
}

pub fn pack_pixels(pixels: &[(u8, u8, u8)]) -> Vec<TransportWord> {
    let slots: Vec<u32> = pixels.iter().map(|&(r, g, b)| pack_rgb(r, g, b)).collect();
    pack_slots(&slots)
}

pub fn uniform_pixels(height: usize, width: usize, rgb: (u8, u8, u8)) -> Vec<(u8, u8, u8)> {
    vec![rgb; height * width]
}

pub fn rgb_image(height: usize, width: usize, pixels: &[(u8, u8, u8)]) -> RgbImage {
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (r, g, b) = pixels[y as usize * width + x as usize];
        Rgb([r, g, b])
    })
}

/// Direct 2-D Sobel over the interior, written against random access for comparison.
pub fn reference_edges(height: usize, width: usize, pixels: &[(u8, u8, u8)]) -> Vec<u8> {
    let luma: Vec<i32> = pixels
        .iter()
        .map(|&(r, g, b)| ((r as i32 * 77 + g as i32 * 150 + b as i32 * 29) >> 8))
        .collect();
    let at = |y: usize, x: usize| luma[y * width + x];
    let mut out = Vec::new();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let gx = -at(y - 1, x - 1) + at(y - 1, x + 1) - 2 * at(y, x - 1) + 2 * at(y, x + 1)
                - at(y + 1, x - 1)
                + at(y + 1, x + 1);
            let gy = at(y - 1, x - 1) + 2 * at(y - 1, x) + at(y - 1, x + 1)
                - at(y + 1, x - 1)
                - 2 * at(y + 1, x)
                - at(y + 1, x + 1);
            out.push(((gx.abs() + gy.abs()) >> 1).clamp(0, 255) as u8);
        }
    }
    out
}
