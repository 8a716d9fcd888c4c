use std::path::Path;

use log::info;

use crate::error::Result;
use crate::math::vec2::Vec2;

/// A raw pixel map used by the textured-triangle path.
///
/// Texel coordinates are in pixels, `(0, 0)` at the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureMap {
    data: Vec<u32>, // The pixel data of the texture in ARGB format.
    width: u32,     // The width of the texture in pixels.
    height: u32,    // The height of the texture in pixels.
}

impl TextureMap {
    /// Builds a texture from raw ARGB pixels in row-major order.
    ///
    /// Returns `None` if the pixel count doesn't match the dimensions or the
    /// map is empty.
    pub fn new(width: u32, height: u32, data: Vec<u32>) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    // Load a texture from an image file (PPM, PNG, BMP, ...)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img = image::open(path.as_ref())?.to_rgb8();
        let (width, height) = img.dimensions();

        // Convert RGB bytes to ARGB u32, alpha forced opaque
        let data: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                crate::colors::pack_color(r, g, b)
            })
            .collect();

        info!(
            "Loaded {}x{} texture from {:?}",
            width,
            height,
            path.as_ref()
        );
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Samples the nearest pixel to `texel` (pixel coordinates).
    ///
    /// The coordinate is rounded; anything outside the map is clamped to the
    /// edge. There is no wrapping or filtering.
    #[inline]
    pub fn sample(&self, texel: Vec2) -> u32 {
        let x = clamp_texel(texel.x, self.width);
        let y = clamp_texel(texel.y, self.height);
        self.data[(y * self.width + x) as usize]
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
}

#[inline]
fn clamp_texel(coord: f32, size: u32) -> u32 {
    if coord.is_nan() {
        return 0;
    }
    coord.round().clamp(0.0, (size - 1) as f32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> TextureMap {
        // 2x2: red, green / blue, white
        TextureMap::new(
            2,
            2,
            vec![0xFFFF0000, 0xFF00FF00, 0xFF0000FF, 0xFFFFFFFF],
        )
        .unwrap()
    }

    #[test]
    fn samples_by_rounded_coordinate() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), 0xFFFF0000);
        assert_eq!(tex.sample(Vec2::new(0.6, 0.2)), 0xFF00FF00);
        assert_eq!(tex.sample(Vec2::new(0.4, 0.7)), 0xFF0000FF);
    }

    #[test]
    fn clamps_outside_coordinates() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(-5.0, 9.0)), 0xFF0000FF);
        assert_eq!(tex.sample(Vec2::new(10.0, 10.0)), 0xFFFFFFFF);
        assert_eq!(tex.sample(Vec2::new(f32::NAN, 0.0)), 0xFFFF0000);
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        assert!(TextureMap::new(2, 2, vec![0; 3]).is_none());
        assert!(TextureMap::new(0, 0, vec![]).is_none());
    }
}
