//! Colour buffer for one canvas.
//!
//! Owns a flat ARGB8888 pixel array with width/height metadata and
//! bounds-checked 2D access. Off-canvas writes are silently dropped so the
//! rasterizer never needs to clip before calling in.

use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;

use crate::colors::{self, unpack_color};
use crate::error::Result;

/// The pixels of one rendered frame, row-major, packed ARGB with alpha 255.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![colors::BACKGROUND; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = vec![colors::BACKGROUND; width as usize * height as usize];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Writes a pixel. Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Mutable row-major pixel slice, `width` pixels per row.
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// The frame as raw bytes in native-endian ARGB8888, ready for a
    /// streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let c = unpack_color(self.pixels[(y * self.width + x) as usize]);
            Rgb([c.r, c.g, c.b])
        })
    }

    /// Saves the frame; the format follows the file extension (`.ppm`,
    /// `.bmp`, `.png`, ...).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_rgb_image().save(path.as_ref())?;
        info!("Saved {}x{} frame to {:?}", self.width, self.height, path.as_ref());
        Ok(())
    }
}
