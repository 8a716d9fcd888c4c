//! Canvas-space drawing demos: random triangles and a four-corner gradient.
//!
//! These draw straight onto the frame with no camera or depth involved, on
//! top of whatever the active render mode produced.

use rand::Rng;

use crate::camera::CanvasPoint;
use crate::colors::{self, Color};
use crate::render::rasterizer::{draw_stroked_triangle, fill_triangle};
use crate::render::FrameBuffer;

/// Gradient corner colours, clockwise from the top left.
pub const GRADIENT_TOP_LEFT: Color = Color::new(255, 0, 0);
pub const GRADIENT_TOP_RIGHT: Color = Color::new(0, 0, 255);
pub const GRADIENT_BOTTOM_RIGHT: Color = Color::new(0, 255, 0);
pub const GRADIENT_BOTTOM_LEFT: Color = Color::new(255, 255, 0);

/// A flat canvas triangle, either outlined or filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSketch {
    pub points: [CanvasPoint; 3],
    pub color: Color,
    pub filled: bool,
}

impl CanvasSketch {
    pub fn new(points: [CanvasPoint; 3], color: Color, filled: bool) -> Self {
        Self {
            points,
            color,
            filled,
        }
    }

    /// Three whole-pixel corners anywhere on a `width` x `height` canvas
    /// and a random opaque colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: u32, height: u32, filled: bool) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut corner = || {
            CanvasPoint::flat(
                rng.gen_range(0..width) as f32,
                rng.gen_range(0..height) as f32,
            )
        };
        let points = [corner(), corner(), corner()];
        let color = Color::new(rng.gen(), rng.gen(), rng.gen());
        Self::new(points, color, filled)
    }

    pub fn draw(&self, buffer: &mut FrameBuffer) {
        let color = self.color.to_argb();
        if self.filled {
            fill_triangle(buffer, self.points, color, None);
        } else {
            draw_stroked_triangle(buffer, self.points, color, None);
        }
    }
}

/// Overwrites the whole buffer with a bilinear blend of the four
/// `GRADIENT_*` corner colours.
pub fn draw_gradient(buffer: &mut FrameBuffer) {
    let (width, height) = (buffer.width(), buffer.height());
    let along = |i: u32, len: u32| {
        if len > 1 {
            i as f32 / (len - 1) as f32
        } else {
            0.0
        }
    };

    for y in 0..height {
        let ty = along(y, height);
        let left = lerp_rgb(GRADIENT_TOP_LEFT, GRADIENT_BOTTOM_LEFT, ty);
        let right = lerp_rgb(GRADIENT_TOP_RIGHT, GRADIENT_BOTTOM_RIGHT, ty);
        for x in 0..width {
            let [r, g, b] = lerp3(left, right, along(x, width));
            // Truncating, as the channels never leave [0, 255]
            let color = colors::pack_color(r as u8, g as u8, b as u8);
            buffer.set_pixel(x as i32, y as i32, color);
        }
    }
}

fn lerp_rgb(from: Color, to: Color, t: f32) -> [f32; 3] {
    lerp3(
        [from.r as f32, from.g as f32, from.b as f32],
        [to.r as f32, to.g as f32, to.b as f32],
        t,
    )
}

fn lerp3(from: [f32; 3], to: [f32; 3], t: f32) -> [f32; 3] {
    [0, 1, 2].map(|i| from[i] + (to[i] - from[i]) * t)
}
