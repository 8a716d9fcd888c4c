//! Scanline-based triangle filling.
//!
//! Triangles are filled one horizontal row at a time using the classic
//! flat-bottom/flat-top decomposition:
//!
//! 1. **Sort vertices** by Y coordinate (top to bottom in screen space)
//! 2. **Split** at the middle vertex's row: the point on the long edge
//!    `v0 -> v2` at `v1.y` becomes the second end of a horizontal edge
//! 3. **Fill** each half row by row, interpolating the left/right boundary
//!    (x, depth and texel) linearly from the apex to the shared edge
//!
//! ```text
//!        v0                   v0
//!        /\                   /\
//!       /  \                 /  \
//!      /    \       =>      /----\<- split at v1.y
//!     /      \             v1   split
//!    /________\             \    /
//!   v1        v2             \  /
//!                             \/
//!                             v2
//! ```
//!
//! Each row is handed to a span callback; the flat fill draws it as a
//! depth-tested line, the textured fill walks it sampling a texture. Because
//! the depth test is per pixel, triangles can be submitted in any order and the
//! nearest surface still wins.
//!
//! Both halves include the shared middle row and every row includes both
//! boundary pixels, which keeps adjacent triangles from showing seams in most
//! cases. It is not a watertight fill rule.

use super::line::{draw_line, plot, visible_steps};
use crate::camera::CanvasPoint;
use crate::math::vec2::Vec2;
use crate::render::depth::DepthBuffer;
use crate::render::framebuffer::FrameBuffer;
use crate::texture::TextureMap;

/// Rows closer together than this are treated as the same row.
const ROW_EPSILON: f32 = 1e-6;

/// A triangle corner carrying every attribute the scanline walk interpolates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanVertex {
    pub point: CanvasPoint,
    pub texel: Vec2,
}

impl SpanVertex {
    pub fn new(point: CanvasPoint, texel: Vec2) -> Self {
        Self { point, texel }
    }

    fn lerp(&self, other: Self, t: f32) -> Self {
        Self {
            point: self.point.lerp(other.point, t),
            texel: self.texel.lerp(other.texel, t),
        }
    }

    fn at_row(mut self, y: f32) -> Self {
        self.point.y = y;
        self
    }
}

/// Axis for [`sort_vertices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAxis {
    X,
    Y,
}

/// Sorts vertices ascending along `axis`. The sort is stable, so ties keep
/// their submission order.
pub fn sort_vertices(vertices: &mut [SpanVertex], axis: SortAxis) {
    match axis {
        SortAxis::X => vertices.sort_by(|a, b| a.point.x.total_cmp(&b.point.x)),
        SortAxis::Y => vertices.sort_by(|a, b| a.point.y.total_cmp(&b.point.y)),
    }
}

/// Walks the triangle row by row, calling `span(left, right)` for each canvas
/// row it covers. Rows outside `0..height` are skipped. Triangles with a
/// non-finite coordinate produce no spans.
pub fn for_each_span<F>(vertices: [SpanVertex; 3], height: u32, mut span: F)
where
    F: FnMut(SpanVertex, SpanVertex),
{
    if vertices.iter().any(|v| !v.point.is_finite()) {
        return;
    }

    let mut sorted = vertices;
    sort_vertices(&mut sorted, SortAxis::Y);
    let [top, middle, bottom] = sorted;

    let total_height = bottom.point.y - top.point.y;
    if total_height < ROW_EPSILON {
        // Every corner on one row: the triangle is its own span.
        sort_vertices(&mut sorted, SortAxis::X);
        span(sorted[0], sorted[2]);
        return;
    }

    // Point on the long edge at the middle vertex's row
    let t = (middle.point.y - top.point.y) / total_height;
    let split = top.lerp(bottom, t).at_row(middle.point.y);

    let mut base = [middle, split];
    sort_vertices(&mut base, SortAxis::X);
    let [left, right] = base;

    fill_half(top, left, right, height, &mut span); // flat-bottom
    fill_half(bottom, left, right, height, &mut span); // flat-top
}

/// Fills the half-triangle between `apex` and the horizontal edge
/// `left`-`right`, both end rows included.
fn fill_half<F>(apex: SpanVertex, left: SpanVertex, right: SpanVertex, height: u32, span: &mut F)
where
    F: FnMut(SpanVertex, SpanVertex),
{
    let base_y = left.point.y;
    let rise = base_y - apex.point.y;
    if rise.abs() < ROW_EPSILON {
        span(left, right);
        return;
    }

    let first = apex.point.y.min(base_y).round().max(0.0);
    let last = apex.point.y.max(base_y).round().min(height as f32 - 1.0);
    if first > last {
        return;
    }

    for row in first as i64..=last as i64 {
        let y = row as f32;
        let t = ((y - apex.point.y) / rise).clamp(0.0, 1.0);
        span(
            apex.lerp(left, t).at_row(y),
            apex.lerp(right, t).at_row(y),
        );
    }
}

/// Fills a projected triangle with a flat colour.
///
/// Each row is drawn with [`draw_line`]; with `depth` set every pixel is
/// depth-tested against the buffer.
pub fn fill_triangle(
    buffer: &mut FrameBuffer,
    points: [CanvasPoint; 3],
    color: u32,
    mut depth: Option<&mut DepthBuffer>,
) {
    let vertices = points.map(|p| SpanVertex::new(p, Vec2::ZERO));
    let height = buffer.height();
    for_each_span(vertices, height, |left, right| {
        draw_line(buffer, left.point, right.point, color, depth.as_deref_mut());
    });
}

/// Fills a projected triangle with a texture.
///
/// `texels` are the texture-space (pixel) coordinates of each canvas corner.
/// They are interpolated affinely in lockstep with the canvas position along
/// the edges and across each row, then sampled by nearest pixel. No
/// perspective correction is applied.
pub fn fill_textured_triangle(
    buffer: &mut FrameBuffer,
    points: [CanvasPoint; 3],
    texels: [Vec2; 3],
    texture: &TextureMap,
    mut depth: Option<&mut DepthBuffer>,
) {
    let vertices = [
        SpanVertex::new(points[0], texels[0]),
        SpanVertex::new(points[1], texels[1]),
        SpanVertex::new(points[2], texels[2]),
    ];
    let height = buffer.height();
    for_each_span(vertices, height, |left, right| {
        textured_span(buffer, left, right, texture, depth.as_deref_mut());
    });
}

fn textured_span(
    buffer: &mut FrameBuffer,
    left: SpanVertex,
    right: SpanVertex,
    texture: &TextureMap,
    mut depth: Option<&mut DepthBuffer>,
) {
    let dx = right.point.x - left.point.x;
    let steps = dx.abs().round();
    if steps < 1.0 {
        plot(buffer, left.point, texture.sample(left.texel), depth);
        return;
    }

    let Some((first, last)) = visible_steps(
        left.point,
        dx,
        0.0,
        steps,
        buffer.width(),
        buffer.height(),
    ) else {
        return;
    };

    for i in first..=last {
        let t = i as f32 / steps;
        let v = left.lerp(right, t);
        plot(buffer, v.point, texture.sample(v.texel), depth.as_deref_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::BACKGROUND;

    const RED: u32 = 0xFFFF0000;
    const GREEN: u32 = 0xFF00FF00;

    fn count(buffer: &FrameBuffer, color: u32) -> usize {
        buffer.pixels().iter().filter(|&&p| p == color).count()
    }

    fn triangle_at(depth: f32) -> [CanvasPoint; 3] {
        [
            CanvasPoint::new(10.0, 5.0, depth),
            CanvasPoint::new(30.0, 35.0, depth),
            CanvasPoint::new(2.0, 25.0, depth),
        ]
    }

    #[test]
    fn sorting_is_stable() {
        let a = SpanVertex::new(CanvasPoint::flat(5.0, 1.0), Vec2::new(1.0, 0.0));
        let b = SpanVertex::new(CanvasPoint::flat(3.0, 1.0), Vec2::new(2.0, 0.0));
        let c = SpanVertex::new(CanvasPoint::flat(4.0, 0.0), Vec2::new(3.0, 0.0));
        let mut v = [a, b, c];
        sort_vertices(&mut v, SortAxis::Y);
        assert_eq!(v, [c, a, b]);
        sort_vertices(&mut v, SortAxis::X);
        assert_eq!(v, [b, c, a]);
    }

    #[test]
    fn split_covers_every_row_once_per_half() {
        let mut rows = Vec::new();
        let vertices = triangle_at(1.0).map(|p| SpanVertex::new(p, Vec2::ZERO));
        for_each_span(vertices, 100, |l, r| {
            assert_eq!(l.point.y, r.point.y);
            assert!(l.point.x <= r.point.x + 1e-3);
            rows.push(l.point.y as i32);
        });
        // 5..=25 from the top half, 25..=35 from the bottom half
        assert_eq!(rows.len(), 21 + 11);
        assert_eq!(rows.first(), Some(&5));
        assert_eq!(rows.last(), Some(&35));
    }

    #[test]
    fn rows_outside_canvas_are_skipped() {
        let mut rows = Vec::new();
        let vertices = [
            CanvasPoint::flat(0.0, -1.0e6),
            CanvasPoint::flat(10.0, 1.0e6),
            CanvasPoint::flat(-10.0, 0.0),
        ]
        .map(|p| SpanVertex::new(p, Vec2::ZERO));
        for_each_span(vertices, 20, |l, _| rows.push(l.point.y));
        assert!(rows.iter().all(|&y| (0.0..20.0).contains(&y)));
        assert!(!rows.is_empty());
    }

    #[test]
    fn fill_is_inside_vertex_bounds() {
        let mut fb = FrameBuffer::new(40, 40);
        fill_triangle(&mut fb, triangle_at(1.0), RED, None);
        assert!(count(&fb, RED) > 200);
        for y in 0..40 {
            for x in 0..40 {
                if fb.get_pixel(x, y) == Some(RED) {
                    assert!((2..=30).contains(&x) && (5..=35).contains(&y));
                }
            }
        }
    }

    #[test]
    fn refilling_is_idempotent() {
        let mut fb = FrameBuffer::new(40, 40);
        let mut depth = DepthBuffer::new(40, 40);
        fill_triangle(&mut fb, triangle_at(3.0), RED, Some(&mut depth));
        let (pixels, depths) = (fb.clone(), depth.clone());
        fill_triangle(&mut fb, triangle_at(3.0), RED, Some(&mut depth));
        assert_eq!(fb, pixels);
        assert_eq!(depth, depths);
    }

    #[test]
    fn nearer_triangle_wins_in_any_order() {
        for near_first in [true, false] {
            let mut fb = FrameBuffer::new(40, 40);
            let mut depth = DepthBuffer::new(40, 40);
            let near = (triangle_at(3.0), RED);
            let far = (triangle_at(6.0), GREEN);
            let order = if near_first { [near, far] } else { [far, near] };
            for (points, color) in order {
                fill_triangle(&mut fb, points, color, Some(&mut depth));
            }
            assert_eq!(count(&fb, GREEN), 0);
            assert_eq!(fb.get_pixel(15, 20), Some(RED));
        }
    }

    #[test]
    fn textured_fill_is_depth_tested_against_flat_fill() {
        let texture = TextureMap::new(8, 8, vec![GREEN; 64]).unwrap();
        let texels = [Vec2::new(0.0, 0.0), Vec2::new(7.0, 0.0), Vec2::new(0.0, 7.0)];

        for (flat_depth, textured_depth, winner, loser) in
            [(3.0, 6.0, RED, GREEN), (6.0, 3.0, GREEN, RED)]
        {
            for flat_first in [true, false] {
                let mut fb = FrameBuffer::new(40, 40);
                let mut depth = DepthBuffer::new(40, 40);
                let flat = |fb: &mut FrameBuffer, depth: &mut DepthBuffer| {
                    fill_triangle(fb, triangle_at(flat_depth), RED, Some(depth))
                };
                let textured = |fb: &mut FrameBuffer, depth: &mut DepthBuffer| {
                    fill_textured_triangle(
                        fb,
                        triangle_at(textured_depth),
                        texels,
                        &texture,
                        Some(depth),
                    )
                };
                if flat_first {
                    flat(&mut fb, &mut depth);
                    textured(&mut fb, &mut depth);
                } else {
                    textured(&mut fb, &mut depth);
                    flat(&mut fb, &mut depth);
                }

                assert_eq!(count(&fb, loser), 0, "flat first: {flat_first}");
                assert_eq!(fb.get_pixel(15, 20), Some(winner));
                let nearest = flat_depth.min(textured_depth);
                assert_eq!(depth.get(15, 20), Some(1.0 / nearest));
            }
        }
    }

    #[test]
    fn degenerate_triangles_do_not_poison_depth() {
        let mut fb = FrameBuffer::new(20, 20);
        let mut depth = DepthBuffer::new(20, 20);
        let collinear = [
            CanvasPoint::new(1.0, 1.0, 2.0),
            CanvasPoint::new(5.0, 5.0, 2.0),
            CanvasPoint::new(9.0, 9.0, 2.0),
        ];
        fill_triangle(&mut fb, collinear, RED, Some(&mut depth));
        let single_row = [
            CanvasPoint::new(3.0, 4.0, 2.0),
            CanvasPoint::new(8.0, 4.0, 2.0),
            CanvasPoint::new(5.0, 4.0, 2.0),
        ];
        fill_triangle(&mut fb, single_row, RED, Some(&mut depth));
        for y in 0..20 {
            for x in 0..20 {
                let d = depth.get(x, y).unwrap();
                assert!(d.is_finite());
            }
        }
        assert_eq!(fb.get_pixel(8, 4), Some(RED));
    }

    #[test]
    fn textured_fill_samples_in_lockstep() {
        // Left half of the texture red, right half green
        let pixels = (0..16 * 16)
            .map(|i| if i % 16 < 8 { RED } else { GREEN })
            .collect();
        let texture = TextureMap::new(16, 16, pixels).unwrap();
        let mut fb = FrameBuffer::new(32, 32);
        fill_textured_triangle(
            &mut fb,
            [
                CanvasPoint::flat(0.0, 0.0),
                CanvasPoint::flat(30.0, 0.0),
                CanvasPoint::flat(0.0, 30.0),
            ],
            [Vec2::new(0.0, 0.0), Vec2::new(15.0, 0.0), Vec2::new(0.0, 15.0)],
            &texture,
            None,
        );
        assert_eq!(fb.get_pixel(2, 2), Some(RED));
        assert_eq!(fb.get_pixel(26, 1), Some(GREEN));
        assert_eq!(fb.get_pixel(31, 31), Some(BACKGROUND));
    }
}
