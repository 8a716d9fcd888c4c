//! DDA line drawing with an optional depth test.
//!
//! The walk takes `steps = max(|dx|, |dy|)` equal increments from `from` to
//! `to` and plots the rounded position at every step, both endpoints
//! included. Depth is interpolated linearly alongside x and y; when a depth
//! buffer is supplied each pixel is only written if its `1/z` passes the
//! buffer's "nearer or equal" test.

use crate::camera::CanvasPoint;
use crate::render::depth::DepthBuffer;
use crate::render::framebuffer::FrameBuffer;

/// Draws a line from `from` to `to`.
///
/// With `depth` set, the line is depth-tested per pixel and updates the
/// buffer; without it every on-canvas pixel is written. Non-finite endpoints
/// draw nothing.
pub fn draw_line(
    buffer: &mut FrameBuffer,
    from: CanvasPoint,
    to: CanvasPoint,
    color: u32,
    mut depth: Option<&mut DepthBuffer>,
) {
    if !from.is_finite() || !to.is_finite() {
        return;
    }

    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).round();

    if steps < 1.0 {
        // Both ends land on (nearly) the same pixel
        plot(buffer, from, color, depth);
        return;
    }

    let Some((first, last)) =
        visible_steps(from, dx, dy, steps, buffer.width(), buffer.height())
    else {
        return;
    };

    for i in first..=last {
        let t = i as f32 / steps;
        plot(buffer, from.lerp(to, t), color, depth.as_deref_mut());
    }
}

/// Draws the three edges of a projected triangle.
pub fn draw_stroked_triangle(
    buffer: &mut FrameBuffer,
    points: [CanvasPoint; 3],
    color: u32,
    mut depth: Option<&mut DepthBuffer>,
) {
    let [p0, p1, p2] = points;
    draw_line(buffer, p0, p1, color, depth.as_deref_mut());
    draw_line(buffer, p1, p2, color, depth.as_deref_mut());
    draw_line(buffer, p2, p0, color, depth);
}

/// Writes one pixel at the rounded position of `point`, depth-tested when a
/// buffer is given.
#[inline]
pub(super) fn plot(
    buffer: &mut FrameBuffer,
    point: CanvasPoint,
    color: u32,
    depth: Option<&mut DepthBuffer>,
) {
    let x = point.x.round() as i32;
    let y = point.y.round() as i32;
    match depth {
        Some(depth) => {
            if depth.test_and_set(x, y, 1.0 / point.depth) {
                buffer.set_pixel(x, y, color);
            }
        }
        None => buffer.set_pixel(x, y, color),
    }
}

/// Range of step indices whose rounded position can land on the canvas.
///
/// Keeps very long off-screen lines from being walked pixel by pixel. The
/// range is conservative; every plot is still bounds-checked.
pub(super) fn visible_steps(
    from: CanvasPoint,
    dx: f32,
    dy: f32,
    steps: f32,
    width: u32,
    height: u32,
) -> Option<(u64, u64)> {
    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    clip_axis(from.x, dx, width as f32, &mut lo, &mut hi)?;
    clip_axis(from.y, dy, height as f32, &mut lo, &mut hi)?;

    let first = (lo * steps).floor().max(0.0);
    let last = (hi * steps).ceil().min(steps);
    Some((first as u64, last as u64))
}

/// Narrows the parameter interval `[lo, hi]` to where `start + s * delta`
/// rounds into `[0, size)`.
fn clip_axis(start: f32, delta: f32, size: f32, lo: &mut f32, hi: &mut f32) -> Option<()> {
    let (min, max) = (-0.5, size - 0.5);
    if delta == 0.0 {
        return (start >= min && start < max).then_some(());
    }
    let a = (min - start) / delta;
    let b = (max - start) / delta;
    *lo = lo.max(a.min(b));
    *hi = hi.min(a.max(b));
    (*lo <= *hi).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::depth::CLEARED_DEPTH;

    const RED: u32 = 0xFFFF0000;
    const BLUE: u32 = 0xFF0000FF;

    fn lit_pixels(buffer: &FrameBuffer) -> Vec<(i32, i32)> {
        let mut lit = Vec::new();
        for y in 0..buffer.height() as i32 {
            for x in 0..buffer.width() as i32 {
                if buffer.get_pixel(x, y) != Some(crate::colors::BACKGROUND) {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    #[test]
    fn horizontal_line_covers_both_endpoints() {
        let mut fb = FrameBuffer::new(10, 5);
        draw_line(&mut fb, CanvasPoint::flat(2.0, 1.0), CanvasPoint::flat(6.0, 1.0), RED, None);
        assert_eq!(lit_pixels(&fb), vec![(2, 1), (3, 1), (4, 1), (5, 1), (6, 1)]);
    }

    #[test]
    fn diagonal_line_steps_once_per_pixel() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_line(&mut fb, CanvasPoint::flat(7.0, 7.0), CanvasPoint::flat(1.0, 1.0), RED, None);
        let lit = lit_pixels(&fb);
        assert_eq!(lit.len(), 7);
        assert!(lit.iter().all(|&(x, y)| x == y));
    }

    #[test]
    fn zero_length_line_plots_single_pixel() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_line(&mut fb, CanvasPoint::flat(1.2, 2.1), CanvasPoint::flat(1.3, 2.2), RED, None);
        assert_eq!(lit_pixels(&fb), vec![(1, 2)]);
    }

    #[test]
    fn line_clips_to_canvas() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_line(
            &mut fb,
            CanvasPoint::flat(-1.0e6, 3.0),
            CanvasPoint::flat(1.0e6, 3.0),
            RED,
            None,
        );
        assert_eq!(lit_pixels(&fb).len(), 8);

        let mut off = FrameBuffer::new(8, 8);
        draw_line(&mut off, CanvasPoint::flat(-10.0, -10.0), CanvasPoint::flat(-2.0, 20.0), RED, None);
        assert!(lit_pixels(&off).is_empty());
    }

    #[test]
    fn non_finite_endpoint_draws_nothing() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_line(&mut fb, CanvasPoint::flat(f32::NAN, 0.0), CanvasPoint::flat(3.0, 3.0), RED, None);
        assert!(lit_pixels(&fb).is_empty());
    }

    #[test]
    fn depth_tested_line_keeps_nearer_surface() {
        let mut fb = FrameBuffer::new(10, 3);
        let mut depth = DepthBuffer::new(10, 3);
        let near = |x: f32| CanvasPoint::new(x, 1.0, 2.0);
        let far = |x: f32| CanvasPoint::new(x, 1.0, 8.0);

        draw_line(&mut fb, near(0.0), near(9.0), RED, Some(&mut depth));
        draw_line(&mut fb, far(0.0), far(9.0), BLUE, Some(&mut depth));
        assert!((0..10).all(|x| fb.get_pixel(x, 1) == Some(RED)));
        assert_eq!(depth.get(4, 1), Some(0.5));
        assert_eq!(depth.get(4, 0), Some(CLEARED_DEPTH));
    }

    #[test]
    fn depth_is_interpolated_along_the_line() {
        let mut fb = FrameBuffer::new(5, 1);
        let mut depth = DepthBuffer::new(5, 1);
        draw_line(
            &mut fb,
            CanvasPoint::new(0.0, 0.0, 2.0),
            CanvasPoint::new(4.0, 0.0, 4.0),
            RED,
            Some(&mut depth),
        );
        assert_eq!(depth.get(0, 0), Some(0.5));
        assert_eq!(depth.get(2, 0), Some(1.0 / 3.0));
        assert_eq!(depth.get(4, 0), Some(0.25));
    }

    #[test]
    fn points_behind_camera_fail_depth_test() {
        let mut fb = FrameBuffer::new(5, 1);
        let mut depth = DepthBuffer::new(5, 1);
        draw_line(
            &mut fb,
            CanvasPoint::new(0.0, 0.0, -2.0),
            CanvasPoint::new(4.0, 0.0, -2.0),
            RED,
            Some(&mut depth),
        );
        assert!(lit_pixels(&fb).is_empty());
    }
}
