//! Per-frame depth buffer for hidden surface removal.
//!
//! The buffer stores reciprocal camera-space depth (1/z) for each pixel.
//! Larger values are nearer the camera, so the depth test is a plain "keep
//! the larger". Values are addressed through a flat, stride-indexed array.

/// Value of a pixel nothing has been drawn to since the last [`DepthBuffer::clear`].
///
/// Any surface in front of the camera has `1/z > 0` and beats it.
pub const CLEARED_DEPTH: f32 = 0.0;

/// Reciprocal-depth buffer, one value per canvas pixel.
///
/// Within a frame a pixel only ever moves to a nearer (or equally near)
/// surface. Scope is one frame: clear it before rasterizing the next.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![CLEARED_DEPTH; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    /// Resets every pixel to [`CLEARED_DEPTH`].
    pub fn clear(&mut self) {
        self.data.fill(CLEARED_DEPTH);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Stored 1/z at (x, y), or None if out of bounds.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|index| self.data[index])
    }

    /// Depth test at (x, y).
    ///
    /// Records `inv_depth` and returns `true` if it is at least as near as
    /// what is stored. Out-of-bounds pixels, surfaces behind the camera
    /// (`inv_depth <= 0`) and non-finite values always fail and leave the
    /// buffer untouched.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, inv_depth: f32) -> bool {
        if !inv_depth.is_finite() || inv_depth <= CLEARED_DEPTH {
            return false;
        }
        let Some(index) = self.index(x, y) else {
            return false;
        };
        if inv_depth >= self.data[index] {
            self.data[index] = inv_depth;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_wins_and_farther_never_overwrites() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(depth.test_and_set(0, 0, 1.0 / 6.0));
        assert!(depth.test_and_set(0, 0, 1.0 / 3.0));
        assert!(!depth.test_and_set(0, 0, 1.0 / 6.0));
        assert_eq!(depth.get(0, 0), Some(1.0 / 3.0));
    }

    #[test]
    fn equal_depth_passes() {
        let mut depth = DepthBuffer::new(1, 1);
        assert!(depth.test_and_set(0, 0, 0.25));
        assert!(depth.test_and_set(0, 0, 0.25));
    }

    #[test]
    fn rejects_invalid_depths_and_positions() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(!depth.test_and_set(0, 0, f32::INFINITY));
        assert!(!depth.test_and_set(0, 0, f32::NAN));
        assert!(!depth.test_and_set(0, 0, -0.5));
        assert!(!depth.test_and_set(2, 0, 0.5));
        assert!(!depth.test_and_set(0, -1, 0.5));
        assert_eq!(depth.get(0, 0), Some(CLEARED_DEPTH));
    }

    #[test]
    fn wide_buffers_address_every_pixel() {
        let mut depth = DepthBuffer::new(70_000, 2);
        assert!(depth.test_and_set(69_999, 1, 0.5));
        assert_eq!(depth.get(69_999, 1), Some(0.5));
        assert_eq!(depth.get(0, 1), Some(CLEARED_DEPTH));
    }

    #[test]
    fn clear_resets_to_sentinel() {
        let mut depth = DepthBuffer::new(3, 1);
        depth.test_and_set(2, 0, 0.9);
        depth.clear();
        assert_eq!(depth.get(2, 0), Some(CLEARED_DEPTH));
    }
}
