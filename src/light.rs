//! Point light used by the ray tracer.

use std::f32::consts::PI;

use crate::math::vec3::Vec3;

/// Lowest brightness any surface receives, lit or shadowed.
pub const AMBIENT_FLOOR: f32 = 0.4;
pub const DEFAULT_LIGHT_POWER: f32 = 40.0;

/// A point light radiating `power` uniformly in every direction.
///
/// Like the camera it is only moved between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub power: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.8, 0.0), DEFAULT_LIGHT_POWER)
    }
}

impl PointLight {
    pub fn new(position: Vec3, power: f32) -> Self {
        PointLight { position, power }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Inverse-square intensity at `distance`, capped at 1.
    ///
    /// `power / (4π·distance²)`. A zero distance is fully lit.
    pub fn intensity_at(&self, distance: f32) -> f32 {
        let intensity = self.power / (4.0 * PI * distance * distance);
        if intensity.is_nan() {
            return 0.0;
        }
        intensity.min(1.0)
    }

    /// Brightness factor for a lit point, in `[AMBIENT_FLOOR, 1]`.
    pub fn brightness(&self, point: Vec3) -> f32 {
        self.intensity_at(point.distance(self.position))
            .clamp(AMBIENT_FLOOR, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_square_falloff() {
        let light = PointLight::new(Vec3::ZERO, 4.0 * PI);
        assert_relative_eq!(light.intensity_at(2.0), 0.25, epsilon = 1e-6);
        assert_relative_eq!(light.intensity_at(4.0), 0.0625, epsilon = 1e-6);
    }

    #[test]
    fn intensity_is_capped_at_one() {
        let light = PointLight::new(Vec3::ZERO, 1000.0);
        assert_eq!(light.intensity_at(0.5), 1.0);
        assert_eq!(light.intensity_at(0.0), 1.0);
    }

    #[test]
    fn brightness_never_drops_below_ambient() {
        let light = PointLight::new(Vec3::ZERO, 1.0);
        assert_eq!(light.brightness(Vec3::new(100.0, 0.0, 0.0)), AMBIENT_FLOOR);
    }

    #[test]
    fn brightness_is_monotonic_in_distance() {
        let light = PointLight::new(Vec3::ZERO, 30.0);
        let mut previous = f32::INFINITY;
        for step in 1..200 {
            let b = light.brightness(Vec3::new(step as f32 * 0.05, 0.0, 0.0));
            assert!(b <= previous);
            previous = b;
        }
    }
}
