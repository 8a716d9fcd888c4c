//! Whitted-style ray tracing with hard shadows.
//!
//! Each pixel casts one primary ray from the camera through its canvas
//! position. The nearest triangle hit is shaded by a point light with
//! inverse-square falloff, and one shadow ray decides whether the light is
//! visible. There are no further bounces.
//!
//! Intersection is a brute-force scan over every triangle, so a frame costs
//! `O(width * height * triangles)` for primary rays plus the same again for
//! shadow rays. Pixels are independent and are traced in parallel rows.

use log::trace;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::colors::Color;
use crate::light::{PointLight, AMBIENT_FLOOR};
use crate::math::vec3::Vec3;
use crate::render::framebuffer::FrameBuffer;
use crate::scene::Triangle;

/// Determinants smaller than this mean the ray runs parallel to the triangle.
const DETERMINANT_EPSILON: f32 = 1e-9;
/// Occluders closer to the shading point than this don't cast shadows.
const SHADOW_BIAS: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// The point `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest hit of a ray against the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayTriangleIntersection {
    pub point: Vec3,
    /// Ray parameter `t` of the hit; a true distance when the ray direction
    /// is unit length.
    pub distance: f32,
    pub triangle_index: usize,
    /// Barycentric weights: `point = v0 + u * e0 + v * e1`.
    pub u: f32,
    pub v: f32,
}

/// Solves `origin + t * direction = v0 + u * e0 + v * e1` for `(t, u, v)`.
///
/// This is the 3x3 system `[-direction, e0, e1] * (t, u, v) = origin - v0`,
/// solved by Cramer's rule. Returns `None` if the system is near-singular
/// (the ray is parallel to the triangle's plane) or the solution lies
/// outside the triangle or at `t <= 0`.
pub fn intersect_triangle(ray: &Ray, triangle: &Triangle) -> Option<(f32, f32, f32)> {
    let (e0, e1) = triangle.edges();
    let p = ray.direction.cross(e1);
    let determinant = e0.dot(p);
    if determinant.abs() < DETERMINANT_EPSILON || !determinant.is_finite() {
        return None;
    }
    let inv_det = 1.0 / determinant;

    let s = ray.origin - triangle.vertices[0];
    let u = s.dot(p) * inv_det;
    if u < 0.0 {
        return None;
    }

    let q = s.cross(e0);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e1.dot(q) * inv_det;
    (t > 0.0).then_some((t, u, v))
}

/// Finds the nearest triangle hit along `ray`.
///
/// Scans every triangle; `exclude` skips one triangle by index (the surface a
/// secondary ray starts on). Returns `None` when nothing is hit.
pub fn closest_intersection(
    ray: &Ray,
    triangles: &[Triangle],
    exclude: Option<usize>,
) -> Option<RayTriangleIntersection> {
    let mut closest: Option<RayTriangleIntersection> = None;

    for (index, triangle) in triangles.iter().enumerate() {
        if exclude == Some(index) {
            continue;
        }
        let Some((t, u, v)) = intersect_triangle(ray, triangle) else {
            continue;
        };
        if closest.map_or(true, |best| t < best.distance) {
            closest = Some(RayTriangleIntersection {
                point: ray.at(t),
                distance: t,
                triangle_index: index,
                u,
                v,
            });
        }
    }

    closest
}

/// Returns true if another triangle blocks the light from `point`.
///
/// `shading_index` is the triangle `point` lies on; it can't shadow itself.
pub fn in_shadow(
    point: Vec3,
    shading_index: usize,
    light: &PointLight,
    triangles: &[Triangle],
) -> bool {
    let to_light = light.position - point;
    let light_distance = to_light.magnitude();
    let Some(direction) = to_light.try_normalize() else {
        return false;
    };

    let shadow_ray = Ray::new(point, direction);
    match closest_intersection(&shadow_ray, triangles, Some(shading_index)) {
        Some(occluder) => {
            occluder.distance > SHADOW_BIAS
                && occluder.distance < light_distance
                && occluder.triangle_index != shading_index
        }
        None => false,
    }
}

/// Brightness factor for a hit: the light's falloff when it is visible, the
/// ambient floor when it is blocked.
pub fn brightness(hit: &RayTriangleIntersection, light: &PointLight, triangles: &[Triangle]) -> f32 {
    if in_shadow(hit.point, hit.triangle_index, light, triangles) {
        AMBIENT_FLOOR
    } else {
        light.brightness(hit.point)
    }
}

/// Final colour of a hit.
pub fn shade(hit: &RayTriangleIntersection, light: &PointLight, triangles: &[Triangle]) -> Color {
    triangles[hit.triangle_index]
        .color
        .scaled(brightness(hit, light, triangles))
}

/// Traces the primary ray through canvas position `(x, y)`. `None` means the
/// ray hit nothing.
pub fn trace_pixel(
    x: f32,
    y: f32,
    camera: &Camera,
    light: &PointLight,
    triangles: &[Triangle],
) -> Option<Color> {
    let ray = Ray::new(camera.position(), camera.primary_ray_direction(x, y));
    closest_intersection(&ray, triangles, None).map(|hit| shade(&hit, light, triangles))
}

/// Ray traces a full frame into `buffer`. Pixels whose ray escapes the scene
/// get `background`.
pub fn render(
    buffer: &mut FrameBuffer,
    triangles: &[Triangle],
    camera: &Camera,
    light: &PointLight,
    background: u32,
) {
    let width = buffer.width() as usize;
    if width == 0 {
        return;
    }
    trace!(
        "Ray tracing {}x{} against {} triangles",
        width,
        buffer.height(),
        triangles.len()
    );

    buffer
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = trace_pixel(x as f32, y as f32, camera, light, triangles)
                    .map_or(background, Color::to_argb);
            }
        });
}
