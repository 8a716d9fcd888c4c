//! Camera-space polygon clipping.
//!
//! Triangles that cross the camera plane can't be projected as-is: vertices
//! behind the camera flip through the perspective divide and the fill covers
//! the wrong part of the canvas. Such triangles are clipped against a near
//! plane with the Sutherland-Hodgman algorithm and re-triangulated as a fan
//! before projection.

use crate::math::vec3::Vec3;

/// Camera-space depth of the near clipping plane.
pub const NEAR_PLANE_DEPTH: f32 = 0.01;

/// A plane defined by a point on the plane and its normal vector.
/// The normal points toward the kept half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// The plane `z = NEAR_PLANE_DEPTH` in camera space, keeping everything
    /// in front of it.
    pub fn near() -> Self {
        Self::new(Vec3::new(0.0, 0.0, NEAR_PLANE_DEPTH), Vec3::FORWARD)
    }

    /// Positive on the kept side, negative on the clipped side.
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        (position - self.point).dot(self.normal)
    }
}

/// A convex polygon of camera-space vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPolygon {
    pub vertices: Vec<Vec3>,
}

impl ClipPolygon {
    pub fn from_triangle(vertices: [Vec3; 3]) -> Self {
        Self {
            vertices: vertices.to_vec(),
        }
    }

    /// True once clipping has removed the polygon's area entirely.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Clips against one plane, keeping the part on the normal's side.
    pub fn clip_against_plane(&self, plane: &Plane) -> Self {
        if self.is_empty() {
            return Self {
                vertices: Vec::new(),
            };
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);
        for (i, &current) in self.vertices.iter().enumerate() {
            let next = self.vertices[(i + 1) % self.vertices.len()];

            let d1 = plane.signed_distance(current);
            let d2 = plane.signed_distance(next);
            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(current);
            }
            if current_inside != next_inside {
                let t = d1 / (d1 - d2);
                output.push(current + (next - current) * t);
            }
        }

        Self { vertices: output }
    }

    /// Fan triangulation. Only valid for convex polygons, which clipping a
    /// triangle against planes always yields.
    pub fn triangulate(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}

/// Clips a camera-space triangle to the near plane, yielding the triangles
/// that remain in front of it (zero, one or two).
pub fn clip_to_near_plane(vertices: [Vec3; 3]) -> Vec<[Vec3; 3]> {
    if vertices.iter().all(|v| v.z >= NEAR_PLANE_DEPTH) {
        return vec![vertices];
    }
    ClipPolygon::from_triangle(vertices)
        .clip_against_plane(&Plane::near())
        .triangulate()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn triangle_in_front_is_untouched() {
        let triangle = [
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(1.0, 0.0, 2.0),
            Vec3::new(0.0, 1.0, 3.0),
        ];
        assert_eq!(clip_to_near_plane(triangle), vec![triangle]);
    }

    #[test]
    fn triangle_behind_is_removed() {
        let triangle = [
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(1.0, 0.0, -2.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert!(clip_to_near_plane(triangle).is_empty());
    }

    #[test]
    fn one_vertex_behind_leaves_a_quad() {
        let triangle = [
            Vec3::new(-1.0, 1.0, 8.0),
            Vec3::new(1.0, 1.0, 8.0),
            Vec3::new(0.0, 1.0, -0.5),
        ];
        let polygon = ClipPolygon::from_triangle(triangle).clip_against_plane(&Plane::near());
        assert_eq!(polygon.vertices.len(), 4);

        let pieces = clip_to_near_plane(triangle);
        assert_eq!(pieces.len(), 2);
        for vertex in pieces.iter().flatten() {
            assert!(vertex.z >= NEAR_PLANE_DEPTH - 1e-6);
            assert_relative_eq!(vertex.y, 1.0);
        }
    }

    #[test]
    fn two_vertices_behind_leave_a_smaller_triangle() {
        let triangle = [
            Vec3::new(0.0, 0.0, 4.0),
            Vec3::new(-1.0, 0.0, -4.0),
            Vec3::new(1.0, 0.0, -4.0),
        ];
        let pieces = clip_to_near_plane(triangle);
        assert_eq!(pieces.len(), 1);

        let [apex, a, b] = pieces[0];
        assert_eq!(apex, triangle[0]);
        assert_relative_eq!(a.z, NEAR_PLANE_DEPTH, epsilon = 1e-6);
        assert_relative_eq!(b.z, NEAR_PLANE_DEPTH, epsilon = 1e-6);
        // Halfway down each edge, less the near offset
        assert_relative_eq!(a.x, -(4.0 - NEAR_PLANE_DEPTH) / 8.0, epsilon = 1e-6);
        assert_relative_eq!(b.x, (4.0 - NEAR_PLANE_DEPTH) / 8.0, epsilon = 1e-6);
    }

    #[test]
    fn clipping_an_empty_polygon_stays_empty() {
        let polygon = ClipPolygon {
            vertices: vec![Vec3::ZERO, Vec3::ONE],
        };
        assert!(polygon.is_empty());
        assert!(polygon.clip_against_plane(&Plane::near()).is_empty());
        assert_eq!(polygon.triangulate().count(), 0);
    }
}
