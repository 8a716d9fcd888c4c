//! Pinhole camera shared by every render back end.
//!
//! # Coordinate System
//!
//! World space is right-handed with +Y up. The camera stores an orthonormal
//! basis as the columns of a [`Mat3`]:
//! - **right**: canvas +x
//! - **up**: canvas -y (canvas rows grow downward)
//! - **forward**: points from the aim point *back toward the camera*
//!
//! A vertex is taken into camera space as `(position - vertex)` expressed in
//! that basis, so anything in front of the camera has a positive camera-space
//! `z`. [`camera_to_canvas`] is the one place that turns camera space into
//! canvas coordinates; projection, wireframe, rasterization and primary-ray
//! generation all go through it (or its exact inverse).

use log::trace;

use crate::math::mat3::{Axis, Mat3};
use crate::math::vec3::Vec3;

pub const DEFAULT_FOCAL_LENGTH: f32 = 2.0;
/// Canvas pixels per unit of image-plane distance.
pub const DEFAULT_RANGE: f32 = 180.0;
/// Angle the orbit advances per frame, in radians.
pub const DEFAULT_ORBIT_STEP: f32 = 0.017_453_292; // 1 degree

/// Camera-space depths closer to zero than this cannot be projected.
const MIN_PROJECTABLE_DEPTH: f32 = 1e-6;

/// A projected point on the canvas.
///
/// `x`/`y` are real-valued pixel coordinates so interpolation can stay
/// sub-pixel. `depth` is the camera-space distance along the view axis
/// (positive in front of the camera); points that never came from a 3D vertex
/// leave it at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl CanvasPoint {
    pub const fn new(x: f32, y: f32, depth: f32) -> Self {
        Self { x, y, depth }
    }

    /// A point without depth information.
    pub const fn flat(x: f32, y: f32) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn lerp(&self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.depth + (other.depth - self.depth) * t,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.depth.is_finite()
    }
}

/// Maps a camera-space point to the canvas.
///
/// ```text
/// x = focal * (-x_cam / z_cam) * range + width / 2
/// y = focal * ( y_cam / z_cam) * range + height / 2
/// ```
///
/// The x axis is negated because camera space is measured from the vertex to
/// the camera. Returns `None` when `z_cam` is too close to zero to divide by.
pub fn camera_to_canvas(
    camera_space: Vec3,
    focal_length: f32,
    range: f32,
    width: f32,
    height: f32,
) -> Option<CanvasPoint> {
    let z = camera_space.z;
    if z.abs() < MIN_PROJECTABLE_DEPTH || !camera_space.is_finite() {
        return None;
    }
    let x = focal_length * (-camera_space.x / z) * range + width / 2.0;
    let y = focal_length * (camera_space.y / z) * range + height / 2.0;
    Some(CanvasPoint::new(x, y, z))
}

/// Inverse of [`camera_to_canvas`] at unit depth: the camera-space point with
/// `z_cam = 1` that lands on canvas position `(x, y)`.
pub fn canvas_to_camera(
    x: f32,
    y: f32,
    focal_length: f32,
    range: f32,
    width: f32,
    height: f32,
) -> Vec3 {
    let scale = focal_length * range;
    Vec3::new(-(x - width / 2.0) / scale, (y - height / 2.0) / scale, 1.0)
}

/// Pinhole camera with an explicit orientation basis.
///
/// Mutated only between frames; render calls take it by reference and treat
/// it as a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    orientation: Mat3,
    focal_length: f32,
    range: f32,
    canvas_width: f32,
    canvas_height: f32,
    /// Aim point used by [`Camera::reaim`] and [`Camera::orbit`].
    target: Vec3,
    orbit_step: f32,
}

impl Camera {
    /// Creates a camera at `position` with the identity basis, which looks
    /// down world -Z.
    pub fn new(position: Vec3, focal_length: f32, range: f32, width: u32, height: u32) -> Self {
        Self {
            position,
            orientation: Mat3::identity(),
            focal_length,
            range,
            canvas_width: width as f32,
            canvas_height: height as f32,
            target: Vec3::ZERO,
            orbit_step: DEFAULT_ORBIT_STEP,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Mat3 {
        self.orientation
    }

    pub fn right(&self) -> Vec3 {
        self.orientation.column(0)
    }

    pub fn up(&self) -> Vec3 {
        self.orientation.column(1)
    }

    /// The basis vector pointing from the scene back toward the camera. The
    /// camera looks along `-forward()`.
    pub fn forward(&self) -> Vec3 {
        self.orientation.column(2)
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    // =========================================================================
    // Setup
    // =========================================================================

    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_width = width as f32;
        self.canvas_height = height as f32;
    }

    pub fn set_range(&mut self, range: f32) {
        self.range = range;
    }

    pub fn set_orbit_step(&mut self, radians: f32) {
        self.orbit_step = radians;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Moves the camera by a world-space offset without turning it.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    // =========================================================================
    // Projection
    // =========================================================================

    /// Expresses a world-space vertex in camera space.
    #[inline]
    pub fn to_camera_space(&self, vertex: Vec3) -> Vec3 {
        self.orientation.transpose() * (self.position - vertex)
    }

    /// Projects a world-space vertex onto the canvas.
    ///
    /// Returns `None` for vertices lying in the camera plane. Vertices behind
    /// the camera project with a negative depth.
    #[inline]
    pub fn project(&self, vertex: Vec3) -> Option<CanvasPoint> {
        self.project_camera_space(self.to_camera_space(vertex))
    }

    /// Projects a point already in camera space, such as a vertex produced by
    /// near-plane clipping.
    #[inline]
    pub fn project_camera_space(&self, camera_space: Vec3) -> Option<CanvasPoint> {
        camera_to_canvas(
            camera_space,
            self.focal_length,
            self.range,
            self.canvas_width,
            self.canvas_height,
        )
    }

    /// Unit world-space direction of the primary ray through canvas position
    /// `(x, y)`. Inverts [`Camera::project`]: the ray through the canvas point
    /// of a projected vertex passes through that vertex.
    pub fn primary_ray_direction(&self, x: f32, y: f32) -> Vec3 {
        let camera_space = canvas_to_camera(
            x,
            y,
            self.focal_length,
            self.range,
            self.canvas_width,
            self.canvas_height,
        );
        // `position - point` in world space; the ray runs the other way.
        (-(self.orientation * camera_space)).normalize()
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Aims the camera at `target`, rebuilding the whole basis from scratch.
    ///
    /// The previous orientation is never incrementally rotated, so repeated
    /// calls can't accumulate drift. If the camera sits on the target the
    /// orientation is left unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        let Some(forward) = (self.position - target).try_normalize() else {
            trace!("look_at: camera is on its target, keeping orientation");
            return;
        };
        let right = Vec3::UP
            .cross(forward)
            .try_normalize()
            .unwrap_or(Vec3::RIGHT);
        let up = forward.cross(right).normalize();
        self.orientation = Mat3::from_columns(right, up, forward);
    }

    /// Re-aims at the stored target.
    pub fn reaim(&mut self) {
        self.look_at(self.target);
    }

    /// Advances one orbit step when `enabled`: the position turns about the
    /// vertical axis through the target and the camera re-aims at it.
    pub fn orbit(&mut self, enabled: bool) {
        if !enabled {
            return;
        }
        let offset = self.position - self.target;
        self.position = self.target + Mat3::rotation_y(self.orbit_step) * offset;
        self.reaim();
    }

    /// Rotates the camera *position* about a world axis through the origin.
    /// The orientation basis is untouched.
    pub fn rotate_camera(&mut self, axis: Axis, angle: f32) {
        self.position = Mat3::rotation(axis, angle) * self.position;
    }

    /// Rotates the orientation basis in place (free look). The position is
    /// untouched.
    pub fn change_orientation(&mut self, axis: Axis, angle: f32) {
        self.orientation = Mat3::rotation(axis, angle) * self.orientation;
    }
}

// =============================================================================
// Tests
// =============================================================================
