//! Pixel buffers and the two drawing back ends.
//!
//! The rasterizer writes through a per-frame [`DepthBuffer`] and clips
//! geometry to the near plane before projecting; the ray tracer resolves
//! visibility itself and only needs a [`FrameBuffer`].

pub mod clipping;
pub mod depth;
pub mod framebuffer;
pub mod rasterizer;
pub mod raytracer;

pub use depth::{DepthBuffer, CLEARED_DEPTH};
pub use framebuffer::FrameBuffer;
pub use raytracer::{closest_intersection, Ray, RayTriangleIntersection};
