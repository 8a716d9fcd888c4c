//! Line drawing and triangle rasterization.
//!
//! Every entry point takes an optional [`DepthBuffer`](super::depth::DepthBuffer):
//! with one, pixels are depth-tested per pixel against reciprocal depth;
//! without one, pixels are written unconditionally. All writes are clipped
//! to the canvas.
//!
//! - [`draw_line`]: DDA line walk
//! - [`draw_stroked_triangle`]: triangle outline (wireframe)
//! - [`fill_triangle`]: flat-colour scanline fill
//! - [`fill_textured_triangle`]: affine texture-mapped scanline fill

mod line;
mod scanline;

pub use line::{draw_line, draw_stroked_triangle};
pub use scanline::{
    fill_textured_triangle, fill_triangle, for_each_span, sort_vertices, SortAxis, SpanVertex,
};
