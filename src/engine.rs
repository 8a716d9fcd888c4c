//! Core rendering engine.
//!
//! The [`Engine`] owns the colour and depth buffers for one canvas and exposes
//! one entry point per render mode. Camera and light are passed in as a
//! [`RenderContext`] snapshot on every call; the engine never keeps or mutates
//! them, so a frame always sees one consistent scene state.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, CanvasPoint};
use crate::colors;
use crate::error::Result;
use crate::light::PointLight;
use crate::math::vec2::Vec2;
use crate::render::clipping::clip_to_near_plane;
use crate::render::rasterizer::{draw_stroked_triangle, fill_textured_triangle, fill_triangle};
use crate::render::{raytracer, DepthBuffer, FrameBuffer};
use crate::scene::{Scene, Triangle};
use crate::sketch::{self, CanvasSketch};
use crate::texture::TextureMap;

/// Canvas size the textured overlay coordinates are laid out for.
const OVERLAY_CANVAS: (f32, f32) = (320.0, 240.0);
const OVERLAY_POINTS: [(f32, f32); 3] = [(160.0, 10.0), (300.0, 230.0), (10.0, 150.0)];
const OVERLAY_TEXELS: [Vec2; 3] = [
    Vec2::new(195.0, 5.0),
    Vec2::new(395.0, 380.0),
    Vec2::new(65.0, 330.0),
];

/// Which back end draws the frame.
///
/// Exactly one mode is active per frame. Until a mode is chosen the engine
/// is [`RenderMode::Unselected`] and frames are cleared to the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Unselected,
    /// Projected triangle outlines (key: 1)
    Wireframe,
    /// Depth-buffered scanline fill (key: 2)
    Rasterized,
    /// Primary rays with hard shadows (key: 3)
    RayTraced,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderMode::Unselected => "unselected",
            RenderMode::Wireframe => "wireframe",
            RenderMode::Rasterized => "rasterized",
            RenderMode::RayTraced => "ray traced",
        };
        f.write_str(name)
    }
}

/// Per-frame snapshot of the mutable scene state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub camera: Camera,
    pub light: PointLight,
}

impl RenderContext {
    pub fn new(camera: Camera, light: PointLight) -> Self {
        Self { camera, light }
    }
}

pub struct Engine {
    frame: FrameBuffer,
    depth: DepthBuffer,
}

impl Engine {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Resizing engine buffers to {}x{}", width, height);
        self.frame.resize(width, height);
        self.depth.resize(width, height);
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_buffer(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    /// Writes the current frame to disk.
    pub fn save_frame<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.frame.save(path)
    }

    /// Renders one frame of `scene` with the back end selected by `mode`.
    pub fn render(&mut self, mode: RenderMode, scene: &Scene, context: &RenderContext) {
        let start = Instant::now();
        match mode {
            RenderMode::Unselected => self.frame.clear(colors::BACKGROUND),
            RenderMode::Wireframe => self.render_wireframe(scene.triangles(), &context.camera),
            RenderMode::Rasterized => self.render_rasterized(scene.triangles(), &context.camera),
            RenderMode::RayTraced => self.render_raytraced(scene.triangles(), context),
        }
        debug!("Rendered {} frame in {:?}", mode, start.elapsed());
    }

    /// White outlines of every triangle fully in front of the camera,
    /// depth-tested against each other.
    pub fn render_wireframe(&mut self, triangles: &[Triangle], camera: &Camera) {
        self.frame.clear(colors::BACKGROUND);
        self.depth.clear();

        let mut skipped = 0;
        for triangle in triangles {
            match project_triangle(camera, triangle) {
                Some(points) => draw_stroked_triangle(
                    &mut self.frame,
                    points,
                    colors::WIREFRAME,
                    Some(&mut self.depth),
                ),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            trace!("Wireframe skipped {} triangles behind the camera", skipped);
        }
    }

    /// Flat-shaded triangles with per-pixel hidden surface removal.
    ///
    /// The depth buffer is cleared first, so submission order doesn't matter.
    /// Triangles are clipped to the near plane in camera space before
    /// projection, so geometry behind the camera never reaches the canvas.
    pub fn render_rasterized(&mut self, triangles: &[Triangle], camera: &Camera) {
        self.frame.clear(colors::BACKGROUND);
        self.depth.clear();

        let mut clipped = 0;
        for triangle in triangles {
            let vertices = triangle.vertices.map(|v| camera.to_camera_space(v));
            let pieces = clip_to_near_plane(vertices);
            if pieces.len() != 1 || pieces[0] != vertices {
                clipped += 1;
            }

            let color = triangle.color.to_argb();
            for piece in pieces {
                let [a, b, c] = piece;
                let (Some(a), Some(b), Some(c)) = (
                    camera.project_camera_space(a),
                    camera.project_camera_space(b),
                    camera.project_camera_space(c),
                ) else {
                    continue;
                };
                fill_triangle(&mut self.frame, [a, b, c], color, Some(&mut self.depth));
            }
        }
        if clipped > 0 {
            trace!("Rasterizer clipped {} triangles at the near plane", clipped);
        }
    }

    /// One primary ray per pixel, shaded with a hard-shadow test.
    pub fn render_raytraced(&mut self, triangles: &[Triangle], context: &RenderContext) {
        raytracer::render(
            &mut self.frame,
            triangles,
            &context.camera,
            &context.light,
            colors::BACKGROUND,
        );
    }

    /// Texture-maps one canvas triangle, drawn over the current frame without
    /// a depth test.
    pub fn draw_textured_triangle(
        &mut self,
        points: [CanvasPoint; 3],
        texels: [Vec2; 3],
        texture: &TextureMap,
    ) {
        fill_textured_triangle(&mut self.frame, points, texels, texture, None);
    }

    /// Draws a canvas-space sketch over the current frame.
    pub fn draw_sketch(&mut self, sketch: &CanvasSketch) {
        sketch.draw(&mut self.frame);
    }

    /// Replaces the frame with the four-corner colour gradient.
    pub fn draw_gradient(&mut self) {
        sketch::draw_gradient(&mut self.frame);
    }

    /// Draws the fixed textured demo triangle, scaled to the canvas and
    /// outlined in the wireframe colour.
    pub fn draw_textured_overlay(&mut self, texture: &TextureMap) {
        let sx = self.width() as f32 / OVERLAY_CANVAS.0;
        let sy = self.height() as f32 / OVERLAY_CANVAS.1;
        let points = OVERLAY_POINTS.map(|(x, y)| CanvasPoint::flat(x * sx, y * sy));
        self.draw_textured_triangle(points, OVERLAY_TEXELS, texture);
        draw_stroked_triangle(&mut self.frame, points, colors::WIREFRAME, None);
    }
}

/// Projects all three vertices, or `None` if any lies in the camera plane.
/// Vertices behind the camera keep their negative depth.
fn project_vertices(camera: &Camera, triangle: &Triangle) -> Option<[CanvasPoint; 3]> {
    let [a, b, c] = triangle.vertices;
    Some([camera.project(a)?, camera.project(b)?, camera.project(c)?])
}

/// Like [`project_vertices`], but also rejects triangles with any vertex
/// behind the camera.
fn project_triangle(camera: &Camera, triangle: &Triangle) -> Option<[CanvasPoint; 3]> {
    project_vertices(camera, triangle).filter(|points| points.iter().all(|p| p.depth > 0.0))
}
