//! A CPU-based software 3D renderer.
//!
//! A triangle scene is drawn by one of three back ends: a wireframe, a
//! z-buffered scanline rasterizer, or a ray tracer with hard shadows. All
//! three share one camera projection, so they frame the scene identically.
//! SDL2 is used only for window management and display (feature `window`).
//!
//! # Quick Start
//!
//! ```ignore
//! use trirender::prelude::*;
//!
//! let settings = Settings::default();
//! let scene = Scene::from_obj(&settings.model_path, settings.model_scale)?;
//! let context = RenderContext::new(settings.camera(), settings.light());
//! let mut engine = Engine::new(settings.width, settings.height);
//! engine.render(RenderMode::RayTraced, &scene, &context);
//! engine.save_frame("frame.ppm")?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod light;
pub mod math;
pub mod render;
pub mod scene;
pub mod sketch;
pub mod texture;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use engine::{Engine, RenderContext, RenderMode};
pub use error::{Error, Result};
pub use scene::{Scene, Triangle};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use trirender::prelude::*;
/// ```
pub mod prelude {
    // Camera & light
    pub use crate::camera::{Camera, CanvasPoint};
    pub use crate::light::PointLight;

    // Engine
    pub use crate::config::Settings;
    pub use crate::engine::{Engine, RenderContext, RenderMode};

    // Scene
    pub use crate::colors::Color;
    pub use crate::scene::{Scene, Triangle};
    pub use crate::sketch::CanvasSketch;
    pub use crate::texture::TextureMap;

    // Math
    pub use crate::math::mat3::{Axis, Mat3};
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;

    // Rendering
    pub use crate::render::{DepthBuffer, FrameBuffer};

    // Window & Input
    #[cfg(feature = "window")]
    pub use crate::window::{InputAction, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::rasterizer::{draw_line, fill_textured_triangle, fill_triangle};
    pub use crate::render::raytracer::{closest_intersection, render as trace_frame, Ray};
    pub use crate::render::{DepthBuffer, FrameBuffer};
}
