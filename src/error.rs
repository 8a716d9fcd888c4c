//! Error types for the renderer.

use thiserror::Error;

/// Main error type for scene loading, texture I/O, export and windowing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load scene from {path}: {source}")]
    SceneLoad {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("window error: {0}")]
    Window(String),
}

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;
