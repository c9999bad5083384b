//! Error types for cadframe
//!
//! This module defines custom error types used throughout the application.
//! We use thiserror for convenient error type definitions and anyhow for
//! the binary's top-level error handling.

use crate::cad::KernelError;
use thiserror::Error;

/// Main error type for cadframe
#[derive(Error, Debug)]
pub enum CadFrameError {
    /// Window-related errors
    #[error("Window error: {0}")]
    Window(String),

    /// Renderer errors
    #[error("Renderer error: {0}")]
    Renderer(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors raised by the CAD kernel
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),

    /// Extrusion requested on a face without a planar normal
    #[error("Selected face is not planar and cannot be extruded")]
    NonPlanarFace,

    /// Extrusion requested with nothing selected
    #[error("No face selected")]
    NoFaceSelected,

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results in cadframe
pub type Result<T> = std::result::Result<T, CadFrameError>;

/// Extension trait for converting other errors to CadFrameError
pub trait IntoFrameError<T> {
    /// Convert this error into a CadFrameError with the given context
    fn window_err(self, context: &str) -> Result<T>;
    fn renderer_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoFrameError<T> for std::result::Result<T, E> {
    fn window_err(self, context: &str) -> Result<T> {
        self.map_err(|e| CadFrameError::Window(format!("{}: {}", context, e)))
    }

    fn renderer_err(self, context: &str) -> Result<T> {
        self.map_err(|e| CadFrameError::Renderer(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| CadFrameError::Config(format!("{}: {}", context, e)))
    }
}
