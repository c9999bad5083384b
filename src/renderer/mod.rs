//! Renderer module for cadframe
//!
//! This module draws the 3D viewport and the window chrome. The scene
//! bookkeeping (display list, camera, picking, selection highlight) lives
//! in [`Scene`] and is shared by the GPU renderer and the headless one.

use crate::cad::{FaceId, Shape};
use crate::utils::error::{CadFrameError, Result};

pub mod camera;
pub mod headless;
pub mod mesh;
pub mod overlay;
pub mod pipeline;
pub mod scene;
pub mod wgpu_renderer;

pub use camera::OrbitCamera;
pub use headless::HeadlessRenderer;
pub use overlay::ChromeState;
pub use scene::Scene;
pub use wgpu_renderer::WgpuRenderer;

/// Handle to a shape in the display list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u32);

/// Granularity of interactive selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Face,
}

/// A face hit by a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickedFace {
    pub shape: ShapeHandle,
    pub face: FaceId,
}

/// Called with the picked faces (nearest first) and the window-local pick position
pub type PickCallback = Box<dyn FnMut(&[PickedFace], f64, f64)>;

/// Viewer operations the workbench and the window host rely on
pub trait SceneRenderer {
    /// Prepare for drawing into a surface of the given size
    fn initialize(&mut self, width: u32, height: u32) -> Result<()>;

    fn set_background_gradient(&mut self, top: Color, bottom: Color);

    /// Add a shape to the display list
    fn display_shape(&mut self, shape: &Shape) -> ShapeHandle;

    /// Empty the display list and drop the highlight
    fn erase_all(&mut self);

    /// Frame everything displayed
    fn fit_all(&mut self);

    fn set_selection_mode(&mut self, mode: SelectionMode);

    /// Replace the callback invoked on every pick
    fn register_pick_callback(&mut self, callback: PickCallback);

    /// Window surface resized
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Pick at a window-local position; invokes the callback when selection is enabled
    fn pick(&mut self, x: f64, y: f64) -> Vec<PickedFace>;

    fn set_highlight(&mut self, face: Option<PickedFace>);

    /// Rotate the view by a pointer delta in pixels
    fn orbit(&mut self, dx: f64, dy: f64);

    /// Dolly in (positive) or out (negative) by wheel steps
    fn zoom(&mut self, steps: f64);

    /// Draw one frame with the given chrome state
    fn render(&mut self, chrome: &ChromeState) -> Result<()>;
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba(r, g, b, 255)
    }

    /// Create color from RGBA values (0-255)
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create color from hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 && hex.len() != 8 {
            return Err(CadFrameError::InvalidInput(
                "Hex color must be 6 or 8 characters".to_string(),
            ));
        }

        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| CadFrameError::InvalidInput(format!("Invalid hex color: #{}", hex)))
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 255 };

        Ok(Self::from_rgba(r, g, b, a))
    }

    /// Same color with every channel scaled toward white by `amount`
    pub fn lighten(&self, amount: f32) -> Self {
        let mix = |c: f32| c + (1.0 - c) * amount;
        Self::new(mix(self.r), mix(self.g), mix(self.b), self.a)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    // Common colors
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// Render statistics for performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    /// Frames rendered in the last second
    pub fps: f32,

    /// Average frame render time in milliseconds
    pub frame_time: f32,

    /// Frames drawn since start
    pub frames: u64,
}
