//! Renderer without a GPU surface
//!
//! Keeps the full scene (display list, camera, picking) and counts frames
//! instead of drawing them. Used for headless runs and by tests.

use crate::cad::Shape;
use crate::renderer::overlay::{build_chrome, ChromeState};
use crate::renderer::scene::Scene;
use crate::renderer::{
    Color, PickCallback, PickedFace, RenderStats, SceneRenderer, SelectionMode, ShapeHandle,
};
use crate::utils::error::{CadFrameError, Result};
use crate::window::layout::ChromeLayout;
use log::info;

pub struct HeadlessRenderer {
    scene: Scene,
    initialized: bool,
    stats: RenderStats,

    /// Overlay vertex count of the last frame
    last_overlay: usize,
}

impl HeadlessRenderer {
    pub fn new(layout: ChromeLayout, width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(layout, width, height),
            initialized: false,
            stats: RenderStats::default(),
            last_overlay: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn last_overlay_vertices(&self) -> usize {
        self.last_overlay
    }

    /// One-line description of what is displayed
    pub fn summary(&self) -> String {
        let faces: usize = self.scene.shapes().iter().map(|s| s.shape.face_count()).sum();
        let (top, bottom) = self.scene.background();
        format!(
            "{} shape(s), {} face(s), selection {:?}, background {:?} -> {:?}",
            self.scene.shapes().len(),
            faces,
            self.scene.selection_mode(),
            top.to_array(),
            bottom.to_array()
        )
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn initialize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(CadFrameError::Renderer(format!(
                "Cannot initialize a {}x{} surface",
                width, height
            )));
        }
        self.scene.set_size(width, height);
        self.initialized = true;
        info!("Headless renderer initialized at {}x{}", width, height);
        Ok(())
    }

    fn set_background_gradient(&mut self, top: Color, bottom: Color) {
        self.scene.set_background(top, bottom);
    }

    fn display_shape(&mut self, shape: &Shape) -> ShapeHandle {
        self.scene.add(shape)
    }

    fn erase_all(&mut self) {
        self.scene.clear();
    }

    fn fit_all(&mut self) {
        self.scene.fit_all();
    }

    fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.scene.set_selection_mode(mode);
    }

    fn register_pick_callback(&mut self, callback: PickCallback) {
        self.scene.set_callback(callback);
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.scene.set_size(width, height);
        Ok(())
    }

    fn pick(&mut self, x: f64, y: f64) -> Vec<PickedFace> {
        self.scene.pick(x, y)
    }

    fn set_highlight(&mut self, face: Option<PickedFace>) {
        self.scene.set_highlight(face);
    }

    fn orbit(&mut self, dx: f64, dy: f64) {
        self.scene.orbit(dx, dy);
    }

    fn zoom(&mut self, steps: f64) {
        self.scene.zoom(steps);
    }

    fn render(&mut self, chrome: &ChromeState) -> Result<()> {
        if !self.initialized {
            return Err(CadFrameError::Renderer("Renderer not initialized".to_string()));
        }
        let width = self.scene.size().0 as f64;
        self.last_overlay = build_chrome(self.scene.layout(), width, chrome).len();
        self.stats.frames += 1;
        Ok(())
    }
}
