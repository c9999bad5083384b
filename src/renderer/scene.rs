//! Renderer-independent scene state

use crate::cad::Shape;
use crate::renderer::camera::OrbitCamera;
use crate::renderer::mesh::ShapeMesh;
use crate::renderer::{Color, PickCallback, PickedFace, SelectionMode, ShapeHandle};
use crate::window::layout::{ChromeLayout, Rect};
use crate::window::Point;
use log::{debug, trace};

pub struct DisplayedShape {
    pub handle: ShapeHandle,
    pub shape: Shape,
    pub mesh: ShapeMesh,
}

pub struct Scene {
    layout: ChromeLayout,
    size: (u32, u32),
    shapes: Vec<DisplayedShape>,
    next_handle: u32,
    camera: OrbitCamera,
    selection: Option<SelectionMode>,
    callback: Option<PickCallback>,
    highlight: Option<PickedFace>,
    background: (Color, Color),

    /// Bumped whenever the display list changes
    revision: u64,
}

impl Scene {
    pub fn new(layout: ChromeLayout, width: u32, height: u32) -> Self {
        Self {
            layout,
            size: (width, height),
            shapes: Vec::new(),
            next_handle: 1,
            camera: OrbitCamera::default(),
            selection: None,
            callback: None,
            highlight: None,
            background: (Color::BLACK, Color::BLACK),
            revision: 0,
        }
    }

    pub fn layout(&self) -> &ChromeLayout {
        &self.layout
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Viewport rectangle in window pixels
    pub fn viewport(&self) -> Rect {
        self.layout.viewport(self.size.0 as f64, self.size.1 as f64)
    }

    pub fn aspect(&self) -> f64 {
        let viewport = self.viewport();
        viewport.width / viewport.height.max(1.0)
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn shapes(&self) -> &[DisplayedShape] {
        &self.shapes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn background(&self) -> (Color, Color) {
        self.background
    }

    pub fn set_background(&mut self, top: Color, bottom: Color) {
        self.background = (top, bottom);
    }

    pub fn selection_mode(&self) -> Option<SelectionMode> {
        self.selection
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection = Some(mode);
    }

    pub fn set_callback(&mut self, callback: PickCallback) {
        self.callback = Some(callback);
    }

    pub fn highlight(&self) -> Option<PickedFace> {
        self.highlight
    }

    pub fn set_highlight(&mut self, face: Option<PickedFace>) {
        self.highlight = face;
    }

    pub fn add(&mut self, shape: &Shape) -> ShapeHandle {
        let handle = ShapeHandle(self.next_handle);
        self.next_handle += 1;
        self.shapes.push(DisplayedShape {
            handle,
            shape: shape.clone(),
            mesh: ShapeMesh::build(shape),
        });
        self.revision += 1;
        debug!("displayed {:?} with {} faces", handle, shape.face_count());
        handle
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.highlight = None;
        self.revision += 1;
    }

    pub fn fit_all(&mut self) {
        let bounds = self
            .shapes
            .iter()
            .filter_map(|s| s.shape.bounds())
            .reduce(|(lo_a, hi_a), (lo_b, hi_b)| (lo_a.min(lo_b), hi_a.max(hi_b)));
        if let Some((lo, hi)) = bounds {
            self.camera.fit_bounds(lo, hi);
        }
    }

    pub fn orbit(&mut self, dx: f64, dy: f64) {
        self.camera.orbit(dx, dy);
    }

    pub fn zoom(&mut self, steps: f64) {
        self.camera.zoom(steps);
    }

    /// Faces under a window-local point, nearest first
    pub fn hits(&self, point: Point) -> Vec<PickedFace> {
        let viewport = self.viewport();
        if !viewport.contains(point) {
            return Vec::new();
        }

        let (origin, dir) = self.camera.ray(
            point.x - viewport.x,
            point.y - viewport.y,
            viewport.width,
            viewport.height,
        );
        let mut hits: Vec<(PickedFace, f64)> = self
            .shapes
            .iter()
            .filter_map(|s| {
                s.mesh
                    .intersect(origin, dir)
                    .map(|(face, distance)| (PickedFace { shape: s.handle, face }, distance))
            })
            .collect();
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits.into_iter().map(|(face, _)| face).collect()
    }

    /// Pick and notify the registered callback
    pub fn pick(&mut self, x: f64, y: f64) -> Vec<PickedFace> {
        if self.selection.is_none() {
            return Vec::new();
        }

        let picked = self.hits(Point::new(x, y));
        trace!("pick at ({:.1}, {:.1}): {:?}", x, y, picked);
        if let Some(callback) = self.callback.as_mut() {
            callback(&picked, x, y);
        }
        picked
    }
}
