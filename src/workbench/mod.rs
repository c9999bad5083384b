//! Modeling workbench
//!
//! Wires a kernel to a viewer: shows a cube, lets the user pick one of its
//! faces and extrudes the picked face along its normal. Failures never
//! escape as errors; they come back as [`Notification`]s for the host to
//! show or log, and the displayed shape is left as it was.

use crate::cad::{CadKernel, Shape};
use crate::renderer::{Color, PickedFace, SceneRenderer, SelectionMode, ShapeHandle};
use crate::utils::config::ViewerConfig;
use crate::utils::error::{CadFrameError, Result};
use crate::utils::round_to;
use crate::window::Key;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

/// A user-facing message about an operation that did not go through
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }

    pub fn log(&self) {
        match self.level {
            NotificationLevel::Warning => warn!("{}: {}", self.title, self.message),
            NotificationLevel::Error => error!("{}: {}", self.title, self.message),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<CadFrameError> for Notification {
    fn from(err: CadFrameError) -> Self {
        match err {
            CadFrameError::NoFaceSelected => {
                Notification::warning("No Face Selected", "Please select a face to extrude.")
            }
            CadFrameError::NonPlanarFace => Notification::warning(
                "Not a Planar Face",
                "Selected face is not planar and cannot be extruded.",
            ),
            CadFrameError::InvalidInput(message) => Notification::warning("Invalid Input", message),
            CadFrameError::Kernel(e) => {
                Notification::error("Extrusion Failed", format!("Extrusion operation failed: {}", e))
            }
            other => Notification::error("Operation Failed", other.to_string()),
        }
    }
}

/// One delivery of the viewer's pick callback
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    pub faces: Vec<PickedFace>,
    pub x: f64,
    pub y: f64,
}

pub struct Workbench<R: SceneRenderer, K: CadKernel> {
    renderer: R,
    kernel: K,
    config: ViewerConfig,

    /// The shape on screen and its display handle
    current: Option<(Shape, ShapeHandle)>,
    selected: Option<PickedFace>,
    distance: f64,

    picks_tx: Sender<PickEvent>,
    picks_rx: Receiver<PickEvent>,
}

impl<R: SceneRenderer, K: CadKernel> Workbench<R, K> {
    pub fn new(renderer: R, kernel: K, config: ViewerConfig) -> Self {
        let (picks_tx, picks_rx) = unbounded();
        let distance = config.extrude_distance;
        Self {
            renderer,
            kernel,
            config,
            current: None,
            selected: None,
            distance,
            picks_tx,
            picks_rx,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.current.as_ref().map(|(shape, _)| shape)
    }

    pub fn selected_face(&self) -> Option<PickedFace> {
        self.selected
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Background, cube and face selection, in that order
    pub fn setup(&mut self) -> Result<()> {
        let top = Color::from_hex(&self.config.background_top)?;
        let bottom = Color::from_hex(&self.config.background_bottom)?;
        self.renderer.set_background_gradient(top, bottom);
        self.display_cube()?;
        self.set_face_selection_mode();
        Ok(())
    }

    /// Replace whatever is displayed with a fresh cube
    pub fn display_cube(&mut self) -> Result<()> {
        let size = self.config.cube_size;
        let cube = self.kernel.make_box(size, size, size)?;
        self.show(cube);
        info!("Displaying {} mm cube", size);
        Ok(())
    }

    pub fn set_face_selection_mode(&mut self) {
        self.renderer.set_selection_mode(SelectionMode::Face);
        let tx = self.picks_tx.clone();
        self.renderer.register_pick_callback(Box::new(move |faces, x, y| {
            // The receiver lives as long as the workbench
            let _ = tx.send(PickEvent {
                faces: faces.to_vec(),
                x,
                y,
            });
        }));
    }

    /// Apply pending picks; the last one wins
    pub fn process_picks(&mut self) {
        let handle = self.current.as_ref().map(|(_, handle)| *handle);
        while let Ok(event) = self.picks_rx.try_recv() {
            let face = event
                .faces
                .iter()
                .find(|picked| Some(picked.shape) == handle)
                .copied();
            debug!("pick at ({:.0}, {:.0}) selected {:?}", event.x, event.y, face);
            self.selected = face;
        }
        self.renderer.set_highlight(self.selected);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.renderer.set_highlight(None);
    }

    pub fn fit_all(&mut self) {
        self.renderer.fit_all();
    }

    /// Step the extrusion distance up or down, clamped and rounded to two decimals
    pub fn adjust_distance(&mut self, steps: i32) -> f64 {
        let next = self.distance + self.config.extrude_step * steps as f64;
        self.distance = round_to(
            next.clamp(self.config.min_distance, self.config.max_distance),
            2,
        );
        self.distance
    }

    /// Extrude with the current distance
    pub fn extrude_selected(&mut self) -> std::result::Result<(), Notification> {
        self.extrude(self.distance)
    }

    /// Extrude the selected face along its normal by `distance`
    pub fn extrude(&mut self, distance: f64) -> std::result::Result<(), Notification> {
        let prism = self.build_prism(distance).map_err(Notification::from)?;
        self.show(prism);
        self.selected = None;
        info!("Extruded selected face by {}", distance);
        Ok(())
    }

    /// Key bindings of the viewport
    pub fn handle_key(&mut self, key: Key) -> std::result::Result<(), Notification> {
        match key {
            Key::Up => {
                info!("Extrusion distance {}", self.adjust_distance(1));
            }
            Key::Down => {
                info!("Extrusion distance {}", self.adjust_distance(-1));
            }
            Key::E => return self.extrude_selected(),
            Key::F => self.fit_all(),
            Key::Escape => self.clear_selection(),
        }
        Ok(())
    }

    fn build_prism(&self, distance: f64) -> Result<Shape> {
        if !(self.config.min_distance..=self.config.max_distance).contains(&distance) {
            return Err(CadFrameError::InvalidInput(format!(
                "Extrusion distance {} is outside {}..{}",
                distance, self.config.min_distance, self.config.max_distance
            )));
        }

        let picked = self.selected.ok_or(CadFrameError::NoFaceSelected)?;
        let face = self
            .shape()
            .and_then(|shape| shape.face(picked.face))
            .ok_or(CadFrameError::NoFaceSelected)?;
        let normal = self
            .kernel
            .face_normal(face)
            .ok_or(CadFrameError::NonPlanarFace)?;

        Ok(self.kernel.make_prism(face, normal * distance)?)
    }

    fn show(&mut self, shape: Shape) {
        self.renderer.erase_all();
        let handle = self.renderer.display_shape(&shape);
        self.renderer.fit_all();
        self.current = Some((shape, handle));
        self.selected = None;
        self.renderer.set_highlight(None);
    }
}
