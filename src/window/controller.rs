//! Interaction state machine for the frameless window
//!
//! The controller owns the window geometry, the display mode and the one
//! drag or resize session that may be in progress. It consumes the
//! router's normalized pointer stream and turns it into commands on a
//! [`WindowManager`].

use crate::utils::config::WindowConfig;
use crate::window::cursor::CursorPresenter;
use crate::window::geometry::{compute_drag, compute_resize, MinimumSize, WindowGeometry};
use crate::window::hit_test::{classify, ResizeEdge, Zone};
use crate::window::{MouseButton, Point, PointerEvent, PointerKind, WindowManager, WindowState};
use log::{debug, info};

/// Whether the controller acted on an event or left it to the widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    PassThrough,
}

/// A gesture in progress, anchored where it started
#[derive(Debug, Clone, Copy, PartialEq)]
enum Session {
    Dragging {
        anchor_pointer: Point,
        anchor_geometry: WindowGeometry,
    },
    Resizing {
        anchor_pointer: Point,
        anchor_geometry: WindowGeometry,
        edge: ResizeEdge,
    },
}

/// Display mode; the restore rectangle lives only as long as it is needed
#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Normal,
    Maximized { snapshot: WindowGeometry },
    /// `snapshot` is set when the window was maximized before minimizing
    Minimized { snapshot: Option<WindowGeometry> },
}

pub struct WindowController {
    geometry: WindowGeometry,
    min: MinimumSize,
    border_width: i32,
    mode: Mode,
    session: Option<Session>,
    cursor: CursorPresenter,
}

impl WindowController {
    pub fn new(geometry: WindowGeometry, min: MinimumSize, border_width: i32) -> Self {
        debug_assert!(geometry.satisfies(min), "initial geometry below minimum");
        Self {
            geometry,
            min,
            border_width,
            mode: Mode::Normal,
            session: None,
            cursor: CursorPresenter::new(),
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(
            WindowGeometry::new(config.x, config.y, config.width, config.height),
            MinimumSize::new(config.min_width, config.min_height),
            config.border_width,
        )
    }

    pub fn geometry(&self) -> WindowGeometry {
        self.geometry
    }

    pub fn minimum_size(&self) -> MinimumSize {
        self.min
    }

    pub fn state(&self) -> WindowState {
        match self.mode {
            Mode::Normal => WindowState::Normal,
            Mode::Maximized { .. } => WindowState::Maximized,
            Mode::Minimized { .. } => WindowState::Minimized,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.session, Some(Session::Dragging { .. }))
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.session, Some(Session::Resizing { .. }))
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn cursor(&self) -> &CursorPresenter {
        &self.cursor
    }

    /// Classify a window-local point against the current geometry
    pub fn zone_at(&self, event: &PointerEvent) -> Zone {
        classify(event.local, &self.geometry, self.border_width, event.region)
    }

    /// Feed one normalized pointer event through the state machine
    pub fn handle_pointer(&mut self, event: &PointerEvent, wm: &mut dyn WindowManager) -> Handled {
        match event.kind {
            PointerKind::Press(button) => self.press(event, button),
            PointerKind::Move => self.pointer_moved(event, wm),
            PointerKind::Release(button) => self.release(event, button, wm),
        }
    }

    fn press(&mut self, event: &PointerEvent, button: MouseButton) -> Handled {
        if !button.is_primary() || self.mode != Mode::Normal {
            return Handled::PassThrough;
        }
        debug_assert!(self.session.is_none(), "press while a session is live");

        let anchor_pointer = event.global;
        let anchor_geometry = self.geometry;
        match self.zone_at(event) {
            Zone::Border(edge) => {
                debug!("resize from {:?} at {:?}", edge, anchor_geometry);
                self.session = Some(Session::Resizing {
                    anchor_pointer,
                    anchor_geometry,
                    edge,
                });
                Handled::Consumed
            }
            Zone::TitleBar => {
                debug!("drag from {:?}", anchor_geometry);
                self.session = Some(Session::Dragging {
                    anchor_pointer,
                    anchor_geometry,
                });
                Handled::Consumed
            }
            Zone::ControlButton | Zone::Interior => Handled::PassThrough,
        }
    }

    fn pointer_moved(&mut self, event: &PointerEvent, wm: &mut dyn WindowManager) -> Handled {
        let Some(session) = self.session else {
            self.update_cursor(event, wm);
            return Handled::PassThrough;
        };

        if !event.buttons.primary() {
            // The release never reached us; the router empties the mask when
            // focus moves to another window
            debug!("primary button no longer held, dropping session");
            self.session = None;
            self.update_cursor(event, wm);
            return Handled::PassThrough;
        }

        let next = match session {
            Session::Dragging {
                anchor_pointer,
                anchor_geometry,
            } => compute_drag(anchor_geometry, event.global.delta_from(anchor_pointer)),
            Session::Resizing {
                anchor_pointer,
                anchor_geometry,
                edge,
            } => compute_resize(
                anchor_geometry,
                self.geometry,
                edge,
                event.global.delta_from(anchor_pointer),
                self.min,
            ),
        };
        self.apply(next, wm);
        Handled::Consumed
    }

    fn release(&mut self, event: &PointerEvent, button: MouseButton, wm: &mut dyn WindowManager) -> Handled {
        if !button.is_primary() {
            return Handled::PassThrough;
        }

        let ended = self.session.take().is_some();
        if ended {
            debug!("session ended at {:?}", self.geometry);
        }
        // The border may have moved out from under the pointer
        self.update_cursor(event, wm);

        if ended {
            Handled::Consumed
        } else {
            Handled::PassThrough
        }
    }

    /// Title bar double-click: toggle maximize
    pub fn double_click(&mut self, event: &PointerEvent, wm: &mut dyn WindowManager) -> Handled {
        if self.zone_at(event) != Zone::TitleBar {
            return Handled::PassThrough;
        }
        self.toggle_maximize(wm);
        Handled::Consumed
    }

    pub fn toggle_maximize(&mut self, wm: &mut dyn WindowManager) {
        match self.mode {
            Mode::Normal => self.maximize(wm),
            Mode::Maximized { .. } => self.restore(wm),
            Mode::Minimized { .. } => {}
        }
    }

    /// Enter the maximized mode; a no-op unless the window is normal
    pub fn maximize(&mut self, wm: &mut dyn WindowManager) {
        if self.mode != Mode::Normal {
            return;
        }
        self.session = None;

        let snapshot = self.geometry;
        self.mode = Mode::Maximized { snapshot };
        info!("maximize, restore rectangle {:?}", snapshot);

        let area = wm.work_area();
        self.apply(area, wm);
        wm.set_state(WindowState::Maximized);
    }

    /// Leave the maximized mode and put the snapshot back
    pub fn restore(&mut self, wm: &mut dyn WindowManager) {
        let Mode::Maximized { snapshot } = self.mode else {
            return;
        };
        self.session = None;
        self.mode = Mode::Normal;
        info!("restore to {:?}", snapshot);

        self.apply(snapshot, wm);
        wm.set_state(WindowState::Normal);
    }

    pub fn minimize(&mut self, wm: &mut dyn WindowManager) {
        let snapshot = match self.mode {
            Mode::Normal => None,
            Mode::Maximized { snapshot } => Some(snapshot),
            Mode::Minimized { .. } => return,
        };
        self.session = None;
        self.cursor.release(wm);
        self.mode = Mode::Minimized { snapshot };
        wm.set_state(WindowState::Minimized);
    }

    /// The host shows the window again after a minimize
    pub fn host_restored(&mut self) {
        if let Mode::Minimized { snapshot } = self.mode {
            self.mode = match snapshot {
                Some(snapshot) => Mode::Maximized { snapshot },
                None => Mode::Normal,
            };
            debug!("window shown again as {:?}", self.state());
        }
    }

    pub fn close(&mut self, wm: &mut dyn WindowManager) {
        self.session = None;
        self.cursor.release(wm);
        wm.close();
    }

    /// Keyboard focus moved elsewhere; pointer tracking is no longer reliable
    pub fn focus_lost(&mut self) {
        if self.session.take().is_some() {
            debug!("focus lost, session cancelled");
        }
    }

    /// The pointer left the window surface
    pub fn pointer_left(&mut self, wm: &mut dyn WindowManager) {
        if self.session.is_none() {
            self.cursor.release(wm);
        }
    }

    /// Adopt a rectangle the host reports on its own (e.g. after an OS-driven move)
    pub fn sync_from_host(&mut self, geometry: WindowGeometry) {
        if self.session.is_some() || self.mode != Mode::Normal {
            return;
        }
        if !geometry.satisfies(self.min) {
            debug!("ignoring host geometry {:?} below minimum", geometry);
            return;
        }
        self.geometry = geometry;
    }

    /// Release anything held on the host before the window goes away
    pub fn shutdown(&mut self, wm: &mut dyn WindowManager) {
        self.session = None;
        self.cursor.release(wm);
    }

    fn update_cursor(&mut self, event: &PointerEvent, wm: &mut dyn WindowManager) {
        let zone = self.zone_at(event);
        self.cursor.update(zone, wm);
    }

    fn apply(&mut self, next: WindowGeometry, wm: &mut dyn WindowManager) {
        if next != self.geometry {
            self.geometry = next;
            wm.set_geometry(next);
        }
    }
}
