//! Winit window host for cadframe
//!
//! Creates the undecorated main window, carries out the controller's
//! window-manager commands on it and feeds every surface event through the
//! router, the controller and finally the viewport and toolbar widgets.

use crate::cad::PolyKernel;
use crate::renderer::pipeline::ShapePalette;
use crate::renderer::{ChromeState, Color, SceneRenderer, WgpuRenderer};
use crate::utils::config::Config;
use crate::utils::error::{CadFrameError, IntoFrameError, Result};
use crate::window::controller::{Handled, WindowController};
use crate::window::geometry::WindowGeometry;
use crate::window::layout::{ChromeLayout, Region, ToolAction};
use crate::window::router::{translate, EventRouter, Routed};
use crate::window::{
    ControlEvent, CursorSink, MouseButton, Point, PointerEvent, PointerKind, WindowManager,
    WindowState,
};
use crate::workbench::{Notification, Workbench};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{CursorIcon, Window, WindowId};

/// Pointer travel, in pixels, below which a viewport press and release is a click
const CLICK_SLOP: f64 = 3.0;

/// What the viewport does with the pointer events the controller passed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportAction {
    Pick(Point),
    Orbit { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, Copy)]
struct Gesture {
    start: Point,
    last: Point,
    orbiting: bool,
}

/// Click-to-pick and drag-to-orbit on the viewport
#[derive(Debug, Default)]
pub struct ViewportInput {
    gesture: Option<Gesture>,
}

impl ViewportInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) -> Option<ViewportAction> {
        match event.kind {
            PointerKind::Press(MouseButton::Left) if event.region == Region::Viewport => {
                self.gesture = Some(Gesture {
                    start: event.local,
                    last: event.local,
                    orbiting: false,
                });
                None
            }
            PointerKind::Move => {
                let gesture = self.gesture.as_mut()?;
                if !event.buttons.primary() {
                    self.gesture = None;
                    return None;
                }
                if !gesture.orbiting && gesture.start.distance(event.local) > CLICK_SLOP {
                    gesture.orbiting = true;
                }
                if !gesture.orbiting {
                    return None;
                }
                let (dx, dy) = (event.local.x - gesture.last.x, event.local.y - gesture.last.y);
                gesture.last = event.local;
                Some(ViewportAction::Orbit { dx, dy })
            }
            PointerKind::Release(MouseButton::Left) => {
                let gesture = self.gesture.take()?;
                (!gesture.orbiting && event.region == Region::Viewport)
                    .then_some(ViewportAction::Pick(event.local))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.gesture = None;
    }
}

/// Window-manager commands carried out on a winit window
struct WinitHost<'a> {
    window: &'a Window,
    event_loop: &'a ActiveEventLoop,

    /// Geometry to report when the monitor is unknown
    fallback: WindowGeometry,
}

impl CursorSink for WinitHost<'_> {
    fn request_cursor(&mut self, icon: CursorIcon) {
        self.window.set_cursor(icon);
    }

    fn restore_cursor(&mut self) {
        self.window.set_cursor(CursorIcon::Default);
    }
}

impl WindowManager for WinitHost<'_> {
    fn set_geometry(&mut self, geometry: WindowGeometry) {
        self.window
            .set_outer_position(PhysicalPosition::new(geometry.x, geometry.y));
        let (width, height) = geometry.size();
        // Applied asynchronously; the Resized event follows
        let _ = self.window.request_inner_size(PhysicalSize::new(width, height));
    }

    fn set_state(&mut self, state: WindowState) {
        debug!("window state -> {:?}", state);
        if state == WindowState::Minimized {
            self.window.set_minimized(true);
        }
        self.window.request_redraw();
    }

    fn close(&mut self) {
        info!("Close requested");
        self.event_loop.exit();
    }

    fn work_area(&self) -> WindowGeometry {
        let monitor = self
            .window
            .current_monitor()
            .or_else(|| self.event_loop.primary_monitor());
        match monitor {
            Some(monitor) => {
                let position = monitor.position();
                let size = monitor.size();
                WindowGeometry::new(position.x, position.y, size.width as i32, size.height as i32)
            }
            None => self.fallback,
        }
    }
}

/// Everything that exists only while the window does
struct Running {
    window: Arc<Window>,
    workbench: Workbench<WgpuRenderer, PolyKernel>,
}

/// The application: event loop handler owning the window and the workbench
pub struct App {
    config: Config,
    controller: WindowController,
    router: EventRouter,
    viewport: ViewportInput,
    running: Option<Running>,

    /// Whether the pointer is over the window surface
    pointer_inside: bool,

    /// Fatal error raised inside the event loop
    error: Option<CadFrameError>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let controller = WindowController::from_config(&config.window);
        let router = EventRouter::new(ChromeLayout::new(config.chrome.clone()));
        Self {
            config,
            controller,
            router,
            viewport: ViewportInput::new(),
            running: None,
            pointer_inside: false,
            error: None,
        }
    }

    /// Run the event loop until the window closes
    pub fn run(config: Config) -> Result<()> {
        let event_loop = EventLoop::new().window_err("Failed to create event loop")?;
        let mut app = App::new(config);
        event_loop.run_app(&mut app).window_err("Event loop error")?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window_config = &self.config.window;
        let geometry = self.controller.geometry();
        let min = self.controller.minimum_size();

        let attributes = Window::default_attributes()
            .with_title(&window_config.title)
            .with_decorations(false)
            .with_position(PhysicalPosition::new(geometry.x, geometry.y))
            .with_inner_size(PhysicalSize::new(geometry.width as u32, geometry.height as u32))
            .with_min_inner_size(PhysicalSize::new(min.width as u32, min.height as u32));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .window_err("Failed to create window")?,
        );

        let viewer = &self.config.viewer;
        let palette = ShapePalette {
            face: Color::from_hex(&viewer.face_color)?,
            highlight: Color::from_hex(&viewer.highlight_color)?,
            edge: Color::from_hex(&viewer.edge_color)?,
        };
        let mut renderer = WgpuRenderer::new(
            window.clone(),
            ChromeLayout::new(self.config.chrome.clone()),
            palette,
        );
        let size = window.inner_size();
        renderer.initialize(size.width.max(1), size.height.max(1))?;

        let mut workbench = Workbench::new(renderer, PolyKernel::new(), viewer.clone());
        workbench.setup()?;

        info!("Window created at {:?}", geometry);
        Ok(Running { window, workbench })
    }

    /// Screen position of the window's top-left corner
    fn origin(&self, window: &Window) -> Point {
        match window.outer_position() {
            Ok(position) => Point::new(position.x as f64, position.y as f64),
            Err(_) => {
                let geometry = self.controller.geometry();
                Point::new(geometry.x as f64, geometry.y as f64)
            }
        }
    }

    fn dispatch(&mut self, routed: Routed, window: &Arc<Window>, event_loop: &ActiveEventLoop) {
        let mut host = WinitHost {
            window,
            event_loop,
            fallback: self.controller.geometry(),
        };

        match routed {
            Routed::Pointer(event) => {
                if self.controller.handle_pointer(&event, &mut host) == Handled::PassThrough {
                    self.viewport_pointer(&event);
                } else {
                    self.viewport.cancel();
                }
            }
            Routed::DoubleClick(event) => {
                if self.controller.double_click(&event, &mut host) == Handled::PassThrough {
                    self.controller.handle_pointer(&event, &mut host);
                }
            }
            Routed::Command(command) => {
                self.viewport.cancel();
                match command {
                    ControlEvent::Minimize => self.controller.minimize(&mut host),
                    ControlEvent::Maximize => self.controller.toggle_maximize(&mut host),
                    ControlEvent::Close => self.controller.close(&mut host),
                }
            }
            Routed::Tool(ToolAction::Extrude) => {
                if let Some(running) = self.running.as_mut() {
                    report(running.workbench.extrude_selected());
                }
            }
            Routed::Wheel { delta, .. } => {
                if let Some(running) = self.running.as_mut() {
                    running.workbench.renderer_mut().zoom(delta as f64);
                }
            }
            Routed::Key(key) => {
                if let Some(running) = self.running.as_mut() {
                    report(running.workbench.handle_key(key));
                }
            }
            Routed::Left => {
                self.pointer_inside = false;
                self.controller.pointer_left(&mut host);
            }
        }
    }

    fn viewport_pointer(&mut self, event: &PointerEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        match self.viewport.on_pointer(event) {
            Some(ViewportAction::Pick(at)) => {
                running.workbench.renderer_mut().pick(at.x, at.y);
                running.workbench.process_picks();
            }
            Some(ViewportAction::Orbit { dx, dy }) => {
                running.workbench.renderer_mut().orbit(dx, dy);
            }
            None => {}
        }
    }

    fn on_resized(&mut self, window: &Window, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if self.controller.state() == WindowState::Minimized {
            self.controller.host_restored();
        }

        let origin = self.origin(window);
        self.controller.sync_from_host(WindowGeometry::new(
            origin.x as i32,
            origin.y as i32,
            size.width as i32,
            size.height as i32,
        ));
        if let Some(running) = self.running.as_mut() {
            if let Err(e) = running.workbench.renderer_mut().resize(size.width, size.height) {
                error!("Resize failed: {}", e);
            }
        }
    }

    fn redraw(&mut self) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        running.workbench.process_picks();

        let width = running.window.inner_size().width as f64;
        let chrome = ChromeState {
            window_state: self.controller.state(),
            hovered: self.pointer_inside.then(|| self.router.hovered(width)),
            pressed: self.router.pressed_control(),
        };
        if let Err(e) = running.workbench.renderer_mut().render(&chrome) {
            error!("Render failed: {}", e);
        }
    }
}

fn report(outcome: std::result::Result<(), Notification>) {
    if let Err(notification) = outcome {
        notification.log();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(e) => {
                error!("Startup failed: {}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.running.as_ref().map(|r| r.window.clone()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                let mut host = WinitHost {
                    window: &window,
                    event_loop,
                    fallback: self.controller.geometry(),
                };
                self.controller.close(&mut host);
            }
            WindowEvent::Resized(size) => {
                self.on_resized(&window, size);
                window.request_redraw();
            }
            WindowEvent::Moved(position) => {
                let size = window.inner_size();
                self.controller.sync_from_host(WindowGeometry::new(
                    position.x,
                    position.y,
                    size.width as i32,
                    size.height as i32,
                ));
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    if self.controller.state() == WindowState::Minimized {
                        self.controller.host_restored();
                    }
                } else {
                    self.router.focus_lost();
                    self.controller.focus_lost();
                    self.viewport.cancel();
                }
                window.request_redraw();
            }
            WindowEvent::CursorEntered { .. } => {
                self.pointer_inside = true;
            }
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                let Some(input) = translate(&other) else {
                    return;
                };
                let origin = self.origin(&window);
                let width = window.inner_size().width as f64;
                for routed in self.router.route(input, origin, width, Instant::now()) {
                    if let Routed::Pointer(_) = routed {
                        self.pointer_inside = true;
                    }
                    self.dispatch(routed, &window, event_loop);
                }
                window.request_redraw();
            }
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.as_ref() {
            let window = running.window.clone();
            let mut host = WinitHost {
                window: &window,
                event_loop,
                fallback: self.controller.geometry(),
            };
            self.controller.shutdown(&mut host);
        }
        info!("Event loop exiting");
    }
}
