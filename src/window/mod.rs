//! Window management module for cadframe
//!
//! The main window is created without native decorations, so moving,
//! resizing, maximizing and border cursor feedback are all done here:
//! the router normalizes pointer input from every region of the window,
//! the controller turns it into window-manager commands, and the host
//! carries those commands out on a winit window.

pub mod controller;
pub mod cursor;
pub mod geometry;
pub mod layout;
pub mod router;
pub mod winit_window;

pub use controller::{Handled, WindowController};
pub use cursor::CursorPresenter;
pub use geometry::{compute_drag, compute_resize, Delta, MinimumSize, WindowGeometry};
pub use hit_test::{classify, ResizeEdge, Zone};
pub use layout::{ChromeLayout, Rect, Region, ToolAction};
pub use router::{EventRouter, Routed, SurfaceInput};
pub use winit_window::{App, ViewportAction, ViewportInput};

use winit::window::CursorIcon;

/// A position in pixels, window-local or global depending on context
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whole-pixel travel from `anchor` to `self`
    pub fn delta_from(&self, anchor: Point) -> Delta {
        Delta::new(
            (self.x - anchor.x).round() as i32,
            (self.y - anchor.y).round() as i32,
        )
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0b001,
            MouseButton::Right => 0b010,
            MouseButton::Middle => 0b100,
        }
    }

    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Set of mouse buttons currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const PRIMARY: ButtonMask = ButtonMask(0b001);

    pub fn with(self, button: MouseButton) -> Self {
        ButtonMask(self.0 | button.bit())
    }

    pub fn without(self, button: MouseButton) -> Self {
        ButtonMask(self.0 & !button.bit())
    }

    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn primary(self) -> bool {
        self.contains(MouseButton::Left)
    }
}

/// Kind of a normalized pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press(MouseButton),
    Move,
    Release(MouseButton),
}

/// Canonical pointer event handed to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,

    /// Position relative to the window's top-left corner
    pub local: Point,

    /// Position on the screen
    pub global: Point,

    /// Buttons held after this event was applied
    pub buttons: ButtonMask,

    /// Innermost region under the pointer
    pub region: Region,
}

/// Window display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
}

/// Title bar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlButton {
    Minimize,
    Maximize,
    Close,
}

impl ControlButton {
    pub const ALL: [ControlButton; 3] = [
        ControlButton::Minimize,
        ControlButton::Maximize,
        ControlButton::Close,
    ];

    /// Icon to draw for this button in the given window state
    pub fn icon(&self, state: WindowState) -> ButtonIcon {
        match self {
            ControlButton::Minimize => ButtonIcon::Minimize,
            ControlButton::Maximize if state == WindowState::Maximized => ButtonIcon::Restore,
            ControlButton::Maximize => ButtonIcon::Maximize,
            ControlButton::Close => ButtonIcon::Close,
        }
    }

    pub fn glyph(&self, state: WindowState) -> char {
        self.icon(state).glyph()
    }

    pub fn event(&self) -> ControlEvent {
        match self {
            ControlButton::Minimize => ControlEvent::Minimize,
            ControlButton::Maximize => ControlEvent::Maximize,
            ControlButton::Close => ControlEvent::Close,
        }
    }
}

/// Icons drawn on the title bar buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonIcon {
    Minimize,
    Maximize,
    Restore,
    Close,
}

impl ButtonIcon {
    pub fn glyph(&self) -> char {
        match self {
            ButtonIcon::Minimize => '–',
            ButtonIcon::Maximize => '□',
            ButtonIcon::Restore => '❐',
            ButtonIcon::Close => '×',
        }
    }
}

/// Window control events (custom titlebar buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Minimize,
    Maximize,
    Close,
}

/// Keyboard keys the workbench reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Escape,
    E,
    F,
}

/// Receiver of cursor override requests
pub trait CursorSink {
    /// Show the given cursor instead of the default
    fn request_cursor(&mut self, icon: CursorIcon);

    /// Go back to the default cursor
    fn restore_cursor(&mut self);
}

/// Commands the controller issues to the host windowing layer
pub trait WindowManager: CursorSink {
    /// Move and resize the window
    fn set_geometry(&mut self, geometry: WindowGeometry);

    /// Inform the host of a state change; `Minimized` hides the window
    fn set_state(&mut self, state: WindowState);

    /// Close the window and leave the event loop
    fn close(&mut self);

    /// Rectangle a maximized window occupies
    fn work_area(&self) -> WindowGeometry;
}
