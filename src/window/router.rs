//! Event routing for the window surface
//!
//! Converts winit events into surface input, resolves the nested region
//! under the pointer and produces the canonical events the controller and
//! the widgets consume. Control button clicks and title bar double-clicks
//! are synthesized here.

use crate::window::layout::{ChromeLayout, Region, ToolAction};
use crate::window::{
    ButtonMask, ControlButton, ControlEvent, Key, MouseButton, Point, PointerEvent, PointerKind,
};
use log::trace;
use std::time::{Duration, Instant};
use winit::event::{
    ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent as WinitWindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Raw input on the window surface, positions window-local
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceInput {
    CursorMoved(Point),
    Button { button: MouseButton, pressed: bool },
    Wheel(f32),
    Key(Key),
    CursorLeft,
}

/// Output of the router
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Routed {
    Pointer(PointerEvent),
    DoubleClick(PointerEvent),
    Command(ControlEvent),
    Tool(ToolAction),
    Wheel { local: Point, delta: f32 },
    Key(Key),
    Left,
}

pub struct EventRouter {
    layout: ChromeLayout,

    /// Buttons currently held on this surface
    buttons: ButtonMask,

    /// Last known pointer position
    last_local: Point,

    /// Control button the primary press landed on
    pressed_control: Option<ControlButton>,

    /// Toolbar button the primary press landed on
    pressed_tool: Option<ToolAction>,

    /// Time and place of the last primary press on the title bar
    last_title_press: Option<(Instant, Point)>,

    double_click_interval: Duration,
    double_click_distance: f64,
}

impl EventRouter {
    pub fn new(layout: ChromeLayout) -> Self {
        let double_click_interval = Duration::from_millis(layout.config().double_click_ms);
        let double_click_distance = layout.config().double_click_distance;
        Self {
            layout,
            buttons: ButtonMask::NONE,
            last_local: Point::default(),
            pressed_control: None,
            pressed_tool: None,
            last_title_press: None,
            double_click_interval,
            double_click_distance,
        }
    }

    pub fn layout(&self) -> &ChromeLayout {
        &self.layout
    }

    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    pub fn last_local(&self) -> Point {
        self.last_local
    }

    /// Control button held down, for pressed-state drawing
    pub fn pressed_control(&self) -> Option<ControlButton> {
        self.pressed_control
    }

    /// Region under the last known pointer position
    pub fn hovered(&self, width: f64) -> Region {
        self.layout.region_at(self.last_local, width)
    }

    /// Forget held buttons and pending clicks.
    ///
    /// winit reports no button state when focus returns, so a release that
    /// happened in another window is only noticed here; the next move then
    /// carries an empty mask.
    pub fn focus_lost(&mut self) {
        self.buttons = ButtonMask::NONE;
        self.pressed_control = None;
        self.pressed_tool = None;
        self.last_title_press = None;
    }

    /// Route one input; `origin` is the window's screen position and `width` its current width
    pub fn route(&mut self, input: SurfaceInput, origin: Point, width: f64, now: Instant) -> Vec<Routed> {
        match input {
            SurfaceInput::CursorMoved(local) => {
                self.last_local = local;
                vec![Routed::Pointer(self.pointer(PointerKind::Move, origin, width))]
            }

            SurfaceInput::Button { button, pressed: true } => {
                self.buttons = self.buttons.with(button);
                self.press(button, origin, width, now)
            }

            SurfaceInput::Button { button, pressed: false } => {
                self.buttons = self.buttons.without(button);
                self.release(button, origin, width)
            }

            SurfaceInput::Wheel(delta) => {
                if self.hovered(width) == Region::Viewport {
                    vec![Routed::Wheel {
                        local: self.last_local,
                        delta,
                    }]
                } else {
                    Vec::new()
                }
            }

            SurfaceInput::Key(key) => vec![Routed::Key(key)],

            SurfaceInput::CursorLeft => {
                self.pressed_control = None;
                self.pressed_tool = None;
                vec![Routed::Left]
            }
        }
    }

    fn press(&mut self, button: MouseButton, origin: Point, width: f64, now: Instant) -> Vec<Routed> {
        let event = self.pointer(PointerKind::Press(button), origin, width);
        if !button.is_primary() {
            return vec![Routed::Pointer(event)];
        }

        match event.region {
            Region::TitleButton(control) => {
                self.pressed_control = Some(control);
                self.last_title_press = None;
                Vec::new()
            }
            Region::TitleBar => {
                if self.is_double_click(event.local, now) {
                    trace!("title bar double-click at {:?}", event.local);
                    self.last_title_press = None;
                    vec![Routed::DoubleClick(event)]
                } else {
                    self.last_title_press = Some((now, event.local));
                    vec![Routed::Pointer(event)]
                }
            }
            Region::ToolButton(action) => {
                self.pressed_tool = Some(action);
                self.last_title_press = None;
                vec![Routed::Pointer(event)]
            }
            Region::Toolbar | Region::Viewport => {
                self.last_title_press = None;
                vec![Routed::Pointer(event)]
            }
        }
    }

    fn release(&mut self, button: MouseButton, origin: Point, width: f64) -> Vec<Routed> {
        let event = self.pointer(PointerKind::Release(button), origin, width);
        let mut routed = vec![Routed::Pointer(event)];
        if !button.is_primary() {
            return routed;
        }

        let control = self.pressed_control.take();
        let tool = self.pressed_tool.take();
        match event.region {
            Region::TitleButton(over) if control == Some(over) => {
                routed.push(Routed::Command(over.event()));
            }
            Region::ToolButton(over) if tool == Some(over) => {
                routed.push(Routed::Tool(over));
            }
            _ => {}
        }
        routed
    }

    fn is_double_click(&self, local: Point, now: Instant) -> bool {
        match self.last_title_press {
            Some((at, first)) => {
                now.saturating_duration_since(at) <= self.double_click_interval
                    && first.distance(local) <= self.double_click_distance
            }
            None => false,
        }
    }

    fn pointer(&self, kind: PointerKind, origin: Point, width: f64) -> PointerEvent {
        PointerEvent {
            kind,
            local: self.last_local,
            global: origin.offset(self.last_local.x, self.last_local.y),
            buttons: self.buttons,
            region: self.layout.region_at(self.last_local, width),
        }
    }
}

/// Convert a winit window event into surface input
pub fn translate(event: &WinitWindowEvent) -> Option<SurfaceInput> {
    match event {
        WinitWindowEvent::CursorMoved { position, .. } => {
            Some(SurfaceInput::CursorMoved(Point::new(position.x, position.y)))
        }

        WinitWindowEvent::MouseInput { state, button, .. } => Some(SurfaceInput::Button {
            button: convert_mouse_button(*button)?,
            pressed: *state == ElementState::Pressed,
        }),

        WinitWindowEvent::MouseWheel { delta, .. } => {
            let scroll = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0, // Standard wheel delta
            };
            Some(SurfaceInput::Wheel(scroll))
        }

        WinitWindowEvent::KeyboardInput { event, .. } => {
            if event.state != ElementState::Pressed {
                return None;
            }
            match event.physical_key {
                PhysicalKey::Code(code) => convert_key_code(code).map(SurfaceInput::Key),
                _ => None,
            }
        }

        WinitWindowEvent::CursorLeft { .. } => Some(SurfaceInput::CursorLeft),

        _ => None,
    }
}

/// Convert winit mouse button to cadframe mouse button
fn convert_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Convert winit key code to cadframe key
fn convert_key_code(keycode: KeyCode) -> Option<Key> {
    match keycode {
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::KeyE => Some(Key::E),
        KeyCode::KeyF => Some(Key::F),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::ChromeConfig;

    const ORIGIN: Point = Point::new(300.0, 300.0);
    const WIDTH: f64 = 900.0;

    fn router() -> EventRouter {
        EventRouter::new(ChromeLayout::new(ChromeConfig::default()))
    }

    fn run(router: &mut EventRouter, input: SurfaceInput, now: Instant) -> Vec<Routed> {
        router.route(input, ORIGIN, WIDTH, now)
    }

    fn click_at(router: &mut EventRouter, x: f64, y: f64, now: Instant) -> Vec<Routed> {
        let mut out = run(router, SurfaceInput::CursorMoved(Point::new(x, y)), now);
        out.extend(run(
            router,
            SurfaceInput::Button { button: MouseButton::Left, pressed: true },
            now,
        ));
        out.extend(run(
            router,
            SurfaceInput::Button { button: MouseButton::Left, pressed: false },
            now,
        ));
        out
    }

    #[test]
    fn test_move_is_normalized() {
        let mut r = router();
        let out = run(&mut r, SurfaceInput::CursorMoved(Point::new(450.0, 400.0)), Instant::now());

        let Routed::Pointer(event) = out[0] else {
            panic!("expected pointer event, got {:?}", out);
        };
        assert_eq!(event.kind, PointerKind::Move);
        assert_eq!(event.global, Point::new(750.0, 700.0));
        assert_eq!(event.region, Region::Viewport);
        assert_eq!(event.buttons, ButtonMask::NONE);
    }

    #[test]
    fn test_control_button_click_synthesized() {
        let mut r = router();
        let out = click_at(&mut r, 870.0, 20.0, Instant::now());

        assert!(
            !out.iter().any(|e| matches!(e, Routed::Pointer(p) if matches!(p.kind, PointerKind::Press(_)))),
            "press on a control button must not be forwarded"
        );
        assert_eq!(out.last(), Some(&Routed::Command(ControlEvent::Close)));
    }

    #[test]
    fn test_control_press_released_elsewhere_is_not_a_click() {
        let mut r = router();
        let now = Instant::now();
        run(&mut r, SurfaceInput::CursorMoved(Point::new(800.0, 20.0)), now);
        run(&mut r, SurfaceInput::Button { button: MouseButton::Left, pressed: true }, now);
        run(&mut r, SurfaceInput::CursorMoved(Point::new(830.0, 20.0)), now);
        let out = run(&mut r, SurfaceInput::Button { button: MouseButton::Left, pressed: false }, now);

        assert!(!out.iter().any(|e| matches!(e, Routed::Command(_))));
    }

    #[test]
    fn test_title_double_click() {
        let mut r = router();
        let start = Instant::now();

        let first = click_at(&mut r, 100.0, 20.0, start);
        assert!(!first.iter().any(|e| matches!(e, Routed::DoubleClick(_))));

        let second = click_at(&mut r, 102.0, 21.0, start + Duration::from_millis(150));
        assert!(second.iter().any(|e| matches!(e, Routed::DoubleClick(_))));
        assert!(
            !second.iter().any(|e| matches!(e, Routed::Pointer(p) if matches!(p.kind, PointerKind::Press(_)))),
            "double-click replaces the press"
        );

        // A third press starts a new sequence
        let third = click_at(&mut r, 102.0, 21.0, start + Duration::from_millis(250));
        assert!(!third.iter().any(|e| matches!(e, Routed::DoubleClick(_))));
    }

    #[test]
    fn test_slow_or_distant_second_press_is_not_double_click() {
        let mut r = router();
        let start = Instant::now();

        click_at(&mut r, 100.0, 20.0, start);
        let late = click_at(&mut r, 100.0, 20.0, start + Duration::from_millis(900));
        assert!(!late.iter().any(|e| matches!(e, Routed::DoubleClick(_))));

        let far = click_at(&mut r, 160.0, 20.0, start + Duration::from_millis(1000));
        assert!(!far.iter().any(|e| matches!(e, Routed::DoubleClick(_))));
    }

    #[test]
    fn test_tool_button_click() {
        let mut r = router();
        let out = click_at(&mut r, 20.0, 60.0, Instant::now());
        assert_eq!(out.last(), Some(&Routed::Tool(ToolAction::Extrude)));
    }

    #[test]
    fn test_button_mask_tracking() {
        let mut r = router();
        let now = Instant::now();
        run(&mut r, SurfaceInput::Button { button: MouseButton::Left, pressed: true }, now);
        run(&mut r, SurfaceInput::Button { button: MouseButton::Right, pressed: true }, now);
        assert!(r.buttons().primary());

        let out = run(&mut r, SurfaceInput::Button { button: MouseButton::Left, pressed: false }, now);
        let Routed::Pointer(event) = out[0] else {
            panic!("expected pointer event");
        };
        assert!(!event.buttons.primary());
        assert!(event.buttons.contains(MouseButton::Right));
    }

    #[test]
    fn test_focus_loss_clears_held_buttons() {
        let mut r = router();
        let now = Instant::now();
        click_at(&mut r, 300.0, 400.0, now);
        run(&mut r, SurfaceInput::Button { button: MouseButton::Left, pressed: true }, now);
        assert!(r.buttons().primary());

        r.focus_lost();
        let out = run(&mut r, SurfaceInput::CursorMoved(Point::new(320.0, 400.0)), now);
        let Routed::Pointer(event) = out[0] else {
            panic!("expected pointer event");
        };
        assert_eq!(event.buttons, ButtonMask::NONE);
        assert_eq!(r.pressed_control(), None);
    }

    #[test]
    fn test_wheel_only_over_viewport() {
        let mut r = router();
        let now = Instant::now();
        run(&mut r, SurfaceInput::CursorMoved(Point::new(100.0, 20.0)), now);
        assert!(run(&mut r, SurfaceInput::Wheel(1.0), now).is_empty());

        run(&mut r, SurfaceInput::CursorMoved(Point::new(400.0, 400.0)), now);
        assert_eq!(
            run(&mut r, SurfaceInput::Wheel(-1.0), now),
            vec![Routed::Wheel { local: Point::new(400.0, 400.0), delta: -1.0 }]
        );
    }

    #[test]
    fn test_mouse_button_conversion() {
        assert_eq!(convert_mouse_button(WinitMouseButton::Left), Some(MouseButton::Left));
        assert_eq!(convert_mouse_button(WinitMouseButton::Right), Some(MouseButton::Right));
        assert_eq!(convert_mouse_button(WinitMouseButton::Middle), Some(MouseButton::Middle));
        assert_eq!(convert_mouse_button(WinitMouseButton::Back), None);
    }

    #[test]
    fn test_key_conversion() {
        assert_eq!(convert_key_code(KeyCode::ArrowUp), Some(Key::Up));
        assert_eq!(convert_key_code(KeyCode::KeyE), Some(Key::E));
        assert_eq!(convert_key_code(KeyCode::KeyF), Some(Key::F));
        assert_eq!(convert_key_code(KeyCode::Space), None);
    }
}
