//! Integration tests for the frameless window controller
//!
//! The host is a mockall mock, so every command the controller issues
//! is an expectation: an unexpected call fails the test.

use cadframe::utils::{ChromeConfig, WindowConfig};
use cadframe::window::{
    ChromeLayout, ControlButton, ControlEvent, CursorSink, EventRouter, Handled, MouseButton,
    Point, Region, Routed, SurfaceInput, WindowController, WindowGeometry, WindowManager,
    WindowState,
};
use cadframe_integration_tests::pointer::PointerScript;
use mockall::predicate::eq;
use mockall::{mock, Sequence};
use std::time::{Duration, Instant};
use winit::window::CursorIcon;

mock! {
    pub Host {}

    impl CursorSink for Host {
        fn request_cursor(&mut self, icon: CursorIcon);
        fn restore_cursor(&mut self);
    }

    impl WindowManager for Host {
        fn set_geometry(&mut self, geometry: WindowGeometry);
        fn set_state(&mut self, state: WindowState);
        fn close(&mut self);
        fn work_area(&self) -> WindowGeometry;
    }
}

const START: WindowGeometry = WindowGeometry::new(300, 300, 900, 700);
const WORK_AREA: WindowGeometry = WindowGeometry::new(0, 0, 1920, 1040);

fn controller() -> WindowController {
    WindowController::from_config(&WindowConfig::default())
}

#[test]
fn test_title_bar_drag_moves_window() {
    let mut host = MockHost::new();
    host.expect_set_geometry()
        .with(eq(WindowGeometry::new(350, 320, 900, 700)))
        .times(1)
        .return_const(());

    let mut wc = controller();
    let mut script = PointerScript::new(START);

    let press = script.press(200.0, 15.0, Region::TitleBar);
    assert_eq!(wc.handle_pointer(&press, &mut host), Handled::Consumed);
    assert!(wc.is_dragging());

    // Same target twice only reaches the host once
    let moved = script.drag_to(&press, 50.0, 20.0);
    assert_eq!(wc.handle_pointer(&moved, &mut host), Handled::Consumed);
    assert_eq!(wc.handle_pointer(&moved, &mut host), Handled::Consumed);

    let release = script.release(200.0, 15.0, Region::TitleBar);
    assert_eq!(wc.handle_pointer(&release, &mut host), Handled::Consumed);
    assert!(!wc.has_session());
    assert_eq!(wc.geometry(), WindowGeometry::new(350, 320, 900, 700));
}

#[test]
fn test_right_edge_resize_sticks_at_minimum() {
    let mut host = MockHost::new();
    let mut seq = Sequence::new();
    host.expect_request_cursor()
        .with(eq(CursorIcon::EwResize))
        .times(1)
        .return_const(());
    host.expect_set_geometry()
        .with(eq(WindowGeometry::new(300, 300, 1000, 700)))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_set_geometry()
        .with(eq(WindowGeometry::new(300, 300, 450, 700)))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut wc = controller();
    let mut script = PointerScript::new(START);

    assert_eq!(
        wc.handle_pointer(&script.hover(898.0, 350.0, Region::Viewport), &mut host),
        Handled::PassThrough
    );
    assert_eq!(wc.cursor().active(), Some(CursorIcon::EwResize));

    let press = script.press(898.0, 350.0, Region::Viewport);
    assert_eq!(wc.handle_pointer(&press, &mut host), Handled::Consumed);
    assert!(wc.is_resizing());

    wc.handle_pointer(&script.drag_to(&press, 100.0, 0.0), &mut host);
    wc.handle_pointer(&script.drag_to(&press, -450.0, 0.0), &mut host);
    assert_eq!(wc.geometry().width, 450);

    // 900 - 850 is below the 400 minimum; the edge stays where it was
    wc.handle_pointer(&script.drag_to(&press, -850.0, 0.0), &mut host);
    wc.handle_pointer(&script.drag_to(&press, -700.0, 0.0), &mut host);
    assert_eq!(wc.geometry(), WindowGeometry::new(300, 300, 450, 700));

    // Still over the border after release; the override is already showing
    wc.handle_pointer(&script.release(448.0, 350.0, Region::Viewport), &mut host);
    assert!(!wc.is_resizing());
}

#[test]
fn test_top_left_corner_moves_origin() {
    let mut host = MockHost::new();
    host.expect_set_geometry()
        .with(eq(WindowGeometry::new(250, 260, 950, 740)))
        .times(1)
        .return_const(());
    host.expect_request_cursor().return_const(());

    let mut wc = controller();
    let mut script = PointerScript::new(START);
    let press = script.press(1.0, 1.0, Region::TitleBar);
    assert_eq!(wc.handle_pointer(&press, &mut host), Handled::Consumed);
    assert!(wc.is_resizing(), "border wins over the title bar");

    wc.handle_pointer(&script.drag_to(&press, -50.0, -40.0), &mut host);
    assert_eq!(wc.geometry(), WindowGeometry::new(250, 260, 950, 740));
}

#[test]
fn test_maximize_and_restore_round_trip() {
    let mut host = MockHost::new();
    let mut seq = Sequence::new();
    host.expect_work_area().return_const(WORK_AREA);
    host.expect_set_geometry()
        .with(eq(WORK_AREA))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_set_state()
        .with(eq(WindowState::Maximized))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_set_geometry()
        .with(eq(START))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_set_state()
        .with(eq(WindowState::Normal))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut wc = controller();
    wc.toggle_maximize(&mut host);
    assert_eq!(wc.state(), WindowState::Maximized);
    assert_eq!(wc.geometry(), WORK_AREA);

    // A maximized window cannot be dragged
    let mut script = PointerScript::new(WORK_AREA);
    let press = script.press(200.0, 15.0, Region::TitleBar);
    assert_eq!(wc.handle_pointer(&press, &mut host), Handled::PassThrough);
    assert!(!wc.has_session());

    wc.toggle_maximize(&mut host);
    assert_eq!(wc.state(), WindowState::Normal);
    assert_eq!(wc.geometry(), START);
}

#[test]
fn test_minimize_remembers_maximized_snapshot() {
    let mut host = MockHost::new();
    host.expect_work_area().return_const(WORK_AREA);
    host.expect_set_geometry().return_const(());
    host.expect_set_state().return_const(());

    let mut wc = controller();
    wc.maximize(&mut host);
    wc.minimize(&mut host);
    assert_eq!(wc.state(), WindowState::Minimized);

    wc.host_restored();
    assert_eq!(wc.state(), WindowState::Maximized);

    wc.restore(&mut host);
    assert_eq!(wc.geometry(), START);
}

#[test]
fn test_close_releases_cursor_override() {
    let mut host = MockHost::new();
    let mut seq = Sequence::new();
    host.expect_request_cursor()
        .with(eq(CursorIcon::NsResize))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_restore_cursor()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    host.expect_close().times(1).in_sequence(&mut seq).return_const(());

    let mut wc = controller();
    let script = PointerScript::new(START);
    wc.handle_pointer(&script.hover(450.0, 699.0, Region::Viewport), &mut host);
    wc.close(&mut host);
    assert_eq!(wc.cursor().active(), None);
}

#[test]
fn test_pointer_left_restores_cursor_once() {
    let mut host = MockHost::new();
    host.expect_request_cursor().times(1).return_const(());
    host.expect_restore_cursor().times(1).return_const(());

    let mut wc = controller();
    let script = PointerScript::new(START);
    wc.handle_pointer(&script.hover(0.0, 350.0, Region::Viewport), &mut host);
    wc.pointer_left(&mut host);
    wc.pointer_left(&mut host);
}

#[test]
fn test_host_geometry_ignored_during_session() {
    let mut host = MockHost::new();
    let mut wc = controller();
    let mut script = PointerScript::new(START);

    wc.handle_pointer(&script.press(200.0, 15.0, Region::TitleBar), &mut host);
    wc.sync_from_host(WindowGeometry::new(0, 0, 1000, 800));
    assert_eq!(wc.geometry(), START);

    wc.focus_lost();
    wc.sync_from_host(WindowGeometry::new(0, 0, 1000, 800));
    assert_eq!(wc.geometry(), WindowGeometry::new(0, 0, 1000, 800));

    wc.sync_from_host(WindowGeometry::new(0, 0, 100, 100));
    assert_eq!(wc.geometry(), WindowGeometry::new(0, 0, 1000, 800));
}

/// Drive the controller the way the window host does: surface input
/// through the router, pointer events and commands into the controller.
#[test]
fn test_router_feeds_controller() {
    let mut host = MockHost::new();
    host.expect_work_area().return_const(WORK_AREA);
    host.expect_set_geometry().return_const(());
    host.expect_set_state()
        .with(eq(WindowState::Maximized))
        .times(1)
        .return_const(());

    let layout = ChromeLayout::new(ChromeConfig::default());
    let maximize = layout.control_button(ControlButton::Maximize, 900.0);
    let mut router = EventRouter::new(layout);
    let mut wc = controller();
    let origin = Point::new(START.x as f64, START.y as f64);
    let now = Instant::now();

    let dispatch = |routed: Vec<Routed>, wc: &mut WindowController, host: &mut MockHost| {
        let mut commands = Vec::new();
        for r in routed {
            match r {
                Routed::Pointer(event) => {
                    wc.handle_pointer(&event, host);
                }
                Routed::Command(command) => commands.push(command),
                _ => {}
            }
        }
        commands
    };

    let center = Point::new(
        maximize.x + maximize.width / 2.0,
        maximize.y + maximize.height / 2.0,
    );
    let mut commands = Vec::new();
    for input in [
        SurfaceInput::CursorMoved(center),
        SurfaceInput::Button {
            button: MouseButton::Left,
            pressed: true,
        },
        SurfaceInput::Button {
            button: MouseButton::Left,
            pressed: false,
        },
    ] {
        let routed = router.route(input, origin, 900.0, now);
        commands.extend(dispatch(routed, &mut wc, &mut host));
    }
    assert_eq!(commands, vec![ControlEvent::Maximize]);
    assert!(!wc.has_session(), "control buttons never start a drag");

    wc.toggle_maximize(&mut host);
    assert_eq!(wc.state(), WindowState::Maximized);

    // Two quick title bar presses form a double-click
    router.route(SurfaceInput::CursorMoved(Point::new(200.0, 15.0)), origin, 900.0, now);
    let press = SurfaceInput::Button {
        button: MouseButton::Left,
        pressed: true,
    };
    let release = SurfaceInput::Button {
        button: MouseButton::Left,
        pressed: false,
    };
    router.route(press, origin, 900.0, now);
    router.route(release, origin, 900.0, now);
    let second = router.route(press, origin, 900.0, now + Duration::from_millis(100));
    assert!(matches!(second.as_slice(), [Routed::DoubleClick(_)]));
}

#[test]
fn test_drag_dropped_after_release_outside_window() {
    // No expectations: the window must not move
    let mut host = MockHost::new();
    let mut router = EventRouter::new(ChromeLayout::new(ChromeConfig::default()));
    let mut wc = controller();
    let origin = Point::new(START.x as f64, START.y as f64);
    let now = Instant::now();

    let mut feed = |router: &mut EventRouter, wc: &mut WindowController, input: SurfaceInput| {
        for routed in router.route(input, origin, 900.0, now) {
            if let Routed::Pointer(event) = routed {
                wc.handle_pointer(&event, &mut host);
            }
        }
    };

    feed(&mut router, &mut wc, SurfaceInput::CursorMoved(Point::new(200.0, 15.0)));
    feed(
        &mut router,
        &mut wc,
        SurfaceInput::Button {
            button: MouseButton::Left,
            pressed: true,
        },
    );
    assert!(wc.is_dragging());

    // The button comes up over another window; only the focus change is seen
    router.focus_lost();
    feed(&mut router, &mut wc, SurfaceInput::CursorMoved(Point::new(260.0, 40.0)));
    assert!(!wc.has_session());
    assert_eq!(wc.geometry(), START);
}
