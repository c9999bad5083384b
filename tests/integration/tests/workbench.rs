//! Integration tests for the modeling workbench
//!
//! Runs the workbench against the headless renderer with either the real
//! polygon kernel or a mocked one, to check how kernel failures surface.

use anyhow::Result;
use cadframe::cad::{CadKernel, Face, KernelError, PolyKernel, Shape, Vec3};
use cadframe::renderer::{ChromeState, SceneRenderer};
use cadframe::window::Key;
use cadframe::workbench::NotificationLevel;
use cadframe_integration_tests::{click_viewport_center, headless_workbench, workbench_with};
use mockall::mock;

mock! {
    pub Kernel {}

    impl CadKernel for Kernel {
        fn make_box(&self, dx: f64, dy: f64, dz: f64) -> Result<Shape, KernelError>;
        fn face_normal(&self, face: &Face) -> Option<Vec3>;
        fn make_prism(&self, face: &Face, vector: Vec3) -> Result<Shape, KernelError>;
    }
}

/// A mock that builds real boxes, so picking has something to hit
fn kernel_with_box() -> MockKernel {
    let mut kernel = MockKernel::new();
    kernel
        .expect_make_box()
        .returning(|dx, dy, dz| PolyKernel.make_box(dx, dy, dz));
    kernel
}

#[test]
fn test_prism_failure_keeps_shape_and_selection() -> Result<()> {
    let mut kernel = kernel_with_box();
    kernel
        .expect_face_normal()
        .returning(|face| PolyKernel.face_normal(face));
    kernel
        .expect_make_prism()
        .times(1)
        .returning(|_, _| Err(KernelError::DegenerateVector));

    let mut bench = workbench_with(kernel)?;
    click_viewport_center(&mut bench);
    let selected = bench.selected_face();
    assert!(selected.is_some());
    let before = bench.shape().cloned();

    let note = bench.extrude_selected().unwrap_err();
    assert_eq!(note.level, NotificationLevel::Error);
    assert_eq!(note.title, "Extrusion Failed");
    assert_eq!(bench.shape().cloned(), before);
    assert_eq!(bench.selected_face(), selected);
    assert_eq!(bench.renderer().scene().shapes().len(), 1);
    Ok(())
}

#[test]
fn test_non_planar_face_never_reaches_prism() -> Result<()> {
    let mut kernel = kernel_with_box();
    kernel.expect_face_normal().returning(|_| None);
    kernel.expect_make_prism().never();

    let mut bench = workbench_with(kernel)?;
    click_viewport_center(&mut bench);

    let note = bench.handle_key(Key::E).unwrap_err();
    assert_eq!(note.level, NotificationLevel::Warning);
    assert_eq!(note.title, "Not a Planar Face");
    Ok(())
}

#[test]
fn test_prism_vector_is_normal_times_distance() -> Result<()> {
    let mut kernel = kernel_with_box();
    kernel
        .expect_face_normal()
        .returning(|face| PolyKernel.face_normal(face));
    kernel
        .expect_make_prism()
        .withf(|_, vector| (vector.length() - 25.0).abs() < 1e-9)
        .times(1)
        .returning(|face, vector| PolyKernel.make_prism(face, vector));

    let mut bench = workbench_with(kernel)?;
    bench.handle_key(Key::Up).map_err(|n| anyhow::anyhow!("{}", n))?;
    click_viewport_center(&mut bench);
    bench.handle_key(Key::E).map_err(|n| anyhow::anyhow!("{}", n))?;

    let shape = bench.shape().expect("prism displayed");
    assert!((shape.volume() - 50.0 * 50.0 * 25.0).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_setup_fails_when_box_rejected() {
    let mut kernel = MockKernel::new();
    kernel
        .expect_make_box()
        .returning(|dx, dy, dz| Err(KernelError::InvalidDimensions(dx, dy, dz)));

    assert!(workbench_with(kernel).is_err());
}

#[test]
fn test_headless_session_renders_extruded_shape() -> Result<()> {
    let mut bench = headless_workbench()?;
    bench.renderer_mut().render(&ChromeState::default())?;

    click_viewport_center(&mut bench);
    bench.extrude(10.0).map_err(|n| anyhow::anyhow!("{}", n))?;
    bench.renderer_mut().render(&ChromeState::default())?;

    assert_eq!(bench.renderer().stats().frames, 2);
    assert!(bench.renderer().summary().starts_with("1 shape(s), 6 face(s)"));

    // The new shape is pickable again
    click_viewport_center(&mut bench);
    assert!(bench.selected_face().is_some());
    Ok(())
}
