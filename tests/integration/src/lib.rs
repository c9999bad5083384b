//! Integration test utilities for cadframe
//!
//! Fixtures shared by the test binaries: pointer event builders, a host
//! that records what the controller asks of it, headless workbenches and
//! temporary config files.

use anyhow::Result;
use cadframe::cad::{CadKernel, PolyKernel};
use cadframe::renderer::{HeadlessRenderer, SceneRenderer};
use cadframe::utils::{ChromeConfig, Config, ViewerConfig};
use cadframe::window::ChromeLayout;
use cadframe::workbench::Workbench;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builders for normalized pointer events
pub mod pointer {
    use cadframe::window::{
        ButtonMask, MouseButton, Point, PointerEvent, PointerKind, Region, WindowGeometry,
    };

    /// Events for a window at `geometry`; global positions follow from it
    pub struct PointerScript {
        pub geometry: WindowGeometry,
        buttons: ButtonMask,
    }

    impl PointerScript {
        pub fn new(geometry: WindowGeometry) -> Self {
            Self {
                geometry,
                buttons: ButtonMask::NONE,
            }
        }

        fn event(&self, kind: PointerKind, local: Point, region: Region) -> PointerEvent {
            PointerEvent {
                kind,
                local,
                global: local.offset(self.geometry.x as f64, self.geometry.y as f64),
                buttons: self.buttons,
                region,
            }
        }

        pub fn press(&mut self, x: f64, y: f64, region: Region) -> PointerEvent {
            self.buttons = self.buttons.with(MouseButton::Left);
            self.event(PointerKind::Press(MouseButton::Left), Point::new(x, y), region)
        }

        /// Move by a screen delta measured from the press position
        pub fn drag_to(&self, press: &PointerEvent, dx: f64, dy: f64) -> PointerEvent {
            PointerEvent {
                kind: PointerKind::Move,
                local: press.local.offset(dx, dy),
                global: press.global.offset(dx, dy),
                buttons: self.buttons,
                region: press.region,
            }
        }

        pub fn hover(&self, x: f64, y: f64, region: Region) -> PointerEvent {
            self.event(PointerKind::Move, Point::new(x, y), region)
        }

        pub fn release(&mut self, x: f64, y: f64, region: Region) -> PointerEvent {
            self.buttons = self.buttons.without(MouseButton::Left);
            self.event(PointerKind::Release(MouseButton::Left), Point::new(x, y), region)
        }
    }
}

/// Headless workbench with the default layout and the polygon kernel
pub fn headless_workbench() -> Result<Workbench<HeadlessRenderer, PolyKernel>> {
    workbench_with(PolyKernel)
}

/// Headless workbench around any kernel, already set up
pub fn workbench_with<K: CadKernel>(kernel: K) -> Result<Workbench<HeadlessRenderer, K>> {
    let mut renderer = HeadlessRenderer::new(ChromeLayout::new(ChromeConfig::default()), 900, 700);
    renderer.initialize(900, 700)?;
    let mut bench = Workbench::new(renderer, kernel, ViewerConfig::default());
    bench.setup()?;
    Ok(bench)
}

/// Pick the middle of the viewport and apply the result
pub fn click_viewport_center<K: CadKernel>(bench: &mut Workbench<HeadlessRenderer, K>) {
    let viewport = bench.renderer().scene().viewport();
    bench
        .renderer_mut()
        .pick(viewport.x + viewport.width / 2.0, viewport.y + viewport.height / 2.0);
    bench.process_picks();
}

/// A config file written into its own temporary directory
pub struct ConfigFixture {
    pub temp_dir: TempDir,
    pub path: PathBuf,
}

impl ConfigFixture {
    pub fn new(config: &Config) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("cadframe").join("config.toml");
        config.save_to(&path)?;
        Ok(Self { temp_dir, path })
    }

    /// Write raw TOML instead of a serialized config
    pub fn raw(contents: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, contents)?;
        Ok(Self { temp_dir, path })
    }
}
