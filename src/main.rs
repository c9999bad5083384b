use anyhow::Result;
use cadframe::cad::PolyKernel;
use cadframe::renderer::{ChromeState, HeadlessRenderer, SceneRenderer};
use cadframe::utils::config::{Config, HEADLESS_ENV};
use cadframe::window::{App, ChromeLayout};
use cadframe::workbench::Workbench;
use clap::Parser;
use env_logger::Env;
use log::info;

/// cadframe - A frameless CAD viewer with face picking and extrusion
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {}

fn main() -> Result<()> {
    // Parse command line arguments
    let _args = Args::parse();

    let config = Config::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    env_logger::Builder::from_env(Env::default().default_filter_or(config.general.log_level.as_str()))
        .format_timestamp_millis()
        .init();

    info!("Starting cadframe v{}", env!("CARGO_PKG_VERSION"));

    if std::env::var_os(HEADLESS_ENV).is_some() {
        return run_headless(config);
    }

    App::run(config)?;
    info!("cadframe exited cleanly");
    Ok(())
}

/// Build the scene without a window, log what would be shown and return
fn run_headless(config: Config) -> Result<()> {
    let (width, height) = (config.window.width as u32, config.window.height as u32);
    let mut renderer = HeadlessRenderer::new(ChromeLayout::new(config.chrome.clone()), width, height);
    renderer.initialize(width, height)?;

    let mut workbench = Workbench::new(renderer, PolyKernel::new(), config.viewer.clone());
    workbench.setup()?;
    workbench.renderer_mut().render(&ChromeState::default())?;

    info!("Headless run: {}", workbench.renderer().summary());
    Ok(())
}
