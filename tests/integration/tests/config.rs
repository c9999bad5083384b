//! Integration tests for configuration loading
//!
//! Environment overrides touch process-global state, so those tests run
//! serially.

use anyhow::Result;
use cadframe::utils::config::HEADLESS_ENV;
use cadframe::utils::Config;
use cadframe::window::{
    classify, ChromeLayout, ControlButton, Point, Region, ResizeEdge, WindowGeometry, Zone,
};
use cadframe_integration_tests::ConfigFixture;
use serial_test::serial;

const OVERRIDES: [&str; 5] = [
    "CADFRAME_WINDOW_WIDTH",
    "CADFRAME_WINDOW_HEIGHT",
    "CADFRAME_BORDER_WIDTH",
    "CADFRAME_EXTRUDE_DISTANCE",
    "CADFRAME_LOG_LEVEL",
];

fn clear_env() {
    for name in OVERRIDES {
        std::env::remove_var(name);
    }
    std::env::remove_var(HEADLESS_ENV);
}

#[test]
fn test_saved_config_reads_back() -> Result<()> {
    let mut config = Config::default();
    config.window.title = "Part 7".to_string();
    config.window.border_width = 3;
    config.viewer.extrude_distance = 12.5;

    let fixture = ConfigFixture::new(&config)?;
    let loaded = Config::from_file(&fixture.path)?;
    assert_eq!(loaded.window.title, "Part 7");
    assert_eq!(loaded.window.border_width, 3);
    assert_eq!(loaded.viewer.extrude_distance, 12.5);
    loaded.validate()?;
    Ok(())
}

#[test]
fn test_partial_file_keeps_defaults() -> Result<()> {
    let fixture = ConfigFixture::raw("[window]\nwidth = 1000\n\n[viewer]\ncube_size = 80.0\n")?;
    let loaded = Config::from_file(&fixture.path)?;
    let defaults = Config::default();

    assert_eq!(loaded.window.width, 1000);
    assert_eq!(loaded.window.height, defaults.window.height);
    assert_eq!(loaded.viewer.cube_size, 80.0);
    assert_eq!(loaded.chrome.titlebar_height, defaults.chrome.titlebar_height);
    Ok(())
}

#[test]
fn test_validate_rejects_bad_values() {
    let mut config = Config::default();
    config.window.width = config.window.min_width - 1;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.viewer.face_color = "not-a-color".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.general.log_level = "loud".to_string();
    assert!(config.validate().is_err());
}

#[test]
#[serial]
fn test_env_overrides_apply() -> Result<()> {
    clear_env();
    std::env::set_var("CADFRAME_WINDOW_WIDTH", "1280");
    std::env::set_var("CADFRAME_BORDER_WIDTH", "3");
    std::env::set_var("CADFRAME_EXTRUDE_DISTANCE", "-15.5");
    std::env::set_var("CADFRAME_LOG_LEVEL", "debug");

    let mut config = Config::default();
    let result = config.apply_env_overrides();
    clear_env();
    result?;

    assert_eq!(config.window.width, 1280);
    assert_eq!(config.window.border_width, 3);
    assert_eq!(config.viewer.extrude_distance, -15.5);
    assert_eq!(config.general.log_level, "debug");
    config.validate()?;
    Ok(())
}

#[test]
#[serial]
fn test_unparsable_override_is_rejected() {
    clear_env();
    std::env::set_var("CADFRAME_WINDOW_HEIGHT", "tall");

    let mut config = Config::default();
    let result = config.apply_env_overrides();
    clear_env();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("CADFRAME_WINDOW_HEIGHT"));
}

#[test]
#[serial]
fn test_override_can_fail_validation() {
    clear_env();
    std::env::set_var("CADFRAME_EXTRUDE_DISTANCE", "5000");

    let mut config = Config::default();
    let applied = config.apply_env_overrides();
    clear_env();

    assert!(applied.is_ok());
    assert!(config.validate().is_err());
}

#[test]
fn test_border_reaching_close_button_is_rejected() {
    let mut config = Config::default();
    config.window.border_width = 6;

    // With this border the top rows of the close button classify as a resize edge
    let layout = ChromeLayout::new(config.chrome.clone());
    let close = layout.control_button(ControlButton::Close, 900.0);
    let point = Point::new(close.x + 1.0, close.y);
    assert_eq!(
        layout.region_at(point, 900.0),
        Region::TitleButton(ControlButton::Close)
    );
    let geometry = WindowGeometry::new(300, 300, 900, 700);
    assert_eq!(
        classify(point, &geometry, config.window.border_width, Region::TitleButton(ControlButton::Close)),
        Zone::Border(ResizeEdge::Top)
    );

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("overlaps the title bar buttons"));

    config.window.border_width = 4;
    assert_eq!(
        classify(point, &geometry, config.window.border_width, Region::TitleButton(ControlButton::Close)),
        Zone::ControlButton
    );
    assert!(config.validate().is_ok());
}
