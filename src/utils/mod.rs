//! Utility module for cadframe
//!
//! This module provides common utilities used throughout the application:
//! - Error handling with custom error types
//! - Configuration management
//! - Small numeric helpers

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{ChromeConfig, Config, GeneralConfig, ViewerConfig, WindowConfig};
pub use error::{CadFrameError, Result};

/// Round a value to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
