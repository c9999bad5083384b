//! cadframe - a frameless CAD viewer
//!
//! The main window has no native decorations; moving, resizing, maximizing
//! and border cursor feedback are implemented in [`window`]. Below the
//! custom title bar a [`workbench`] shows a cube whose faces can be picked
//! and extruded, using the [`cad`] kernel and a [`renderer`].

pub mod cad;
pub mod renderer;
pub mod utils;
pub mod window;
pub mod workbench;
