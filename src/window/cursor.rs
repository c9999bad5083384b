//! Resize cursor feedback
//!
//! The presenter is the only writer of the cursor override. It remembers
//! which glyph it last requested so repeated moves over the same edge do
//! not hit the host again, and it hands the default cursor back as soon as
//! the pointer leaves the border.

use crate::window::hit_test::Zone;
use crate::window::CursorSink;
use log::trace;
use winit::window::CursorIcon;

#[derive(Debug, Default)]
pub struct CursorPresenter {
    /// Glyph currently requested from the host, `None` when the default is showing
    active: Option<CursorIcon>,
}

impl CursorPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the cursor for the zone under the pointer
    pub fn update(&mut self, zone: Zone, sink: &mut dyn CursorSink) {
        match zone.resize_edge().map(|edge| edge.to_cursor_icon()) {
            Some(icon) => {
                if self.active != Some(icon) {
                    trace!("cursor override -> {:?}", icon);
                    sink.request_cursor(icon);
                    self.active = Some(icon);
                }
            }
            None => self.release(sink),
        }
    }

    /// Drop the override, if any
    pub fn release(&mut self, sink: &mut dyn CursorSink) {
        if self.active.take().is_some() {
            trace!("cursor override released");
            sink.restore_cursor();
        }
    }

    pub fn active(&self) -> Option<CursorIcon> {
        self.active
    }
}
