//! Window rectangle math for drag and border resize
//!
//! Every function here is pure: it takes the geometry captured when the
//! gesture started (the anchor) plus the pointer travel since then, and
//! returns the rectangle the window should have now.

use crate::window::hit_test::ResizeEdge;

/// Window rectangle in physical screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Size as winit expects it; negative sizes never reach the host
    pub fn size(&self) -> (u32, u32) {
        (self.width.max(0) as u32, self.height.max(0) as u32)
    }

    pub fn satisfies(&self, min: MinimumSize) -> bool {
        self.width >= min.width && self.height >= min.height
    }
}

/// Smallest size a border resize may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumSize {
    pub width: i32,
    pub height: i32,
}

impl MinimumSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Pointer travel since the anchor, in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
}

impl Delta {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// Translate the anchor by the delta; size is unchanged
pub fn compute_drag(anchor: WindowGeometry, delta: Delta) -> WindowGeometry {
    WindowGeometry {
        x: anchor.x + delta.dx,
        y: anchor.y + delta.dy,
        ..anchor
    }
}

/// Resize the anchor from the given edge.
///
/// `delta` is the total pointer travel since the gesture started and
/// `current` the rectangle the window has right now. Each axis is checked
/// on its own: a candidate size below the minimum leaves that axis as it
/// currently is (the edge sticks at its last valid position), while the
/// other axis of a corner may still move.
pub fn compute_resize(
    anchor: WindowGeometry,
    current: WindowGeometry,
    edge: ResizeEdge,
    delta: Delta,
    min: MinimumSize,
) -> WindowGeometry {
    let mut geometry = anchor;

    if edge.has_left() || edge.has_right() {
        let candidate = if edge.has_left() {
            anchor.width - delta.dx
        } else {
            anchor.width + delta.dx
        };
        if candidate < min.width {
            geometry.x = current.x;
            geometry.width = current.width;
        } else {
            if edge.has_left() {
                geometry.x = anchor.x + delta.dx;
            }
            geometry.width = candidate;
        }
    }

    if edge.has_top() || edge.has_bottom() {
        let candidate = if edge.has_top() {
            anchor.height - delta.dy
        } else {
            anchor.height + delta.dy
        };
        if candidate < min.height {
            geometry.y = current.y;
            geometry.height = current.height;
        } else {
            if edge.has_top() {
                geometry.y = anchor.y + delta.dy;
            }
            geometry.height = candidate;
        }
    }

    geometry
}
