//! Window chrome geometry
//!
//! Title bar, toolbar and buttons are drawn as flat quads in window pixels;
//! button glyphs are line art built from thin quads.

use crate::renderer::Color;
use crate::window::layout::{ChromeLayout, Rect, Region, ToolAction};
use crate::window::{ButtonIcon, ControlButton, WindowState};
use bytemuck::{Pod, Zeroable};

/// What the chrome needs to know to draw itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeState {
    pub window_state: WindowState,
    pub hovered: Option<Region>,
    pub pressed: Option<ControlButton>,
}

impl Default for ChromeState {
    fn default() -> Self {
        Self {
            window_state: WindowState::Normal,
            hovered: None,
            pressed: None,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OverlayVertex {
    /// Window pixels, origin top-left
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl OverlayVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x4,  // color
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const TITLE_BAR: Color = Color::new(0.13, 0.14, 0.16, 1.0);
const TOOLBAR: Color = Color::new(0.17, 0.18, 0.21, 1.0);
const BUTTON: Color = Color::new(0.24, 0.26, 0.30, 1.0);
const CLOSE_HOVER: Color = Color::new(0.78, 0.20, 0.20, 1.0);
const GLYPH: Color = Color::new(0.86, 0.88, 0.92, 1.0);
const STROKE: f32 = 1.5;

/// Accumulates overlay triangles
#[derive(Debug, Default)]
pub struct OverlayBuilder {
    vertices: Vec<OverlayVertex>,
}

impl OverlayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        let (x0, y0) = (rect.x as f32, rect.y as f32);
        let (x1, y1) = (x0 + rect.width as f32, y0 + rect.height as f32);
        self.quad([[x0, y0], [x1, y0], [x1, y1], [x0, y1]], color);
    }

    /// A line segment drawn `STROKE` pixels wide
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], color: Color) {
        let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        let (nx, ny) = (-dy / length * STROKE * 0.5, dx / length * STROKE * 0.5);
        self.quad(
            [
                [from[0] + nx, from[1] + ny],
                [to[0] + nx, to[1] + ny],
                [to[0] - nx, to[1] - ny],
                [from[0] - nx, from[1] - ny],
            ],
            color,
        );
    }

    /// Outline of a rectangle
    pub fn frame(&mut self, rect: Rect, color: Color) {
        let (x0, y0) = (rect.x as f32, rect.y as f32);
        let (x1, y1) = (x0 + rect.width as f32, y0 + rect.height as f32);
        self.line([x0, y0], [x1, y0], color);
        self.line([x1, y0], [x1, y1], color);
        self.line([x1, y1], [x0, y1], color);
        self.line([x0, y1], [x0, y0], color);
    }

    fn quad(&mut self, corners: [[f32; 2]; 4], color: Color) {
        let color = color.to_array();
        for i in [0, 1, 2, 2, 3, 0] {
            self.vertices.push(OverlayVertex {
                position: corners[i],
                color,
            });
        }
    }

    pub fn finish(self) -> Vec<OverlayVertex> {
        self.vertices
    }
}

/// Build the chrome for a window of the given size
pub fn build_chrome(layout: &ChromeLayout, width: f64, chrome: &ChromeState) -> Vec<OverlayVertex> {
    let mut out = OverlayBuilder::new();
    out.rect(layout.title_bar(width), TITLE_BAR);
    out.rect(layout.toolbar(width), TOOLBAR);

    for action in ToolAction::ALL {
        let rect = layout.tool_button(action);
        let hovered = chrome.hovered == Some(Region::ToolButton(action));
        out.rect(rect, if hovered { BUTTON.lighten(0.15) } else { BUTTON });
        tool_glyph(&mut out, action, rect);
    }

    for button in ControlButton::ALL {
        let rect = layout.control_button(button, width);
        let hovered = chrome.hovered == Some(Region::TitleButton(button));
        let pressed = chrome.pressed == Some(button);
        let fill = match (button, hovered || pressed) {
            (ControlButton::Close, true) => Some(CLOSE_HOVER),
            (_, true) if pressed => Some(BUTTON.lighten(0.25)),
            (_, true) => Some(BUTTON),
            _ => None,
        };
        if let Some(fill) = fill {
            out.rect(rect, fill);
        }
        icon_glyph(&mut out, button.icon(chrome.window_state), rect);
    }

    out.finish()
}

fn icon_glyph(out: &mut OverlayBuilder, icon: ButtonIcon, rect: Rect) {
    let inset = rect.width * 0.3;
    let inner = Rect::new(
        rect.x + inset,
        rect.y + inset,
        rect.width - inset * 2.0,
        rect.height - inset * 2.0,
    );
    let (x0, y0) = (inner.x as f32, inner.y as f32);
    let (x1, y1) = (x0 + inner.width as f32, y0 + inner.height as f32);
    let mid_y = (y0 + y1) * 0.5;

    match icon {
        ButtonIcon::Minimize => out.line([x0, mid_y], [x1, mid_y], GLYPH),
        ButtonIcon::Maximize => out.frame(inner, GLYPH),
        ButtonIcon::Restore => {
            let offset = inner.width * 0.25;
            let back = Rect::new(inner.x + offset, inner.y, inner.width - offset, inner.height - offset);
            let front = Rect::new(inner.x, inner.y + offset, inner.width - offset, inner.height - offset);
            out.frame(back, GLYPH);
            out.rect(front, TITLE_BAR);
            out.frame(front, GLYPH);
        }
        ButtonIcon::Close => {
            out.line([x0, y0], [x1, y1], GLYPH);
            out.line([x1, y0], [x0, y1], GLYPH);
        }
    }
}

fn tool_glyph(out: &mut OverlayBuilder, action: ToolAction, rect: Rect) {
    match action {
        ToolAction::Extrude => {
            // Arrow rising out of a slab
            let cx = (rect.x + rect.width * 0.5) as f32;
            let base = (rect.y + rect.height * 0.75) as f32;
            let tip = (rect.y + rect.height * 0.2) as f32;
            let half = (rect.height * 0.3) as f32;
            out.line([cx - half * 2.0, base], [cx + half * 2.0, base], GLYPH);
            out.line([cx, base], [cx, tip], GLYPH);
            out.line([cx, tip], [cx - half * 0.6, tip + half * 0.6], GLYPH);
            out.line([cx, tip], [cx + half * 0.6, tip + half * 0.6], GLYPH);
        }
    }
}
