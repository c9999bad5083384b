//! Region layout of the window chrome
//!
//! The window surface is split into nested regions: the custom title bar
//! with its three control buttons, the toolbar below it, and the 3D
//! viewport filling the rest. All rectangles are window-local and are
//! recomputed from the current window size on demand.

use crate::utils::config::ChromeConfig;
use crate::window::{ControlButton, Point};

/// Actions offered by the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolAction {
    Extrude,
}

impl ToolAction {
    pub const ALL: [ToolAction; 1] = [ToolAction::Extrude];

    pub fn label(&self) -> &'static str {
        match self {
            ToolAction::Extrude => "Extrude Selected Face",
        }
    }
}

/// An input-receiving region nested inside the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    TitleBar,
    TitleButton(ControlButton),
    Toolbar,
    ToolButton(ToolAction),
    Viewport,
}

/// Axis-aligned rectangle in window-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Computes region rectangles for a given window size
#[derive(Debug, Clone)]
pub struct ChromeLayout {
    config: ChromeConfig,
}

impl ChromeLayout {
    pub fn new(config: ChromeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }

    pub fn title_bar(&self, width: f64) -> Rect {
        Rect::new(0.0, 0.0, width, self.config.titlebar_height as f64)
    }

    /// Buttons sit at the right end of the title bar: minimize, maximize, close
    pub fn control_button(&self, button: ControlButton, width: f64) -> Rect {
        let size = self.config.control_size as f64;
        let step = size + self.config.spacing as f64;
        let slot = match button {
            ControlButton::Close => 0.0,
            ControlButton::Maximize => 1.0,
            ControlButton::Minimize => 2.0,
        };
        let x = width - self.config.margin_right as f64 - size - slot * step;
        let y = ((self.config.titlebar_height as f64 - size) / 2.0).max(0.0);
        Rect::new(x, y, size, size)
    }

    pub fn toolbar(&self, width: f64) -> Rect {
        Rect::new(
            0.0,
            self.config.titlebar_height as f64,
            width,
            self.config.toolbar_height as f64,
        )
    }

    pub fn tool_button(&self, action: ToolAction) -> Rect {
        let margin = self.config.toolbar_margin as f64;
        let slot = ToolAction::ALL.iter().position(|a| *a == action).unwrap_or(0) as f64;
        let step = self.config.tool_button_width as f64 + margin;
        Rect::new(
            margin + slot * step,
            self.config.titlebar_height as f64 + margin,
            self.config.tool_button_width as f64,
            self.config.tool_button_height as f64,
        )
    }

    pub fn viewport(&self, width: f64, height: f64) -> Rect {
        let top = (self.config.titlebar_height + self.config.toolbar_height) as f64;
        Rect::new(0.0, top, width, (height - top).max(0.0))
    }

    /// Resolve the innermost region containing the point
    pub fn region_at(&self, point: Point, width: f64) -> Region {
        if self.title_bar(width).contains(point) {
            return ControlButton::ALL
                .iter()
                .find(|b| self.control_button(**b, width).contains(point))
                .map(|b| Region::TitleButton(*b))
                .unwrap_or(Region::TitleBar);
        }

        if self.toolbar(width).contains(point) {
            return ToolAction::ALL
                .iter()
                .find(|a| self.tool_button(**a).contains(point))
                .map(|a| Region::ToolButton(*a))
                .unwrap_or(Region::Toolbar);
        }

        Region::Viewport
    }

    pub fn region_rect(&self, region: Region, width: f64, height: f64) -> Rect {
        match region {
            Region::TitleBar => self.title_bar(width),
            Region::TitleButton(button) => self.control_button(button, width),
            Region::Toolbar => self.toolbar(width),
            Region::ToolButton(action) => self.tool_button(action),
            Region::Viewport => self.viewport(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ChromeLayout {
        ChromeLayout::new(ChromeConfig::default())
    }

    #[test]
    fn test_control_buttons_right_aligned() {
        let layout = layout();
        let close = layout.control_button(ControlButton::Close, 900.0);
        assert_eq!(close, Rect::new(864.0, 5.0, 28.0, 28.0));

        let maximize = layout.control_button(ControlButton::Maximize, 900.0);
        assert_eq!(maximize.x, 828.0);

        let minimize = layout.control_button(ControlButton::Minimize, 900.0);
        assert_eq!(minimize.x, 792.0);
    }

    #[test]
    fn test_region_at() {
        let layout = layout();
        let w = 900.0;

        assert_eq!(layout.region_at(Point::new(100.0, 20.0), w), Region::TitleBar);
        assert_eq!(
            layout.region_at(Point::new(870.0, 20.0), w),
            Region::TitleButton(ControlButton::Close)
        );
        assert_eq!(
            layout.region_at(Point::new(800.0, 10.0), w),
            Region::TitleButton(ControlButton::Minimize)
        );
        // Gap between buttons belongs to the title bar
        assert_eq!(layout.region_at(Point::new(860.0, 20.0), w), Region::TitleBar);

        assert_eq!(
            layout.region_at(Point::new(20.0, 60.0), w),
            Region::ToolButton(ToolAction::Extrude)
        );
        assert_eq!(layout.region_at(Point::new(500.0, 60.0), w), Region::Toolbar);
        assert_eq!(layout.region_at(Point::new(450.0, 400.0), w), Region::Viewport);
    }

    #[test]
    fn test_viewport_fills_remainder() {
        let layout = layout();
        assert_eq!(layout.viewport(900.0, 700.0), Rect::new(0.0, 90.0, 900.0, 610.0));
        assert_eq!(layout.viewport(900.0, 50.0).height, 0.0);
    }
}
