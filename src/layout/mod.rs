//! Pure geometry: every function here maps dates, slots and options to
//! pixel coordinates without touching any rendering backend.

pub mod arrow;
pub mod bar;
pub mod coords;
pub mod grid;
pub mod scale;
pub mod scroll;

pub use arrow::{ArrowGeometry, PathSegment, Route};
pub use bar::{BarGeometry, BarStyle, LabelPlacement, TextMeasure, ApproxMeasure};
pub use grid::GridGeometry;
pub use scale::GanttConfig;
pub use scroll::{ScrollBehavior, ScrollRequest, ScrollTarget};

/// Axis-aligned rectangle in chart coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn end_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn end_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.end_x() && y >= self.y && y <= self.end_y()
    }
}

/// Size of the area the chart is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, crate::GanttError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(crate::GanttError::InvalidContainer(format!(
                "viewport must have a positive size, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Compact number formatting for SVG output: at most two decimals, no
/// trailing zeros.
pub fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(45.0), "45");
        assert_eq!(num(22.5), "22.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-5.0), "-5");
    }

    #[test]
    fn viewport_rejects_degenerate_sizes() {
        assert!(Viewport::new(800.0, 600.0).is_ok());
        assert!(Viewport::new(0.0, 600.0).is_err());
        assert!(Viewport::new(f32::NAN, 600.0).is_err());
    }
}
