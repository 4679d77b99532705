//! Input events and pointer normalization.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Semantic input events delivered by the host page or window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer moved, in client (window) pixel coordinates.
    PointerMoved(Point),
    /// Primary button click.
    Click,
    /// A key was pressed; only mode keys have an effect.
    ModeKey(String),
}

/// Placement of the drawing surface in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasGeometry {
    /// Top-left corner of the canvas in client pixels.
    pub origin: Point,
    /// Canvas size in pixels.
    pub size: Size,
}

impl CanvasGeometry {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Canvas at the client origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(Point::ZERO, Size::new(width, height))
    }

    /// Map a client position to normalized device coordinates.
    ///
    /// x grows right and y grows up, both spanning `[-1, 1]` over the canvas.
    /// A degenerate canvas maps everything to the center.
    pub fn normalize(&self, client: Point) -> Point {
        if self.size.width <= 0.0 || self.size.height <= 0.0 {
            return Point::ZERO;
        }
        let pos_x = client.x - self.origin.x;
        let pos_y = client.y - self.origin.y;
        Point::new(
            pos_x / self.size.width * 2.0 - 1.0,
            pos_y / self.size.height * -2.0 + 1.0,
        )
    }
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self::from_size(640.0, 480.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_corners() {
        let geometry = CanvasGeometry::from_size(800.0, 600.0);
        assert_eq!(geometry.normalize(Point::new(0.0, 0.0)), Point::new(-1.0, 1.0));
        assert_eq!(geometry.normalize(Point::new(800.0, 600.0)), Point::new(1.0, -1.0));
        assert_eq!(geometry.normalize(Point::new(400.0, 300.0)), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_normalize_with_offset() {
        let geometry = CanvasGeometry::new(Point::new(100.0, 50.0), Size::new(200.0, 100.0));
        assert_eq!(geometry.normalize(Point::new(200.0, 100.0)), Point::new(0.0, 0.0));
        assert_eq!(geometry.normalize(Point::new(150.0, 75.0)), Point::new(-0.5, 0.5));
    }

    #[test]
    fn test_normalize_degenerate_canvas() {
        let geometry = CanvasGeometry::from_size(0.0, 100.0);
        assert_eq!(geometry.normalize(Point::new(10.0, 10.0)), Point::ZERO);
    }
}
