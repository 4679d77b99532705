//! Axis-aligned box shape.

use super::{ShapeError, ShapeId, ShapeKind, ShapeTrait, allocate_point, ensure_complete};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle spanned by two opposite corners.
///
/// The corners may be captured in any order; the outline is the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Two opposite corners, in capture order.
    pub(crate) points: Vec<Point>,
    pub(crate) dirty: bool,
}

impl Rectangle {
    /// Points needed to define a box.
    pub const CAPACITY: usize = 2;

    /// Create an empty box.
    pub fn new() -> Self {
        Self::with_points(Vec::with_capacity(Self::CAPACITY))
    }

    pub(crate) fn with_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            dirty: false,
        }
    }

    /// Get the box as a kurbo Rect, once both corners are captured.
    pub fn as_rect(&self) -> Option<Rect> {
        match self.points.as_slice() {
            [a, b] => Some(Rect::from_points(*a, *b)),
            _ => None,
        }
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Box
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn new_point(&mut self) -> Result<&mut Point, ShapeError> {
        allocate_point(&mut self.points, Self::CAPACITY)
    }

    fn last_point_mut(&mut self) -> Option<&mut Point> {
        self.points.last_mut()
    }

    fn vertex_list(&self) -> Result<Vec<f64>, ShapeError> {
        ensure_complete(&self.points, Self::CAPACITY)?;
        let (p0, p1) = (self.points[0], self.points[1]);
        let mut vertices = Vec::with_capacity(16);
        // From each corner: a horizontal edge to the other corner's x and a
        // vertical edge to the other corner's y.
        for (a, b) in [(p0, p1), (p1, p0)] {
            vertices.extend_from_slice(&[a.x, a.y, b.x, a.y]);
            vertices.extend_from_slice(&[a.x, a.y, a.x, b.y]);
        }
        Ok(vertices)
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}
