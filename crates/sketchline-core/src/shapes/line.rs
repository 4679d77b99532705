//! Line shape.

use super::{ShapeError, ShapeId, ShapeKind, ShapeTrait, allocate_point, ensure_complete};
use kurbo::{Line as KurboLine, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight segment between two captured points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start and end point, in capture order.
    pub(crate) points: Vec<Point>,
    pub(crate) dirty: bool,
}

impl Line {
    /// Points needed to define a line.
    pub const CAPACITY: usize = 2;

    /// Create an empty line.
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

    /// Get as a kurbo Line, once both points are captured.
    pub fn as_kurbo(&self) -> Option<KurboLine> {
        match self.points.as_slice() {
            [start, end] => Some(KurboLine::new(*start, *end)),
            _ => None,
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
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
        Ok(self.points.iter().flat_map(|p| [p.x, p.y]).collect())
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}
