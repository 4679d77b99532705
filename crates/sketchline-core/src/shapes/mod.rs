//! Shape definitions for the canvas.
//!
//! Every shape is a fixed-capacity buffer of points filled in capture order.
//! A shape becomes renderable (and committable) once the buffer is full.

mod line;
mod rectangle;

pub use line::Line;
pub use rectangle::Rectangle;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Shape errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("Shape already holds all {capacity} points")]
    CapacityExceeded { capacity: usize },
    #[error("Shape has {found} of {capacity} points")]
    IncompleteShape { found: usize, capacity: usize },
    #[error("Unknown shape type: {0}")]
    UnknownShapeType(String),
    #[error("Odd number of coordinates: {0}")]
    OddCoordinateCount(usize),
}

/// Shape type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Line,
    Box,
}

impl ShapeKind {
    /// All known shape kinds.
    pub const ALL: [ShapeKind; 2] = [ShapeKind::Line, ShapeKind::Box];

    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Box => "Box",
        }
    }

    /// Number of points required to fully define a shape of this kind.
    pub fn capacity(self) -> usize {
        match self {
            ShapeKind::Line => Line::CAPACITY,
            ShapeKind::Box => Rectangle::CAPACITY,
        }
    }

    /// Map a mode key to a shape kind. Unbound keys return `None`.
    pub fn from_mode_key(key: &str) -> Option<Self> {
        match key {
            "l" => Some(ShapeKind::Line),
            "b" => Some(ShapeKind::Box),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ShapeError::UnknownShapeType(s.to_string()))
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the type tag.
    fn kind(&self) -> ShapeKind;

    /// Captured points, in capture order.
    fn points(&self) -> &[Point];

    /// Append a zeroed point and return it for in-place updates.
    fn new_point(&mut self) -> Result<&mut Point, ShapeError>;

    /// The most recently allocated point.
    fn last_point_mut(&mut self) -> Option<&mut Point>;

    /// Flat `[x0, y0, x1, y1, ...]` list of line-segment endpoints.
    ///
    /// Only defined once the shape holds all of its points.
    fn vertex_list(&self) -> Result<Vec<f64>, ShapeError>;

    /// Whether local state has not yet been confirmed by the remote store.
    fn is_dirty(&self) -> bool;

    fn capacity(&self) -> usize {
        self.kind().capacity()
    }

    fn is_complete(&self) -> bool {
        self.points().len() == self.capacity()
    }
}

/// Push a zeroed point onto `points` unless it already holds `capacity` points.
pub(crate) fn allocate_point(
    points: &mut Vec<Point>,
    capacity: usize,
) -> Result<&mut Point, ShapeError> {
    if points.len() >= capacity {
        return Err(ShapeError::CapacityExceeded { capacity });
    }
    points.push(Point::ZERO);
    let last = points.len() - 1;
    Ok(&mut points[last])
}

/// Fail with `IncompleteShape` unless `points` is full.
pub(crate) fn ensure_complete(points: &[Point], capacity: usize) -> Result<(), ShapeError> {
    if points.len() != capacity {
        return Err(ShapeError::IncompleteShape {
            found: points.len(),
            capacity,
        });
    }
    Ok(())
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Box(Rectangle),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Line(s) => s.id(),
            Shape::Box(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Line(s) => s.kind(),
            Shape::Box(s) => s.kind(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.kind().capacity()
    }

    pub fn points(&self) -> &[Point] {
        match self {
            Shape::Line(s) => s.points(),
            Shape::Box(s) => s.points(),
        }
    }

    pub fn new_point(&mut self) -> Result<&mut Point, ShapeError> {
        match self {
            Shape::Line(s) => s.new_point(),
            Shape::Box(s) => s.new_point(),
        }
    }

    pub fn last_point_mut(&mut self) -> Option<&mut Point> {
        match self {
            Shape::Line(s) => s.last_point_mut(),
            Shape::Box(s) => s.last_point_mut(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Shape::Line(s) => s.is_complete(),
            Shape::Box(s) => s.is_complete(),
        }
    }

    pub fn vertex_list(&self) -> Result<Vec<f64>, ShapeError> {
        match self {
            Shape::Line(s) => s.vertex_list(),
            Shape::Box(s) => s.vertex_list(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            Shape::Line(s) => s.is_dirty(),
            Shape::Box(s) => s.is_dirty(),
        }
    }

    pub(crate) fn set_dirty(&mut self, dirty: bool) {
        match self {
            Shape::Line(s) => s.dirty = dirty,
            Shape::Box(s) => s.dirty = dirty,
        }
    }

    /// Points flattened to `[x0, y0, x1, y1, ...]` for the wire.
    pub fn flattened_points(&self) -> Vec<f64> {
        self.points().iter().flat_map(|p| [p.x, p.y]).collect()
    }

    /// Detached copy for the scene: fresh id, same points, marked dirty.
    ///
    /// The copy shares nothing with `self`, so later cursor updates on the
    /// in-progress shape cannot leak into the committed one.
    pub fn committed_copy(&self) -> Shape {
        let points = self.points().to_vec();
        let mut copy = match self.kind() {
            ShapeKind::Line => Shape::Line(Line::with_points(points)),
            ShapeKind::Box => Shape::Box(Rectangle::with_points(points)),
        };
        copy.set_dirty(true);
        copy
    }

    /// Rebuild a shape of `kind` from a flat coordinate list.
    ///
    /// The list must hold exactly `capacity` coordinate pairs.
    pub fn from_flat(kind: ShapeKind, coords: &[f64]) -> Result<Shape, ShapeError> {
        if coords.len() % 2 != 0 {
            return Err(ShapeError::OddCoordinateCount(coords.len()));
        }
        let mut shape = ShapeFactory::create_kind(kind);
        for pair in coords.chunks_exact(2) {
            *shape.new_point()? = Point::new(pair[0], pair[1]);
        }
        if !shape.is_complete() {
            return Err(ShapeError::IncompleteShape {
                found: shape.points().len(),
                capacity: shape.capacity(),
            });
        }
        Ok(shape)
    }
}

/// Builds empty shapes from type tags.
pub struct ShapeFactory;

impl ShapeFactory {
    /// Create an empty shape from its wire tag.
    pub fn create(tag: &str) -> Result<Shape, ShapeError> {
        let kind: ShapeKind = tag.parse()?;
        Ok(Self::create_kind(kind))
    }

    /// Create an empty shape of the given kind.
    pub fn create_kind(kind: ShapeKind) -> Shape {
        match kind {
            ShapeKind::Line => Shape::Line(Line::new()),
            ShapeKind::Box => Shape::Box(Rectangle::new()),
        }
    }
}
