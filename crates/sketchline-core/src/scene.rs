//! Committed shape storage.

use crate::shapes::{Shape, ShapeId};

/// Append-only, ordered collection of committed shapes.
///
/// Insertion order is both draw order and save order. Shapes are only
/// handed out by shared reference; the dirty flag is the single piece of
/// state that changes after a shape is appended, and only the sync layer
/// changes it.
#[derive(Debug, Clone, Default)]
pub struct SceneStore {
    shapes: Vec<Shape>,
}

impl SceneStore {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed shape and return its position.
    pub fn append(&mut self, shape: Shape) -> usize {
        log::debug!(
            "Appending {} {} (dirty: {})",
            shape.kind(),
            shape.id(),
            shape.is_dirty()
        );
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    /// Find a shape by ID.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    /// Shapes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Number of shapes not yet confirmed by the remote store.
    pub fn dirty_count(&self) -> usize {
        self.shapes.iter().filter(|shape| shape.is_dirty()).count()
    }

    pub fn has_dirty(&self) -> bool {
        self.shapes.iter().any(Shape::is_dirty)
    }

    /// Positions of dirty shapes, in order.
    pub fn dirty_indices(&self) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, shape)| shape.is_dirty())
            .map(|(index, _)| index)
            .collect()
    }

    /// Record that the shape at `index` is persisted remotely.
    pub(crate) fn mark_persisted(&mut self, index: usize) {
        if let Some(shape) = self.shapes.get_mut(index) {
            shape.set_dirty(false);
        }
    }

    /// Record that the shape at `index` still needs saving.
    pub(crate) fn mark_dirty(&mut self, index: usize) {
        if let Some(shape) = self.shapes.get_mut(index) {
            shape.set_dirty(true);
        }
    }
}
