//! Canvas state: committed scene plus the capture in progress.

use crate::capture::{CaptureOutcome, CaptureStateMachine};
use crate::input::{CanvasGeometry, InputEvent};
use crate::scene::SceneStore;
use crate::shapes::{Shape, ShapeError, ShapeKind};

/// The drawing surface state threaded through every event handler.
///
/// Handlers run to completion one at a time, so plain `&mut` access is the
/// only synchronization needed.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    /// Committed shapes.
    pub scene: SceneStore,
    /// Mode, cursor and the shape being captured.
    pub capture: CaptureStateMachine,
    /// Where the canvas sits in client coordinates.
    pub geometry: CanvasGeometry,
}

impl Canvas {
    /// Create an empty canvas.
    pub fn new(geometry: CanvasGeometry, mode: ShapeKind) -> Self {
        Self {
            scene: SceneStore::new(),
            capture: CaptureStateMachine::new(mode),
            geometry,
        }
    }

    /// Update the canvas placement after a resize or layout change.
    pub fn set_geometry(&mut self, geometry: CanvasGeometry) {
        self.geometry = geometry;
    }

    /// Route one input event to the capture state machine.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<CaptureOutcome, ShapeError> {
        match event {
            InputEvent::PointerMoved(client) => {
                let position = self.geometry.normalize(*client);
                Ok(self.capture.pointer_moved(position))
            }
            InputEvent::Click => self.capture.click(&mut self.scene),
            InputEvent::ModeKey(key) => Ok(self.capture.mode_key(key)),
        }
    }

    /// Shapes to draw this frame: the in-progress shape first, then the scene.
    pub fn drawable_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.capture.in_progress().into_iter().chain(self.scene.iter())
    }
}
