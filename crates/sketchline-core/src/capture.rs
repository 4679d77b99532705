//! Click-driven shape capture.
//!
//! The first click starts a shape of the current mode and drops its first
//! point at the cursor; a second, pending point follows the cursor until the
//! next click commits the shape into the scene.

use crate::scene::SceneStore;
use crate::shapes::{Shape, ShapeError, ShapeFactory, ShapeId, ShapeKind};
use kurbo::Point;

/// What a single input did to the capture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureOutcome {
    /// Cursor moved; the pending point (if any) followed it.
    Moved,
    /// A new in-progress shape was started.
    Started,
    /// Another point was dropped on a shape that still has free slots.
    PointAdded,
    /// The in-progress shape was committed to the scene.
    Committed { index: usize, id: ShapeId },
    /// The mode for the next shape changed.
    ModeChanged(ShapeKind),
    /// The in-progress shape was discarded.
    Cancelled,
    /// The input had no effect.
    Ignored,
}

/// Interaction state: current mode, the shape being captured and the cursor.
///
/// The in-progress shape is owned here and never shared with the scene; on
/// commit a detached copy is appended instead.
#[derive(Debug, Clone)]
pub struct CaptureStateMachine {
    mode: ShapeKind,
    in_progress: Option<Shape>,
    cursor: Point,
}

impl Default for CaptureStateMachine {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

impl CaptureStateMachine {
    /// Create an idle state machine that starts shapes of `mode`.
    pub fn new(mode: ShapeKind) -> Self {
        Self {
            mode,
            in_progress: None,
            cursor: Point::ZERO,
        }
    }

    /// Kind used for the next shape.
    pub fn mode(&self) -> ShapeKind {
        self.mode
    }

    /// Last cursor position in normalized device coordinates.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// The shape currently being captured, if any.
    pub fn in_progress(&self) -> Option<&Shape> {
        self.in_progress.as_ref()
    }

    /// Check if a capture is active.
    pub fn is_capturing(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Move the cursor; the pending point of the in-progress shape follows.
    pub fn pointer_moved(&mut self, position: Point) -> CaptureOutcome {
        self.cursor = position;
        if let Some(pending) = self
            .in_progress
            .as_mut()
            .and_then(|shape| shape.last_point_mut())
        {
            *pending = position;
        }
        CaptureOutcome::Moved
    }

    /// Start, extend or commit the in-progress shape.
    pub fn click(&mut self, scene: &mut SceneStore) -> Result<CaptureOutcome, ShapeError> {
        let Some(shape) = self.in_progress.as_mut() else {
            return self.start();
        };

        if !shape.is_complete() {
            *shape.new_point()? = self.cursor;
            return Ok(CaptureOutcome::PointAdded);
        }

        self.commit(scene)
    }

    /// Select the kind for the next shape. An in-progress shape keeps its kind.
    pub fn set_mode(&mut self, mode: ShapeKind) -> CaptureOutcome {
        if mode != self.mode {
            log::debug!("Capture mode {} -> {}", self.mode, mode);
        }
        self.mode = mode;
        CaptureOutcome::ModeChanged(mode)
    }

    /// Handle a key press; keys without a mode binding are ignored.
    pub fn mode_key(&mut self, key: &str) -> CaptureOutcome {
        match ShapeKind::from_mode_key(key) {
            Some(mode) => self.set_mode(mode),
            None => CaptureOutcome::Ignored,
        }
    }

    /// Discard the in-progress shape without touching the scene.
    pub fn cancel(&mut self) -> CaptureOutcome {
        match self.in_progress.take() {
            Some(shape) => {
                log::debug!("Cancelled {} capture", shape.kind());
                CaptureOutcome::Cancelled
            }
            None => CaptureOutcome::Ignored,
        }
    }

    fn start(&mut self) -> Result<CaptureOutcome, ShapeError> {
        let mut shape = ShapeFactory::create_kind(self.mode);
        // The first point is fixed; the second is pending and tracks the cursor.
        *shape.new_point()? = self.cursor;
        *shape.new_point()? = self.cursor;
        log::debug!("Started {} at ({:.3}, {:.3})", shape.kind(), self.cursor.x, self.cursor.y);
        self.in_progress = Some(shape);
        Ok(CaptureOutcome::Started)
    }

    fn commit(&mut self, scene: &mut SceneStore) -> Result<CaptureOutcome, ShapeError> {
        let Some(shape) = self.in_progress.take() else {
            return Ok(CaptureOutcome::Ignored);
        };
        let committed = shape.committed_copy();
        let id = committed.id();
        let index = scene.append(committed);
        log::info!("Committed {} {} at scene position {}", shape.kind(), id, index);
        Ok(CaptureOutcome::Committed { index, id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_starts_with_two_points_at_cursor() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Line);
        let mut scene = SceneStore::new();

        capture.pointer_moved(Point::new(0.2, 0.4));
        assert_eq!(capture.click(&mut scene).unwrap(), CaptureOutcome::Started);

        let shape = capture.in_progress().unwrap();
        assert_eq!(shape.kind(), ShapeKind::Line);
        assert_eq!(shape.points(), &[Point::new(0.2, 0.4), Point::new(0.2, 0.4)]);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_motion_only_moves_pending_point() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Line);
        let mut scene = SceneStore::new();

        capture.pointer_moved(Point::new(-0.5, -0.5));
        capture.click(&mut scene).unwrap();
        capture.pointer_moved(Point::new(0.1, 0.1));
        capture.pointer_moved(Point::new(0.5, 0.25));

        let points = capture.in_progress().unwrap().points();
        assert_eq!(points[0], Point::new(-0.5, -0.5));
        assert_eq!(points[1], Point::new(0.5, 0.25));
    }

    #[test]
    fn test_second_click_commits_line() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Line);
        let mut scene = SceneStore::new();

        capture.pointer_moved(Point::new(0.0, 0.0));
        capture.click(&mut scene).unwrap();
        capture.pointer_moved(Point::new(1.0, 1.0));
        let outcome = capture.click(&mut scene).unwrap();

        let CaptureOutcome::Committed { index, id } = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };
        assert_eq!(index, 0);
        assert!(capture.in_progress().is_none());

        let shape = scene.get(0).unwrap();
        assert_eq!(shape.id(), id);
        assert!(shape.is_dirty());
        assert_eq!(shape.points(), &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
    }

    #[test]
    fn test_motion_after_commit_does_not_alias() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Box);
        let mut scene = SceneStore::new();

        capture.pointer_moved(Point::new(-0.5, 0.5));
        capture.click(&mut scene).unwrap();
        capture.pointer_moved(Point::new(0.5, -0.5));
        capture.click(&mut scene).unwrap();
        capture.pointer_moved(Point::new(0.9, 0.9));

        assert_eq!(scene.get(0).unwrap().points()[1], Point::new(0.5, -0.5));
        assert_eq!(capture.cursor(), Point::new(0.9, 0.9));
    }

    #[test]
    fn test_next_shape_starts_at_current_cursor() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Line);
        let mut scene = SceneStore::new();

        capture.click(&mut scene).unwrap();
        capture.pointer_moved(Point::new(0.3, 0.3));
        capture.click(&mut scene).unwrap();
        capture.click(&mut scene).unwrap();

        let shape = capture.in_progress().unwrap();
        assert_eq!(shape.points()[0], Point::new(0.3, 0.3));
    }

    #[test]
    fn test_mode_change_mid_capture_keeps_kind() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Line);
        let mut scene = SceneStore::new();

        capture.click(&mut scene).unwrap();
        assert_eq!(capture.mode_key("b"), CaptureOutcome::ModeChanged(ShapeKind::Box));
        capture.click(&mut scene).unwrap();
        assert_eq!(scene.get(0).unwrap().kind(), ShapeKind::Line);

        capture.click(&mut scene).unwrap();
        assert_eq!(capture.in_progress().unwrap().kind(), ShapeKind::Box);
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut capture = CaptureStateMachine::new(ShapeKind::Box);
        assert_eq!(capture.mode_key("q"), CaptureOutcome::Ignored);
        assert_eq!(capture.mode(), ShapeKind::Box);
    }

    #[test]
    fn test_cancel_discards_capture() {
        let mut capture = CaptureStateMachine::default();
        let mut scene = SceneStore::new();

        assert_eq!(capture.cancel(), CaptureOutcome::Ignored);
        capture.click(&mut scene).unwrap();
        assert_eq!(capture.cancel(), CaptureOutcome::Cancelled);
        assert!(!capture.is_capturing());
        assert!(scene.is_empty());
    }
}
