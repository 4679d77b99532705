//! Synchronization of the scene with the remote shape store.
//!
//! `push` saves every dirty shape, one request at a time and in scene order.
//! Each shape's dirty flag reflects only its own request outcome. `pull`
//! appends an owner's stored shapes, skipping records it cannot rebuild.
//! Nothing is retried automatically; the controls tell the host layer when a
//! user-triggered retry makes sense.

mod http;
mod memory;

pub use http::HttpRemote;
pub use memory::MemoryRemote;

use crate::scene::SceneStore;
use crate::shapes::{Shape, ShapeError, ShapeId, ShapeKind};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Sync errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Remote store responded with status {0}")]
    Status(u16),
    #[error("Invalid response: {0}")]
    Decode(String),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Boxed future for remote operations (executor-agnostic).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Body of a save request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    /// Flattened `[x0, y0, x1, y1, ...]`.
    pub points: Vec<f64>,
    pub user_id: String,
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape, owner_id: &str) -> Self {
        Self {
            kind: shape.kind().as_str().to_string(),
            points: shape.flattened_points(),
            user_id: owner_id.to_string(),
        }
    }
}

/// A shape as returned by the load endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredShape {
    #[serde(rename = "type")]
    pub kind: String,
    pub points: Vec<f64>,
}

impl StoredShape {
    /// Rebuild a clean (already persisted) shape from this record.
    pub fn to_shape(&self) -> Result<Shape, ShapeError> {
        let kind: ShapeKind = self.kind.parse()?;
        Shape::from_flat(kind, &self.points)
    }
}

impl From<ShapeRecord> for StoredShape {
    fn from(record: ShapeRecord) -> Self {
        Self {
            kind: record.kind,
            points: record.points,
        }
    }
}

/// Body of a successful login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: String,
}

/// A remote store for shapes.
///
/// Implementations can talk HTTP or keep everything in memory.
pub trait RemoteStore {
    /// Persist one shape.
    fn save_shape(&self, record: &ShapeRecord) -> BoxFuture<'_, SyncResult<()>>;

    /// Fetch every shape saved by `owner_id`, in save order.
    fn load_shapes(&self, owner_id: &str) -> BoxFuture<'_, SyncResult<Vec<StoredShape>>>;
}

/// Enablement of the user-facing save and load controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncControls {
    /// The scene holds a dirty shape (newly committed or from a failed save).
    pub save_armed: bool,
    /// Loading is available (not yet loaded, or the last load failed).
    pub load_armed: bool,
}

/// A shape that failed to save during a push pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PushFailure {
    pub index: usize,
    pub id: ShapeId,
    pub error: SyncError,
}

/// Outcome of a push pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PushReport {
    /// Save requests issued.
    pub attempted: usize,
    /// Requests that succeeded.
    pub saved: usize,
    pub failures: Vec<PushFailure>,
}

impl PushReport {
    /// At least one shape is still dirty because its save failed.
    pub fn retry_needed(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// A loaded record that could not be turned into a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the response.
    pub position: usize,
    pub kind: String,
    pub error: ShapeError,
}

/// Outcome of a successful pull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Pushes dirty shapes to, and pulls saved shapes from, a remote store.
pub struct SyncService<R: RemoteStore> {
    remote: R,
    owner_id: String,
    load_armed: bool,
}

impl<R: RemoteStore> SyncService<R> {
    /// Create a sync service acting for `owner_id`.
    pub fn new(remote: R, owner_id: impl Into<String>) -> Self {
        Self {
            remote,
            owner_id: owner_id.into(),
            load_armed: true,
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Current enablement of the save/load controls.
    ///
    /// Saving is armed exactly when `scene` holds a dirty shape, so a commit
    /// or a failed save arms it without any extra bookkeeping.
    pub fn controls(&self, scene: &SceneStore) -> SyncControls {
        SyncControls {
            save_armed: scene.has_dirty(),
            load_armed: self.load_armed,
        }
    }

    /// Save every dirty shape in scene order, one request at a time.
    ///
    /// Successful saves clear the shape's dirty flag; failed saves leave it
    /// set. A failure never stops the pass.
    pub async fn push(&mut self, scene: &mut SceneStore) -> PushReport {
        let mut report = PushReport::default();

        for index in scene.dirty_indices() {
            let Some(shape) = scene.get(index) else {
                continue;
            };
            let id = shape.id();
            let record = ShapeRecord::from_shape(shape, &self.owner_id);
            report.attempted += 1;

            match self.remote.save_shape(&record).await {
                Ok(()) => {
                    scene.mark_persisted(index);
                    report.saved += 1;
                    log::debug!("Saved {} {}", record.kind, id);
                }
                Err(error) => {
                    scene.mark_dirty(index);
                    log::warn!("Failed to save {} {}: {}", record.kind, id, error);
                    report.failures.push(PushFailure { index, id, error });
                }
            }
        }

        log::info!(
            "Save pass: {} of {} shapes saved, {} failed",
            report.saved,
            report.attempted,
            report.failures.len()
        );
        report
    }

    /// Append the owner's stored shapes to the scene as clean shapes.
    ///
    /// Records with an unknown type or malformed points are skipped. If the
    /// request itself fails the scene is left untouched.
    pub async fn pull(&mut self, scene: &mut SceneStore) -> SyncResult<LoadReport> {
        let records = match self.remote.load_shapes(&self.owner_id).await {
            Ok(records) => records,
            Err(error) => {
                log::warn!("Failed to load shapes for {}: {}", self.owner_id, error);
                self.load_armed = true;
                return Err(error);
            }
        };

        let mut report = LoadReport::default();
        for (position, record) in records.into_iter().enumerate() {
            match record.to_shape() {
                Ok(shape) => {
                    scene.append(shape);
                    report.loaded += 1;
                }
                Err(error) => {
                    log::warn!("Skipping stored shape {} ({}): {}", position, record.kind, error);
                    report.skipped.push(SkippedRecord {
                        position,
                        kind: record.kind,
                        error,
                    });
                }
            }
        }

        self.load_armed = false;
        log::info!(
            "Loaded {} shapes for {} ({} skipped)",
            report.loaded,
            self.owner_id,
            report.skipped.len()
        );
        Ok(report)
    }
}
