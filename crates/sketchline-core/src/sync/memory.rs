//! In-memory remote store.

use super::{BoxFuture, RemoteStore, ShapeRecord, StoredShape, SyncError, SyncResult};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory remote store for testing and offline use.
///
/// Individual save calls (numbered from zero) and all loads can be made to
/// fail with a 500 status.
#[derive(Default)]
pub struct MemoryRemote {
    shapes: RwLock<HashMap<String, Vec<StoredShape>>>,
    save_calls: AtomicUsize,
    failing_saves: RwLock<HashSet<usize>>,
    fail_loads: AtomicBool,
}

impl MemoryRemote {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `call`-th save request (zero-based) fail.
    pub fn fail_save_call(&self, call: usize) {
        if let Ok(mut failing) = self.failing_saves.write() {
            failing.insert(call);
        }
    }

    /// Make every load fail (or succeed again).
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Seed a stored shape for `owner_id`.
    pub fn insert(&self, owner_id: &str, shape: StoredShape) {
        if let Ok(mut shapes) = self.shapes.write() {
            shapes.entry(owner_id.to_string()).or_default().push(shape);
        }
    }

    /// Everything stored for `owner_id`.
    pub fn shapes_for(&self, owner_id: &str) -> Vec<StoredShape> {
        self.shapes
            .read()
            .ok()
            .and_then(|shapes| shapes.get(owner_id).cloned())
            .unwrap_or_default()
    }

    /// Number of save requests received, including failed ones.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

impl RemoteStore for MemoryRemote {
    fn save_shape(&self, record: &ShapeRecord) -> BoxFuture<'_, SyncResult<()>> {
        let record = record.clone();
        Box::pin(async move {
            let call = self.save_calls.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .failing_saves
                .read()
                .map_err(|e| SyncError::Transport(format!("Lock error: {}", e)))?
                .contains(&call);
            if failing {
                return Err(SyncError::Status(500));
            }

            let mut shapes = self
                .shapes
                .write()
                .map_err(|e| SyncError::Transport(format!("Lock error: {}", e)))?;
            shapes
                .entry(record.user_id.clone())
                .or_default()
                .push(record.into());
            Ok(())
        })
    }

    fn load_shapes(&self, owner_id: &str) -> BoxFuture<'_, SyncResult<Vec<StoredShape>>> {
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            if self.fail_loads.load(Ordering::SeqCst) {
                return Err(SyncError::Status(500));
            }
            let shapes = self
                .shapes
                .read()
                .map_err(|e| SyncError::Transport(format!("Lock error: {}", e)))?;
            Ok(shapes.get(&owner_id).cloned().unwrap_or_default())
        })
    }
}
