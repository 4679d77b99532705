//! Sketchline Core Library
//!
//! Shape capture, the committed scene and synchronization with the remote
//! shape store. Rendering and windowing live outside this crate.

pub mod canvas;
pub mod capture;
pub mod config;
pub mod input;
pub mod scene;
pub mod shapes;
pub mod sync;

pub use canvas::Canvas;
pub use capture::{CaptureOutcome, CaptureStateMachine};
pub use config::{ConfigError, SyncConfig};
pub use input::{CanvasGeometry, InputEvent};
pub use scene::SceneStore;
pub use shapes::{Shape, ShapeError, ShapeFactory, ShapeId, ShapeKind, ShapeTrait};
pub use sync::{
    HttpRemote, LoadReport, MemoryRemote, PushReport, RemoteStore, SyncControls, SyncError,
    SyncService,
};
