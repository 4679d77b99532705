//! Sketchline Render Library
//!
//! Renderer abstraction and the per-frame drawing routine. Backends receive
//! flat line-segment vertex lists in normalized device coordinates.

mod path;
mod renderer;

pub use path::PathRenderer;
pub use renderer::{
    FrameStats, Primitive, RenderContext, RenderError, RenderResult, Renderer, render_frame,
    render_shapes,
};
