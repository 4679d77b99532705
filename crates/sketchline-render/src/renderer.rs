//! Renderer trait abstraction.

use peniko::Color;
use sketchline_core::canvas::Canvas;
use sketchline_core::shapes::Shape;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Vertex list of {0} coordinates does not describe whole line segments")]
    MalformedVertexList(usize),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Primitive topology for a vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Primitive {
    /// Every two vertices form an independent segment.
    #[default]
    Lines,
}

/// Context for a single render frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Clear color.
    pub background_color: Color,
    /// Color for every shape outline.
    pub stroke_color: Color,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            background_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_color: Color::from_rgba8(255, 255, 255, 255),
        }
    }
}

impl RenderContext {
    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the stroke color.
    pub fn with_stroke(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations own buffer upload and draw-call issuance.
pub trait Renderer {
    /// Start a new frame: clear to the background color.
    fn begin_frame(&mut self, ctx: &RenderContext);

    /// Draw a flat `[x0, y0, x1, y1, ...]` vertex list.
    fn draw(&mut self, vertices: &[f64], primitive: Primitive) -> RenderResult<()>;
}

/// What a frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    /// Shapes still missing points.
    pub skipped: usize,
}

/// Draw one frame of `canvas`: the in-progress shape, then the scene in order.
pub fn render_frame<R: Renderer + ?Sized>(
    renderer: &mut R,
    ctx: &RenderContext,
    canvas: &Canvas,
) -> RenderResult<FrameStats> {
    render_shapes(renderer, ctx, canvas.drawable_shapes())
}

/// Draw a frame from an arbitrary sequence of shapes.
///
/// Shapes that are not yet complete are skipped.
pub fn render_shapes<'a, R: Renderer + ?Sized>(
    renderer: &mut R,
    ctx: &RenderContext,
    shapes: impl IntoIterator<Item = &'a Shape>,
) -> RenderResult<FrameStats> {
    renderer.begin_frame(ctx);
    let mut stats = FrameStats::default();
    for shape in shapes {
        match shape.vertex_list() {
            Ok(vertices) => {
                renderer.draw(&vertices, Primitive::Lines)?;
                stats.drawn += 1;
            }
            Err(_) => stats.skipped += 1,
        }
    }
    Ok(stats)
}
