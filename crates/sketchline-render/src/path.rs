//! Renderer that accumulates each frame into a kurbo path.

use crate::renderer::{Primitive, RenderContext, RenderError, RenderResult, Renderer};
use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;

/// Builds one `BezPath` per frame from the submitted line segments.
///
/// Vertices arrive in normalized device coordinates. With a viewport set,
/// they are mapped to pixel space (origin top-left, y down) so the path can
/// be stroked directly by a 2D backend.
#[derive(Debug, Clone)]
pub struct PathRenderer {
    transform: Affine,
    path: BezPath,
    segments: usize,
    background_color: Color,
    stroke_color: Color,
}

impl Default for PathRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PathRenderer {
    /// Renderer that keeps normalized device coordinates.
    pub fn new() -> Self {
        let ctx = RenderContext::default();
        Self {
            transform: Affine::IDENTITY,
            path: BezPath::new(),
            segments: 0,
            background_color: ctx.background_color,
            stroke_color: ctx.stroke_color,
        }
    }

    /// Renderer that maps normalized device coordinates onto a pixel viewport.
    pub fn with_viewport(viewport: Size) -> Self {
        let half_w = viewport.width / 2.0;
        let half_h = viewport.height / 2.0;
        Self {
            transform: Affine::translate((half_w, half_h))
                * Affine::scale_non_uniform(half_w, -half_h),
            ..Self::new()
        }
    }

    /// Path built for the current frame.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Line segments drawn in the current frame.
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }
}

impl Renderer for PathRenderer {
    fn begin_frame(&mut self, ctx: &RenderContext) {
        self.path = BezPath::new();
        self.segments = 0;
        self.background_color = ctx.background_color;
        self.stroke_color = ctx.stroke_color;
    }

    fn draw(&mut self, vertices: &[f64], primitive: Primitive) -> RenderResult<()> {
        match primitive {
            Primitive::Lines => {
                if vertices.len() % 4 != 0 {
                    log::warn!("Dropping vertex list with {} coordinates", vertices.len());
                    return Err(RenderError::MalformedVertexList(vertices.len()));
                }
                for segment in vertices.chunks_exact(4) {
                    self.path
                        .move_to(self.transform * Point::new(segment[0], segment[1]));
                    self.path
                        .line_to(self.transform * Point::new(segment[2], segment[3]));
                    self.segments += 1;
                }
            }
        }
        Ok(())
    }
}
