use glam::Mat4;
use kinetic_model::{FillRule, GradientStop, LineCap, LineJoin, Rgba, Vector2D};
use lyon_path::Path;

/// What a shape is filled or stroked with, sampled at a single frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Brush {
    Solid(Rgba),
    LinearGradient {
        start: Vector2D,
        end: Vector2D,
        stops: Vec<GradientStop>,
    },
    RadialGradient {
        start: Vector2D,
        end: Vector2D,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintStyle {
    Fill {
        rule: FillRule,
    },
    Stroke {
        width: f32,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
        dashes: Option<Vec<f32>>,
    },
}

/// A fully sampled paint: brush, style, and the alpha accumulated down the
/// group and layer hierarchy, in `[0,1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub brush: Brush,
    pub style: PaintStyle,
    pub alpha: f32,
}

/// Drawing surface for one evaluated frame. Implementations receive
/// geometry in shape-local coordinates with the accumulated transform
/// alongside.
pub trait Canvas {
    fn draw(&mut self, path: &Path, paint: &Paint, transform: Mat4);
}

/// A canvas that records every draw call, for inspection in tests and
/// headless pipelines.
#[derive(Default)]
pub struct RecordingCanvas {
    pub calls: Vec<(Path, Paint, Mat4)>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        RecordingCanvas::default()
    }
}

impl Canvas for RecordingCanvas {
    fn draw(&mut self, path: &Path, paint: &Paint, transform: Mat4) {
        self.calls.push((path.clone(), paint.clone(), transform));
    }
}
