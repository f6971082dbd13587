//! Canvas operations on top of an abstract 2D drawing surface.
//!
//! The surface itself (a browser canvas, a window, a pixel buffer) is
//! supplied by the embedding application through [`Surface`]. This module
//! owns only the two operations the protocol needs, with the constants
//! every client must agree on.

use serde::{Deserialize, Serialize};

use crate::message::{Color, Point};

// ── Surface ──────────────────────────────────────────────────────

/// The subset of a 2D canvas API the drawing core relies on.
pub trait Surface {
    fn set_fill_style(&mut self, color: Color);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, color: Color);
    fn stroke(&mut self);
    fn close_path(&mut self);
}

// ── CanvasConfig ─────────────────────────────────────────────────

/// Logical canvas geometry and the fixed stroke parameters.
///
/// `line_width` is not carried by messages, so all clients sharing a
/// topic must use the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: f64,
    pub background: Color,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 5000,
            height: 5000,
            line_width: 15.0,
            background: Color::BACKGROUND,
        }
    }
}

// ── Operations ───────────────────────────────────────────────────

/// Fill the whole logical canvas with the background color.
pub fn clear<S: Surface + ?Sized>(surface: &mut S, config: &CanvasConfig) {
    surface.set_fill_style(config.background);
    surface.fill_rect(0.0, 0.0, f64::from(config.width), f64::from(config.height));
}

/// Stroke one straight segment with the configured line width.
pub fn render_line<S: Surface + ?Sized>(
    surface: &mut S,
    config: &CanvasConfig,
    color: Color,
    from: Point,
    to: Point,
) {
    surface.begin_path();
    surface.move_to(from);
    surface.line_to(to);
    surface.set_line_width(config.line_width);
    surface.set_stroke_style(color);
    surface.stroke();
    surface.close_path();
}

// ── Recorder ─────────────────────────────────────────────────────

/// One call made against a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceOp {
    SetFillStyle(Color),
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    SetLineWidth(f64),
    SetStrokeStyle(Color),
    Stroke,
    ClosePath,
}

/// A segment as it was actually stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub from: Point,
    pub to: Point,
}

/// A [`Surface`] that keeps a log of every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    ops: Vec<SurfaceOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }

    /// Number of full-size background fills seen so far.
    pub fn clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::FillRect { x, y, .. } if *x == 0.0 && *y == 0.0))
            .count()
    }

    /// Replay the log and list every stroked segment with the style that
    /// was active when `stroke` was called.
    pub fn strokes(&self) -> Vec<Stroke> {
        let mut out = Vec::new();
        let mut color = Color::BLACK;
        let mut width = 1.0;
        let mut path: Vec<Point> = Vec::new();

        for op in &self.ops {
            match *op {
                SurfaceOp::BeginPath => path.clear(),
                SurfaceOp::MoveTo(p) => path = vec![p],
                SurfaceOp::LineTo(p) => path.push(p),
                SurfaceOp::SetLineWidth(w) => width = w,
                SurfaceOp::SetStrokeStyle(c) => color = c,
                SurfaceOp::Stroke => out.extend(path.windows(2).map(|seg| Stroke {
                    color,
                    width,
                    from: seg[0],
                    to: seg[1],
                })),
                SurfaceOp::SetFillStyle(_) | SurfaceOp::FillRect { .. } | SurfaceOp::ClosePath => {}
            }
        }
        out
    }
}

impl Surface for Recorder {
    fn set_fill_style(&mut self, color: Color) {
        self.ops.push(SurfaceOp::SetFillStyle(color));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(SurfaceOp::FillRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.ops.push(SurfaceOp::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.ops.push(SurfaceOp::LineTo(p));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(SurfaceOp::SetLineWidth(width));
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.ops.push(SurfaceOp::SetStrokeStyle(color));
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }
}
