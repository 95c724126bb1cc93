/// the minimal path-drawing capability strokes and erase engines paint through.
///
/// implementations decide the visual details (cap style, dash pattern, color),
/// callers only describe geometry and line width.
pub trait PaintContext {
    fn set_line_width(&mut self, width: f64);

    /// start a new sub-path at `(x, y)`
    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// stroke the current path and clear it
    fn stroke(&mut self);
}

/// a single recorded paint command, see [`PathRecorder`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    LineWidth(f64),
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

/// a [`PaintContext`] that just remembers what it was asked to do.
/// handy for hit previews and tests.
#[derive(Clone, Debug, Default)]
pub struct PathRecorder {
    pub ops: Vec<PaintOp>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// number of `stroke` calls seen so far
    pub fn stroke_count(&self) -> usize {
        self.ops.iter().filter(|op| **op == PaintOp::Stroke).count()
    }
}

impl PaintContext for PathRecorder {
    fn set_line_width(&mut self, width: f64) {
        self.ops.push(PaintOp::LineWidth(width));
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(PaintOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(PaintOp::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.ops.push(PaintOp::Stroke);
    }
}
