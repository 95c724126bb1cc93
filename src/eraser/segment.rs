use kurbo::Rect;

use crate::stroke::Point;

/// a run of consecutive points cut out of the original stroke.
///
/// starts life as one edge of the stroke (two points) and is subdivided,
/// trimmed and split as the eraser passes over it. the cached `bounds` always
/// match the current points once `recompute_bounds` has run.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    points: Vec<Point>,

    /// pressure of the edge's first point, or `Point::NO_PRESSURE`
    width: f64,

    bounds: Rect,

    /// the half eraser size this segment was last subdivided for
    split_size: Option<f64>,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        let mut segment = Segment {
            points: vec![a, b],
            width: a.pressure,
            bounds: Rect::ZERO,
            split_size: None,
        };
        segment.recompute_bounds();
        segment
    }

    /// an empty segment, used as the template for split fragments
    pub fn with_width(width: f64) -> Self {
        Segment {
            points: Vec::new(),
            width,
            bounds: Rect::ZERO,
            split_size: None,
        }
    }

    pub(crate) fn fragment(width: f64, points: Vec<Point>) -> Self {
        let mut segment = Segment::with_width(width);
        segment.points = points;
        segment.recompute_bounds();
        segment
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// fewer than two points: nothing left to draw or rebuild from
    pub fn is_dead(&self) -> bool {
        self.points.len() < 2
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn recompute_bounds(&mut self) {
        let Some((first, rest)) = self.points.split_first() else {
            self.bounds = Rect::ZERO;
            return;
        };

        let (mut x0, mut y0) = (first.x, first.y);
        let (mut x1, mut y1) = (x0, y0);
        for p in rest {
            x0 = x0.min(p.x);
            x1 = x1.max(p.x);
            y0 = y0.min(p.y);
            y1 = y1.max(p.y);
        }
        self.bounds = Rect::new(x0, y0, x1, y1);
    }

    /// subdivide the straight span between the endpoints so that points lie
    /// `half_eraser_size / 2` apart. no-op when already split for this size,
    /// when the span is no longer than `half_eraser_size`, or when the size
    /// is not positive.
    pub fn split_for(&mut self, half_eraser_size: f64) {
        if half_eraser_size.is_nan() || half_eraser_size <= 0.0 {
            return;
        }
        if self.split_size == Some(half_eraser_size) {
            return;
        }
        self.split_size = Some(half_eraser_size);

        if self.points.len() < 2 {
            return;
        }
        let (a, b) = (self.points[0], self.points[self.points.len() - 1]);

        let len = a.distance_to(&b);
        if len <= half_eraser_size {
            return;
        }

        let step = half_eraser_size / 2.0;
        let mut filled = Vec::with_capacity((len / step) as usize + 2);
        filled.push(a);

        let mut remaining = len - step;
        let mut interior = Vec::new();
        while remaining > step {
            interior.push(a.line_to(&b, remaining));
            remaining -= step;
        }
        filled.extend(interior.into_iter().rev());
        filled.push(b);

        self.points = filled;
        self.recompute_bounds();
    }
}
