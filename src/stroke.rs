use eframe::egui::Color32;
use kurbo::{Point as KPoint, Rect};

use crate::eraser::EraseableStroke;
use crate::paint::PaintContext;

/// a single sample of a stroke: position plus pen pressure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,

    /// pen pressure, or [`Point::NO_PRESSURE`] for mouse input
    pub pressure: f64,
}

impl Point {
    pub const NO_PRESSURE: f64 = -1.0;

    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            pressure: Self::NO_PRESSURE,
        }
    }

    pub fn with_pressure(x: f64, y: f64, pressure: f64) -> Self {
        Point { x, y, pressure }
    }

    pub fn has_pressure(&self) -> bool {
        self.pressure != Self::NO_PRESSURE
    }

    /// same location, pressure is ignored
    pub fn equals_pos(&self, other: &Point) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// the point `length` units away from `self`, heading towards `other`.
    /// the result carries no pressure.
    pub fn line_to(&self, other: &Point, length: f64) -> Point {
        let full = self.distance_to(other);
        if full == 0.0 {
            return Point::new(self.x, self.y);
        }
        let factor = length / full;
        Point::new(
            self.x + (other.x - self.x) * factor,
            self.y + (other.y - self.y) * factor,
        )
    }

    pub fn to_kurbo(self) -> KPoint {
        KPoint::new(self.x, self.y)
    }
}

impl From<KPoint> for Point {
    fn from(p: KPoint) -> Self {
        Point::new(p.x, p.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolType {
    #[default]
    Pen,
    Highlighter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed {
        dash: f64,
        gap: f64,
    },
    Dotted {
        spacing: f64,
    },
}

/// identifier handed out by the [`crate::layer::Layer`] a stroke lives in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(pub u64);

#[derive(Debug)]
pub struct Stroke {
    pub(crate) id: StrokeId,

    /// the sampled polyline, in world coordinates
    pub points: Vec<Point>,

    /// line width used wherever a point carries no pressure
    pub width: f64,

    pub color: Color32,
    pub tool_type: ToolType,
    pub line_style: LineStyle,

    // present only while an erase gesture is touching this stroke
    eraseable: Option<EraseableStroke>,
}

impl Stroke {
    pub fn new(width: f64, color: Color32) -> Self {
        Stroke {
            id: StrokeId::default(),
            points: Vec::new(),
            width,
            color,
            tool_type: ToolType::default(),
            line_style: LineStyle::default(),
            eraseable: None,
        }
    }

    /// an empty stroke with the same styling as `other`
    pub fn styled_like(other: &Stroke) -> Self {
        Stroke {
            tool_type: other.tool_type,
            line_style: other.line_style,
            ..Stroke::new(other.width, other.color)
        }
    }

    pub fn from_points(points: Vec<Point>, width: f64, color: Color32) -> Self {
        Stroke {
            points,
            ..Stroke::new(width, color)
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn add_point(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// bounding box of the polyline, `None` for a stroke without points
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        let start = Rect::from_points(first.to_kurbo(), first.to_kurbo());
        Some(rest.iter().fold(start, |r, p| r.union_pt(p.to_kurbo())))
    }

    /// the erase engine bound to this stroke, built on first use
    pub fn eraseable(&mut self) -> &EraseableStroke {
        let engine = match self.eraseable.take() {
            Some(engine) => engine,
            None => EraseableStroke::new(self),
        };
        self.eraseable.insert(engine)
    }

    pub fn is_being_erased(&self) -> bool {
        self.eraseable.is_some()
    }

    pub fn take_eraseable(&mut self) -> Option<EraseableStroke> {
        self.eraseable.take()
    }

    /// paint the stroke. while an erase gesture is in progress the engine's
    /// surviving geometry is drawn instead of the original polyline.
    pub fn draw(&self, ctx: &mut impl PaintContext) {
        if let Some(eraseable) = &self.eraseable {
            eraseable.draw(ctx);
            return;
        }

        let Some((first, rest)) = self.points.split_first() else {
            return;
        };
        if rest.is_empty() {
            return;
        }

        // pressure strokes change width per edge, plain strokes are one path
        if first.has_pressure() {
            for pair in self.points.windows(2) {
                ctx.set_line_width(pair[0].pressure);
                ctx.move_to(pair[0].x, pair[0].y);
                ctx.line_to(pair[1].x, pair[1].y);
                ctx.stroke();
            }
        } else {
            ctx.set_line_width(self.width);
            ctx.move_to(first.x, first.y);
            for p in rest {
                ctx.line_to(p.x, p.y);
            }
            ctx.stroke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equals_pos_ignores_pressure() {
        let a = Point::with_pressure(1.0, 2.0, 0.5);
        let b = Point::new(1.0, 2.0);
        assert!(a.equals_pos(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn line_to_walks_towards_target() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let p = a.line_to(&b, 2.5);
        assert_eq!(p.x, 2.5);
        assert_eq!(p.y, 0.0);
        assert!(!p.has_pressure());
    }

    #[test]
    fn bounds_cover_all_points() {
        let stroke = Stroke::from_points(
            vec![Point::new(3.0, 4.0), Point::new(-1.0, 8.0), Point::new(2.0, 0.0)],
            2.0,
            Color32::BLACK,
        );
        let r = stroke.bounds().unwrap();
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (-1.0, 0.0, 3.0, 8.0));
        assert!(Stroke::new(1.0, Color32::BLACK).bounds().is_none());
    }

    #[test]
    fn styled_like_copies_styling_only() {
        let mut original = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            4.0,
            Color32::RED,
        );
        original.tool_type = ToolType::Highlighter;
        original.line_style = LineStyle::Dashed { dash: 3.0, gap: 1.0 };

        let copy = Stroke::styled_like(&original);
        assert!(copy.points.is_empty());
        assert_eq!(copy.width, 4.0);
        assert_eq!(copy.color, Color32::RED);
        assert_eq!(copy.tool_type, ToolType::Highlighter);
        assert_eq!(copy.line_style, original.line_style);
    }
}
