use std::sync::{Mutex, MutexGuard};

use log::{debug, trace};

use super::damage::{self, Damage};
use super::segment::Segment;
use crate::paint::PaintContext;
use crate::stroke::{Point, Stroke};

/// padding added to the near-miss circle test, in world units
const NEAR_MISS_PADDING: f64 = 0.1;

/// a segment whose endpoints are both this close (in half eraser sizes) to
/// the eraser center is dropped without looking at its points
const ENGULF_FACTOR: f64 = 1.2;

/// the square eraser footprint, inclusive on all edges
#[derive(Clone, Copy, Debug)]
struct EraserBox {
    x: f64,
    y: f64,
    half: f64,
}

impl EraserBox {
    fn contains(&self, p: &Point) -> bool {
        p.x >= self.x - self.half
            && p.x <= self.x + self.half
            && p.y >= self.y - self.half
            && p.y <= self.y + self.half
    }

    fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// result of trimming one segment against the eraser
struct PartOutcome {
    changed: bool,

    /// the segment lost every point and must leave the list
    delete: bool,

    /// extra pieces to insert right after the segment, in point order
    fragments: Vec<Segment>,
}

/// the erasable view of one stroke.
///
/// holds the surviving pieces of the stroke as a list of [`Segment`]s. the
/// list sits behind a lock that is only ever held to copy it out or swap a
/// new one in, so `draw` can run on another thread while `erase` is busy.
/// only one `erase` may be in flight at a time.
#[derive(Debug)]
pub struct EraseableStroke {
    segments: Mutex<Vec<Segment>>,

    /// fallback line width for segments without pressure
    width: f64,
}

impl EraseableStroke {
    /// one two-point segment per edge of `stroke`
    pub fn new(stroke: &Stroke) -> Self {
        let segments: Vec<Segment> = stroke
            .points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
            .collect();

        debug!(
            "eraseable stroke for {:?}: {} segments",
            stroke.id(),
            segments.len()
        );

        EraseableStroke {
            segments: Mutex::new(segments),
            width: stroke.width,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Segment>> {
        // the list is only ever replaced wholesale, so a poisoned lock
        // still guards a consistent value
        self.segments.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// a copy of the current segment list
    pub fn snapshot(&self) -> Vec<Segment> {
        self.lock().clone()
    }

    pub fn segment_count(&self) -> usize {
        self.lock().len()
    }

    /// remove everything inside the square of half side `half_eraser_size`
    /// centered on `(x, y)`.
    ///
    /// returns `damage` grown by every touched segment's bounds. `None` comes
    /// back only when `None` went in and nothing changed. an eraser without
    /// a positive size touches nothing.
    pub fn erase(
        &self,
        x: f64,
        y: f64,
        half_eraser_size: f64,
        mut damage: Option<Damage>,
    ) -> Option<Damage> {
        if half_eraser_size.is_nan() || half_eraser_size <= 0.0 {
            trace!("ignoring erase with half size {half_eraser_size}");
            return damage;
        }

        let mut parts = self.snapshot();
        let eraser = EraserBox {
            x,
            y,
            half: half_eraser_size,
        };

        let mut i = 0;
        while i < parts.len() {
            i = Self::erase_segment(&eraser, &mut parts, i, &mut damage);
        }

        *self.lock() = parts;
        damage
    }

    /// test and trim `parts[i]`, returning the index of the next segment
    /// to look at. fragments split off here are not revisited.
    fn erase_segment(
        eraser: &EraserBox,
        parts: &mut Vec<Segment>,
        i: usize,
        damage: &mut Option<Damage>,
    ) -> usize {
        let part = &parts[i];
        if part.is_dead() {
            return i + 1;
        }

        let points = part.points();
        let a = points[0];
        let b = points[points.len() - 1];
        let center = eraser.center();
        let h = eraser.half;

        let reach = h * ENGULF_FACTOR;
        if center.distance_to(&a) < reach && center.distance_to(&b) < reach {
            let bounds = part.bounds();
            damage::grow(damage, bounds.x0, bounds.y0, bounds.width(), bounds.height());
            parts.remove(i);
            trace!("segment {i} engulfed by eraser");
            return i;
        }

        let overlaps =
            eraser.contains(&a) || eraser.contains(&b) || Self::near_miss(eraser, &a, &b);
        if !overlaps {
            return i + 1;
        }

        let outcome = Self::erase_part(eraser, &mut parts[i]);
        let part = &mut parts[i];
        if outcome.changed {
            let stale = part.bounds();
            damage::grow(damage, stale.x0, stale.y0, stale.width(), stale.height());
            part.recompute_bounds();
        }

        if outcome.delete {
            parts.remove(i);
            return i;
        }

        let inserted = outcome.fragments.len();
        if inserted > 0 {
            trace!("segment {i} split into {} pieces", inserted + 1);
        }
        for (k, fragment) in outcome.fragments.into_iter().enumerate() {
            parts.insert(i + 1 + k, fragment);
        }
        i + 1 + inserted
    }

    /// the eraser center is within `h` of the line through `a` and `b`, and
    /// close enough to the segment's midpoint for the eraser to reach it.
    ///
    /// approximation: the segment is treated as a circle around its midpoint
    /// with radius half its length, and the eraser as a circle enclosing the box.
    fn near_miss(eraser: &EraserBox, a: &Point, b: &Point) -> bool {
        let len = a.distance_to(b);
        if len == 0.0 {
            return false;
        }

        let (x, y) = (eraser.x, eraser.y);
        let p = ((x - a.x) * (a.y - b.y) + (y - a.y) * (b.x - a.x)).abs() / len;
        if p > eraser.half {
            return false;
        }

        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let distance = eraser.center().distance_to(&mid) - eraser.half * std::f64::consts::SQRT_2;
        distance <= len / 2.0 + NEAR_MISS_PADDING
    }

    /// remove the points of `part` that lie in the eraser, splitting it where
    /// interior points disappear. `part` keeps the first surviving run.
    fn erase_part(eraser: &EraserBox, part: &mut Segment) -> PartOutcome {
        part.split_for(eraser.half);

        let width = part.width();
        let points = part.points_mut();
        let before = points.len();

        let lead = points.iter().take_while(|p| eraser.contains(p)).count();
        points.drain(..lead);

        let trail = points.iter().rev().take_while(|p| eraser.contains(p)).count();
        points.truncate(points.len() - trail);

        let mut runs: Vec<Vec<Point>> = Vec::new();
        let mut current = Vec::new();
        for p in points.drain(..) {
            if eraser.contains(&p) {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else {
                current.push(p);
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }

        let surviving: usize = runs.iter().map(Vec::len).sum();
        let changed = surviving != before;

        let mut runs = runs.into_iter();
        let Some(first) = runs.next() else {
            return PartOutcome {
                changed,
                delete: true,
                fragments: Vec::new(),
            };
        };

        *points = first;
        PartOutcome {
            changed,
            delete: false,
            fragments: runs.map(|run| Segment::fragment(width, run)).collect(),
        }
    }

    /// paint every surviving segment as its own sub-path
    pub fn draw(&self, ctx: &mut impl PaintContext) {
        let parts = self.snapshot();

        for part in parts.iter().filter(|p| !p.is_dead()) {
            if part.width() == Point::NO_PRESSURE {
                ctx.set_line_width(self.width);
            } else {
                ctx.set_line_width(part.width());
            }

            let points = part.points();
            ctx.move_to(points[0].x, points[0].y);
            for p in &points[1..] {
                ctx.line_to(p.x, p.y);
            }
            ctx.stroke();
        }
    }

    /// rebuild full strokes from what is left, styled like `original`.
    ///
    /// consecutive segments whose ends meet form one stroke; every gap starts
    /// a new one. an entirely erased stroke yields no strokes at all.
    pub fn reconstruct_strokes(&self, original: &Stroke) -> Vec<Stroke> {
        let parts = self.snapshot();

        let mut strokes: Vec<Stroke> = Vec::new();
        let mut last: Option<Point> = None;

        for part in parts.iter().filter(|p| !p.is_dead()) {
            let points = part.points();
            let mut a = points[0];
            let b = points[points.len() - 1];
            a.pressure = part.width();

            let continues = last.is_some_and(|l| l.equals_pos(&a));
            if !continues {
                if let (Some(stroke), Some(end)) = (strokes.last_mut(), last) {
                    stroke.add_point(end);
                }
                strokes.push(Stroke::styled_like(original));
            }
            if let Some(stroke) = strokes.last_mut() {
                stroke.add_point(a);
            }
            last = Some(b);
        }

        if let (Some(stroke), Some(end)) = (strokes.last_mut(), last) {
            stroke.add_point(end);
        }

        debug!(
            "reconstructed {:?} into {} strokes",
            original.id(),
            strokes.len()
        );
        strokes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{PaintOp, PathRecorder};
    use eframe::egui::Color32;

    fn line(points: &[(f64, f64)]) -> Stroke {
        Stroke::from_points(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            3.0,
            Color32::BLACK,
        )
    }

    #[test]
    fn builds_one_segment_per_edge() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 1.0), (3.0, 3.0)]));
        assert_eq!(e.segment_count(), 3);
        assert_eq!(EraseableStroke::new(&line(&[(0.0, 0.0)])).segment_count(), 0);
        assert_eq!(EraseableStroke::new(&line(&[])).segment_count(), 0);
    }

    #[test]
    fn engulfed_segment_is_dropped_whole() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (1.0, 0.0), (30.0, 0.0)]));
        let damage = e.erase(0.5, 0.0, 2.0, None);

        // the long edge only loses its start
        let parts = e.snapshot();
        assert_eq!(parts.len(), 1);
        assert!(parts[0].first().unwrap().x > 2.5);
        assert_eq!(parts[0].last().map(|p| p.x), Some(30.0));
        let rect = damage.unwrap().rect();
        assert!(rect.x0 <= 0.0 && rect.x1 >= 1.0);
    }

    #[test]
    fn eraser_over_endpoint_trims_the_edge() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (10.0, 0.0)]));
        e.erase(10.0, 0.0, 1.0, None);

        let parts = e.snapshot();
        assert_eq!(parts.len(), 1);
        let last = parts[0].last().unwrap();
        assert!(last.x < 9.0, "end should be cut back, got {}", last.x);
        assert_eq!(parts[0].first().map(|p| p.x), Some(0.0));
    }

    #[test]
    fn eraser_without_size_erases_nothing() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (10.0, 0.0)]));
        let before = e.snapshot();

        assert_eq!(e.erase(0.0, 0.0, 0.0, None), None);
        assert_eq!(e.erase(10.0, 0.0, -3.0, None), None);
        assert_eq!(e.erase(5.0, 0.0, f64::NAN, None), None);
        assert_eq!(e.snapshot(), before);

        let carried = Some(Damage::new(1.0, 1.0));
        assert_eq!(e.erase(0.0, 0.0, 0.0, carried), carried);
    }

    #[test]
    fn eraser_in_the_middle_splits_in_two() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (20.0, 0.0)]));
        let damage = e.erase(10.0, 0.5, 1.0, None);

        let parts = e.snapshot();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].last().unwrap().x < 9.0);
        assert!(parts[1].first().unwrap().x > 11.0);
        assert_eq!(parts[1].last().map(|p| p.x), Some(20.0));
        assert!(damage.is_some());
    }

    #[test]
    fn near_miss_needs_the_line_within_reach() {
        let eraser = EraserBox {
            x: 5.0,
            y: 0.8,
            half: 1.0,
        };
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!(EraseableStroke::near_miss(&eraser, &a, &b));

        let far = EraserBox { y: 3.0, ..eraser };
        assert!(!EraseableStroke::near_miss(&far, &a, &b));

        // on the line, but well past its end
        let beyond = EraserBox {
            x: 20.0,
            y: 0.0,
            half: 1.0,
        };
        assert!(!EraseableStroke::near_miss(&beyond, &a, &b));
        assert!(!EraseableStroke::near_miss(&eraser, &a, &a));
    }

    #[test]
    fn draw_uses_stroke_width_without_pressure() {
        let e = EraseableStroke::new(&line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]));
        let mut rec = PathRecorder::new();
        e.draw(&mut rec);

        assert_eq!(rec.stroke_count(), 2);
        assert_eq!(rec.ops[0], PaintOp::LineWidth(3.0));
        assert_eq!(rec.ops[1], PaintOp::MoveTo(0.0, 0.0));
        assert_eq!(rec.ops[2], PaintOp::LineTo(1.0, 0.0));
    }

    #[test]
    fn draw_uses_segment_pressure() {
        let stroke = Stroke::from_points(
            vec![
                Point::with_pressure(0.0, 0.0, 1.5),
                Point::with_pressure(4.0, 0.0, 2.5),
            ],
            3.0,
            Color32::BLACK,
        );
        let mut rec = PathRecorder::new();
        EraseableStroke::new(&stroke).draw(&mut rec);
        assert_eq!(rec.ops[0], PaintOp::LineWidth(1.5));
    }

    #[test]
    fn reconstruct_untouched_stroke_keeps_its_shape() {
        let original = line(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        let strokes = EraseableStroke::new(&original).reconstruct_strokes(&original);

        assert_eq!(strokes.len(), 1);
        let xy: Vec<(f64, f64)> = strokes[0].points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(xy, vec![(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        assert_eq!(strokes[0].width, 3.0);
    }

    #[test]
    fn reconstruct_carries_segment_width_as_pressure() {
        let original = Stroke::from_points(
            vec![
                Point::with_pressure(0.0, 0.0, 1.0),
                Point::with_pressure(5.0, 0.0, 2.0),
                Point::with_pressure(10.0, 0.0, 3.0),
            ],
            1.0,
            Color32::BLUE,
        );
        let strokes = EraseableStroke::new(&original).reconstruct_strokes(&original);
        let pressures: Vec<f64> = strokes[0].points.iter().map(|p| p.pressure).collect();
        assert_eq!(pressures, vec![1.0, 2.0, 3.0]);
        assert_eq!(strokes[0].color, Color32::BLUE);
    }
}
