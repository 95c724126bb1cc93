use kurbo::{Point, Rect};

/// the region an erase call touched and that needs repainting.
///
/// grows monotonically. a damage handed back from one `erase` call can be
/// passed into the next one to collect a whole gesture into a single repaint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Damage {
    rect: Rect,
}

impl Damage {
    /// a zero-sized damage at `(x, y)`
    pub fn new(x: f64, y: f64) -> Self {
        Damage {
            rect: Rect::from_points((x, y), (x, y)),
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.rect = self.rect.union_pt(Point::new(x, y));
    }

    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.add_point(x, y);
        self.add_point(x + width, y + height);
    }

    pub fn union(&mut self, other: &Damage) {
        self.rect = self.rect.union(other.rect);
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.rect.x0 && x <= self.rect.x1 && y >= self.rect.y0 && y <= self.rect.y1
    }
}

/// grow `damage` by a `width` x `height` box at `(x, y)`, allocating it if needed
pub(crate) fn grow(damage: &mut Option<Damage>, x: f64, y: f64, width: f64, height: f64) {
    match damage {
        Some(d) => d.add_rect(x, y, width, height),
        None => {
            let mut d = Damage::new(x, y);
            d.add_point(x + width, y + height);
            *damage = Some(d);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_from_a_single_point() {
        let mut d = Damage::new(5.0, 5.0);
        assert_eq!(d.rect().area(), 0.0);
        d.add_point(1.0, 7.0);
        assert_eq!(d.rect(), Rect::new(1.0, 5.0, 5.0, 7.0));
        assert!(d.contains(3.0, 6.0));
        assert!(!d.contains(6.0, 6.0));
    }

    #[test]
    fn grow_allocates_when_missing() {
        let mut damage = None;
        grow(&mut damage, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(damage.map(|d| d.rect()), Some(Rect::new(1.0, 2.0, 4.0, 6.0)));

        grow(&mut damage, -1.0, 0.0, 0.0, 0.0);
        assert_eq!(damage.map(|d| d.rect()), Some(Rect::new(-1.0, 0.0, 4.0, 6.0)));
    }

    #[test]
    fn union_merges_both_boxes() {
        let mut a = Damage::new(0.0, 0.0);
        a.add_point(1.0, 1.0);
        let mut b = Damage::new(10.0, 10.0);
        b.add_point(12.0, 11.0);
        a.union(&b);
        assert_eq!(a.rect(), Rect::new(0.0, 0.0, 12.0, 11.0));
    }
}
