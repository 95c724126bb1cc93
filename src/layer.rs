use kurbo::Rect;

use crate::error::LayerError;
use crate::stroke::{Stroke, StrokeId};

/// an ordered stack of strokes. index 0 is painted first.
#[derive(Debug, Default)]
pub struct Layer {
    strokes: Vec<Stroke>,
    next_id: u64,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    fn assign_id(&mut self, stroke: &mut Stroke) {
        self.next_id += 1;
        stroke.id = StrokeId(self.next_id);
    }

    /// put a fresh stroke on top and return its id
    pub fn add_stroke(&mut self, mut stroke: Stroke) -> StrokeId {
        self.assign_id(&mut stroke);
        let id = stroke.id;
        self.strokes.push(stroke);
        id
    }

    /// insert a stroke at `pos` (clamped to the end). strokes that already
    /// carry an id from this layer keep it, so undo can find them again.
    pub fn insert_stroke(&mut self, pos: usize, mut stroke: Stroke) -> StrokeId {
        if stroke.id == StrokeId::default() {
            self.assign_id(&mut stroke);
        }
        let id = stroke.id;
        let pos = pos.min(self.strokes.len());
        self.strokes.insert(pos, stroke);
        id
    }

    pub fn remove_stroke(&mut self, id: StrokeId) -> Result<(usize, Stroke), LayerError> {
        let pos = self.index_of(id).ok_or(LayerError::StrokeNotFound(id))?;
        Ok((pos, self.strokes.remove(pos)))
    }

    pub fn index_of(&self, id: StrokeId) -> Option<usize> {
        self.strokes.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: StrokeId) -> Option<&mut Stroke> {
        self.strokes.iter_mut().find(|s| s.id == id)
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// ids of the strokes whose bounds, grown by `margin`, touch `area`
    pub fn strokes_in(&self, area: Rect, margin: f64) -> Vec<StrokeId> {
        self.strokes
            .iter()
            .filter(|s| {
                s.bounds().is_some_and(|b| {
                    let b = b.inflate(margin, margin);
                    b.x0 <= area.x1 && area.x0 <= b.x1 && b.y0 <= area.y1 && area.y0 <= b.y1
                })
            })
            .map(|s| s.id)
            .collect()
    }
}
