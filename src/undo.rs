use log::debug;

use crate::eraser::EraseableStroke;
use crate::error::LayerError;
use crate::layer::Layer;
use crate::stroke::{Stroke, StrokeId};

/// where a stroke sat in its layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PosEntry {
    pub id: StrokeId,
    pub pos: usize,
}

/// one eraser gesture, replayable in both directions.
///
/// while the gesture runs, every stroke the eraser touches is recorded as an
/// original. `finalize` swaps those for the strokes rebuilt from their erase
/// engines. afterwards the action owns whichever set is not in the layer.
#[derive(Debug, Default)]
pub struct EraseUndoAction {
    /// sorted by position
    original: Vec<PosEntry>,
    edited: Vec<PosEntry>,

    stash: Vec<Stroke>,

    finalized: bool,
    undone: bool,
}

impl EraseUndoAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &'static str {
        "Erase stroke"
    }

    /// remember a stroke touched by the eraser. repeated calls for the same
    /// stroke are ignored.
    pub fn add_original(&mut self, id: StrokeId, pos: usize) {
        if self.contains_original(id) {
            return;
        }
        let at = self.original.partition_point(|e| e.pos <= pos);
        self.original.insert(at, PosEntry { id, pos });
    }

    pub fn contains_original(&self, id: StrokeId) -> bool {
        self.original.iter().any(|e| e.id == id)
    }

    pub fn originals(&self) -> &[PosEntry] {
        &self.original
    }

    pub fn edited(&self) -> &[PosEntry] {
        &self.edited
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn is_undone(&self) -> bool {
        self.undone
    }

    /// replace every recorded original with its reconstructed pieces, placed
    /// where the original was. the erase engines are dropped here.
    ///
    /// strokes without any points are left alone and forgotten by the action.
    /// if an original is missing from the layer nothing is changed.
    pub fn finalize(&mut self, layer: &mut Layer) -> Result<(), LayerError> {
        if self.finalized {
            return Err(LayerError::AlreadyFinalized);
        }
        if let Some(missing) = self.original.iter().find(|e| layer.get(e.id).is_none()) {
            return Err(LayerError::StrokeNotFound(missing.id));
        }

        let mut kept = Vec::with_capacity(self.original.len());
        for entry in std::mem::take(&mut self.original) {
            let stroke = layer
                .get_mut(entry.id)
                .ok_or(LayerError::StrokeNotFound(entry.id))?;

            if stroke.point_count() == 0 {
                stroke.take_eraseable();
                debug!("skipping empty stroke {:?} on finalize", entry.id);
                continue;
            }

            let (mut pos, mut original) = layer.remove_stroke(entry.id)?;
            let engine = match original.take_eraseable() {
                Some(engine) => engine,
                None => EraseableStroke::new(&original),
            };
            let rebuilt = engine.reconstruct_strokes(&original);

            for stroke in rebuilt {
                let id = layer.insert_stroke(pos, stroke);
                self.edited.push(PosEntry { id, pos });
                pos += 1;
            }

            self.stash.push(original);
            kept.push(entry);
        }

        debug!(
            "erase finalized: {} originals, {} edited strokes",
            kept.len(),
            self.edited.len()
        );
        self.original = kept;
        self.finalized = true;
        Ok(())
    }

    pub fn undo(&mut self, layer: &mut Layer) -> Result<(), LayerError> {
        if !self.finalized {
            return Err(LayerError::NotFinalized);
        }
        if self.undone {
            return Ok(());
        }

        Self::swap(layer, &mut self.stash, &self.edited, &self.original)?;
        self.undone = true;
        Ok(())
    }

    pub fn redo(&mut self, layer: &mut Layer) -> Result<(), LayerError> {
        if !self.finalized {
            return Err(LayerError::NotFinalized);
        }
        if !self.undone {
            return Ok(());
        }

        Self::swap(layer, &mut self.stash, &self.original, &self.edited)?;
        self.undone = false;
        Ok(())
    }

    /// take `remove` out of the layer into the stash, then put the stashed
    /// strokes listed in `insert` back at their positions. layer and stash
    /// are left untouched when a stroke on either side is missing.
    fn swap(
        layer: &mut Layer,
        stash: &mut Vec<Stroke>,
        remove: &[PosEntry],
        insert: &[PosEntry],
    ) -> Result<(), LayerError> {
        if let Some(missing) = remove.iter().find(|e| layer.get(e.id).is_none()) {
            return Err(LayerError::StrokeNotFound(missing.id));
        }
        if let Some(missing) = insert
            .iter()
            .find(|e| !stash.iter().any(|s| s.id() == e.id))
        {
            return Err(LayerError::StrokeNotFound(missing.id));
        }

        let mut incoming = std::mem::take(stash);

        for entry in remove {
            let (_, stroke) = layer.remove_stroke(entry.id)?;
            stash.push(stroke);
        }

        for entry in insert {
            let at = incoming
                .iter()
                .position(|s| s.id() == entry.id)
                .ok_or(LayerError::StrokeNotFound(entry.id))?;
            layer.insert_stroke(entry.pos, incoming.swap_remove(at));
        }
        Ok(())
    }
}

/// finalized erase actions, newest last
#[derive(Debug, Default)]
pub struct History {
    undo: Vec<EraseUndoAction>,
    redo: Vec<EraseUndoAction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: EraseUndoAction) {
        self.undo.push(action);
        self.redo.clear();
    }

    /// any other edit invalidates what could be redone
    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// returns false when there was nothing to undo
    pub fn undo(&mut self, layer: &mut Layer) -> Result<bool, LayerError> {
        let Some(mut action) = self.undo.pop() else {
            return Ok(false);
        };
        if let Err(e) = action.undo(layer) {
            self.undo.push(action);
            return Err(e);
        }
        self.redo.push(action);
        Ok(true)
    }

    pub fn redo(&mut self, layer: &mut Layer) -> Result<bool, LayerError> {
        let Some(mut action) = self.redo.pop() else {
            return Ok(false);
        };
        if let Err(e) = action.redo(layer) {
            self.redo.push(action);
            return Err(e);
        }
        self.undo.push(action);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::Point;
    use eframe::egui::Color32;

    fn horizontal(y: f64) -> Stroke {
        Stroke::from_points(
            vec![Point::new(0.0, y), Point::new(10.0, y), Point::new(20.0, y)],
            2.0,
            Color32::BLACK,
        )
    }

    fn ys(layer: &Layer) -> Vec<f64> {
        layer.strokes().iter().map(|s| s.points[0].y).collect()
    }

    /// erase the middle of the stroke at `id`, the way the eraser tool does
    fn erase_middle(layer: &mut Layer, action: &mut EraseUndoAction, id: StrokeId) {
        let pos = layer.index_of(id).unwrap();
        action.add_original(id, pos);
        let stroke = layer.get_mut(id).unwrap();
        let y = stroke.points[0].y;
        stroke.eraseable().erase(10.0, y, 1.0, None);
    }

    #[test]
    fn add_original_keeps_position_order() {
        let mut action = EraseUndoAction::new();
        action.add_original(StrokeId(3), 5);
        action.add_original(StrokeId(1), 2);
        action.add_original(StrokeId(3), 5);
        let order: Vec<usize> = action.originals().iter().map(|e| e.pos).collect();
        assert_eq!(order, vec![2, 5]);
    }

    #[test]
    fn finalize_replaces_original_in_place() {
        let mut layer = Layer::new();
        layer.add_stroke(horizontal(0.0));
        let middle = layer.add_stroke(horizontal(5.0));
        layer.add_stroke(horizontal(9.0));

        let mut action = EraseUndoAction::new();
        erase_middle(&mut layer, &mut action, middle);
        action.finalize(&mut layer).unwrap();

        assert_eq!(ys(&layer), vec![0.0, 5.0, 5.0, 9.0]);
        assert_eq!(action.edited().len(), 2);
        assert!(layer.get(middle).is_none());
        assert!(layer.strokes().iter().all(|s| !s.is_being_erased()));
        assert_eq!(action.finalize(&mut layer), Err(LayerError::AlreadyFinalized));
    }

    #[test]
    fn undo_and_redo_swap_strokes() {
        let mut layer = Layer::new();
        let first = layer.add_stroke(horizontal(0.0));
        layer.add_stroke(horizontal(5.0));
        let last = layer.add_stroke(horizontal(9.0));

        let mut action = EraseUndoAction::new();
        erase_middle(&mut layer, &mut action, first);
        erase_middle(&mut layer, &mut action, last);
        action.finalize(&mut layer).unwrap();
        assert_eq!(ys(&layer), vec![0.0, 0.0, 5.0, 9.0, 9.0]);

        let mut history = History::new();
        history.push(action);

        assert!(history.undo(&mut layer).unwrap());
        assert_eq!(ys(&layer), vec![0.0, 5.0, 9.0]);
        assert_eq!(layer.index_of(first), Some(0));
        assert_eq!(layer.index_of(last), Some(2));
        assert!(!history.undo(&mut layer).unwrap());

        assert!(history.redo(&mut layer).unwrap());
        assert_eq!(ys(&layer), vec![0.0, 0.0, 5.0, 9.0, 9.0]);
        assert!(layer.get(first).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn empty_stroke_is_skipped_on_finalize() {
        let mut layer = Layer::new();
        let empty = layer.add_stroke(Stroke::new(1.0, Color32::BLACK));

        let mut action = EraseUndoAction::new();
        action.add_original(empty, 0);
        layer.get_mut(empty).unwrap().eraseable();
        action.finalize(&mut layer).unwrap();

        assert_eq!(layer.index_of(empty), Some(0));
        assert!(!layer.get(empty).unwrap().is_being_erased());
        assert!(action.is_empty());
        assert!(action.edited().is_empty());
    }

    #[test]
    fn finalize_with_missing_stroke_changes_nothing() {
        let mut layer = Layer::new();
        let first = layer.add_stroke(horizontal(0.0));

        let mut action = EraseUndoAction::new();
        erase_middle(&mut layer, &mut action, first);
        action.add_original(StrokeId(99), 1);

        assert_eq!(
            action.finalize(&mut layer),
            Err(LayerError::StrokeNotFound(StrokeId(99)))
        );
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.index_of(first), Some(0));
        assert_eq!(action.originals().len(), 2);
        assert!(action.edited().is_empty());
        assert_eq!(action.undo(&mut layer), Err(LayerError::NotFinalized));
    }

    #[test]
    fn failed_undo_keeps_layer_and_history() {
        let mut layer = Layer::new();
        let first = layer.add_stroke(horizontal(0.0));

        let mut action = EraseUndoAction::new();
        erase_middle(&mut layer, &mut action, first);
        action.finalize(&mut layer).unwrap();
        let piece = action.edited()[1].id;

        let mut history = History::new();
        history.push(action);

        // something else took one of the pieces away
        let (pos, taken) = layer.remove_stroke(piece).unwrap();
        assert_eq!(history.undo(&mut layer), Err(LayerError::StrokeNotFound(piece)));
        assert_eq!(layer.len(), 1);
        assert!(layer.get(first).is_none());
        assert!(history.can_undo());
        assert!(!history.can_redo());

        // once it is back the undo goes through
        layer.insert_stroke(pos, taken);
        assert_eq!(history.undo(&mut layer), Ok(true));
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.index_of(first), Some(0));
    }

    #[test]
    fn undo_before_finalize_is_refused() {
        let mut layer = Layer::new();
        let mut action = EraseUndoAction::new();
        assert_eq!(action.undo(&mut layer), Err(LayerError::NotFinalized));
    }
}
