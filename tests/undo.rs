use eframe::egui::Color32;
use sketchpad::layer::Layer;
use sketchpad::undo::{EraseUndoAction, History};
use sketchpad::{LineStyle, Point, Stroke, ToolType};

fn styled_line(y: f64) -> Stroke {
    let mut stroke = Stroke::from_points(
        vec![Point::new(0.0, y), Point::new(30.0, y)],
        5.0,
        Color32::DARK_GREEN,
    );
    stroke.tool_type = ToolType::Highlighter;
    stroke.line_style = LineStyle::Dotted { spacing: 2.0 };
    stroke
}

#[test]
fn whole_gesture_round_trips_through_history() {
    let mut layer = Layer::new();
    let target = layer.add_stroke(styled_line(0.0));
    let bystander = layer.add_stroke(styled_line(50.0));

    // two passes over the same stroke in one gesture
    let mut action = EraseUndoAction::new();
    let mut damage = None;
    for x in [10.0, 20.0] {
        let pos = layer.index_of(target).unwrap();
        action.add_original(target, pos);
        let stroke = layer.get_mut(target).unwrap();
        damage = stroke.eraseable().erase(x, 0.0, 1.0, damage);
    }
    let damage = damage.unwrap();
    assert!(damage.contains(10.0, 0.0) && damage.contains(20.0, 0.0));

    action.finalize(&mut layer).unwrap();
    assert_eq!(layer.len(), 4);
    assert_eq!(layer.index_of(bystander), Some(3));
    for piece in &layer.strokes()[..3] {
        assert_eq!(piece.tool_type, ToolType::Highlighter);
        assert_eq!(piece.line_style, LineStyle::Dotted { spacing: 2.0 });
        assert_eq!(piece.color, Color32::DARK_GREEN);
        assert_eq!(piece.width, 5.0);
    }

    let mut history = History::new();
    history.push(action);

    history.undo(&mut layer).unwrap();
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.strokes()[0].id(), target);
    assert_eq!(layer.strokes()[0].points.len(), 2);

    history.redo(&mut layer).unwrap();
    assert_eq!(layer.len(), 4);
    assert!(layer.get(target).is_none());
}

#[test]
fn stroke_erased_away_entirely_disappears() {
    let mut layer = Layer::new();
    let target = layer.add_stroke(styled_line(0.0));

    let mut action = EraseUndoAction::new();
    action.add_original(target, 0);
    layer
        .get_mut(target)
        .unwrap()
        .eraseable()
        .erase(15.0, 0.0, 40.0, None);
    action.finalize(&mut layer).unwrap();

    assert!(layer.is_empty());
    assert!(action.edited().is_empty());

    action.undo(&mut layer).unwrap();
    assert_eq!(layer.index_of(target), Some(0));
}
