use crate::Sketchpad;
use crate::tool::Tool;
use eframe::egui::{
    self, Align, Color32, Context, Layout, Painter, Pos2, Response, SliderOrientation,
};
use kurbo::Rect;
use log::{debug, warn};
use sketchpad::Damage;
use sketchpad::config::EraserConfig;
use sketchpad::undo::EraseUndoAction;

/// cuts away the parts of strokes under a square cursor.
///
/// one drag is one gesture: every stroke it touches gets an erase engine,
/// and on release the engines are turned back into strokes through an
/// [`EraseUndoAction`] that goes on the history.
pub struct EraserTool {
    action: Option<EraseUndoAction>,

    /// repaint region collected over the current gesture
    damage: Option<Damage>,
}

impl EraserTool {
    pub fn new() -> Self {
        EraserTool {
            action: None,
            damage: None,
        }
    }

    /// the eraser keeps its on-screen size when zooming
    fn half_size(app: &Sketchpad) -> f64 {
        app.config.eraser.half_size() / app.zoom as f64
    }

    fn erase_at(&mut self, screen_pos: Pos2, app: &mut Sketchpad) {
        let Some(action) = self.action.as_mut() else {
            return;
        };

        let world = app.screen_to_world(screen_pos);
        let (x, y) = (world.x as f64, world.y as f64);
        let h = Self::half_size(app);
        let area = Rect::new(x - h, y - h, x + h, y + h);

        for id in app.layer.strokes_in(area, 0.0) {
            let Some(pos) = app.layer.index_of(id) else {
                continue;
            };
            let Some(stroke) = app.layer.get_mut(id) else {
                continue;
            };

            match stroke.eraseable().erase(x, y, h, None) {
                Some(touched) => {
                    action.add_original(id, pos);
                    match self.damage.as_mut() {
                        Some(d) => d.union(&touched),
                        None => self.damage = Some(touched),
                    }
                }
                // only near the bounds, not on the line
                None if !action.contains_original(id) => {
                    stroke.take_eraseable();
                }
                None => {}
            }
        }

        app.last_damage = self.damage;
    }

    fn finish(&mut self, app: &mut Sketchpad) {
        let Some(mut action) = self.action.take() else {
            return;
        };
        self.damage = None;

        if action.is_empty() {
            return;
        }
        match action.finalize(&mut app.layer) {
            Ok(()) => {
                debug!("{} ({} strokes)", action.text(), action.originals().len());
                app.history.push(action);
            }
            Err(e) => warn!("could not finalize erase: {e}"),
        }
    }
}

impl Tool for EraserTool {
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut Sketchpad) {
        app.handle_zoom(ctx, response);

        if response.drag_started() {
            self.action = Some(EraseUndoAction::new());
            self.damage = None;
            if let Some(pos) = response.interact_pointer_pos() {
                self.erase_at(pos, app);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.erase_at(pos, app);
            }
        }

        if response.drag_stopped() {
            self.finish(app);
        }
    }

    fn paint(&mut self, ctx: &Context, painter: &Painter, app: &Sketchpad) {
        // outline the square footprint around the cursor
        if let Some(mouse_pos) = ctx.input(|i| i.pointer.hover_pos()) {
            let h = app.config.eraser.half_size() as f32;
            let corners = [
                Pos2::new(mouse_pos.x - h, mouse_pos.y - h),
                Pos2::new(mouse_pos.x + h, mouse_pos.y - h),
                Pos2::new(mouse_pos.x + h, mouse_pos.y + h),
                Pos2::new(mouse_pos.x - h, mouse_pos.y + h),
                Pos2::new(mouse_pos.x - h, mouse_pos.y - h),
            ];
            painter.line(corners.to_vec(), egui::Stroke::new(1.0, Color32::DARK_GRAY));
        }
    }

    fn tool_ui(&mut self, ctx: &Context, app: &mut Sketchpad) {
        egui::TopBottomPanel::top("eraser settings")
            .resizable(false)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    let size = egui::Slider::new(
                        &mut app.config.eraser.size,
                        EraserConfig::SIZE_MIN..=EraserConfig::SIZE_MAX,
                    )
                    .text("Eraser size")
                    .orientation(SliderOrientation::Horizontal);
                    ui.add(size);

                    ui.checkbox(&mut app.show_damage, "Show repaint area");
                });
            });
    }

    // an unfinished gesture still has to hand its strokes back to the layer
    fn cancel(&mut self, app: &mut Sketchpad) {
        self.finish(app);
    }
}
