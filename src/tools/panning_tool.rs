use crate::Sketchpad;
use crate::tool::Tool;
use eframe::egui::{self, Align, Context, Layout, Painter, Pos2, Response, Vec2};

pub struct PanningTool {
    /// remember the pointer position at the start of drag
    drag_start: Option<Pos2>,
    orig_pan: Vec2,

    is_panning: bool,
}

impl PanningTool {
    pub fn new() -> Self {
        PanningTool {
            drag_start: None,
            orig_pan: Vec2::ZERO,
            is_panning: false,
        }
    }
}

impl Tool for PanningTool {
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut Sketchpad) {
        // handle zooming with scroll wheel, but not while dragging the view
        if !self.is_panning {
            app.handle_zoom(ctx, response);
        }

        // when the user starts dragging, record the initial pointer and pan
        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.is_panning = true;
                self.drag_start = Some(pos);
                self.orig_pan = app.pan_offset;
            }
        }

        // while dragging, compute delta from start, and adjust pan_offset
        if response.dragged() {
            if let (Some(start), Some(current)) = (self.drag_start, response.interact_pointer_pos())
            {
                let delta = current - start;
                app.pan_offset = self.orig_pan + Vec2::new(delta.x, delta.y);
            }
        }

        // on drag end, clear the stored start position
        if response.drag_stopped() {
            self.drag_start = None;
            self.is_panning = false;
        }
    }

    fn paint(&mut self, _ctx: &Context, _painter: &Painter, _app: &Sketchpad) {}

    fn tool_ui(&mut self, ctx: &Context, app: &mut Sketchpad) {
        egui::TopBottomPanel::top("panning settings")
            .resizable(false)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    // reset transform (pan and zoom) button
                    let reset_transform_btn = egui::Button::new("Reset Transformation");
                    if ui.add(reset_transform_btn).clicked() {
                        app.zoom = 1.0;
                        app.pan_offset = Vec2::ZERO;
                        app.calc_zoom_level();
                    }

                    ui.label(format!("Zoom: {:.2}%", app.zoom_percent));
                    ui.label(format!(
                        "Pan X: {:.2}, Pan Y: {:.2}",
                        app.pan_offset.x, app.pan_offset.y
                    ));
                });
            });
    }

    fn cancel(&mut self, _app: &mut Sketchpad) {
        self.drag_start = None;
        self.is_panning = false;
    }
}
