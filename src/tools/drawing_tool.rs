use crate::Sketchpad;
use crate::tool::Tool;
use eframe::egui::color_picker::Alpha;
use eframe::egui::{self, Align, Color32, Context, Layout, Painter, Response, SliderOrientation};
use sketchpad::config::{PenConfig, SketchConfig};
use sketchpad::{LineStyle, Point, Stroke, ToolType};

pub struct DrawingTool {
    thickness: f64,

    /// Minimum pixel distance before we sample a new raw point
    sample_tol: f32,

    drawing_color: Color32,
    tool_type: ToolType,
    line_style: LineStyle,

    is_drawing: bool,
}

impl DrawingTool {
    pub fn new(config: &SketchConfig) -> Self {
        DrawingTool {
            thickness: config.pen.width,
            sample_tol: config.pen.sample_tolerance,
            drawing_color: Color32::BLACK,
            tool_type: ToolType::Pen,
            line_style: LineStyle::Solid,
            is_drawing: false,
        }
    }

    fn finish_stroke(&mut self, app: &mut Sketchpad) {
        let raw = std::mem::take(&mut app.current_stroke);
        self.is_drawing = false;
        if raw.len() < 2 {
            return;
        }

        let points = raw
            .iter()
            .map(|p| Point::new(p.x as f64, p.y as f64))
            .collect();
        let mut stroke = Stroke::from_points(points, self.thickness, self.drawing_color);
        stroke.tool_type = self.tool_type;
        stroke.line_style = self.line_style;

        app.layer.add_stroke(stroke);
        // a new stroke changes positions a pending redo would rely on
        app.history.clear_redo();
    }
}

impl Tool for DrawingTool {
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut Sketchpad) {
        // handle zooming in and out first
        app.handle_zoom(ctx, response);

        // begin raw stroke
        if response.drag_started() {
            app.current_stroke.clear();
            if let Some(pos) = response.interact_pointer_pos() {
                let world_pos = app.screen_to_world(pos);
                app.current_stroke.push(world_pos);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let world_pos = app.screen_to_world(pos);
                // sample_tol is in screen pixels
                let should_add = match app.current_stroke.last() {
                    Some(&last) => last.distance(world_pos) > (self.sample_tol / app.zoom),
                    None => true,
                };
                if should_add {
                    app.current_stroke.push(world_pos);
                    self.is_drawing = true;
                }
            }
        }

        if response.drag_stopped() {
            self.finish_stroke(app);
        }
    }

    fn paint(&mut self, ctx: &Context, painter: &Painter, app: &Sketchpad) {
        // draw in-progress stroke in gray:
        for window in app.current_stroke.windows(2) {
            let a = app.world_to_screen(window[0]);
            let b = app.world_to_screen(window[1]);
            painter.line_segment(
                [a, b],
                egui::Stroke::new(self.thickness as f32 * app.zoom, Color32::GRAY),
            );
        }

        // draw a small circle to indicate the cursor position (pen size)
        if let Some(mouse_pos) = ctx.input(|i| i.pointer.hover_pos()) {
            if !self.is_drawing {
                painter.circle_filled(
                    mouse_pos,
                    (self.thickness as f32 * app.zoom) / 2.0,
                    self.drawing_color,
                );
            }
        }
    }

    fn tool_ui(&mut self, ctx: &Context, _app: &mut Sketchpad) {
        egui::TopBottomPanel::top("drawing settings")
            .resizable(false)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    // slider for thickness of new strokes
                    let width = egui::Slider::new(
                        &mut self.thickness,
                        PenConfig::WIDTH_MIN..=PenConfig::WIDTH_MAX,
                    )
                    .text("Thickness")
                    .orientation(SliderOrientation::Horizontal);
                    ui.add(width);

                    // color picker for the stroke using
                    // the color edit button (most common)
                    ui.horizontal(|ui| {
                        egui::widgets::color_picker::color_edit_button_srgba(
                            ui,
                            &mut self.drawing_color,
                            Alpha::Opaque,
                        );
                        ui.label("Stroke Color");
                    });

                    ui.separator();
                    ui.radio_value(&mut self.tool_type, ToolType::Pen, "Pen");
                    ui.radio_value(&mut self.tool_type, ToolType::Highlighter, "Highlighter");

                    ui.separator();
                    ui.radio_value(&mut self.line_style, LineStyle::Solid, "Solid");
                    ui.radio_value(
                        &mut self.line_style,
                        LineStyle::Dashed { dash: 6.0, gap: 4.0 },
                        "Dashed",
                    );
                    ui.radio_value(
                        &mut self.line_style,
                        LineStyle::Dotted { spacing: 6.0 },
                        "Dotted",
                    );
                });
            });
    }

    fn cancel(&mut self, app: &mut Sketchpad) {
        app.current_stroke.clear();
        self.is_drawing = false;
    }
}
