use eframe::egui::{self, Color32, Painter, Pos2, Shape};
use sketchpad::paint::PaintContext;
use sketchpad::{LineStyle, Stroke, ToolType};

use crate::Sketchpad;

/// paints world-space paths onto an egui `Painter`, applying the view
/// transform and the styling of the stroke being drawn.
pub struct EguiPaint<'a> {
    painter: &'a Painter,
    app: &'a Sketchpad,

    color: Color32,
    line_style: LineStyle,
    width: f64,

    // current sub-path, already in screen space
    path: Vec<Pos2>,
}

impl<'a> EguiPaint<'a> {
    pub fn new(painter: &'a Painter, app: &'a Sketchpad, stroke: &Stroke) -> Self {
        let color = match stroke.tool_type {
            ToolType::Pen => stroke.color,
            ToolType::Highlighter => stroke.color.gamma_multiply(0.4),
        };
        EguiPaint {
            painter,
            app,
            color,
            line_style: stroke.line_style,
            width: stroke.width,
            path: Vec::new(),
        }
    }

    fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        self.app.world_to_screen(Pos2::new(x as f32, y as f32))
    }
}

impl PaintContext for EguiPaint<'_> {
    fn set_line_width(&mut self, width: f64) {
        self.width = width;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.clear();
        let p = self.to_screen(x, y);
        self.path.push(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.to_screen(x, y);
        self.path.push(p);
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        if path.len() < 2 {
            return;
        }

        let zoom = self.app.zoom;
        let width = self.width as f32 * zoom;
        let stroke = egui::Stroke::new(width, self.color);
        match self.line_style {
            LineStyle::Solid => {
                self.painter.add(Shape::line(path, stroke));
            }
            LineStyle::Dashed { dash, gap } => {
                self.painter.extend(Shape::dashed_line(
                    &path,
                    stroke,
                    dash as f32 * zoom,
                    gap as f32 * zoom,
                ));
            }
            LineStyle::Dotted { spacing } => {
                self.painter.extend(Shape::dotted_line(
                    &path,
                    self.color,
                    spacing as f32 * zoom,
                    width / 2.0,
                ));
            }
        }
    }
}
