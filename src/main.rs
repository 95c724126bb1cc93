mod canvas;
mod tool;
mod tools {
    pub mod drawing_tool;
    pub mod eraser_tool;
    pub mod panning_tool;
}
use std::path::Path;

use crate::canvas::EguiPaint;
use crate::tool::Tool;
use eframe::egui::{self, Context, Visuals};
use egui::emath::Vec2;
use egui::{Color32, Key, Sense};
use log::warn;
use sketchpad::config::SketchConfig;
use sketchpad::layer::Layer;
use sketchpad::undo::History;
use sketchpad::{Damage, Stroke};
use tools::drawing_tool::DrawingTool;
use tools::eraser_tool::EraserTool;
use tools::panning_tool::PanningTool;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Drawing,
    Erasing,
    Panning,
}

/// main application state
pub struct Sketchpad {
    // all committed strokes, bottom to top
    pub layer: Layer,

    // finished erase gestures that can be undone
    pub history: History,

    pub config: SketchConfig,

    // raw points (world space) of the stroke being drawn right now
    pub current_stroke: Vec<egui::Pos2>,

    // outline the region repainted by the last erase gesture
    pub show_damage: bool,
    pub last_damage: Option<Damage>,

    // transform values
    pub pan_offset: Vec2,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_percent: f32,

    // which tool is currently active
    pub selected_tool: ToolKind,

    // keep each tool in a `Box<dyn Tool>`, so they can be swapped at runtime.
    drawing_tool: Option<Box<dyn Tool>>,
    eraser_tool: Option<Box<dyn Tool>>,
    panning_tool: Option<Box<dyn Tool>>,
}

fn main() -> eframe::Result {
    // RUST_LOG=sketchpad=debug for engine traces
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = SketchConfig::load_or_default(Path::new(SketchConfig::FILE_NAME));
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Sketchpad",
        native_options,
        Box::new(|cc| Ok(Box::new(Sketchpad::new(cc, config)))),
    )
}

impl Sketchpad {
    fn new(_cc: &eframe::CreationContext<'_>, config: SketchConfig) -> Self {
        Sketchpad {
            layer: Layer::new(),
            history: History::new(),
            drawing_tool: Some(Box::new(DrawingTool::new(&config))),
            eraser_tool: Some(Box::new(EraserTool::new())),
            panning_tool: Some(Box::new(PanningTool::new())),
            config,
            current_stroke: Vec::new(),
            show_damage: false,
            last_damage: None,
            pan_offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 20.0,
            zoom_percent: 100.0,
            selected_tool: ToolKind::Drawing,
        }
    }

    /// given a point in the drawing’s logical coordinate system,
    /// return the point in screen space after applying zoom and pan.
    pub fn world_to_screen(&self, p: egui::Pos2) -> egui::Pos2 {
        egui::Pos2::new(
            p.x * self.zoom + self.pan_offset.x,
            p.y * self.zoom + self.pan_offset.y,
        )
    }

    pub fn screen_to_world(&self, p: egui::Pos2) -> egui::Pos2 {
        egui::Pos2::new(
            (p.x - self.pan_offset.x) / self.zoom,
            (p.y - self.pan_offset.y) / self.zoom,
        )
    }

    pub fn calc_zoom_level(&mut self) {
        self.zoom_percent = self.zoom * 100.0;
    }

    /// scroll-wheel zoom around the pointer, shared by every tool
    pub fn handle_zoom(&mut self, ctx: &Context, response: &egui::Response) {
        let Some(pointer_pos) = response.hover_pos() else {
            return;
        };
        let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }

        // convert world position before zoom
        let old_world_pos = self.screen_to_world(pointer_pos);

        // apply zoom
        let zoom_delta = (scroll_delta * 0.009).exp();
        self.zoom = (self.zoom * zoom_delta).clamp(self.min_zoom, self.max_zoom);

        // adjust pan offset to keep pointer position stable
        let new_world_pos = self.screen_to_world(pointer_pos);
        let world_delta = Vec2::new(
            new_world_pos.x - old_world_pos.x,
            new_world_pos.y - old_world_pos.y,
        );
        self.pan_offset += world_delta * self.zoom;

        self.calc_zoom_level();
    }

    fn tool_slot(&mut self, kind: ToolKind) -> &mut Option<Box<dyn Tool>> {
        match kind {
            ToolKind::Drawing => &mut self.drawing_tool,
            ToolKind::Erasing => &mut self.eraser_tool,
            ToolKind::Panning => &mut self.panning_tool,
        }
    }

    /// temporarily take the active tool out of its slot so it can borrow
    /// both itself and the app mutably, then put it back.
    fn with_tool(&mut self, kind: ToolKind, f: impl FnOnce(&mut dyn Tool, &mut Sketchpad)) {
        let Some(mut tool) = self.tool_slot(kind).take() else {
            return;
        };
        f(tool.as_mut(), self);
        *self.tool_slot(kind) = Some(tool);
    }

    fn select_tool(&mut self, kind: ToolKind) {
        if kind == self.selected_tool {
            return;
        }
        let current = self.selected_tool;
        self.with_tool(current, |tool, app| tool.cancel(app));
        self.selected_tool = kind;
    }

    fn handle_history_keys(&mut self, ctx: &Context, response: &egui::Response) {
        // never rewrite the layer under a running gesture
        if response.dragged() {
            return;
        }

        let (undo, redo) = ctx.input(|i| {
            let z = i.modifiers.command && i.key_pressed(Key::Z);
            (z && !i.modifiers.shift, z && i.modifiers.shift)
        });

        let result = if undo {
            self.history.undo(&mut self.layer)
        } else if redo {
            self.history.redo(&mut self.layer)
        } else {
            return;
        };

        match result {
            Ok(_) => self.last_damage = None,
            Err(e) => warn!("history: {e}"),
        }
    }

    fn draw_stroke(&self, painter: &egui::Painter, stroke: &Stroke) {
        let mut paint = EguiPaint::new(painter, self, stroke);
        stroke.draw(&mut paint);
    }
}

impl eframe::App for Sketchpad {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // set bgc/other visuals if needed
        ctx.set_visuals(Visuals {
            window_fill: Color32::WHITE,
            ..egui::Visuals::light() // base style
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let canvas_height = ctx.available_rect().height();
            let (response, painter) = ui.allocate_painter(
                egui::Vec2::new(ctx.available_rect().width(), canvas_height),
                Sense::drag(),
            );

            // handle input based on selected tool
            let current_tool = self.selected_tool;
            self.with_tool(current_tool, |tool, app| {
                tool.handle_input(ctx, &response, app)
            });
            self.handle_history_keys(ctx, &response);

            // draw all committed strokes; strokes being erased draw their
            // surviving pieces
            for stroke in self.layer.strokes() {
                self.draw_stroke(&painter, stroke);
            }

            if self.show_damage {
                if let Some(damage) = self.last_damage {
                    let r = damage.rect();
                    let corners = [
                        (r.x0, r.y0),
                        (r.x1, r.y0),
                        (r.x1, r.y1),
                        (r.x0, r.y1),
                        (r.x0, r.y0),
                    ]
                    .map(|(x, y)| self.world_to_screen(egui::Pos2::new(x as f32, y as f32)));
                    painter.line(corners.to_vec(), egui::Stroke::new(1.0, Color32::RED));
                }
            }

            // active tool overlays (in-progress stroke, eraser cursor)
            self.with_tool(current_tool, |tool, app| tool.paint(ctx, &painter, app));

            // draw the tool selector windows (always at fixed screen coords)
            self.show_tools_window(ctx);
            self.show_tool_specific_ui(ctx);
        });
    }
}

impl Sketchpad {
    // tools window
    fn show_tools_window(&mut self, ctx: &Context) {
        let mut picked = None;
        egui::Window::new("Tools")
            .anchor(egui::Align2::LEFT_TOP, egui::Vec2::new(10.0, 40.0))
            .show(ctx, |ui| {
                if ui.button("Draw").clicked() {
                    picked = Some(ToolKind::Drawing);
                }
                if ui.button("Erase").clicked() {
                    picked = Some(ToolKind::Erasing);
                }
                if ui.button("Pan-Zoom").clicked() {
                    picked = Some(ToolKind::Panning);
                }
                ui.separator();
                ui.add_enabled_ui(self.history.can_undo(), |ui| {
                    if ui.button("Undo erase").clicked() {
                        if let Err(e) = self.history.undo(&mut self.layer) {
                            warn!("undo failed: {e}");
                        }
                    }
                });
                ui.add_enabled_ui(self.history.can_redo(), |ui| {
                    if ui.button("Redo erase").clicked() {
                        if let Err(e) = self.history.redo(&mut self.layer) {
                            warn!("redo failed: {e}");
                        }
                    }
                });
            });

        if let Some(kind) = picked {
            self.select_tool(kind);
        }
    }

    /// Displays the UI for the currently selected tool.
    fn show_tool_specific_ui(&mut self, ctx: &egui::Context) {
        let current_tool = self.selected_tool;
        self.with_tool(current_tool, |tool, app| tool.tool_ui(ctx, app));
    }
}
