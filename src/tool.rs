use eframe::egui::{Context, Painter, Response};

/// Each tool must be able to:
/// - handle input events
/// - draw itself onto the `painter`
/// - show its own settings bar
/// - optionally modify the app state (layer, history, camera transform, etc.)
pub trait Tool {
    /// called once per frame; let the tool inspect input, mutate app state, etc.
    fn handle_input(&mut self, ctx: &Context, response: &Response, app: &mut crate::Sketchpad);

    /// called after input, to let the tool draw any custom UI or decorations.
    /// draw in-progress strokes, eraser cursor, etc.
    fn paint(&mut self, ctx: &Context, painter: &Painter, app: &crate::Sketchpad);

    /// settings bar shown while the tool is active
    fn tool_ui(&mut self, ctx: &Context, app: &mut crate::Sketchpad);

    /// the pointer went away mid-gesture or the user switched tools
    fn cancel(&mut self, _app: &mut crate::Sketchpad) {}
}
