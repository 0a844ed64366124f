//! The editor: surfaces, history, tools and settings wired together.

use crate::color::RasterImage;
use crate::config::{EditorConfig, ToolSettings};
use crate::grid::GridSettings;
use crate::history::UndoRedo;
use crate::input::{InputEvent, InputState};
use crate::palette::ColorPalette;
use crate::scheduler::Scheduler;
use crate::selection::Magnetism;
use crate::surface::DrawingSurface;
use crate::tools::{Tool, ToolContext, ToolKind};
use std::sync::Arc;
use std::time::Duration;

/// A paint editor over a base surface (the drawing) and a preview surface
/// (tool feedback, composited on top by the host).
pub struct Editor<S: DrawingSurface> {
    base: S,
    preview: S,
    history: UndoRedo,
    palette: ColorPalette,
    grid: GridSettings,
    magnetism: Magnetism,
    scheduler: Scheduler,
    settings: ToolSettings,
    handle_size: f64,
    input: InputState,
    tool: Box<dyn Tool>,
    stamp_image: Option<Arc<RasterImage>>,
}

impl<S: DrawingSurface> std::fmt::Debug for Editor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("size", &(self.base.width(), self.base.height()))
            .field("tool", &self.tool.kind())
            .field("history", &self.history.sizes())
            .finish()
    }
}

impl<S: DrawingSurface> Editor<S> {
    pub fn new(config: EditorConfig, mut base: S, mut preview: S) -> Self {
        let config = config.normalized();
        let (width, height) = (config.canvas_width, config.canvas_height);
        base.resize(width, height);
        preview.resize(width, height);
        preview.clear();
        log::info!("Editor created with a {width}x{height} canvas");
        Self {
            base,
            preview,
            history: UndoRedo::new(width, height),
            palette: ColorPalette::default(),
            grid: config.grid,
            magnetism: Magnetism::new(),
            scheduler: Scheduler::new(),
            settings: config.tools,
            handle_size: config.handle_size,
            input: InputState::new(),
            tool: ToolKind::default().create(),
            stamp_image: None,
        }
    }

    /// Run `f` with the current tool and a context over everything else.
    fn with_tool(&mut self, f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>)) {
        let mut ctx = ToolContext {
            base: &mut self.base,
            preview: &mut self.preview,
            history: &mut self.history,
            palette: &mut self.palette,
            grid: &self.grid,
            magnetism: &mut self.magnetism,
            scheduler: &mut self.scheduler,
            settings: &self.settings,
            handle_size: self.handle_size,
            stamp_image: self.stamp_image.clone(),
        };
        f(self.tool.as_mut(), &mut ctx);
    }

    /// Finish any gesture in progress.
    fn settle(&mut self) {
        if self.tool.is_active() {
            self.with_tool(|tool, ctx| tool.deactivate(ctx));
        }
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Switch tools. The current gesture is committed or dropped first.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if self.tool.kind() == kind {
            return;
        }
        self.with_tool(|tool, ctx| tool.deactivate(ctx));
        self.preview.clear();
        self.tool = kind.create();
        log::debug!("Tool switched to {kind:?}");
    }

    pub fn dispatch(&mut self, event: InputEvent) {
        self.input.handle_event(&event);
        match event {
            InputEvent::PointerDown(ev) => self.with_tool(|tool, ctx| tool.on_pointer_down(&ev, ctx)),
            InputEvent::PointerMove(ev) => self.with_tool(|tool, ctx| tool.on_pointer_move(&ev, ctx)),
            InputEvent::PointerUp(ev) => self.with_tool(|tool, ctx| tool.on_pointer_up(&ev, ctx)),
            InputEvent::PointerLeave(ev) => self.with_tool(|tool, ctx| tool.on_pointer_leave(&ev, ctx)),
            InputEvent::Key { key, pressed, .. } => self.with_tool(|tool, ctx| tool.on_key(key, pressed, ctx)),
            InputEvent::Wheel { event, delta } => self.with_tool(|tool, ctx| tool.on_wheel(&event, delta, ctx)),
        }
    }

    /// Advance the scheduler clock and deliver every task that fired.
    pub fn tick(&mut self, elapsed: Duration) {
        for task in self.scheduler.advance(elapsed) {
            self.with_tool(|tool, ctx| tool.on_tick(task, ctx));
        }
    }

    pub fn undo(&mut self) -> bool {
        self.settle();
        self.history.undo(&mut self.base)
    }

    pub fn redo(&mut self) -> bool {
        self.settle();
        self.history.redo(&mut self.base)
    }

    /// Start over on a blank canvas.
    pub fn new_drawing(&mut self, width: u32, height: u32) {
        self.settle();
        self.history.set_canvas_size(width.max(1), height.max(1));
        self.history.set_initial_image(None);
        self.restart();
    }

    /// Start over on a copy of `image`, which every replay redraws first.
    pub fn load_image(&mut self, image: RasterImage) {
        self.settle();
        self.history.set_canvas_size(image.width().max(1), image.height().max(1));
        self.history.set_initial_image(Some(image));
        self.restart();
    }

    fn restart(&mut self) {
        let (width, height) = self.history.canvas_size();
        self.history.reset();
        self.history.refresh(&mut self.base);
        self.preview.resize(width, height);
        self.preview.clear();
        log::info!("New {width}x{height} drawing");
    }

    /// Image the stamp tool draws. `None` disables stamping.
    pub fn set_stamp_image(&mut self, image: Option<RasterImage>) {
        self.stamp_image = image.map(Arc::new);
    }

    pub fn toggle_magnetism(&mut self) -> bool {
        self.magnetism.toggle_magnetism()
    }

    pub fn history(&self) -> &UndoRedo {
        &self.history
    }

    /// For subscribing to history notifications.
    pub fn history_mut(&mut self) -> &mut UndoRedo {
        &mut self.history
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut ColorPalette {
        &mut self.palette
    }

    pub fn grid(&self) -> &GridSettings {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridSettings {
        &mut self.grid
    }

    pub fn magnetism(&self) -> &Magnetism {
        &self.magnetism
    }

    pub fn magnetism_mut(&mut self) -> &mut Magnetism {
        &mut self.magnetism
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn tool_settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    pub fn preview(&self) -> &S {
        &self.preview
    }

    pub fn into_surfaces(self) -> (S, S) {
        (self.base, self.preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::commands::Command;
    use crate::input::{Key, Modifiers, PointerEvent};
    use crate::surface::{RecordingSurface, SurfaceOp};
    use kurbo::Point;

    fn editor() -> Editor<RecordingSurface> {
        let config = EditorConfig {
            canvas_width: 200,
            canvas_height: 100,
            ..EditorConfig::default()
        };
        Editor::new(config, RecordingSurface::new(1, 1), RecordingSurface::new(1, 1))
    }

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(Point::new(x, y))
    }

    fn stroke(editor: &mut Editor<RecordingSurface>, y: f64) {
        editor.dispatch(InputEvent::PointerDown(at(0.0, y)));
        editor.dispatch(InputEvent::PointerMove(at(50.0, y)));
        editor.dispatch(InputEvent::PointerUp(at(50.0, y)));
    }

    #[test]
    fn test_new_sizes_surfaces() {
        let editor = editor();
        assert_eq!((editor.base().width(), editor.base().height()), (200, 100));
        assert_eq!(editor.history().canvas_size(), (200, 100));
        assert_eq!(editor.tool_kind(), ToolKind::Pencil);
    }

    #[test]
    fn test_undo_redo_replays_base() {
        let mut editor = editor();
        stroke(&mut editor, 10.0);
        stroke(&mut editor, 20.0);
        assert_eq!(editor.history().undo_len(), 2);

        assert!(editor.undo());
        let ops = editor.base().ops_since_clear();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0], SurfaceOp::Resize { width: 200, height: 100 });

        assert!(editor.redo());
        assert_eq!(editor.base().ops_since_clear().len(), 3);
        assert!(!editor.redo());
    }

    #[test]
    fn test_switching_tool_commits_gesture() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Rectangle);
        editor.dispatch(InputEvent::PointerDown(at(10.0, 10.0)));
        editor.dispatch(InputEvent::PointerMove(at(60.0, 40.0)));
        editor.set_tool(ToolKind::Ellipse);
        assert!(matches!(editor.history().commands(), [Command::Rectangle(_)]));
        assert!(editor.preview().ops_since_clear().is_empty());
    }

    #[test]
    fn test_shift_key_reaches_tool() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Rectangle);
        editor.dispatch(InputEvent::PointerDown(at(0.0, 0.0)));
        editor.dispatch(InputEvent::PointerMove(at(80.0, 30.0)));
        editor.dispatch(InputEvent::Key {
            key: Key::Shift,
            pressed: true,
            modifiers: Modifiers::NONE,
        });
        assert!(editor.input().shift());
        editor.dispatch(InputEvent::PointerUp(at(80.0, 30.0).with_modifiers(Modifiers::shift())));
        let [Command::Rectangle(cmd)] = editor.history().commands() else {
            panic!("expected one rectangle");
        };
        assert!(cmd.params().aspect_locked);
    }

    #[test]
    fn test_tick_drives_aerosol() {
        let mut editor = editor();
        editor.set_tool(ToolKind::Aerosol);
        editor.dispatch(InputEvent::PointerDown(at(50.0, 50.0)));
        editor.tick(Duration::from_millis(200));
        editor.dispatch(InputEvent::PointerUp(at(50.0, 50.0)));
        let [Command::Aerosol(cmd)] = editor.history().commands() else {
            panic!("expected one aerosol command");
        };
        assert_eq!(cmd.sprays().len(), 6);
        // Stopped: more time adds nothing.
        editor.tick(Duration::from_secs(1));
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_new_drawing_resets_history() {
        let mut editor = editor();
        stroke(&mut editor, 10.0);
        editor.new_drawing(64, 32);
        assert_eq!(editor.history().undo_len(), 0);
        assert_eq!(editor.base().ops_since_clear(), &[SurfaceOp::Resize { width: 64, height: 32 }]);
        assert_eq!(editor.preview().width(), 64);
    }

    #[test]
    fn test_load_image_is_replayed_first() {
        let mut editor = editor();
        editor.load_image(RasterImage::filled(30, 20, Rgba::black()));
        stroke(&mut editor, 5.0);
        editor.undo();
        let ops = editor.base().ops_since_clear();
        assert_eq!(ops[0], SurfaceOp::Resize { width: 30, height: 20 });
        assert!(matches!(ops[1], SurfaceOp::Image { width: 30, height: 20, .. }));
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn test_undo_mid_gesture_commits_first() {
        let mut editor = editor();
        editor.dispatch(InputEvent::PointerDown(at(0.0, 0.0)));
        editor.dispatch(InputEvent::PointerMove(at(10.0, 0.0)));
        assert!(editor.undo());
        assert_eq!(editor.history().undo_len(), 0);
        assert_eq!(editor.history().redo_len(), 1);
    }
}
