//! Interactive tools.
//!
//! A tool turns pointer and key events into a live preview on the overlay
//! surface and, when the gesture finishes, one command committed to the
//! history. Tools never draw on the base surface themselves.

mod aerosol;
mod eraser;
mod pencil;
mod pipette;
mod selection;
mod shape;
mod stamp;
mod text;

pub use aerosol::{AerosolTool, SprayRng};
pub use eraser::EraserTool;
pub use pencil::PencilTool;
pub use pipette::PipetteTool;
pub use selection::{NUDGE_STEP, SelectionTool};
pub use shape::{ShapeKind, ShapeTool};
pub use stamp::{ROTATION_FINE_STEP, ROTATION_STEP, StampTool};
pub use text::{TextTool, wrap_text};

use crate::color::{RasterImage, Rgba};
use crate::commands::Command;
use crate::config::ToolSettings;
use crate::grid::GridSettings;
use crate::history::UndoRedo;
use crate::input::{Key, MouseButton, PointerEvent};
use crate::palette::ColorPalette;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::selection::Magnetism;
use crate::surface::DrawingSurface;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Generate a seed for a new tool interaction.
fn generate_tool_seed() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};

    static SEED_COUNTER: AtomicU64 = AtomicU64::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    // splitmix64 finaliser
    let mut x = counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^= x >> 31;
    x
}

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Pencil,
    Eraser,
    Rectangle,
    Ellipse,
    Polygon,
    Aerosol,
    Stamp,
    Text,
    Pipette,
    Selection,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Pencil,
        ToolKind::Eraser,
        ToolKind::Rectangle,
        ToolKind::Ellipse,
        ToolKind::Polygon,
        ToolKind::Aerosol,
        ToolKind::Stamp,
        ToolKind::Text,
        ToolKind::Pipette,
        ToolKind::Selection,
    ];

    /// Build a fresh, idle tool of this kind.
    pub fn create(self) -> Box<dyn Tool> {
        match self {
            ToolKind::Pencil => Box::new(PencilTool::new()),
            ToolKind::Eraser => Box::new(EraserTool::new()),
            ToolKind::Rectangle => Box::new(ShapeTool::new(ShapeKind::Rectangle)),
            ToolKind::Ellipse => Box::new(ShapeTool::new(ShapeKind::Ellipse)),
            ToolKind::Polygon => Box::new(ShapeTool::new(ShapeKind::Polygon)),
            ToolKind::Aerosol => Box::new(AerosolTool::new()),
            ToolKind::Stamp => Box::new(StampTool::new()),
            ToolKind::Text => Box::new(TextTool::new()),
            ToolKind::Pipette => Box::new(PipetteTool::new()),
            ToolKind::Selection => Box::new(SelectionTool::new()),
        }
    }
}

/// Everything a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub base: &'a mut dyn DrawingSurface,
    /// Overlay for previews. Cleared when a command is committed.
    pub preview: &'a mut dyn DrawingSurface,
    pub history: &'a mut UndoRedo,
    pub palette: &'a mut ColorPalette,
    pub grid: &'a GridSettings,
    pub magnetism: &'a mut Magnetism,
    pub scheduler: &'a mut Scheduler,
    pub settings: &'a ToolSettings,
    pub handle_size: f64,
    pub stamp_image: Option<Arc<RasterImage>>,
}

impl ToolContext<'_> {
    /// Drop the preview and run `command` through the history.
    pub fn commit(&mut self, command: impl Into<Command>) {
        self.preview.clear();
        self.history.execute_command(command, self.base);
    }

    pub fn clear_preview(&mut self) {
        self.preview.clear();
    }

    /// Draw color for a button: primary on left, secondary otherwise.
    pub fn color_for(&self, button: MouseButton) -> Rgba {
        match button {
            MouseButton::Left => self.palette.primary(),
            _ => self.palette.secondary(),
        }
    }
}

/// An interactive tool.
pub trait Tool: std::fmt::Debug {
    fn kind(&self) -> ToolKind;

    fn on_pointer_down(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>);

    fn on_pointer_move(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>);

    fn on_pointer_up(&mut self, event: &PointerEvent, ctx: &mut ToolContext<'_>);

    fn on_pointer_leave(&mut self, _event: &PointerEvent, _ctx: &mut ToolContext<'_>) {}

    fn on_key(&mut self, _key: Key, _pressed: bool, _ctx: &mut ToolContext<'_>) {}

    fn on_wheel(&mut self, _event: &PointerEvent, _delta: f64, _ctx: &mut ToolContext<'_>) {}

    /// A scheduler task fired.
    fn on_tick(&mut self, _task: TaskHandle, _ctx: &mut ToolContext<'_>) {}

    /// The tool is being switched away: finish or drop the gesture.
    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Whether a gesture is in progress.
    fn is_active(&self) -> bool {
        false
    }
}
