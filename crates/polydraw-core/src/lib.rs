//! PolyDraw Core Library
//!
//! Surface-agnostic drawing commands, replay-based undo/redo, selection
//! geometry and the interactive tools of the PolyDraw paint editor.

pub mod color;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod history;
pub mod input;
pub mod notify;
pub mod palette;
pub mod scheduler;
pub mod selection;
pub mod surface;
pub mod tools;

pub use color::{RasterImage, Rgba};
pub use commands::{Command, DrawCommand};
pub use config::{AerosolSettings, EditorConfig, ToolSettings};
pub use editor::Editor;
pub use error::{EditorError, EditorResult};
pub use grid::GridSettings;
pub use history::{HistoryFlags, PileSizes, UndoRedo};
pub use input::{InputEvent, InputState, Key, Modifiers, MouseButton, PointerEvent};
pub use notify::{Notifier, SubscriptionId};
pub use palette::ColorPalette;
pub use scheduler::{Scheduler, TaskHandle};
pub use selection::{AnchorPoint, HandleKind, Magnetism, ResizerHandler, SelectionBox, snap_to_grid};
pub use surface::{DrawingSurface, FontSpec, LineCap, LineJoin, RecordingSurface, StrokeParams};
pub use tools::{Tool, ToolContext, ToolKind};
