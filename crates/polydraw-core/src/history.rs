//! Undo/redo by full replay.
//!
//! Commands are draw operations without inverses, so undoing cannot erase a
//! single stroke. Instead every undo or redo wipes the surface, re-applies the
//! canvas size (and the loaded base image, if any) and replays the whole undo
//! pile in chronological order. The cost is linear in the history length.

use crate::color::RasterImage;
use crate::commands::{Command, DrawCommand, ResizeCanvasCommand};
use crate::notify::{Notifier, SubscriptionId};
use crate::surface::DrawingSurface;
use kurbo::Affine;

/// Lengths of the undo and redo piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PileSizes {
    pub undo: usize,
    pub redo: usize,
}

/// Whether the undo and redo actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryFlags {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// The undo/redo engine.
#[derive(Debug)]
pub struct UndoRedo {
    /// Committed commands, oldest first.
    undo_pile: Vec<Command>,
    /// Undone commands, most recently undone last.
    redo_pile: Vec<Command>,
    reset_size: ResizeCanvasCommand,
    initial_image: Option<RasterImage>,
    flags: HistoryFlags,
    sizes_changed: Notifier<PileSizes>,
    flags_changed: Notifier<HistoryFlags>,
}

impl UndoRedo {
    /// Create an empty history for a canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            undo_pile: Vec::new(),
            redo_pile: Vec::new(),
            reset_size: ResizeCanvasCommand::new(width, height),
            initial_image: None,
            flags: HistoryFlags::default(),
            sizes_changed: Notifier::new(),
            flags_changed: Notifier::new(),
        }
    }

    /// Replace the command that re-establishes the canvas size on refresh.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.reset_size = ResizeCanvasCommand::new(width, height);
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.reset_size.width(), self.reset_size.height())
    }

    /// Seed (or stop seeding) every replay with a loaded image.
    pub fn set_initial_image(&mut self, image: Option<RasterImage>) {
        self.initial_image = image;
    }

    pub fn initial_image(&self) -> Option<&RasterImage> {
        self.initial_image.as_ref()
    }

    /// Run a new command against the base surface and record it.
    /// Any undone history is discarded.
    pub fn execute_command(&mut self, command: impl Into<Command>, surface: &mut dyn DrawingSurface) {
        let command = command.into();
        command.execute(surface);
        log::debug!(
            "Committed {} command ({} in history, {} discarded)",
            command.name(),
            self.undo_pile.len() + 1,
            self.redo_pile.len()
        );
        self.undo_pile.push(command);
        self.redo_pile.clear();
        self.publish();
    }

    /// Undo the last command. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, surface: &mut dyn DrawingSurface) -> bool {
        let Some(command) = self.undo_pile.pop() else {
            return false;
        };
        log::debug!("Undo {}", command.name());
        self.redo_pile.push(command);
        self.refresh(surface);
        true
    }

    /// Redo the last undone command. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self, surface: &mut dyn DrawingSurface) -> bool {
        let Some(command) = self.redo_pile.pop() else {
            return false;
        };
        log::debug!("Redo {}", command.name());
        self.undo_pile.push(command);
        self.refresh(surface);
        true
    }

    /// Rebuild the surface from scratch by replaying the undo pile.
    pub fn refresh(&mut self, surface: &mut dyn DrawingSurface) {
        surface.clear();
        self.reset_size.execute(surface);
        if let Some(image) = &self.initial_image {
            surface.draw_image(image, Affine::IDENTITY);
        }
        for command in &self.undo_pile {
            command.execute(surface);
        }
        log::debug!("Replayed {} commands", self.undo_pile.len());
        self.publish();
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.undo_pile.clear();
        self.redo_pile.clear();
        self.publish();
    }

    pub fn undo_len(&self) -> usize {
        self.undo_pile.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_pile.len()
    }

    pub fn can_undo(&self) -> bool {
        self.flags.can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.flags.can_redo
    }

    pub fn sizes(&self) -> PileSizes {
        PileSizes {
            undo: self.undo_pile.len(),
            redo: self.redo_pile.len(),
        }
    }

    pub fn flags(&self) -> HistoryFlags {
        self.flags
    }

    /// Committed commands, oldest first.
    pub fn commands(&self) -> &[Command] {
        &self.undo_pile
    }

    /// Listen for pile size changes, reported as `[undo, redo]`.
    pub fn on_sizes_changed(&mut self, listener: impl FnMut(&PileSizes) + 'static) -> SubscriptionId {
        self.sizes_changed.subscribe(listener)
    }

    /// Listen for changes to the undo/redo availability flags.
    pub fn on_flags_changed(&mut self, listener: impl FnMut(&HistoryFlags) + 'static) -> SubscriptionId {
        self.flags_changed.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.sizes_changed.unsubscribe(id) || self.flags_changed.unsubscribe(id)
    }

    fn publish(&mut self) {
        self.flags = HistoryFlags {
            can_undo: !self.undo_pile.is_empty(),
            can_redo: !self.redo_pile.is_empty(),
        };
        let sizes = self.sizes();
        self.sizes_changed.emit(&sizes);
        let flags = self.flags;
        self.flags_changed.emit(&flags);
    }
}
