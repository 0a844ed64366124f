//! Replayable drawing commands.
//!
//! A command captures, by value, everything needed to redraw one finished
//! gesture. Executing the same command against the same surface state always
//! produces the same pixels, which is what lets the history rebuild the
//! drawing by replaying its undo pile from scratch.

mod aerosol;
mod eraser;
mod pencil;
mod reset;
mod selection;
mod shape;
mod stamp;
mod text;

pub use aerosol::AerosolCommand;
pub use eraser::EraserCommand;
pub use pencil::PencilCommand;
pub use reset::ResizeCanvasCommand;
pub use selection::{SelectionCommand, placement};
pub use shape::{
    EllipseCommand, FillMode, MIN_BORDER_WIDTH, POLYGON_SIDES, PolygonCommand, RectangleCommand,
    ShapeGeometry, ShapeParams,
};
pub use stamp::StampCommand;
pub use text::{LINE_HEIGHT, TextAlign, TextCommand};

use crate::surface::DrawingSurface;
use kurbo::{BezPath, Point};

/// The capability every drawing command shares.
pub trait DrawCommand {
    /// Draw onto `surface`. Must be deterministic.
    fn execute(&self, surface: &mut dyn DrawingSurface);
}

/// Any command that can live in the undo history.
#[derive(Debug, Clone)]
pub enum Command {
    Pencil(PencilCommand),
    Eraser(EraserCommand),
    Rectangle(RectangleCommand),
    Ellipse(EllipseCommand),
    Polygon(PolygonCommand),
    Aerosol(AerosolCommand),
    Stamp(StampCommand),
    Text(TextCommand),
    Selection(SelectionCommand),
    ResetSize(ResizeCanvasCommand),
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Pencil(_) => "pencil",
            Command::Eraser(_) => "eraser",
            Command::Rectangle(_) => "rectangle",
            Command::Ellipse(_) => "ellipse",
            Command::Polygon(_) => "polygon",
            Command::Aerosol(_) => "aerosol",
            Command::Stamp(_) => "stamp",
            Command::Text(_) => "text",
            Command::Selection(_) => "selection",
            Command::ResetSize(_) => "reset-size",
        }
    }
}

impl DrawCommand for Command {
    fn execute(&self, surface: &mut dyn DrawingSurface) {
        match self {
            Command::Pencil(c) => c.execute(surface),
            Command::Eraser(c) => c.execute(surface),
            Command::Rectangle(c) => c.execute(surface),
            Command::Ellipse(c) => c.execute(surface),
            Command::Polygon(c) => c.execute(surface),
            Command::Aerosol(c) => c.execute(surface),
            Command::Stamp(c) => c.execute(surface),
            Command::Text(c) => c.execute(surface),
            Command::Selection(c) => c.execute(surface),
            Command::ResetSize(c) => c.execute(surface),
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_command! {
    Pencil => PencilCommand,
    Eraser => EraserCommand,
    Rectangle => RectangleCommand,
    Ellipse => EllipseCommand,
    Polygon => PolygonCommand,
    Aerosol => AerosolCommand,
    Stamp => StampCommand,
    Text => TextCommand,
    Selection => SelectionCommand,
    ResetSize => ResizeCanvasCommand,
}

/// Build an open polyline through `points`.
pub(crate) fn polyline(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
    path
}
