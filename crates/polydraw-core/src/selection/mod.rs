//! Selection rectangle geometry: resize strategies, handles and magnetism.

mod handles;
mod magnetism;
mod resize;

pub use handles::{DEFAULT_HANDLE_SIZE, HandleKind, ResizerHandle, ResizerHandler};
pub use magnetism::{AnchorPoint, Magnetism, snap_to_grid};
pub use resize::{CornerResize, EdgeResize, ResizeStrategy, Side, strategy_for};

use kurbo::{Point, Rect};

/// Live placement of the selection preview.
///
/// Width and height are never negative; when a drag crosses the fixed edge
/// the strategies move `left`/`top` instead.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.left + self.width, self.top + self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        self.rect().contains(point)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Corners of the selection captured when a resize drag starts.
///
/// Each axis strategy anchors on one of these: Right and Bottom on
/// `initial_position`, Left and Top on `bottom_right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeFrame {
    pub initial_position: Point,
    pub bottom_right: Point,
}

impl ResizeFrame {
    pub fn new(initial_position: Point, bottom_right: Point) -> Self {
        Self {
            initial_position,
            bottom_right,
        }
    }

    pub fn from_box(selection: &SelectionBox) -> Self {
        Self::new(selection.top_left(), selection.bottom_right())
    }
}
