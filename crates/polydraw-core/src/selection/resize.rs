//! Per-handle resize strategies.
//!
//! Each edge strategy owns one axis of the selection box. It keeps the edge
//! captured in the [`ResizeFrame`] fixed and moves the other one to the
//! pointer. When the pointer crosses the fixed edge the box mirrors: the
//! fixed edge becomes the box's near side and the size keeps growing from
//! there. Corner strategies drive one horizontal and one vertical edge.

use super::handles::HandleKind;
use super::{ResizeFrame, SelectionBox};
use kurbo::Point;

/// The edge a strategy drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }

    /// The fixed edge lies past the dragged edge (right or bottom).
    fn anchored_far(self) -> bool {
        matches!(self, Side::Left | Side::Top)
    }
}

/// Geometry for dragging one resize handle.
pub trait ResizeStrategy: std::fmt::Debug {
    /// Follow the pointer. With `aspect_locked`, corner strategies keep the
    /// box square; edge strategies ignore the flag.
    fn resize(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame, pointer: Point, aspect_locked: bool);

    /// Square the box in place (aspect lock engaged without moving).
    fn resize_square(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame);

    /// Undo the squaring when the aspect lock is released.
    fn restore_last_dimensions(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame);

    /// Whether the box is mirrored on the (horizontal, vertical) axis.
    fn mirrored(&self) -> (bool, bool);
}

/// Resize along a single axis from one edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeResize {
    side: Side,
    /// `lastWidth`/`lastHeight`: the size the pointer asked for, before any
    /// aspect lock.
    last_size: f64,
    mirrored: bool,
}

impl EdgeResize {
    fn new(side: Side) -> Self {
        Self {
            side,
            last_size: 0.0,
            mirrored: false,
        }
    }

    pub fn top() -> Self {
        Self::new(Side::Top)
    }

    pub fn bottom() -> Self {
        Self::new(Side::Bottom)
    }

    pub fn left() -> Self {
        Self::new(Side::Left)
    }

    pub fn right() -> Self {
        Self::new(Side::Right)
    }

    /// Seed the cached size from the frame the drag starts on, so an aspect
    /// lock released before any pointer move restores the original size.
    pub fn with_frame(mut self, frame: &ResizeFrame) -> Self {
        self.last_size = if self.side.is_horizontal() {
            frame.bottom_right.x - frame.initial_position.x
        } else {
            frame.bottom_right.y - frame.initial_position.y
        }
        .abs();
        self.mirrored = false;
        self
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn last_size(&self) -> f64 {
        self.last_size
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Coordinate of the fixed edge.
    pub fn anchor(&self, frame: &ResizeFrame) -> f64 {
        match self.side {
            Side::Left => frame.bottom_right.x,
            Side::Right => frame.initial_position.x,
            Side::Top => frame.bottom_right.y,
            Side::Bottom => frame.initial_position.y,
        }
    }

    fn coord(&self, p: Point) -> f64 {
        if self.side.is_horizontal() { p.x } else { p.y }
    }

    fn get(&self, sel: &SelectionBox) -> (f64, f64) {
        if self.side.is_horizontal() {
            (sel.left, sel.width)
        } else {
            (sel.top, sel.height)
        }
    }

    fn set(&self, sel: &mut SelectionBox, position: f64, size: f64) {
        if self.side.is_horizontal() {
            sel.left = position;
            sel.width = size;
        } else {
            sel.top = position;
            sel.height = size;
        }
    }

    /// The box currently lies before (left of / above) its fixed edge.
    fn before_anchor(&self) -> bool {
        self.side.anchored_far() != self.mirrored
    }

    fn track(&mut self, pointer: f64, anchor: f64) {
        self.mirrored = if self.side.anchored_far() {
            pointer > anchor
        } else {
            pointer < anchor
        };
        self.last_size = (pointer - anchor).abs();
    }

    /// Give the box `length` along this axis, extending from `anchor` on the
    /// side the box currently occupies.
    fn place(&self, sel: &mut SelectionBox, anchor: f64, length: f64) {
        let position = if self.before_anchor() { anchor - length } else { anchor };
        self.set(sel, position, length);
    }

    /// Plain drag along this axis.
    pub fn resize_axis(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame, pointer: Point) {
        let anchor = self.anchor(frame);
        let p = self.coord(pointer);
        self.track(p, anchor);
        if p > anchor {
            self.set(sel, anchor, p - anchor);
        } else {
            self.set(sel, p, anchor - p);
        }
    }

    /// Aspect-locked drag: the size is the shorter of the two pointer deltas
    /// measured from `reference`.
    pub fn resize_width(&mut self, sel: &mut SelectionBox, pointer: Point, reference: Point) {
        debug_assert!(self.side.is_horizontal());
        self.resize_locked(sel, pointer, reference);
    }

    /// Vertical counterpart of [`Self::resize_width`].
    pub fn resize_height(&mut self, sel: &mut SelectionBox, pointer: Point, reference: Point) {
        debug_assert!(!self.side.is_horizontal());
        self.resize_locked(sel, pointer, reference);
    }

    fn resize_locked(&mut self, sel: &mut SelectionBox, pointer: Point, reference: Point) {
        let shortest_side = (pointer.x - reference.x).abs().min((pointer.y - reference.y).abs());
        let anchor = self.coord(reference);
        self.track(self.coord(pointer), anchor);
        self.place(sel, anchor, shortest_side);
    }

    /// Force this axis to `length`, or with `combined` and no length, to the
    /// box's shorter side. Without either this is a no-op.
    pub fn resize_square(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame, combined: bool, length: Option<f64>) {
        let length = match length {
            Some(length) => length,
            None if combined => sel.width.min(sel.height),
            None => return,
        };
        self.place(sel, self.anchor(frame), length);
    }

    /// Put back the size cached by the last unlocked (or locked) drag,
    /// keeping the fixed edge where it is.
    pub fn restore_last_dimensions(&mut self, sel: &mut SelectionBox) {
        let (position, size) = self.get(sel);
        let position = if self.before_anchor() {
            position + (size - self.last_size)
        } else {
            position
        };
        self.set(sel, position, self.last_size);
    }
}

impl ResizeStrategy for EdgeResize {
    fn resize(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame, pointer: Point, _aspect_locked: bool) {
        self.resize_axis(sel, frame, pointer);
    }

    fn resize_square(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame) {
        EdgeResize::resize_square(self, sel, frame, false, None);
    }

    fn restore_last_dimensions(&mut self, sel: &mut SelectionBox, _frame: &ResizeFrame) {
        EdgeResize::restore_last_dimensions(self, sel);
    }

    fn mirrored(&self) -> (bool, bool) {
        if self.side.is_horizontal() {
            (self.mirrored, false)
        } else {
            (false, self.mirrored)
        }
    }
}

/// Resize from a corner by driving one horizontal and one vertical edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CornerResize {
    horizontal: EdgeResize,
    vertical: EdgeResize,
}

impl CornerResize {
    fn new(horizontal: EdgeResize, vertical: EdgeResize) -> Self {
        Self { horizontal, vertical }
    }

    pub fn top_left() -> Self {
        Self::new(EdgeResize::left(), EdgeResize::top())
    }

    pub fn top_right() -> Self {
        Self::new(EdgeResize::right(), EdgeResize::top())
    }

    pub fn bottom_left() -> Self {
        Self::new(EdgeResize::left(), EdgeResize::bottom())
    }

    pub fn bottom_right() -> Self {
        Self::new(EdgeResize::right(), EdgeResize::bottom())
    }

    /// Seed both edges from the frame the drag starts on.
    pub fn with_frame(self, frame: &ResizeFrame) -> Self {
        Self::new(self.horizontal.with_frame(frame), self.vertical.with_frame(frame))
    }

    pub fn horizontal(&self) -> &EdgeResize {
        &self.horizontal
    }

    pub fn vertical(&self) -> &EdgeResize {
        &self.vertical
    }

    /// The frame corner opposite the dragged one.
    pub fn reference(&self, frame: &ResizeFrame) -> Point {
        Point::new(self.horizontal.anchor(frame), self.vertical.anchor(frame))
    }

    fn finalize(sel: &mut SelectionBox) {
        sel.width = sel.width.max(0.0);
        sel.height = sel.height.max(0.0);
    }
}

impl ResizeStrategy for CornerResize {
    fn resize(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame, pointer: Point, aspect_locked: bool) {
        if aspect_locked {
            let reference = self.reference(frame);
            self.horizontal.resize_width(sel, pointer, reference);
            self.vertical.resize_height(sel, pointer, reference);
        } else {
            self.horizontal.resize_axis(sel, frame, pointer);
            self.vertical.resize_axis(sel, frame, pointer);
        }
        Self::finalize(sel);
    }

    fn resize_square(&mut self, sel: &mut SelectionBox, frame: &ResizeFrame) {
        self.horizontal.resize_square(sel, frame, true, None);
        self.vertical.resize_square(sel, frame, true, None);
        Self::finalize(sel);
    }

    fn restore_last_dimensions(&mut self, sel: &mut SelectionBox, _frame: &ResizeFrame) {
        self.horizontal.restore_last_dimensions(sel);
        self.vertical.restore_last_dimensions(sel);
        Self::finalize(sel);
    }

    fn mirrored(&self) -> (bool, bool) {
        (self.horizontal.mirrored, self.vertical.mirrored)
    }
}

/// The strategy that implements dragging `kind` from `frame`.
pub fn strategy_for(kind: HandleKind, frame: &ResizeFrame) -> Box<dyn ResizeStrategy> {
    match kind {
        HandleKind::Top => Box::new(EdgeResize::top().with_frame(frame)),
        HandleKind::Bottom => Box::new(EdgeResize::bottom().with_frame(frame)),
        HandleKind::Left => Box::new(EdgeResize::left().with_frame(frame)),
        HandleKind::Right => Box::new(EdgeResize::right().with_frame(frame)),
        HandleKind::TopLeft => Box::new(CornerResize::top_left().with_frame(frame)),
        HandleKind::TopRight => Box::new(CornerResize::top_right().with_frame(frame)),
        HandleKind::BottomLeft => Box::new(CornerResize::bottom_left().with_frame(frame)),
        HandleKind::BottomRight => Box::new(CornerResize::bottom_right().with_frame(frame)),
    }
}
