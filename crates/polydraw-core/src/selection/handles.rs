//! The eight resize handles around a floating selection.

use super::resize::{ResizeStrategy, strategy_for};
use super::{ResizeFrame, SelectionBox};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Handle size in surface pixels.
pub const DEFAULT_HANDLE_SIZE: f64 = 8.0;

/// Position of a handle on the selection box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl HandleKind {
    /// In declaration order, so `kind as usize` indexes it.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::Top,
        HandleKind::TopRight,
        HandleKind::Right,
        HandleKind::BottomRight,
        HandleKind::Bottom,
        HandleKind::BottomLeft,
        HandleKind::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft | HandleKind::TopRight | HandleKind::BottomLeft | HandleKind::BottomRight
        )
    }

    /// The point of `rect` this handle is centred on.
    pub fn point_on(self, rect: Rect) -> Point {
        let mid_x = (rect.x0 + rect.x1) / 2.0;
        let mid_y = (rect.y0 + rect.y1) / 2.0;
        match self {
            HandleKind::TopLeft => Point::new(rect.x0, rect.y0),
            HandleKind::Top => Point::new(mid_x, rect.y0),
            HandleKind::TopRight => Point::new(rect.x1, rect.y0),
            HandleKind::Right => Point::new(rect.x1, mid_y),
            HandleKind::BottomRight => Point::new(rect.x1, rect.y1),
            HandleKind::Bottom => Point::new(mid_x, rect.y1),
            HandleKind::BottomLeft => Point::new(rect.x0, rect.y1),
            HandleKind::Left => Point::new(rect.x0, mid_y),
        }
    }
}

/// A single handle. `position` is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizerHandle {
    pub kind: HandleKind,
    pub position: Point,
    pub visible: bool,
}

impl ResizerHandle {
    fn hidden(kind: HandleKind) -> Self {
        Self {
            kind,
            position: Point::ZERO,
            visible: false,
        }
    }

    pub fn rect(&self, size: f64) -> Rect {
        Rect::from_origin_size(self.position, Size::new(size, size))
    }
}

#[derive(Debug)]
struct ActiveResize {
    kind: HandleKind,
    frame: ResizeFrame,
    strategy: Box<dyn ResizeStrategy>,
}

/// Owns the handles and routes a drag on one of them to its strategy.
#[derive(Debug)]
pub struct ResizerHandler {
    handles: [ResizerHandle; 8],
    active: Option<ActiveResize>,
    handle_size: f64,
}

impl Default for ResizerHandler {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_SIZE)
    }
}

impl ResizerHandler {
    pub fn new(handle_size: f64) -> Self {
        Self {
            handles: HandleKind::ALL.map(ResizerHandle::hidden),
            active: None,
            handle_size: handle_size.max(1.0),
        }
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    /// Start dragging `kind`. The current box becomes the fixed frame.
    pub fn press(&mut self, kind: HandleKind, sel: &SelectionBox) {
        log::debug!("Resize started from {kind:?}");
        let frame = ResizeFrame::from_box(sel);
        self.active = Some(ActiveResize {
            kind,
            strategy: strategy_for(kind, &frame),
            frame,
        });
    }

    /// Follow the pointer. Returns `false` if no handle is pressed.
    pub fn resize(&mut self, sel: &mut SelectionBox, pointer: Point, shift: bool) -> bool {
        let Some(active) = &mut self.active else {
            return false;
        };
        active.strategy.resize(sel, &active.frame, pointer, shift);
        self.set_resizer_positions(sel.rect());
        true
    }

    /// React to the aspect lock changing mid-drag: square the box when
    /// `shift` goes down, restore the unlocked size when it comes up.
    pub fn resize_square(&mut self, sel: &mut SelectionBox, shift: bool) -> bool {
        let Some(active) = &mut self.active else {
            return false;
        };
        if shift {
            active.strategy.resize_square(sel, &active.frame);
        } else {
            active.strategy.restore_last_dimensions(sel, &active.frame);
        }
        self.set_resizer_positions(sel.rect());
        true
    }

    /// End the drag, returning the handle that was held.
    pub fn release(&mut self) -> Option<HandleKind> {
        self.active.take().map(|active| active.kind)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<HandleKind> {
        self.active.as_ref().map(|active| active.kind)
    }

    /// Mirroring of the active drag on the (horizontal, vertical) axes.
    pub fn active_mirrored(&self) -> Option<(bool, bool)> {
        self.active.as_ref().map(|active| active.strategy.mirrored())
    }

    /// Lay the handles out around `rect` and show them.
    pub fn set_resizer_positions(&mut self, rect: Rect) {
        let half = self.handle_size / 2.0;
        for handle in &mut self.handles {
            let center = handle.kind.point_on(rect);
            handle.position = Point::new(center.x - half, center.y - half);
            handle.visible = true;
        }
    }

    /// Hide every handle.
    pub fn reset_resizers(&mut self) {
        for handle in &mut self.handles {
            handle.position = Point::ZERO;
            handle.visible = false;
        }
    }

    /// The visible handle under `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<HandleKind> {
        self.handles
            .iter()
            .filter(|h| h.visible)
            .find(|h| h.rect(self.handle_size).contains(point))
            .map(|h| h.kind)
    }

    pub fn handles(&self) -> impl Iterator<Item = &ResizerHandle> {
        self.handles.iter()
    }

    pub fn handle(&self, kind: HandleKind) -> &ResizerHandle {
        &self.handles[kind as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_offset_by_half_size() {
        let mut handler = ResizerHandler::new(8.0);
        handler.set_resizer_positions(Rect::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(handler.handle(HandleKind::TopLeft).position, Point::new(6.0, 16.0));
        assert_eq!(handler.handle(HandleKind::Bottom).position, Point::new(56.0, 66.0));
        assert_eq!(handler.handle(HandleKind::Right).position, Point::new(106.0, 41.0));
        assert!(handler.handles().all(|h| h.visible));
    }

    #[test]
    fn test_reset_hides_handles() {
        let mut handler = ResizerHandler::default();
        handler.set_resizer_positions(Rect::new(0.0, 0.0, 50.0, 50.0));
        handler.reset_resizers();
        assert!(handler.handles().all(|h| !h.visible && h.position == Point::ZERO));
        assert_eq!(handler.hit_test(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_hit_test() {
        let mut handler = ResizerHandler::new(8.0);
        handler.set_resizer_positions(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(handler.hit_test(Point::new(101.0, 99.0)), Some(HandleKind::BottomRight));
        assert_eq!(handler.hit_test(Point::new(50.0, -2.0)), Some(HandleKind::Top));
        assert_eq!(handler.hit_test(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_drag_updates_box_and_handles() {
        let mut handler = ResizerHandler::new(8.0);
        let mut sel = SelectionBox::new(0.0, 0.0, 100.0, 100.0);
        handler.set_resizer_positions(sel.rect());
        handler.press(HandleKind::BottomRight, &sel);

        assert!(handler.resize(&mut sel, Point::new(150.0, 120.0), false));
        assert_eq!(sel, SelectionBox::new(0.0, 0.0, 150.0, 120.0));
        assert_eq!(handler.handle(HandleKind::BottomRight).position, Point::new(146.0, 116.0));

        assert!(handler.resize_square(&mut sel, true));
        assert_eq!((sel.width, sel.height), (120.0, 120.0));
        assert!(handler.resize_square(&mut sel, false));
        assert_eq!((sel.width, sel.height), (150.0, 120.0));

        assert_eq!(handler.release(), Some(HandleKind::BottomRight));
        assert!(!handler.resize(&mut sel, Point::new(0.0, 0.0), false));
    }

    #[test]
    fn test_shift_toggle_before_moving_restores_box() {
        let mut handler = ResizerHandler::new(8.0);
        let mut sel = SelectionBox::new(0.0, 0.0, 100.0, 50.0);

        handler.press(HandleKind::Right, &sel);
        assert!(handler.resize_square(&mut sel, true));
        assert!(handler.resize_square(&mut sel, false));
        assert_eq!(sel, SelectionBox::new(0.0, 0.0, 100.0, 50.0));
        handler.release();

        handler.press(HandleKind::BottomRight, &sel);
        handler.resize_square(&mut sel, true);
        assert_eq!(sel, SelectionBox::new(0.0, 0.0, 50.0, 50.0));
        handler.resize_square(&mut sel, false);
        assert_eq!(sel, SelectionBox::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(handler.handle(HandleKind::BottomRight).position, Point::new(96.0, 46.0));
    }

    #[test]
    fn test_mirrored_drag_reports_axes() {
        let mut handler = ResizerHandler::new(8.0);
        let mut sel = SelectionBox::new(100.0, 100.0, 50.0, 50.0);
        handler.press(HandleKind::Left, &sel);
        handler.resize(&mut sel, Point::new(200.0, 0.0), false);
        assert_eq!(handler.active_mirrored(), Some((true, false)));
        assert_eq!((sel.left, sel.width), (150.0, 50.0));
    }
}
