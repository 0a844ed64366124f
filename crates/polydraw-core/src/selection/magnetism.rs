//! Grid magnetism for moving selections.

use crate::notify::{Notifier, SubscriptionId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Snap a point to the nearest grid intersection. A non-positive cell size
/// leaves the point alone.
pub fn snap_to_grid(point: Point, cell_size: f64) -> Point {
    if cell_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / cell_size).round() * cell_size,
        (point.y / cell_size).round() * cell_size,
    )
}

/// Which point of the selection is pulled onto the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPoint {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Center,
}

impl AnchorPoint {
    pub const ALL: [AnchorPoint; 9] = [
        AnchorPoint::TopLeft,
        AnchorPoint::Top,
        AnchorPoint::TopRight,
        AnchorPoint::Right,
        AnchorPoint::BottomRight,
        AnchorPoint::Bottom,
        AnchorPoint::BottomLeft,
        AnchorPoint::Left,
        AnchorPoint::Center,
    ];

    /// Locate this anchor on the box spanned by two corners.
    pub fn locate(self, top_left: Point, bottom_right: Point) -> Point {
        let mid = top_left.midpoint(bottom_right);
        match self {
            AnchorPoint::TopLeft => top_left,
            AnchorPoint::Top => Point::new(mid.x, top_left.y),
            AnchorPoint::TopRight => Point::new(bottom_right.x, top_left.y),
            AnchorPoint::Right => Point::new(bottom_right.x, mid.y),
            AnchorPoint::BottomRight => bottom_right,
            AnchorPoint::Bottom => Point::new(mid.x, bottom_right.y),
            AnchorPoint::BottomLeft => Point::new(top_left.x, bottom_right.y),
            AnchorPoint::Left => Point::new(top_left.x, mid.y),
            AnchorPoint::Center => mid,
        }
    }
}

/// Magnetism state: on/off, the reference anchor and the move in progress.
#[derive(Debug, Default)]
pub struct Magnetism {
    enabled: bool,
    reference: AnchorPoint,
    /// Translation of the selection since the move started.
    transform_delta: Vec2,
    toggled: Notifier<bool>,
}

impl Magnetism {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn reference(&self) -> AnchorPoint {
        self.reference
    }

    pub fn set_reference(&mut self, reference: AnchorPoint) {
        self.reference = reference;
    }

    pub fn transform_delta(&self) -> Vec2 {
        self.transform_delta
    }

    pub fn set_transform_delta(&mut self, delta: Vec2) {
        self.transform_delta = delta;
    }

    /// Flip magnetism on or off and tell the listeners.
    pub fn toggle_magnetism(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::debug!("Magnetism {}", if self.enabled { "on" } else { "off" });
        let enabled = self.enabled;
        self.toggled.emit(&enabled);
        enabled
    }

    pub fn on_toggled(&mut self, listener: impl FnMut(&bool) + 'static) -> SubscriptionId {
        self.toggled.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.toggled.unsubscribe(id)
    }

    /// Every anchor of the box, in [`AnchorPoint::ALL`] order.
    pub fn candidate_points(&self, top_left: Point, bottom_right: Point) -> [(AnchorPoint, Point); 9] {
        AnchorPoint::ALL.map(|anchor| (anchor, anchor.locate(top_left, bottom_right)))
    }

    /// The extra translation that puts the reference anchor, moved by the
    /// pending delta, exactly on a grid intersection.
    pub fn magnetize_selection(&self, top_left: Point, bottom_right: Point, cell_size: f64) -> Vec2 {
        let moved = self.reference.locate(top_left, bottom_right) + self.transform_delta;
        snap_to_grid(moved, cell_size) - moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Point::new(14.0, 16.0), 10.0), Point::new(10.0, 20.0));
        assert_eq!(snap_to_grid(Point::new(-14.0, 3.0), 10.0), Point::new(-10.0, 0.0));
        assert_eq!(snap_to_grid(Point::new(7.0, 7.0), 0.0), Point::new(7.0, 7.0));
    }

    #[test]
    fn test_magnetize_center_and_corner() {
        let mut magnetism = Magnetism::new();
        let tl = Point::new(0.0, 0.0);
        let br = Point::new(100.0, 100.0);

        magnetism.set_reference(AnchorPoint::Center);
        assert_eq!(magnetism.magnetize_selection(tl, br, 30.0), Vec2::new(10.0, 10.0));

        magnetism.set_reference(AnchorPoint::TopLeft);
        assert_eq!(magnetism.magnetize_selection(tl, br, 30.0), Vec2::ZERO);
    }

    #[test]
    fn test_magnetize_accounts_for_pending_delta() {
        let mut magnetism = Magnetism::new();
        magnetism.set_transform_delta(Vec2::new(12.0, 47.0));
        let delta = magnetism.magnetize_selection(Point::new(0.0, 0.0), Point::new(40.0, 40.0), 25.0);
        assert_eq!(delta, Vec2::new(-12.0, 3.0));
        let landed = Point::new(0.0, 0.0) + magnetism.transform_delta() + delta;
        assert_eq!(landed, Point::new(0.0, 50.0));
    }

    #[test]
    fn test_candidate_points() {
        let magnetism = Magnetism::new();
        let points = magnetism.candidate_points(Point::new(0.0, 0.0), Point::new(20.0, 10.0));
        assert_eq!(points[1], (AnchorPoint::Top, Point::new(10.0, 0.0)));
        assert_eq!(points[6], (AnchorPoint::BottomLeft, Point::new(0.0, 10.0)));
        assert_eq!(points[8], (AnchorPoint::Center, Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_toggle_notifies() {
        let mut magnetism = Magnetism::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        magnetism.on_toggled(move |on| s.borrow_mut().push(*on));
        assert!(magnetism.toggle_magnetism());
        assert!(!magnetism.toggle_magnetism());
        assert_eq!(*seen.borrow(), vec![true, false]);
    }
}
