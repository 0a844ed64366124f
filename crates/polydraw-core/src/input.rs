//! Input events and tracked input state for pointer and keyboard handling.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// A pointer position in canvas pixels with the button and modifiers held.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Keys the tools react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Escape,
    Shift,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Parse a key name such as `"Enter"`, `"ArrowLeft"` or `"a"`.
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name {
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Shift" => Key::Shift,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Space" => Key::Character(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// Unit direction of an arrow key.
    pub fn arrow_direction(self) -> Option<(f64, f64)> {
        match self {
            Key::ArrowUp => Some((0.0, -1.0)),
            Key::ArrowDown => Some((0.0, 1.0)),
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            _ => None,
        }
    }
}

/// Everything the editor can be fed.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    PointerLeave(PointerEvent),
    Key {
        key: Key,
        pressed: bool,
        modifiers: Modifiers,
    },
    /// Wheel notches, positive away from the user.
    Wheel { event: PointerEvent, delta: f64 },
}

/// Tracks pointer and keyboard state across events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<Key>,
    pub modifiers: Modifiers,
    /// Start position of the current left-button drag.
    pub drag_start: Option<Point>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown(ev) => {
                self.pointer_position = ev.position;
                self.modifiers = ev.modifiers;
                self.pressed_buttons.insert(ev.button);
                if ev.button == MouseButton::Left && self.drag_start.is_none() {
                    self.drag_start = Some(ev.position);
                }
            }
            InputEvent::PointerUp(ev) => {
                self.pointer_position = ev.position;
                self.modifiers = ev.modifiers;
                self.pressed_buttons.remove(&ev.button);
                if ev.button == MouseButton::Left {
                    self.drag_start = None;
                }
            }
            InputEvent::PointerMove(ev) | InputEvent::PointerLeave(ev) => {
                self.pointer_position = ev.position;
                self.modifiers = ev.modifiers;
            }
            InputEvent::Key { key, pressed, modifiers } => {
                self.modifiers = *modifiers;
                if *key == Key::Shift {
                    self.modifiers.shift = *pressed;
                }
                if *pressed {
                    self.pressed_keys.insert(*key);
                } else {
                    self.pressed_keys.remove(key);
                }
            }
            InputEvent::Wheel { event, .. } => {
                self.pointer_position = event.position;
                self.modifiers = event.modifiers;
            }
        }
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_tracking() {
        let mut input = InputState::new();
        input.handle_event(&InputEvent::PointerDown(PointerEvent::new(Point::new(1.0, 2.0))));
        assert!(input.is_dragging());
        assert!(input.is_button_pressed(MouseButton::Left));
        input.handle_event(&InputEvent::PointerMove(PointerEvent::new(Point::new(5.0, 5.0))));
        assert_eq!(input.drag_start, Some(Point::new(1.0, 2.0)));
        assert_eq!(input.pointer_position, Point::new(5.0, 5.0));
        input.handle_event(&InputEvent::PointerUp(PointerEvent::new(Point::new(5.0, 5.0))));
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_shift_key_sets_modifier() {
        let mut input = InputState::new();
        input.handle_event(&InputEvent::Key {
            key: Key::Shift,
            pressed: true,
            modifiers: Modifiers::NONE,
        });
        assert!(input.shift());
        assert!(input.is_key_pressed(Key::Shift));
        input.handle_event(&InputEvent::Key {
            key: Key::Shift,
            pressed: false,
            modifiers: Modifiers::shift(),
        });
        assert!(!input.shift());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_name("x"), Some(Key::Character('x')));
        assert_eq!(Key::from_name("Space"), Some(Key::Character(' ')));
        assert_eq!(Key::from_name("F13"), None);
        assert_eq!(Key::ArrowLeft.arrow_direction(), Some((-1.0, 0.0)));
    }
}
