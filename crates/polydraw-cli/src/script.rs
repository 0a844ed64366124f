//! JSON editing scripts.

use anyhow::Context;
use polydraw_core::commands::FillMode;
use polydraw_core::{AnchorPoint, EditorConfig, Modifiers, MouseButton, PointerEvent, Rgba, ToolKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A pointer position plus the button and modifiers held.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointerStep {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub ctrl: bool,
}

impl PointerStep {
    pub fn event(&self) -> PointerEvent {
        PointerEvent::new((self.x, self.y).into())
            .with_button(self.button)
            .with_modifiers(Modifiers {
                shift: self.shift,
                alt: self.alt,
                ctrl: self.ctrl,
                ..Modifiers::NONE
            })
    }
}

fn pressed_default() -> bool {
    true
}

/// One editor operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool {
        tool: ToolKind,
    },
    Down(PointerStep),
    Move(PointerStep),
    Up(PointerStep),
    Leave(PointerStep),
    Wheel {
        x: f64,
        y: f64,
        delta: f64,
        #[serde(default)]
        alt: bool,
    },
    /// A key by name (`"Enter"`, `"ArrowLeft"`, `"a"`).
    Key {
        key: String,
        #[serde(default = "pressed_default")]
        pressed: bool,
    },
    /// Press and release every character of `text`.
    Type {
        text: String,
    },
    Tick {
        ms: u64,
    },
    Undo,
    Redo,
    Color {
        primary: Option<String>,
        secondary: Option<String>,
    },
    Width {
        value: f64,
    },
    Fill {
        mode: FillMode,
    },
    Sides {
        value: u32,
    },
    Grid {
        visible: Option<bool>,
        cell_size: Option<f64>,
        opacity: Option<f64>,
    },
    /// Switch selection magnetism and pick the anchor pulled onto the grid.
    /// With neither field the step toggles magnetism.
    Magnetism {
        enabled: Option<bool>,
        anchor: Option<AnchorPoint>,
    },
    New {
        width: u32,
        height: u32,
    },
}

/// A replayable editing session.
#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub config: EditorConfig,
    /// PNG loaded as the initial image, relative to the script.
    pub image: Option<PathBuf>,
    /// PNG used by the stamp tool, relative to the script.
    pub stamp: Option<PathBuf>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid script")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// The editor configuration with the script's canvas size applied.
    pub fn editor_config(&self) -> EditorConfig {
        let mut config = self.config.clone();
        if let Some(width) = self.width {
            config.canvas_width = width;
        }
        if let Some(height) = self.height {
            config.canvas_height = height;
        }
        config.normalized()
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, 255)),
        8 => Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff8000"), Some(Rgba::new(255, 128, 0, 255)));
        assert_eq!(parse_color(" #00000080 "), Some(Rgba::new(0, 0, 0, 128)));
        assert_eq!(parse_color("ff8000"), None);
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r##"{
                "width": 64,
                "steps": [
                    { "op": "tool", "tool": "rectangle" },
                    { "op": "down", "x": 1, "y": 2, "shift": true },
                    { "op": "up", "x": 3, "y": 4, "button": "right" },
                    { "op": "key", "key": "Enter" },
                    { "op": "fill", "mode": "outline" },
                    { "op": "undo" },
                    { "op": "magnetism", "anchor": "center" }
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(script.steps.len(), 7);
        assert_eq!(
            script.steps[6],
            Step::Magnetism {
                enabled: None,
                anchor: Some(AnchorPoint::Center)
            }
        );
        assert_eq!(script.steps[0], Step::Tool { tool: ToolKind::Rectangle });
        let Step::Down(down) = &script.steps[1] else {
            panic!("expected down");
        };
        assert!(down.event().modifiers.shift);
        let Step::Up(up) = &script.steps[2] else {
            panic!("expected up");
        };
        assert_eq!(up.button, MouseButton::Right);
        assert_eq!(
            script.steps[3],
            Step::Key {
                key: "Enter".to_string(),
                pressed: true
            }
        );

        let config = script.editor_config();
        assert_eq!(config.canvas_width, 64);
        assert_eq!(config.canvas_height, 800);
    }

    #[test]
    fn test_unknown_op_rejected() {
        assert!(Script::from_json(r#"{ "steps": [{ "op": "explode" }] }"#).is_err());
    }
}
